//! Shared test utilities for `InvoiceDesk`.
//!
//! This module provides common helpers for building packages, line items and
//! carts with sensible defaults.

use crate::core::{
    cart::Cart,
    totals::{LineItem, Package},
};
use tracing_subscriber::EnvFilter;

/// Routes `tracing` output to the test harness. Safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates a catalog package with sensible defaults.
///
/// # Defaults
/// * `category`: "Utama"
/// * `description`: two bullet lines separated by `<br>`
pub fn test_package(id: &str, name: &str, price: f64) -> Package {
    Package {
        id: id.to_string(),
        name: name.to_string(),
        category: "Utama".to_string(),
        price,
        description: "- Item one<br>- Item two".to_string(),
    }
}

/// Creates a line item with quantity 1 and no details.
#[allow(clippy::unwrap_used)]
pub fn test_item(source_id: &str, price: f64) -> LineItem {
    LineItem::new(source_id, "Test item", "", price).unwrap()
}

/// Creates a cart from `(id, name, price)` tuples, in order.
#[allow(clippy::unwrap_used)]
pub fn setup_cart(packages: &[(&str, &str, f64)]) -> Cart {
    let mut cart = Cart::new();
    for (id, name, price) in packages {
        cart.add_package(&test_package(id, name, *price)).unwrap();
    }
    cart
}
