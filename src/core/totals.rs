//! Totals business logic - line items and invoice totals.
//!
//! A [`LineItem`] is a snapshot of a catalog [`Package`] taken when it is added
//! to a cart. Only its quantity may change afterwards. [`calculate_totals`]
//! reduces a list of line items to a subtotal and a grand total after cashback;
//! it is pure, never fails, and clamps its inputs instead of rejecting them.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Smallest quantity a line item can contribute.
pub const MIN_QTY: i64 = 1;

/// A sellable package from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// Catalog identifier of the package
    pub id: String,
    /// Display name
    pub name: String,
    /// Catalog grouping (e.g. "Utama", "Bonus")
    #[serde(default)]
    pub category: String,
    /// Unit price
    pub price: f64,
    /// Free-form description, possibly with `<br>` markup
    #[serde(default)]
    pub description: String,
}

impl Package {
    /// Creates a catalog package from raw input, trimming `id` and `name`.
    ///
    /// # Errors
    /// Returns an error if:
    /// - `id` is empty or whitespace-only
    /// - `name` is empty or whitespace-only
    /// - `price` is negative or not finite
    pub fn new(
        id: &str,
        name: &str,
        category: &str,
        price: f64,
        description: &str,
    ) -> Result<Self> {
        let id = id.trim();
        if id.is_empty() {
            return Err(Error::MissingId);
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::EmptyName);
        }
        validate_amount(price)?;

        Ok(Self {
            id: id.to_string(),
            name: name.to_string(),
            category: category.trim().to_string(),
            price,
            description: description.to_string(),
        })
    }
}

/// One package entry in an invoice-in-progress cart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    id: Uuid,
    source_id: String,
    description: String,
    details: String,
    unit_price: f64,
    quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    bundle_of: Option<Vec<LineItem>>,
}

impl LineItem {
    /// Creates a line item with quantity 1 and a fresh id.
    ///
    /// # Errors
    /// Returns an error if:
    /// - `source_id` is empty or whitespace-only
    /// - `description` is empty or whitespace-only
    /// - `unit_price` is negative or not finite
    pub fn new(
        source_id: &str,
        description: &str,
        details: &str,
        unit_price: f64,
    ) -> Result<Self> {
        let source_id = source_id.trim();
        if source_id.is_empty() {
            return Err(Error::MissingId);
        }
        let description = description.trim();
        if description.is_empty() {
            return Err(Error::EmptyName);
        }
        validate_amount(unit_price)?;

        Ok(Self {
            id: Uuid::new_v4(),
            source_id: source_id.to_string(),
            description: description.to_string(),
            details: details.to_string(),
            unit_price,
            quantity: MIN_QTY,
            bundle_of: None,
        })
    }

    /// Snapshots a catalog package into a new cart entry.
    pub fn from_package(package: &Package) -> Result<Self> {
        Self::new(
            &package.id,
            &package.name,
            &package.description,
            package.price,
        )
    }

    /// Builds a bundle entry that replaces `sources` in a cart.
    pub(crate) fn bundle(
        title: &str,
        details: String,
        unit_price: f64,
        sources: Vec<Self>,
    ) -> Result<Self> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::EmptyName);
        }
        validate_amount(unit_price)?;

        let id = Uuid::new_v4();
        Ok(Self {
            id,
            source_id: format!("bundle:{id}"),
            description: title.to_string(),
            details,
            unit_price,
            quantity: MIN_QTY,
            bundle_of: Some(sources),
        })
    }

    /// Unique id of this cart entry
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Id of the package this entry was created from
    #[must_use]
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Display name captured when the entry was added
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Raw description text captured when the entry was added
    #[must_use]
    pub fn details(&self) -> &str {
        &self.details
    }

    /// Unit price captured when the entry was added
    #[must_use]
    pub const fn unit_price(&self) -> f64 {
        self.unit_price
    }

    /// Current quantity
    #[must_use]
    pub const fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Quantity used in totals, never below [`MIN_QTY`].
    #[must_use]
    pub fn effective_quantity(&self) -> i64 {
        self.quantity.max(MIN_QTY)
    }

    /// `unit_price * effective_quantity`
    #[must_use]
    pub fn line_total(&self) -> f64 {
        // Cast safety: quantities are small counts, well inside f64's exact range.
        #[allow(clippy::cast_precision_loss)]
        let qty = self.effective_quantity() as f64;
        self.unit_price * qty
    }

    /// Whether this entry was produced by merging other entries
    #[must_use]
    pub const fn is_bundle(&self) -> bool {
        self.bundle_of.is_some()
    }

    /// The entries a bundle was merged from
    #[must_use]
    pub fn bundle_sources(&self) -> Option<&[Self]> {
        self.bundle_of.as_deref()
    }

    /// Sets the quantity, clamped to at least [`MIN_QTY`]. Bundles stay at 1.
    ///
    /// Returns the quantity actually stored.
    pub fn set_quantity(&mut self, quantity: i64) -> i64 {
        self.quantity = if self.is_bundle() {
            MIN_QTY
        } else {
            quantity.max(MIN_QTY)
        };
        self.quantity
    }

    pub(crate) fn into_bundle_sources(self) -> Option<Vec<Self>> {
        self.bundle_of
    }
}

/// Subtotal and grand total of a set of line items. Always derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Totals {
    /// Sum of `unit_price * quantity` over all items
    pub subtotal: f64,
    /// `max(0, subtotal - cashback)`
    pub grand_total: f64,
}

/// Computes subtotal and grand total after cashback.
///
/// Each item contributes `unit_price * max(1, quantity)`. Negative cashback is
/// treated as zero, and the grand total never goes below zero.
///
/// # Examples
/// ```
/// use invoice_desk::core::totals::{calculate_totals, LineItem};
/// let mut a = LineItem::new("p1", "Photo", "", 100_000.0).unwrap();
/// a.set_quantity(2);
/// let b = LineItem::new("p2", "Video", "", 50_000.0).unwrap();
/// let totals = calculate_totals(&[a, b], 25_000.0);
/// assert_eq!(totals.subtotal, 250_000.0);
/// assert_eq!(totals.grand_total, 225_000.0);
/// ```
#[must_use]
pub fn calculate_totals(items: &[LineItem], cashback: f64) -> Totals {
    let subtotal: f64 = items.iter().map(LineItem::line_total).sum();
    let grand_total = (subtotal - cashback.max(0.0)).max(0.0);
    Totals {
        subtotal,
        grand_total,
    }
}

/// Parses a quantity typed into a form, e.g. `"3"` or `"2.0"`.
///
/// Fractions are truncated and the result is clamped to at least [`MIN_QTY`].
///
/// # Errors
/// Returns [`Error::InvalidQuantity`] if the input is not a finite number.
pub fn parse_quantity(raw: &str) -> Result<i64> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| Error::InvalidQuantity {
            quantity: raw.to_string(),
        })?;
    coerce_quantity(value)
}

/// Turns a numeric quantity into a whole count of at least [`MIN_QTY`].
///
/// # Errors
/// Returns [`Error::InvalidQuantity`] if `value` is NaN or infinite.
// Cast safety: finite, truncation toward zero is the intended coercion.
#[allow(clippy::cast_possible_truncation)]
pub fn coerce_quantity(value: f64) -> Result<i64> {
    if !value.is_finite() {
        return Err(Error::InvalidQuantity {
            quantity: value.to_string(),
        });
    }
    Ok((value.trunc() as i64).max(MIN_QTY))
}

/// Parses a money amount typed into a form (cashback, schedule slots).
///
/// # Errors
/// Returns an error if the input is not a number, is negative, or is not finite.
pub fn parse_amount(raw: &str) -> Result<f64> {
    let amount: f64 = raw.trim().parse().map_err(|_| Error::InvalidAmount {
        amount: f64::NAN,
    })?;
    validate_amount(amount)
}

/// Checks that an amount is finite and not negative, returning it unchanged.
///
/// # Errors
/// Returns [`Error::InvalidAmount`] otherwise.
pub fn validate_amount(amount: f64) -> Result<f64> {
    if amount < 0.0 || !amount.is_finite() {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    /// Builds an item bypassing the quantity clamp, as a careless caller could.
    fn raw_item(price: f64, quantity: i64) -> LineItem {
        LineItem {
            quantity,
            ..test_item("raw", price)
        }
    }

    #[test]
    fn test_calculate_totals_with_cashback() {
        let items = vec![raw_item(100_000.0, 2), raw_item(50_000.0, 1)];
        let totals = calculate_totals(&items, 25_000.0);
        assert_eq!(totals.subtotal, 250_000.0);
        assert_eq!(totals.grand_total, 225_000.0);
    }

    #[test]
    fn test_calculate_totals_empty_cart() {
        let totals = calculate_totals(&[], 0.0);
        assert_eq!(totals.subtotal, 0.0);
        assert_eq!(totals.grand_total, 0.0);
    }

    #[test]
    fn test_calculate_totals_non_positive_quantity_counts_as_one() {
        let items = vec![raw_item(1_000.0, 0), raw_item(2_000.0, -5)];
        let totals = calculate_totals(&items, 0.0);
        assert_eq!(totals.subtotal, 3_000.0);
    }

    #[test]
    fn test_calculate_totals_negative_cashback_ignored() {
        let items = vec![raw_item(1_000.0, 1)];
        let totals = calculate_totals(&items, -500.0);
        assert_eq!(totals.grand_total, 1_000.0);
    }

    #[test]
    fn test_calculate_totals_nan_cashback_ignored() {
        let items = vec![raw_item(1_000.0, 1)];
        let totals = calculate_totals(&items, f64::NAN);
        assert_eq!(totals.grand_total, 1_000.0);
    }

    #[test]
    fn test_calculate_totals_oversized_cashback_floors_at_zero() {
        let items = vec![raw_item(1_000.0, 3)];
        let totals = calculate_totals(&items, 1_000_000.0);
        assert_eq!(totals.subtotal, 3_000.0);
        assert_eq!(totals.grand_total, 0.0);
    }

    #[test]
    fn test_calculate_totals_keeps_fractional_precision() {
        let items = vec![raw_item(0.5, 3), raw_item(100.25, 1)];
        let totals = calculate_totals(&items, 0.0);
        assert_eq!(totals.subtotal, 101.75);
    }

    #[test]
    fn test_calculate_totals_order_independent() {
        let a = raw_item(100.0, 3);
        let b = raw_item(250.0, 2);
        let c = raw_item(75.0, 1);
        let forward = calculate_totals(&[a.clone(), b.clone(), c.clone()], 10.0);
        let backward = calculate_totals(&[c, b, a], 10.0);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_line_item_from_package_snapshots_fields() {
        let package = test_package("pkg-1", "Wedding Photo", 1_500_000.0);
        let item = LineItem::from_package(&package).unwrap();
        assert_eq!(item.source_id(), "pkg-1");
        assert_eq!(item.description(), "Wedding Photo");
        assert_eq!(item.details(), package.description);
        assert_eq!(item.unit_price(), 1_500_000.0);
        assert_eq!(item.quantity(), 1);
        assert!(!item.is_bundle());
    }

    #[test]
    fn test_line_item_ids_are_unique_per_entry() {
        let package = test_package("pkg-1", "Wedding Photo", 10.0);
        let a = LineItem::from_package(&package).unwrap();
        let b = LineItem::from_package(&package).unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.source_id(), b.source_id());
    }

    #[test]
    fn test_line_item_rejects_invalid_input() {
        assert!(matches!(
            LineItem::new("  ", "Name", "", 1.0),
            Err(Error::MissingId)
        ));
        assert!(matches!(
            LineItem::new("p", " ", "", 1.0),
            Err(Error::EmptyName)
        ));
        assert!(matches!(
            LineItem::new("p", "Name", "", -1.0),
            Err(Error::InvalidAmount { .. })
        ));
        assert!(matches!(
            LineItem::new("p", "Name", "", f64::INFINITY),
            Err(Error::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_set_quantity_clamps_to_minimum() {
        let mut item = test_item("p", 10.0);
        assert_eq!(item.set_quantity(4), 4);
        assert_eq!(item.set_quantity(0), 1);
        assert_eq!(item.set_quantity(-3), 1);
        assert_eq!(item.line_total(), 10.0);
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("3").unwrap(), 3);
        assert_eq!(parse_quantity(" 2.9 ").unwrap(), 2);
        assert_eq!(parse_quantity("0").unwrap(), 1);
        assert_eq!(parse_quantity("-4").unwrap(), 1);
        assert!(parse_quantity("abc").is_err());
        assert!(parse_quantity("inf").is_err());
    }

    #[test]
    fn test_coerce_quantity() {
        assert_eq!(coerce_quantity(4.0).unwrap(), 4);
        assert_eq!(coerce_quantity(1.9).unwrap(), 1);
        assert_eq!(coerce_quantity(-2.0).unwrap(), 1);
        assert!(matches!(
            coerce_quantity(f64::NAN),
            Err(Error::InvalidQuantity { .. })
        ));
    }

    #[test]
    fn test_package_new_validates_and_trims() {
        let package = Package::new(" pkg-1 ", " Wedding Photo ", "Utama", 10.0, "- a").unwrap();
        assert_eq!(package.id, "pkg-1");
        assert_eq!(package.name, "Wedding Photo");
        assert_eq!(package.description, "- a");
        assert!(matches!(
            Package::new("", "Name", "", 1.0, ""),
            Err(Error::MissingId)
        ));
        assert!(matches!(
            Package::new("p", "  ", "", 1.0, ""),
            Err(Error::EmptyName)
        ));
        assert!(matches!(
            Package::new("p", "Name", "", f64::NAN, ""),
            Err(Error::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("500000").unwrap(), 500_000.0);
        assert_eq!(parse_amount("0").unwrap(), 0.0);
        assert!(parse_amount("-1").is_err());
        assert!(parse_amount("NaN").is_err());
        assert!(parse_amount("").is_err());
    }
}
