//! Unified error types for invoice composition.
//!
//! The calculators in [`crate::core`] are total and never fail. Errors only
//! appear at the edges: building line items from raw input, mutating a cart,
//! and loading configuration.

use thiserror::Error;

/// All errors raised by the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or was invalid
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// A price or amount was negative or not finite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// A quantity that cannot be coerced into a positive count
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// The rejected raw quantity
        quantity: String,
    },

    /// A package or bundle name was empty
    #[error("Name cannot be empty")]
    EmptyName,

    /// A package arrived without an identifier
    #[error("Package id cannot be empty")]
    MissingId,

    /// No cart entry with the given id
    #[error("Cart item not found: {id}")]
    ItemNotFound {
        /// Cart entry id or package id that was looked up
        id: String,
    },

    /// The package is already in the cart
    #[error("Package already in cart: {source_id}")]
    DuplicateItem {
        /// Package id that was added twice
        source_id: String,
    },

    /// A bundle could not be created or reverted
    #[error("Bundle error: {message}")]
    Bundle {
        /// What went wrong
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
