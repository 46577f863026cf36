//! Commerce error types.

use thiserror::Error;

use crate::ids::LineId;

/// Errors that can occur in cart, pricing and checkout operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Quantity input failed type or sign checks.
    #[error("Invalid quantity: {0:?}")]
    InvalidQuantity(String),

    /// Line not present in the cart.
    #[error("Unknown cart line: {0}")]
    UnknownLine(LineId),

    /// Checkout attempted on a cart with no lines.
    #[error("Cannot assemble an order from an empty cart")]
    EmptyCart,

    /// Checkout incomplete.
    #[error("Checkout incomplete: missing {0}")]
    CheckoutIncomplete(&'static str),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Catalog data could not be ingested.
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Persistence layer failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The external order API rejected or failed the submission.
    #[error("Order submission failed: {0}")]
    Gateway(String),
}

#[cfg(feature = "storage")]
impl From<larder_cache::CacheError> for CommerceError {
    fn from(e: larder_cache::CacheError) -> Self {
        CommerceError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::Serialization(e.to_string())
    }
}
