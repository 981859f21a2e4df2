//! NewType wrappers for financial primitives.
//!
//! This module provides type-safe wrappers around decimal and string values
//! to prevent mixing incompatible types at compile time.
//!
//! # Types
//!
//! - [`Price`] - Asset price values
//! - [`Quantity`] - Trading quantities
//! - [`Symbol`] - Trading pair identifiers
//! - [`OrderId`] - Exchange-assigned order identifiers
//! - [`Timestamp`] - Unix millisecond timestamps

mod order_id;
mod price;
mod quantity;
mod symbol;
mod timestamp;

pub use order_id::OrderId;
pub use price::Price;
pub use quantity::Quantity;
pub use symbol::Symbol;
pub use timestamp::Timestamp;

/// Identifier of a configured sub-account.
pub type AccountId = u32;

/// Validation error for `NewType` construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Price value is negative
    #[error("price cannot be negative: {0}")]
    NegativePrice(rust_decimal::Decimal),

    /// Quantity value is negative
    #[error("quantity cannot be negative: {0}")]
    NegativeQuantity(rust_decimal::Decimal),

    /// Value could not be parsed as a decimal
    #[error("invalid decimal value: {0}")]
    InvalidDecimal(String),

    /// Symbol format is invalid
    #[error("invalid symbol format: {0}")]
    InvalidSymbol(String),

    /// Symbol is empty
    #[error("symbol cannot be empty")]
    EmptySymbol,

    /// Order ID is empty
    #[error("order ID cannot be empty")]
    EmptyOrderId,

    /// Timestamp is invalid (zero or negative)
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(i64),
}
