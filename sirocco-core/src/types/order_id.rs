//! Order identifier type.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Exchange-assigned order identifier.
///
/// Stored as a string so numeric and alphanumeric exchange id schemes
/// both fit without loss.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Creates a new `OrderId` from a string.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyOrderId` if the string is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.is_empty() {
            return Err(ValidationError::EmptyOrderId);
        }
        Ok(Self(s))
    }

    /// Returns the order ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for OrderId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_id_new() {
        let id = OrderId::new("12345").unwrap();
        assert_eq!(id.as_str(), "12345");
    }

    #[test]
    fn test_order_id_empty() {
        assert!(matches!(
            OrderId::new(""),
            Err(ValidationError::EmptyOrderId)
        ));
    }

    #[test]
    fn test_order_id_from_u64() {
        let id = OrderId::from(42u64);
        assert_eq!(id.as_str(), "42");
    }
}
