//! Symbol type for representing trading pair identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Symbol type - used for representing trading pair identifiers.
///
/// Wraps a `String` value with validation to ensure proper format.
/// Binance spot symbols are compact, e.g. "JTOUSDT" or "ETHBTC".
///
/// # Examples
///
/// ```
/// use sirocco_core::types::Symbol;
///
/// let symbol = Symbol::new("JTOUSDT").unwrap();
/// assert_eq!(symbol.as_str(), "JTOUSDT");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a new `Symbol` from a string.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptySymbol` if the string is empty.
    /// Returns `ValidationError::InvalidSymbol` if the format is invalid.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }
        // Basic validation: must contain only alphanumeric chars, hyphens, underscores
        if !s
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ValidationError::InvalidSymbol(s));
        }
        Ok(Self(s))
    }

    /// Creates a new `Symbol` without validation.
    ///
    /// # Safety
    ///
    /// The caller must ensure the value is a valid symbol format.
    #[must_use]
    pub fn new_unchecked(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Symbol {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_new_valid() {
        let symbol = Symbol::new("JTOUSDT").unwrap();
        assert_eq!(symbol.as_str(), "JTOUSDT");
    }

    #[test]
    fn test_symbol_new_empty() {
        let result = Symbol::new("");
        assert!(matches!(result, Err(ValidationError::EmptySymbol)));
    }

    #[test]
    fn test_symbol_new_invalid_chars() {
        let result = Symbol::new("JTO@USDT");
        assert!(matches!(result, Err(ValidationError::InvalidSymbol(_))));
    }

    #[test]
    fn test_symbol_display() {
        let symbol = Symbol::new("ETHBTC").unwrap();
        assert_eq!(format!("{symbol}"), "ETHBTC");
    }

    #[test]
    fn test_symbol_serde_roundtrip() {
        let symbol = Symbol::new("JTOUSDT").unwrap();
        let json = serde_json::to_string(&symbol).unwrap();
        let parsed: Symbol = serde_json::from_str(&json).unwrap();
        assert_eq!(symbol, parsed);
    }
}
