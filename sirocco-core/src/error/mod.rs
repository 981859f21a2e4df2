//! Error types and handling framework.
//!
//! Hierarchical error types for the Sirocco order placer:
//! - [`SiroccoError`] - Top-level error type
//!   - [`ConfigError`] - Configuration and input errors (always fatal)
//!   - [`NetworkError`] - Transport and HTTP errors
//!   - [`ExchangeError`] - Exchange API errors, including business errors
//!     embedded in otherwise-successful responses
//!
//! No error in this hierarchy is retried automatically; severity only
//! tells the caller how far a failure reaches (one check vs. the run).

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

mod config;
mod exchange;
mod network;

pub use config::ConfigError;
pub use exchange::ExchangeError;
pub use network::NetworkError;

/// Error severity levels for categorizing errors.
///
/// - `Fatal`: ends the current run
/// - `Finding`: collected and reported, the run continues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ErrorSeverity {
    /// Unrecoverable error; the run must stop.
    #[default]
    Fatal,

    /// Reportable defect that does not stop the run (dry-run findings).
    Finding,
}

impl ErrorSeverity {
    /// Returns true if this error is fatal to the run.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal)
    }

    /// Returns the severity as a static string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fatal => "FATAL",
            Self::Finding => "FINDING",
        }
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Top-level error type for the Sirocco order placer.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SiroccoError {
    /// Configuration or input error.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// Transport or HTTP error.
    #[error("{0}")]
    Network(#[from] NetworkError),

    /// Exchange API error.
    #[error("{0}")]
    Exchange(#[from] ExchangeError),
}

impl SiroccoError {
    /// Returns the severity level of this error.
    #[must_use]
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Config(_) | Self::Network(_) => ErrorSeverity::Fatal,
            Self::Exchange(e) => e.severity(),
        }
    }

    /// Returns the error category as a string.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Network(_) => "network",
            Self::Exchange(_) => "exchange",
        }
    }

    /// Returns the inner network error, if this is a network error.
    #[must_use]
    pub fn as_network_error(&self) -> Option<&NetworkError> {
        match self {
            Self::Network(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the inner exchange error, if this is an exchange error.
    #[must_use]
    pub fn as_exchange_error(&self) -> Option<&ExchangeError> {
        match self {
            Self::Exchange(e) => Some(e),
            _ => None,
        }
    }
}

/// A specialized Result type for Sirocco operations.
pub type Result<T> = std::result::Result<T, SiroccoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_display() {
        assert_eq!(ErrorSeverity::Fatal.to_string(), "FATAL");
        assert_eq!(ErrorSeverity::Finding.to_string(), "FINDING");
    }

    #[test]
    fn test_config_error_conversion() {
        let err: SiroccoError = ConfigError::InvalidDirection {
            value: "hold".to_string(),
        }
        .into();
        assert_eq!(err.category(), "config");
        assert!(err.severity().is_fatal());
    }

    #[test]
    fn test_network_error_conversion() {
        let network_err = NetworkError::Timeout { timeout_ms: 5000 };
        let err: SiroccoError = network_err.clone().into();
        assert_eq!(err.category(), "network");
        assert_eq!(err.as_network_error(), Some(&network_err));
        assert!(err.as_exchange_error().is_none());
    }

    #[test]
    fn test_exchange_error_conversion() {
        let exchange_err = ExchangeError::Business {
            code: -1013,
            message: "Filter failure: PRICE_FILTER".to_string(),
        };
        let err: SiroccoError = exchange_err.clone().into();
        assert_eq!(err.category(), "exchange");
        assert_eq!(err.as_exchange_error(), Some(&exchange_err));
        assert!(err.severity().is_fatal());
    }

    #[test]
    fn test_credential_error_is_finding() {
        let err: SiroccoError = ExchangeError::AuthenticationFailed {
            account_id: 2,
            status: 401,
            reason: "Unauthorized".to_string(),
        }
        .into();
        assert_eq!(err.severity(), ErrorSeverity::Finding);
    }

    #[test]
    fn test_serde_roundtrip() {
        let err = SiroccoError::Network(NetworkError::Timeout { timeout_ms: 3000 });
        let json = serde_json::to_string(&err).unwrap();
        let parsed: SiroccoError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, parsed);
    }
}
