//! Exchange-related error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ErrorSeverity;

/// Exchange error type covering authentication failures and business
/// errors reported by the exchange API.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExchangeError {
    /// Credentials were rejected (HTTP 401/403).
    ///
    /// During preflight this is a finding, collected per account rather
    /// than raised, so the remaining accounts still get checked.
    #[error("[Exchange] Authentication failed for account {account_id}: status {status} - {reason}")]
    AuthenticationFailed {
        /// Account whose credentials were rejected.
        account_id: u32,
        /// HTTP status returned (401 or 403).
        status: u16,
        /// Status reason.
        reason: String,
    },

    /// Exchange-level error carried inside an HTTP 200 response.
    ///
    /// The spot API can acknowledge the transport request and still report
    /// a business failure in the body; this must not be mistaken for
    /// success.
    #[error("[Exchange] Business error: code={code}, message={message}")]
    Business {
        /// Error code from the exchange.
        code: i64,
        /// Error message from the exchange.
        message: String,
    },

    /// Exchange returned an error the client has no specific mapping for.
    #[error("[Exchange] Unknown error: code={code}, message={message}")]
    Unknown {
        /// Error code from the exchange.
        code: i64,
        /// Error message from the exchange.
        message: String,
    },
}

impl ExchangeError {
    /// Returns the severity level of this error.
    #[must_use]
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::AuthenticationFailed { .. } => ErrorSeverity::Finding,
            Self::Business { .. } | Self::Unknown { .. } => ErrorSeverity::Fatal,
        }
    }

    /// Returns the exchange error code if available.
    #[must_use]
    pub fn error_code(&self) -> Option<i64> {
        match self {
            Self::Business { code, .. } | Self::Unknown { code, .. } => Some(*code),
            Self::AuthenticationFailed { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_error() {
        let error = ExchangeError::Business {
            code: -2010,
            message: "Account has insufficient balance".to_string(),
        };
        assert!(error.to_string().contains("-2010"));
        assert_eq!(error.error_code(), Some(-2010));
        assert!(error.severity().is_fatal());
    }

    #[test]
    fn test_authentication_failed_is_finding() {
        let error = ExchangeError::AuthenticationFailed {
            account_id: 3,
            status: 401,
            reason: "Unauthorized".to_string(),
        };
        assert!(!error.severity().is_fatal());
        assert!(error.to_string().contains("account 3"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let error = ExchangeError::Business {
            code: -1013,
            message: "Filter failure".to_string(),
        };
        let json = serde_json::to_string(&error).unwrap();
        let parsed: ExchangeError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, parsed);
    }
}
