//! Configuration-related error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error type covering malformed input, missing credentials,
/// and invalid throttle settings.
///
/// Configuration errors surface immediately and are never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigError {
    /// Order direction value is not one of the recognized values.
    #[error("[Config] Invalid direction detected: {value}")]
    InvalidDirection {
        /// The offending direction value.
        value: String,
    },

    /// Order row violates an invariant (non-positive price or quantity).
    #[error("[Config] Invalid order: {reason}")]
    InvalidOrder {
        /// Reason why the order is invalid.
        reason: String,
    },

    /// Throttle weight exceeds the bucket capacity and can never be satisfied.
    #[error("[Config] Throttle weight {weight} exceeds bucket capacity {capacity}")]
    ThrottleWeightExceedsCapacity {
        /// Requested acquisition weight.
        weight: u32,
        /// Configured bucket capacity.
        capacity: u32,
    },

    /// No credentials are configured for a referenced account.
    #[error("[Config] No credentials configured for account {account_id}")]
    UnknownAccount {
        /// Account id referenced by an order row.
        account_id: u32,
    },

    /// Environment variable is missing.
    #[error("[Config] Missing environment variable: {name}")]
    MissingEnvVar {
        /// Name of the missing environment variable.
        name: String,
    },

    /// Environment variable has invalid value.
    #[error("[Config] Invalid environment variable '{name}': {reason}")]
    InvalidEnvVar {
        /// Name of the environment variable.
        name: String,
        /// Reason why the value is invalid.
        reason: String,
    },

    /// Input file could not be read or has invalid shape.
    #[error("[Config] Invalid input file '{path}': {reason}")]
    InvalidInput {
        /// Path to the input file.
        path: String,
        /// Reason for the failure.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_direction_message() {
        let error = ConfigError::InvalidDirection {
            value: "short".to_string(),
        };
        assert!(error.to_string().contains("short"));
    }

    #[test]
    fn test_throttle_weight_message() {
        let error = ConfigError::ThrottleWeightExceedsCapacity {
            weight: 100,
            capacity: 45,
        };
        let message = error.to_string();
        assert!(message.contains("100"));
        assert!(message.contains("45"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let error = ConfigError::UnknownAccount { account_id: 4 };
        let json = serde_json::to_string(&error).unwrap();
        let parsed: ConfigError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, parsed);
    }
}
