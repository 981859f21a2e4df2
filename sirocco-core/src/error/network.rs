//! Network-related error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Network error type covering transport faults and HTTP-level failures.
///
/// Any of these is fatal to the batch it occurs in; the engine cancels
/// sibling tasks and surfaces the original status and reason unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkError {
    /// Connection to remote host failed.
    #[error("[Network] Connection failed: {reason}")]
    ConnectionFailed {
        /// Reason for the connection failure.
        reason: String,
    },

    /// Request timed out.
    #[error("[Network] Request timeout after {timeout_ms}ms")]
    Timeout {
        /// Timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// HTTP request completed with a non-success status.
    #[error("[Network] HTTP error: status {status_code} - {reason}")]
    Http {
        /// HTTP status code.
        status_code: u16,
        /// Reason or response body for the HTTP error.
        reason: String,
    },

    /// Response body could not be decoded.
    #[error("[Network] Invalid response: {reason}")]
    InvalidResponse {
        /// Reason why decoding failed.
        reason: String,
    },

    /// Transport-level failure not covered by a more specific variant.
    #[error("[Network] Transport fault: {reason}")]
    Transport {
        /// Reason for the fault.
        reason: String,
    },
}

impl NetworkError {
    /// Returns the HTTP status code, if this error carries one.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}
