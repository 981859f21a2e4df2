//! Request signing for authenticated exchange calls.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use sirocco_core::error::NetworkError;
use sirocco_core::types::Timestamp;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 request signer.
///
/// Produces hex-encoded signatures over the query string exactly as it is
/// transmitted. The API key never enters the signed string; it travels in
/// a request header.
#[derive(Clone)]
pub struct RequestSigner {
    secret: String,
}

impl RequestSigner {
    /// Creates a new signer from an API secret.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Signs a message and returns the hex-encoded signature.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError` if the HMAC cannot be constructed.
    pub fn sign(&self, message: &str) -> Result<String, NetworkError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes()).map_err(|e| {
            NetworkError::Transport {
                reason: format!("failed to create HMAC: {e}"),
            }
        })?;
        mac.update(message.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Builds a query string from parameters, preserving their order.
///
/// The signature is computed over the string exactly as transmitted, so
/// parameters are joined in the order given and never re-sorted.
#[must_use]
pub fn build_query_string(params: &[(&str, &str)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Builds a signed query string with an explicit timestamp.
///
/// Appends `timestamp=<millis>` to the parameter string (or uses the bare
/// timestamp when there are no parameters), signs the result, and appends
/// the signature.
///
/// # Errors
///
/// Returns `NetworkError` if signing fails.
pub fn signed_query_at(
    params: &[(&str, &str)],
    signer: &RequestSigner,
    timestamp_ms: i64,
) -> Result<String, NetworkError> {
    let query = build_query_string(params);
    let query = if query.is_empty() {
        format!("timestamp={timestamp_ms}")
    } else {
        format!("{query}&timestamp={timestamp_ms}")
    };
    let signature = signer.sign(&query)?;
    Ok(format!("{query}&signature={signature}"))
}

/// Builds a signed query string timestamped with the current wall clock.
///
/// # Errors
///
/// Returns `NetworkError` if signing fails.
pub fn signed_query(
    params: &[(&str, &str)],
    signer: &RequestSigner,
) -> Result<String, NetworkError> {
    signed_query_at(params, signer, Timestamp::now().as_millis())
}
