//! Spot endpoint trait - the seam between the engine and exchange clients.
//!
//! The submission engine and the preflight validator only ever see
//! [`SpotEndpoint`]; the caller decides at construction time whether a real
//! REST client or a simulation client sits behind it. There is no runtime
//! environment sniffing inside any constructor.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::data::OrderRequest;
use crate::error::NetworkError;

/// Authentication credentials for one sub-account.
///
/// # Security
///
/// The secret is only reachable through [`Credentials::api_secret`] and is
/// excluded from `Debug` output.
#[derive(Clone)]
pub struct Credentials {
    /// API key, transmitted in a request header.
    pub api_key: String,

    /// API secret used for signing requests. Never serialized or logged.
    api_secret: String,
}

impl Credentials {
    /// Creates new credentials with API key and secret.
    #[must_use]
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Returns the API secret.
    ///
    /// # Security
    ///
    /// Only use this for signing requests; never log or serialize it.
    #[must_use]
    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// A decoded-on-demand exchange response.
///
/// Carries the HTTP status, the status reason when the transport supplied
/// one, and the raw body text. The body is only parsed when a caller asks
/// for it via [`EndpointResponse::json`].
#[derive(Debug, Clone)]
pub struct EndpointResponse {
    status: u16,
    reason: Option<String>,
    body: String,
}

impl EndpointResponse {
    /// Creates a response from its parts.
    #[must_use]
    pub fn new(status: u16, reason: Option<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            reason,
            body: body.into(),
        }
    }

    /// Returns true if the status indicates success (status < 300).
    #[must_use]
    pub const fn ok(&self) -> bool {
        self.status < 300
    }

    /// Returns the HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Returns the status reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Returns the raw body text.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::InvalidResponse` if the body is not valid
    /// JSON for the requested type.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, NetworkError> {
        serde_json::from_str(&self.body).map_err(|e| NetworkError::InvalidResponse {
            reason: format!("failed to decode response body: {e}"),
        })
    }
}

/// Spot trading endpoint capability set.
///
/// Implementations wrap a signer, a throttler, and a transport; every
/// method waits on the throttler before touching the wire. Transport and
/// HTTP failures surface unchanged as `NetworkError` - classification of
/// recoverability belongs to the caller.
#[async_trait]
pub trait SpotEndpoint: Send + Sync {
    /// Submits a limit order.
    async fn place_order(&self, order: &OrderRequest) -> Result<EndpointResponse, NetworkError>;

    /// Fetches account information for the configured credentials.
    ///
    /// Returns 401/403 inside the response (not as an error) when the
    /// credentials are rejected.
    async fn account_info(&self) -> Result<EndpointResponse, NetworkError>;

    /// Fetches exchange metadata including the tradable symbol set.
    /// Unsigned; works without credentials.
    async fn exchange_symbols(&self) -> Result<EndpointResponse, NetworkError>;

    /// Returns a short name identifying the endpoint implementation.
    fn name(&self) -> &str;
}
