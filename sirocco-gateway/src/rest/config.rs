//! Endpoint client configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::throttler::RefillRateUnit;

/// Configuration for an exchange endpoint client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Base URL for API requests.
    pub base_url: String,

    /// API key for authentication.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// API secret for signing requests.
    #[serde(skip_serializing, skip_deserializing)]
    pub api_secret: Option<String>,

    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Token bucket capacity shared by all requests from this client.
    #[serde(default = "default_bucket_capacity")]
    pub bucket_capacity: u32,

    /// Token refill rate, expressed in `refill_unit`.
    #[serde(default = "default_refill_rate")]
    pub refill_rate: u32,

    /// Unit the refill rate is expressed in.
    #[serde(default)]
    pub refill_unit: RefillRateUnit,

    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_bucket_capacity() -> u32 {
    45
}

fn default_refill_rate() -> u32 {
    5
}

fn default_user_agent() -> String {
    format!("Sirocco/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: None,
            api_secret: None,
            timeout_ms: default_timeout_ms(),
            bucket_capacity: default_bucket_capacity(),
            refill_rate: default_refill_rate(),
            refill_unit: RefillRateUnit::Second,
            user_agent: default_user_agent(),
        }
    }
}

impl EndpointConfig {
    /// Creates a new builder for `EndpointConfig`.
    #[must_use]
    pub fn builder() -> EndpointConfigBuilder {
        EndpointConfigBuilder::default()
    }

    /// Returns the request timeout as a Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Returns whether the client has authentication configured.
    #[must_use]
    pub fn has_auth(&self) -> bool {
        self.api_key.is_some() && self.api_secret.is_some()
    }
}

/// Builder for `EndpointConfig`.
#[derive(Debug, Default)]
pub struct EndpointConfigBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    api_secret: Option<String>,
    timeout_ms: Option<u64>,
    bucket_capacity: Option<u32>,
    refill_rate: Option<u32>,
    refill_unit: Option<RefillRateUnit>,
    user_agent: Option<String>,
}

impl EndpointConfigBuilder {
    /// Sets the base URL.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the API key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the API secret.
    #[must_use]
    pub fn api_secret(mut self, secret: impl Into<String>) -> Self {
        self.api_secret = Some(secret.into());
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    /// Sets the token bucket capacity.
    #[must_use]
    pub fn bucket_capacity(mut self, capacity: u32) -> Self {
        self.bucket_capacity = Some(capacity);
        self
    }

    /// Sets the token refill rate together with its unit.
    #[must_use]
    pub fn refill_rate(mut self, rate: u32, unit: RefillRateUnit) -> Self {
        self.refill_rate = Some(rate);
        self.refill_unit = Some(unit);
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Builds the `EndpointConfig`.
    #[must_use]
    pub fn build(self) -> EndpointConfig {
        EndpointConfig {
            base_url: self.base_url.unwrap_or_default(),
            api_key: self.api_key,
            api_secret: self.api_secret,
            timeout_ms: self.timeout_ms.unwrap_or_else(default_timeout_ms),
            bucket_capacity: self.bucket_capacity.unwrap_or_else(default_bucket_capacity),
            refill_rate: self.refill_rate.unwrap_or_else(default_refill_rate),
            refill_unit: self.refill_unit.unwrap_or_default(),
            user_agent: self.user_agent.unwrap_or_else(default_user_agent),
        }
    }
}
