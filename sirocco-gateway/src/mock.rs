//! Simulation endpoint for non-production verification.
//!
//! [`MockSpotEndpoint`] is substitutable for the real client behind
//! [`SpotEndpoint`]: same trait, same response shapes, no network. It adds
//! configurable artificial latency and a configurable random failure
//! probability so the batch abort paths can be exercised end to end.

use async_trait::async_trait;
use rand::Rng;
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

use sirocco_core::data::OrderRequest;
use sirocco_core::error::NetworkError;
use sirocco_core::traits::{Credentials, EndpointResponse, SpotEndpoint};
use sirocco_core::types::Timestamp;

use crate::rest::{RefillRateUnit, Throttler};

/// Credential pairs the simulated exchange accepts.
const VALID_API_SECRET_PAIRS: &[(&str, &str)] = &[
    ("1api", "1secret"),
    ("2api", "2secret"),
    ("3api", "3secret"),
];

/// Tradable symbols the simulated exchange reports.
const TRADABLE_SYMBOLS: &[(&str, &str, &str)] =
    &[("ETHBTC", "ETH", "BTC"), ("JTOUSDT", "JTO", "USDT")];

/// Simulated spot endpoint.
///
/// Orders are acknowledged with monotonically increasing ids after a
/// random delay inside the configured latency range; with probability
/// `failure_rate` the acknowledgement is replaced by an HTTP 500.
/// Account queries answer 401 unless the credentials are one of the
/// known-valid pairs. Strictly for non-production verification.
pub struct MockSpotEndpoint {
    credentials: Option<Credentials>,
    failure_rate: f64,
    latency_ms: (u64, u64),
    throttler: Throttler,
    order_counter: AtomicU64,
}

impl MockSpotEndpoint {
    /// Creates a simulated endpoint for the given credentials.
    ///
    /// Pass `None` for the unsigned client used to list symbols.
    #[must_use]
    pub fn new(credentials: Option<Credentials>) -> Self {
        Self {
            credentials,
            failure_rate: 0.0,
            latency_ms: (200, 500),
            throttler: Throttler::new(50, 5, RefillRateUnit::Second),
            order_counter: AtomicU64::new(0),
        }
    }

    /// Sets the probability (0.0..=1.0) that an order placement fails
    /// with an HTTP 500.
    #[must_use]
    pub fn with_failure_rate(mut self, failure_rate: f64) -> Self {
        self.failure_rate = failure_rate;
        self
    }

    /// Sets the artificial latency range in milliseconds.
    #[must_use]
    pub fn with_latency_ms(mut self, min: u64, max: u64) -> Self {
        self.latency_ms = (min, max);
        self
    }

    fn credentials_valid(&self) -> bool {
        self.credentials.as_ref().is_some_and(|creds| {
            VALID_API_SECRET_PAIRS
                .iter()
                .any(|(key, secret)| creds.api_key == *key && creds.api_secret() == *secret)
        })
    }
}

#[async_trait]
impl SpotEndpoint for MockSpotEndpoint {
    async fn place_order(&self, order: &OrderRequest) -> Result<EndpointResponse, NetworkError> {
        let order_id = self.order_counter.fetch_add(1, Ordering::SeqCst) + 1;
        self.throttler
            .acquire(1)
            .await
            .map_err(|e| NetworkError::Transport {
                reason: e.to_string(),
            })?;

        // Sample before the await: the rng is not held across suspension.
        let (delay_ms, fail) = {
            let mut rng = rand::thread_rng();
            let delay = rng.gen_range(self.latency_ms.0..=self.latency_ms.1);
            let fail = self.failure_rate > 0.0 && rng.gen::<f64>() < self.failure_rate;
            (delay, fail)
        };
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;

        if fail {
            debug!(order = %order, "Simulated order failure");
            return Ok(EndpointResponse::new(
                500,
                Some("Internal server error.".to_string()),
                "",
            ));
        }

        let body = json!({
            "symbol": order.symbol.as_str(),
            "orderId": order_id,
            "orderListId": -1,
            "clientOrderId": uuid::Uuid::new_v4().to_string(),
            "transactTime": Timestamp::now().as_millis(),
        });
        Ok(EndpointResponse::new(200, None, body.to_string()))
    }

    async fn account_info(&self) -> Result<EndpointResponse, NetworkError> {
        self.throttler
            .acquire(1)
            .await
            .map_err(|e| NetworkError::Transport {
                reason: e.to_string(),
            })?;

        if self.credentials_valid() {
            Ok(EndpointResponse::new(200, None, "{}"))
        } else {
            Ok(EndpointResponse::new(
                401,
                Some("Unauthorized".to_string()),
                "",
            ))
        }
    }

    async fn exchange_symbols(&self) -> Result<EndpointResponse, NetworkError> {
        self.throttler
            .acquire(1)
            .await
            .map_err(|e| NetworkError::Transport {
                reason: e.to_string(),
            })?;

        let symbols: Vec<_> = TRADABLE_SYMBOLS
            .iter()
            .map(|(symbol, base, quote)| {
                json!({
                    "symbol": symbol,
                    "status": "TRADING",
                    "baseAsset": base,
                    "quoteAsset": quote,
                })
            })
            .collect();
        let body = json!({
            "timezone": "UTC",
            "serverTime": Timestamp::now().as_millis(),
            "rateLimits": [],
            "exchangeFilters": [],
            "symbols": symbols,
        });
        Ok(EndpointResponse::new(200, None, body.to_string()))
    }

    fn name(&self) -> &str {
        "mock-spot"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binance::{ExchangeInfo, OrderAck};
    use rust_decimal_macros::dec;
    use sirocco_core::data::OrderSide;
    use sirocco_core::types::{Price, Quantity, Symbol};

    fn order() -> OrderRequest {
        OrderRequest::limit(
            1,
            Symbol::new("JTOUSDT").unwrap(),
            OrderSide::Buy,
            Quantity::new(dec!(17.3)).unwrap(),
            Price::new(dec!(1.93)).unwrap(),
        )
    }

    fn endpoint(api_key: &str, api_secret: &str) -> MockSpotEndpoint {
        MockSpotEndpoint::new(Some(Credentials::new(api_key, api_secret))).with_latency_ms(0, 0)
    }

    #[tokio::test]
    async fn test_account_info_valid_credentials() {
        let resp = endpoint("1api", "1secret").account_info().await.unwrap();
        assert!(resp.ok());
        assert_eq!(resp.status(), 200);
    }

    #[tokio::test]
    async fn test_account_info_invalid_credentials() {
        let resp = endpoint("1api", "wrong").account_info().await.unwrap();
        assert!(!resp.ok());
        assert_eq!(resp.status(), 401);
        assert_eq!(resp.reason(), Some("Unauthorized"));
    }

    #[tokio::test]
    async fn test_account_info_without_credentials() {
        let resp = MockSpotEndpoint::new(None).account_info().await.unwrap();
        assert_eq!(resp.status(), 401);
    }

    #[tokio::test]
    async fn test_place_order_acks_with_increasing_ids() {
        let endpoint = endpoint("1api", "1secret");

        let first: OrderAck = endpoint.place_order(&order()).await.unwrap().json().unwrap();
        let second: OrderAck = endpoint.place_order(&order()).await.unwrap().json().unwrap();

        assert_eq!(first.order_id, 1);
        assert_eq!(second.order_id, 2);
        assert_eq!(first.symbol, "JTOUSDT");
        assert_ne!(first.client_order_id, second.client_order_id);
    }

    #[tokio::test]
    async fn test_place_order_always_fails_at_rate_one() {
        let endpoint = endpoint("1api", "1secret").with_failure_rate(1.0);

        for _ in 0..5 {
            let resp = endpoint.place_order(&order()).await.unwrap();
            assert_eq!(resp.status(), 500);
            assert_eq!(resp.reason(), Some("Internal server error."));
        }
    }

    #[tokio::test]
    async fn test_place_order_never_fails_at_rate_zero() {
        let endpoint = endpoint("1api", "1secret");

        for _ in 0..5 {
            let resp = endpoint.place_order(&order()).await.unwrap();
            assert_eq!(resp.status(), 200);
        }
    }

    #[tokio::test]
    async fn test_exchange_symbols() {
        let info: ExchangeInfo = MockSpotEndpoint::new(None)
            .exchange_symbols()
            .await
            .unwrap()
            .json()
            .unwrap();

        let set = info.symbol_set();
        assert!(set.contains("ETHBTC"));
        assert!(set.contains("JTOUSDT"));
        assert_eq!(set.len(), 2);
    }
}
