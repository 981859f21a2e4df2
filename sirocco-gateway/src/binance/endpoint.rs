//! The real Binance spot endpoint client.

use async_trait::async_trait;
use reqwest::Method;
use tracing::debug;

use sirocco_core::data::OrderRequest;
use sirocco_core::error::NetworkError;
use sirocco_core::traits::{EndpointResponse, SpotEndpoint};

use crate::rest::{build_query_string, signed_query, EndpointConfig, RequestSigner, Throttler};

/// Token cost of a single request against the shared bucket.
const REQUEST_WEIGHT: u32 = 1;

/// Binance spot API v3 endpoint client.
///
/// One instance per credential set. All requests pass through the
/// instance's token bucket before reaching the wire; order placement and
/// account queries are signed, the symbol listing is not. The underlying
/// `reqwest::Client` (connection pool) is shared across all endpoint
/// clients in a run and handed in by the caller.
pub struct BinanceSpotEndpoint {
    config: EndpointConfig,
    http: reqwest::Client,
    throttler: Throttler,
    signer: Option<RequestSigner>,
}

impl BinanceSpotEndpoint {
    /// Creates a new endpoint client over a shared HTTP client.
    #[must_use]
    pub fn new(http: reqwest::Client, config: EndpointConfig) -> Self {
        let throttler = Throttler::new(
            config.bucket_capacity,
            config.refill_rate,
            config.refill_unit,
        );
        let signer = config.api_secret.as_deref().map(|secret| RequestSigner::new(secret));
        Self {
            config,
            http,
            throttler,
            signer,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    /// Builds the query string for an order placement request.
    ///
    /// Parameter order is fixed and preserved through signing; the
    /// signature covers the byte sequence exactly as transmitted.
    fn order_query(&self, order: &OrderRequest) -> Result<String, NetworkError> {
        let quantity = order.quantity.to_string();
        let price = order.price.to_string();
        let params = [
            ("symbol", order.symbol.as_str()),
            ("side", order.side.as_str()),
            ("type", order.order_type.as_str()),
            ("timeInForce", order.time_in_force.as_str()),
            ("quantity", quantity.as_str()),
            ("price", price.as_str()),
        ];
        match &self.signer {
            Some(signer) => signed_query(&params, signer),
            // Without a secret the request goes out unsigned; the exchange
            // answers 401 and the caller sees the real rejection.
            None => Ok(build_query_string(&params)),
        }
    }

    async fn request(
        &self,
        method: Method,
        path: &'static str,
        query: Option<String>,
        authenticated: bool,
    ) -> Result<EndpointResponse, NetworkError> {
        self.throttler
            .acquire(REQUEST_WEIGHT)
            .await
            .map_err(|e| NetworkError::Transport {
                reason: e.to_string(),
            })?;

        let url = match query {
            Some(q) if !q.is_empty() => format!("{}{path}?{q}", self.config.base_url),
            _ => format!("{}{path}", self.config.base_url),
        };

        debug!(method = %method, path, "Sending request");

        let mut request = self
            .http
            .request(method, &url)
            .timeout(self.config.timeout())
            .header(reqwest::header::USER_AGENT, &self.config.user_agent);

        if authenticated {
            request = request.header("Content-Type", "application/json;charset=utf-8");
            if let Some(api_key) = &self.config.api_key {
                request = request.header("X-MBX-APIKEY", api_key);
            }
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                NetworkError::Timeout {
                    timeout_ms: self.config.timeout_ms,
                }
            } else if e.is_connect() {
                NetworkError::ConnectionFailed {
                    reason: e.to_string(),
                }
            } else {
                NetworkError::Transport {
                    reason: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        let reason = status.canonical_reason().map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|e| NetworkError::Transport {
                reason: format!("failed to read response body: {e}"),
            })?;

        debug!(status = status.as_u16(), path, "Received response");

        Ok(EndpointResponse::new(status.as_u16(), reason, body))
    }
}

#[async_trait]
impl SpotEndpoint for BinanceSpotEndpoint {
    async fn place_order(&self, order: &OrderRequest) -> Result<EndpointResponse, NetworkError> {
        let query = self.order_query(order)?;
        self.request(Method::POST, "/api/v3/order", Some(query), true)
            .await
    }

    async fn account_info(&self) -> Result<EndpointResponse, NetworkError> {
        let query = match &self.signer {
            Some(signer) => Some(signed_query(&[], signer)?),
            None => None,
        };
        self.request(Method::GET, "/api/v3/account", query, true)
            .await
    }

    async fn exchange_symbols(&self) -> Result<EndpointResponse, NetworkError> {
        self.request(Method::GET, "/api/v3/exchangeInfo", None, false)
            .await
    }

    fn name(&self) -> &str {
        "binance-spot"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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

    fn endpoint(secret: Option<&str>) -> BinanceSpotEndpoint {
        let mut builder = EndpointConfig::builder()
            .base_url("https://testnet.binance.vision")
            .api_key("api");
        if let Some(secret) = secret {
            builder = builder.api_secret(secret);
        }
        BinanceSpotEndpoint::new(reqwest::Client::new(), builder.build())
    }

    #[test]
    fn test_order_query_parameter_order() {
        let endpoint = endpoint(None);
        let query = endpoint.order_query(&order()).unwrap();
        assert_eq!(
            query,
            "symbol=JTOUSDT&side=BUY&type=LIMIT&timeInForce=GTC&quantity=17.3&price=1.93"
        );
    }

    #[test]
    fn test_order_query_signed() {
        let endpoint = endpoint(Some("secret"));
        let query = endpoint.order_query(&order()).unwrap();

        assert!(query
            .starts_with("symbol=JTOUSDT&side=BUY&type=LIMIT&timeInForce=GTC&quantity=17.3&price=1.93&timestamp="));
        assert!(query.contains("&signature="));
    }

    #[test]
    fn test_signer_presence_follows_config() {
        assert!(endpoint(Some("secret")).signer.is_some());
        assert!(endpoint(None).signer.is_none());
    }

    #[test]
    fn test_name() {
        assert_eq!(endpoint(None).name(), "binance-spot");
    }
}
