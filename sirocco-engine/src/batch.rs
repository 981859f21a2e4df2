//! Concurrent batch order submission.
//!
//! One task per order, all dispatched up front; completions are consumed
//! in arrival order through a fan-in channel. The first unrecoverable
//! completion aborts every still-pending task and surfaces the fault,
//! carrying the final accounting with it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{error, info};

use sirocco_core::data::{OrderOutcome, OrderRequest};
use sirocco_core::error::{ConfigError, ExchangeError, NetworkError, SiroccoError};
use sirocco_core::traits::{EndpointResponse, SpotEndpoint};
use sirocco_core::types::{AccountId, OrderId, Timestamp};

/// Final accounting for one batch run.
///
/// Emitted on every exit path; the denominator always equals the number
/// of input orders, whether the batch completed or aborted.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Number of orders in the batch.
    pub total: usize,
    /// Orders accepted by the exchange before completion or abort.
    pub successful: usize,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
    /// Recorded outcomes in arrival order, keyed by input row index.
    /// Orders cancelled before resolving produce no outcome.
    pub outcomes: Vec<(usize, OrderOutcome)>,
}

/// A batch that stopped on its first unrecoverable completion.
///
/// Carries the fault that triggered the abort and the accounting gathered
/// up to that point.
#[derive(Debug, Error)]
#[error("batch aborted after {}/{} orders: {cause}", .report.successful, .report.total)]
pub struct BatchAborted {
    /// The fault that aborted the batch.
    pub cause: SiroccoError,
    /// Accounting at the moment of the abort.
    pub report: BatchReport,
}

/// How one completion affects the batch.
enum Completion {
    Accepted(OrderOutcome),
    Fatal {
        outcome: Option<OrderOutcome>,
        error: SiroccoError,
    },
}

/// Concurrent order submission engine.
///
/// Owns one endpoint client per sub-account; the caller decides which
/// implementation sits behind each [`SpotEndpoint`].
pub struct SubmissionEngine {
    endpoints: HashMap<AccountId, Arc<dyn SpotEndpoint>>,
}

impl SubmissionEngine {
    /// Creates an engine over per-account endpoint clients.
    #[must_use]
    pub fn new(endpoints: HashMap<AccountId, Arc<dyn SpotEndpoint>>) -> Self {
        Self { endpoints }
    }

    /// Submits every order concurrently and collects completions in
    /// arrival order.
    ///
    /// Any transport fault, HTTP failure, or exchange business error in a
    /// completion aborts the batch: still-pending tasks are cancelled
    /// best-effort and the fault is returned. Cancellation races with
    /// in-flight network I/O, so a cancelled order may still reach the
    /// exchange; callers must treat an aborted batch as partially placed.
    ///
    /// The `successful/total` accounting is logged on every exit path and
    /// carried in the returned report (or inside [`BatchAborted`]).
    ///
    /// # Errors
    ///
    /// Returns [`BatchAborted`] on the first unrecoverable completion, or
    /// for configuration errors detected before dispatch (unknown account,
    /// invariant-violating order).
    pub async fn submit(&self, orders: &[OrderRequest]) -> Result<BatchReport, BatchAborted> {
        let start = Instant::now();
        let total = orders.len();

        // Resolve endpoints and check invariants before dispatching
        // anything; a configuration error must not place a partial batch.
        let mut resolved = Vec::with_capacity(total);
        for order in orders {
            if let Err(e) = order.validate() {
                return Err(Self::abort(e.into(), total, 0, Vec::new(), start));
            }
            match self.endpoints.get(&order.account_id) {
                Some(endpoint) => resolved.push(Arc::clone(endpoint)),
                None => {
                    let e = ConfigError::UnknownAccount {
                        account_id: order.account_id,
                    };
                    return Err(Self::abort(e.into(), total, 0, Vec::new(), start));
                }
            }
        }

        info!(total, "Starting order execution");

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut handles = Vec::with_capacity(total);
        for (idx, (order, endpoint)) in orders.iter().cloned().zip(resolved).enumerate() {
            let tx = tx.clone();
            handles.push(tokio::spawn(async move {
                let result = endpoint.place_order(&order).await;
                // Receiver gone means the batch already aborted.
                let _ = tx.send((idx, result));
            }));
        }
        // The channel closes once every task has reported or been aborted.
        drop(tx);

        let mut successful = 0usize;
        let mut outcomes: Vec<(usize, OrderOutcome)> = Vec::new();
        let mut fatal: Option<SiroccoError> = None;

        while let Some((idx, result)) = rx.recv().await {
            let order = &orders[idx];
            match Self::classify(result) {
                Completion::Accepted(outcome) => {
                    info!(order = %order, "Placed order");
                    successful += 1;
                    outcomes.push((idx, outcome));
                }
                Completion::Fatal { outcome, error } => {
                    error!(order = %order, error = %error, "Cancelling pending orders");
                    if let Some(outcome) = outcome {
                        outcomes.push((idx, outcome));
                    }
                    for handle in &handles {
                        handle.abort();
                    }
                    fatal = Some(error);
                    break;
                }
            }
        }

        match fatal {
            Some(cause) => Err(Self::abort(cause, total, successful, outcomes, start)),
            None => {
                let report = Self::finish(total, successful, outcomes, start);
                Ok(report)
            }
        }
    }

    /// Builds the report and emits the unconditional accounting line.
    fn finish(
        total: usize,
        successful: usize,
        outcomes: Vec<(usize, OrderOutcome)>,
        start: Instant,
    ) -> BatchReport {
        let elapsed = start.elapsed();
        info!(
            elapsed_ms = elapsed.as_millis() as u64,
            "Placed {successful}/{total} orders"
        );
        BatchReport {
            total,
            successful,
            elapsed,
            outcomes,
        }
    }

    fn abort(
        cause: SiroccoError,
        total: usize,
        successful: usize,
        outcomes: Vec<(usize, OrderOutcome)>,
        start: Instant,
    ) -> BatchAborted {
        let report = Self::finish(total, successful, outcomes, start);
        BatchAborted { cause, report }
    }

    /// Classifies one completion.
    ///
    /// HTTP 200 with a `code` field in the body is a business error and
    /// fatal; a non-success status is fatal with the original status and
    /// reason preserved; a transport fault is fatal as-is.
    fn classify(result: Result<EndpointResponse, NetworkError>) -> Completion {
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                return Completion::Fatal {
                    outcome: None,
                    error: e.into(),
                }
            }
        };

        if !response.ok() {
            let status = response.status();
            let reason = response
                .reason()
                .map_or_else(|| response.body().to_string(), str::to_string);
            return Completion::Fatal {
                outcome: Some(OrderOutcome::Rejected {
                    status,
                    reason: response.reason().map(str::to_string),
                }),
                error: NetworkError::Http {
                    status_code: status,
                    reason,
                }
                .into(),
            };
        }

        let body: serde_json::Value = match response.json() {
            Ok(body) => body,
            Err(e) => {
                return Completion::Fatal {
                    outcome: None,
                    error: e.into(),
                }
            }
        };

        if let Some(code) = body.get("code").and_then(serde_json::Value::as_i64) {
            let message = body
                .get("msg")
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default()
                .to_string();
            return Completion::Fatal {
                outcome: Some(OrderOutcome::ExchangeError {
                    code,
                    message: message.clone(),
                }),
                error: ExchangeError::Business { code, message }.into(),
            };
        }

        let order_id = body.get("orderId").and_then(serde_json::Value::as_u64);
        let transact_time = body
            .get("transactTime")
            .and_then(serde_json::Value::as_i64)
            .and_then(|t| Timestamp::new(t).ok());
        match (order_id, transact_time) {
            (Some(order_id), Some(transact_time)) => {
                Completion::Accepted(OrderOutcome::Accepted {
                    order_id: OrderId::from(order_id),
                    transact_time,
                })
            }
            _ => Completion::Fatal {
                outcome: None,
                error: NetworkError::InvalidResponse {
                    reason: "order acknowledgement missing orderId or transactTime".to_string(),
                }
                .into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use sirocco_core::data::OrderSide;
    use sirocco_core::types::{Price, Quantity, Symbol};
    use std::sync::atomic::{AtomicU64, Ordering};

    #[derive(Clone, Copy)]
    enum Behavior {
        Ack,
        BusinessError,
        HttpError(u16),
        Fault,
    }

    /// Stub endpoint scripted per symbol: behavior plus artificial delay,
    /// so tests control the completion (arrival) order precisely.
    struct ScriptedEndpoint {
        script: HashMap<String, (u64, Behavior)>,
        counter: AtomicU64,
    }

    impl ScriptedEndpoint {
        fn new(script: &[(&str, u64, Behavior)]) -> Arc<Self> {
            Arc::new(Self {
                script: script
                    .iter()
                    .map(|(symbol, delay, behavior)| {
                        ((*symbol).to_string(), (*delay, *behavior))
                    })
                    .collect(),
                counter: AtomicU64::new(0),
            })
        }
    }

    #[async_trait]
    impl SpotEndpoint for ScriptedEndpoint {
        async fn place_order(
            &self,
            order: &OrderRequest,
        ) -> Result<EndpointResponse, NetworkError> {
            let (delay_ms, behavior) = self.script[order.symbol.as_str()];
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            match behavior {
                Behavior::Ack => {
                    let id = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
                    let body = json!({
                        "symbol": order.symbol.as_str(),
                        "orderId": id,
                        "clientOrderId": format!("stub-{id}"),
                        "transactTime": 1_700_000_000_000u64,
                    });
                    Ok(EndpointResponse::new(200, None, body.to_string()))
                }
                Behavior::BusinessError => {
                    let body = json!({"code": -2010, "msg": "Account has insufficient balance"});
                    Ok(EndpointResponse::new(200, None, body.to_string()))
                }
                Behavior::HttpError(status) => Ok(EndpointResponse::new(
                    status,
                    Some("Internal server error.".to_string()),
                    "",
                )),
                Behavior::Fault => Err(NetworkError::Transport {
                    reason: "connection reset by peer".to_string(),
                }),
            }
        }

        async fn account_info(&self) -> Result<EndpointResponse, NetworkError> {
            Ok(EndpointResponse::new(200, None, "{}"))
        }

        async fn exchange_symbols(&self) -> Result<EndpointResponse, NetworkError> {
            Ok(EndpointResponse::new(200, None, r#"{"symbols": []}"#))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn order(symbol: &str) -> OrderRequest {
        OrderRequest::limit(
            1,
            Symbol::new(symbol).unwrap(),
            OrderSide::Buy,
            Quantity::new(dec!(1)).unwrap(),
            Price::new(dec!(1.5)).unwrap(),
        )
    }

    fn engine(endpoint: Arc<ScriptedEndpoint>) -> SubmissionEngine {
        let mut endpoints: HashMap<AccountId, Arc<dyn SpotEndpoint>> = HashMap::new();
        endpoints.insert(1, endpoint);
        SubmissionEngine::new(endpoints)
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_orders_succeed() {
        let endpoint = ScriptedEndpoint::new(&[
            ("AAAUSDT", 30, Behavior::Ack),
            ("BBBUSDT", 10, Behavior::Ack),
            ("CCCUSDT", 20, Behavior::Ack),
            ("DDDUSDT", 50, Behavior::Ack),
            ("EEEUSDT", 40, Behavior::Ack),
        ]);
        let engine = engine(endpoint);
        let orders: Vec<_> = ["AAAUSDT", "BBBUSDT", "CCCUSDT", "DDDUSDT", "EEEUSDT"]
            .iter()
            .map(|s| order(s))
            .collect();

        let report = engine.submit(&orders).await.unwrap();

        assert_eq!(report.successful, 5);
        assert_eq!(report.total, 5);
        assert_eq!(report.outcomes.len(), 5);
        assert!(report.outcomes.iter().all(|(_, o)| o.is_accepted()));
        // Completions were collected in arrival order, not submission order.
        assert_eq!(report.outcomes[0].0, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_business_error_aborts_batch() {
        // Two orders resolve before the failing one; the last two would
        // only resolve much later and must be cancelled.
        let endpoint = ScriptedEndpoint::new(&[
            ("AAAUSDT", 10, Behavior::Ack),
            ("BBBUSDT", 20, Behavior::Ack),
            ("BADUSDT", 30, Behavior::BusinessError),
            ("DDDUSDT", 40_000, Behavior::Ack),
            ("EEEUSDT", 50_000, Behavior::Ack),
        ]);
        let engine = engine(endpoint);
        let orders: Vec<_> = ["AAAUSDT", "BBBUSDT", "BADUSDT", "DDDUSDT", "EEEUSDT"]
            .iter()
            .map(|s| order(s))
            .collect();

        let aborted = engine.submit(&orders).await.unwrap_err();

        assert_eq!(aborted.report.total, 5);
        assert_eq!(aborted.report.successful, 2);
        assert!(matches!(
            aborted.cause.as_exchange_error(),
            Some(ExchangeError::Business { code: -2010, .. })
        ));
        // The failing order still produced its outcome; cancelled ones
        // produced none.
        assert_eq!(aborted.report.outcomes.len(), 3);
        assert!(aborted.report.elapsed < Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_http_error_aborts_with_status_preserved() {
        let endpoint = ScriptedEndpoint::new(&[
            ("AAAUSDT", 10, Behavior::Ack),
            ("BADUSDT", 20, Behavior::HttpError(500)),
            ("CCCUSDT", 30_000, Behavior::Ack),
        ]);
        let engine = engine(endpoint);
        let orders: Vec<_> = ["AAAUSDT", "BADUSDT", "CCCUSDT"]
            .iter()
            .map(|s| order(s))
            .collect();

        let aborted = engine.submit(&orders).await.unwrap_err();

        assert_eq!(aborted.report.successful, 1);
        let network = aborted.cause.as_network_error().unwrap();
        assert_eq!(network.status_code(), Some(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_fault_aborts_batch() {
        let endpoint = ScriptedEndpoint::new(&[
            ("BADUSDT", 10, Behavior::Fault),
            ("BBBUSDT", 20_000, Behavior::Ack),
        ]);
        let engine = engine(endpoint);
        let orders: Vec<_> = ["BADUSDT", "BBBUSDT"].iter().map(|s| order(s)).collect();

        let aborted = engine.submit(&orders).await.unwrap_err();

        assert_eq!(aborted.report.successful, 0);
        assert_eq!(aborted.report.total, 2);
        assert!(matches!(
            aborted.cause.as_network_error(),
            Some(NetworkError::Transport { .. })
        ));
        // A transport fault resolves no outcome for the faulted order.
        assert!(aborted.report.outcomes.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_account_fails_before_dispatch() {
        let engine = SubmissionEngine::new(HashMap::new());
        let orders = vec![order("AAAUSDT")];

        let aborted = engine.submit(&orders).await.unwrap_err();

        assert_eq!(aborted.report.total, 1);
        assert_eq!(aborted.report.successful, 0);
        assert!(matches!(
            aborted.cause,
            SiroccoError::Config(ConfigError::UnknownAccount { account_id: 1 })
        ));
    }

    #[tokio::test]
    async fn test_invalid_order_fails_before_dispatch() {
        let endpoint = ScriptedEndpoint::new(&[("AAAUSDT", 0, Behavior::Ack)]);
        let engine = engine(endpoint);
        let mut bad = order("AAAUSDT");
        bad.quantity = Quantity::ZERO;

        let aborted = engine.submit(&[bad]).await.unwrap_err();
        assert!(matches!(
            aborted.cause,
            SiroccoError::Config(ConfigError::InvalidOrder { .. })
        ));
    }

    #[test]
    fn test_classify_accepts_ack() {
        let body = json!({"orderId": 12, "transactTime": 1_700_000_000_000u64});
        let completion =
            SubmissionEngine::classify(Ok(EndpointResponse::new(200, None, body.to_string())));
        assert!(matches!(
            completion,
            Completion::Accepted(OrderOutcome::Accepted { .. })
        ));
    }

    #[test]
    fn test_classify_rejects_malformed_ack() {
        let completion =
            SubmissionEngine::classify(Ok(EndpointResponse::new(200, None, r#"{"odd": 1}"#)));
        assert!(matches!(
            completion,
            Completion::Fatal { outcome: None, .. }
        ));
    }
}
