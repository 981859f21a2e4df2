//! Dry-run preflight validation.
//!
//! Two independent passes, both completed before reporting: every
//! configured credential is checked against the exchange, and every order
//! row is checked against the authoritative tradable-symbol set. Row- and
//! account-level defects are collected, not raised; only systemic
//! failures (unreachable exchange, unexpected API errors) abort the
//! validation itself.

use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

use sirocco_core::error::{NetworkError, SiroccoError};
use sirocco_core::traits::{EndpointResponse, SpotEndpoint};
use sirocco_core::types::AccountId;

use crate::input::OrderRow;

/// A named defect on one order row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowDefect {
    /// Symbol is not in the exchange's tradable set.
    InvalidPair,
    /// Direction is not one of the two recognized values.
    InvalidDirection,
    /// Price or quantity is missing, malformed, or non-positive.
    InvalidPriceOrQuantity,
}

impl fmt::Display for RowDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPair => write!(f, "Invalid Pair"),
            Self::InvalidDirection => write!(f, "Invalid Direction"),
            Self::InvalidPriceOrQuantity => write!(f, "Invalid price or quantity"),
        }
    }
}

/// An account whose credentials the exchange rejected.
#[derive(Debug, Clone)]
pub struct InvalidAccount {
    /// The rejected account.
    pub account_id: AccountId,
    /// HTTP status (401 or 403).
    pub status: u16,
    /// Status reason, when supplied.
    pub reason: Option<String>,
}

/// An order row with one or more defects.
#[derive(Debug, Clone)]
pub struct InvalidRow {
    /// Zero-based row index in the input.
    pub index: usize,
    /// The offending row.
    pub row: OrderRow,
    /// All defects found on the row.
    pub defects: Vec<RowDefect>,
}

/// Result of a preflight validation run.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// Number of accounts whose credentials were checked.
    pub accounts_checked: usize,
    /// Accounts with rejected credentials.
    pub invalid_accounts: Vec<InvalidAccount>,
    /// Number of order rows examined.
    pub order_count: usize,
    /// Rows with defects.
    pub invalid_rows: Vec<InvalidRow>,
}

impl ValidationReport {
    /// Returns true if every account and every order row passed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.invalid_accounts.is_empty() && self.invalid_rows.is_empty()
    }
}

/// Credential and order validation without placing anything.
pub struct PreflightValidator {
    endpoints: HashMap<AccountId, Arc<dyn SpotEndpoint>>,
    public: Arc<dyn SpotEndpoint>,
}

impl PreflightValidator {
    /// Creates a validator over per-account endpoints plus one
    /// credential-less endpoint for the unsigned symbol listing.
    #[must_use]
    pub fn new(
        endpoints: HashMap<AccountId, Arc<dyn SpotEndpoint>>,
        public: Arc<dyn SpotEndpoint>,
    ) -> Self {
        Self { endpoints, public }
    }

    /// Runs both validation passes and reports per-account and per-row
    /// findings.
    ///
    /// An account answered with 401/403 becomes a finding and does not
    /// stop the remaining credential checks or the order pass. Any other
    /// failure is systemic and aborts the validation.
    ///
    /// # Errors
    ///
    /// Returns the underlying error when the exchange is unreachable or
    /// answers a credential or symbol query with an unexpected failure.
    pub async fn validate(&self, rows: &[OrderRow]) -> Result<ValidationReport, SiroccoError> {
        info!("Starting dry run");

        let invalid_accounts = self.check_credentials().await?;
        let symbols = self.fetch_symbol_set().await?;
        let invalid_rows = Self::check_rows(rows, &symbols);

        let report = ValidationReport {
            accounts_checked: self.endpoints.len(),
            invalid_accounts,
            order_count: rows.len(),
            invalid_rows,
        };

        if report.invalid_rows.is_empty() {
            info!(orders = report.order_count, "Successfully validated orders");
        } else {
            for invalid in &report.invalid_rows {
                let defects: Vec<String> =
                    invalid.defects.iter().map(ToString::to_string).collect();
                error!(
                    row_number = invalid.index + 1,
                    row = %invalid.row,
                    defects = ?defects,
                    "Invalid order row"
                );
            }
        }

        Ok(report)
    }

    /// Checks every configured credential concurrently.
    async fn check_credentials(&self) -> Result<Vec<InvalidAccount>, SiroccoError> {
        info!(accounts = self.endpoints.len(), "Validating credentials");

        let mut handles: Vec<(
            AccountId,
            JoinHandle<Result<EndpointResponse, NetworkError>>,
        )> = Vec::with_capacity(self.endpoints.len());
        for (&account_id, endpoint) in &self.endpoints {
            let endpoint = Arc::clone(endpoint);
            handles.push((
                account_id,
                tokio::spawn(async move { endpoint.account_info().await }),
            ));
        }

        let mut invalid_accounts = Vec::new();
        for (account_id, handle) in handles {
            let response = handle
                .await
                .map_err(|e| NetworkError::Transport {
                    reason: format!("credential check task failed: {e}"),
                })?
                .map_err(SiroccoError::from)?;

            match response.status() {
                401 | 403 => {
                    error!(
                        account_id,
                        status = response.status(),
                        reason = response.reason().unwrap_or(""),
                        "Invalid credentials"
                    );
                    invalid_accounts.push(InvalidAccount {
                        account_id,
                        status: response.status(),
                        reason: response.reason().map(str::to_string),
                    });
                }
                _ if !response.ok() => {
                    // Anything other than a credential rejection is a
                    // systemic failure; validation cannot be trusted.
                    return Err(NetworkError::Http {
                        status_code: response.status(),
                        reason: response
                            .reason()
                            .map_or_else(|| response.body().to_string(), str::to_string),
                    }
                    .into());
                }
                _ => {}
            }
        }

        if invalid_accounts.is_empty() {
            info!(
                accounts = self.endpoints.len(),
                "Successfully validated credentials"
            );
        }
        Ok(invalid_accounts)
    }

    /// Fetches the authoritative tradable-symbol set.
    async fn fetch_symbol_set(&self) -> Result<HashSet<String>, SiroccoError> {
        info!("Retrieving valid spot symbols");

        let response = self.public.exchange_symbols().await?;
        if !response.ok() {
            return Err(NetworkError::Http {
                status_code: response.status(),
                reason: response
                    .reason()
                    .map_or_else(|| response.body().to_string(), str::to_string),
            }
            .into());
        }

        let body: serde_json::Value = response.json()?;
        let symbols = body
            .get("symbols")
            .and_then(serde_json::Value::as_array)
            .ok_or_else(|| NetworkError::InvalidResponse {
                reason: "exchange info is missing the symbols array".to_string(),
            })?;

        Ok(symbols
            .iter()
            .filter_map(|s| s.get("symbol").and_then(serde_json::Value::as_str))
            .map(str::to_string)
            .collect())
    }

    /// Checks every row against the symbol set and the order invariants.
    /// Defects accumulate; a row can carry several.
    fn check_rows(rows: &[OrderRow], symbols: &HashSet<String>) -> Vec<InvalidRow> {
        info!(orders = rows.len(), "Validating orders");

        let mut invalid_rows = Vec::new();
        for (index, row) in rows.iter().enumerate() {
            let mut defects = Vec::new();

            if !symbols.contains(&row.pair) {
                defects.push(RowDefect::InvalidPair);
            }
            if !row.direction.eq_ignore_ascii_case("buy")
                && !row.direction.eq_ignore_ascii_case("sell")
            {
                defects.push(RowDefect::InvalidDirection);
            }
            if !is_positive_decimal(&row.price) || !is_positive_decimal(&row.quantity) {
                defects.push(RowDefect::InvalidPriceOrQuantity);
            }

            if !defects.is_empty() {
                invalid_rows.push(InvalidRow {
                    index,
                    row: row.clone(),
                    defects,
                });
            }
        }
        invalid_rows
    }
}

fn is_positive_decimal(value: &str) -> bool {
    Decimal::from_str(value).is_ok_and(|d| d > Decimal::ZERO)
}
