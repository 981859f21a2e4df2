//! # Sirocco CLI
//!
//! Command-line interface for the Sirocco batch order placer.
//!
//! Reads orders and per-account precision from CSV files, loads
//! credentials from the environment, and either runs a dry-run validation
//! (the default) or places the batch for real. The endpoint
//! implementation - real Binance client or the simulation client - is
//! chosen here, at the composition root, and injected into the engine.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod env;
mod input;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, Level};

use sirocco_core::traits::{Credentials, SpotEndpoint};
use sirocco_core::types::AccountId;
use sirocco_engine::{PreflightValidator, SubmissionEngine};
use sirocco_gateway::binance::{BinanceBase, BinanceSpotEndpoint};
use sirocco_gateway::mock::MockSpotEndpoint;
use sirocco_gateway::rest::EndpointConfig;

/// Sirocco - batch limit order placement across sub-accounts
#[derive(Parser)]
#[command(name = "sirocco")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Filepath for orders data
    orders: String,

    /// Filepath for precision data
    precision: String,

    /// Place orders for real; without this flag only the dry run executes
    #[arg(short = 'e', long)]
    execute: bool,

    /// Use the simulation endpoint instead of the real exchange
    #[arg(long)]
    mock: bool,

    /// Probability (0..=1) that a simulated order placement fails.
    /// Only valid together with --mock
    #[arg(long, default_value_t = 0.0)]
    mock_fail_rate: f64,

    /// Talk to the spot testnet instead of production
    #[arg(long)]
    testnet: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);
    run(cli).await
}

async fn run(cli: Cli) -> Result<()> {
    if cli.mock_fail_rate > 0.0 && !cli.mock {
        bail!("--mock-fail-rate is only valid together with --mock");
    }

    let credentials = env::load_credentials()?;
    let precision = input::read_precision(&cli.precision)?;
    let rows = input::read_orders(&cli.orders)?;

    let base = if cli.testnet {
        BinanceBase::Testnet
    } else {
        BinanceBase::Mainnet
    };

    // One connection pool shared by every endpoint client in the run;
    // dropped on every exit path when this function returns.
    let http = reqwest::Client::new();

    let mut endpoints: HashMap<AccountId, Arc<dyn SpotEndpoint>> = HashMap::new();
    for (&account_id, creds) in &credentials {
        endpoints.insert(account_id, make_endpoint(&cli, &http, base, Some(creds)));
    }

    if cli.execute {
        let mut orders = Vec::with_capacity(rows.len());
        for row in &rows {
            let scales = precision
                .get(&row.account_id)
                .with_context(|| format!("no precision configured for account {}", row.account_id))?;
            orders.push(row.to_request(scales.price, scales.quantity)?);
        }

        let engine = SubmissionEngine::new(endpoints);
        let report = engine.submit(&orders).await?;
        info!(
            successful = report.successful,
            total = report.total,
            "Execution complete"
        );
    } else {
        let public = make_endpoint(&cli, &http, base, None);
        let validator = PreflightValidator::new(endpoints, public);
        let report = validator.validate(&rows).await?;

        if !report.is_valid() {
            let accounts: Vec<AccountId> = report
                .invalid_accounts
                .iter()
                .map(|a| a.account_id)
                .collect();
            bail!(
                "dry run failed: {} invalid account(s) {:?}, {} invalid row(s) of {}",
                report.invalid_accounts.len(),
                accounts,
                report.invalid_rows.len(),
                report.order_count,
            );
        }
        info!(
            accounts = report.accounts_checked,
            orders = report.order_count,
            "Dry run passed"
        );
    }

    Ok(())
}

/// Builds one endpoint client. The mock/real decision lives here and
/// nowhere else; everything downstream sees only the trait.
fn make_endpoint(
    cli: &Cli,
    http: &reqwest::Client,
    base: BinanceBase,
    credentials: Option<&Credentials>,
) -> Arc<dyn SpotEndpoint> {
    if cli.mock {
        return Arc::new(
            MockSpotEndpoint::new(credentials.cloned()).with_failure_rate(cli.mock_fail_rate),
        );
    }

    let mut builder = EndpointConfig::builder().base_url(base.rest_base_url());
    if let Some(creds) = credentials {
        builder = builder
            .api_key(&creds.api_key)
            .api_secret(creds.api_secret());
    }
    Arc::new(BinanceSpotEndpoint::new(http.clone(), builder.build()))
}
