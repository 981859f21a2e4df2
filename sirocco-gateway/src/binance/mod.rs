//! Binance spot endpoint client.
//!
//! Wraps the REST infrastructure (throttler, signer, shared HTTP client)
//! into an implementation of [`sirocco_core::traits::SpotEndpoint`] for
//! the Binance spot API v3.

mod endpoint;
mod types;

pub use endpoint::BinanceSpotEndpoint;
pub use types::{ApiErrorBody, BinanceBase, ExchangeInfo, OrderAck, SymbolInfo};
