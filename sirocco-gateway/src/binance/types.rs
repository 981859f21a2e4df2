//! Binance-specific wire types.
//!
//! Response shapes for the three spot API v3 endpoints this system
//! consumes. Unknown fields are ignored on deserialization.

use serde::{Deserialize, Serialize};

/// Binance spot API deployment to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BinanceBase {
    /// Production spot API
    #[default]
    Mainnet,
    /// Spot testnet
    Testnet,
}

impl BinanceBase {
    /// Returns the REST API base URL for this deployment.
    #[must_use]
    pub const fn rest_base_url(&self) -> &'static str {
        match self {
            Self::Mainnet => "https://api.binance.com",
            Self::Testnet => "https://testnet.binance.vision",
        }
    }
}

/// Successful order placement acknowledgement (`POST /api/v3/order`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAck {
    /// Trading pair symbol.
    pub symbol: String,
    /// Exchange-assigned order id.
    pub order_id: u64,
    /// Order list id (-1 when the order is not part of a list).
    #[serde(default)]
    pub order_list_id: Option<i64>,
    /// Client order id assigned by the exchange.
    pub client_order_id: String,
    /// Transaction time in unix milliseconds.
    pub transact_time: i64,
}

/// Error payload the exchange embeds in response bodies.
///
/// Can arrive with any HTTP status, including 200 - the presence of a
/// `code` field is what marks a business error, not the status line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Exchange error code (negative).
    pub code: i64,
    /// Human-readable error message.
    pub msg: String,
}

/// One tradable symbol entry from `GET /api/v3/exchangeInfo`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
    /// Symbol name, e.g. "JTOUSDT".
    pub symbol: String,
    /// Trading status, e.g. "TRADING".
    #[serde(default)]
    pub status: Option<String>,
    /// Base asset.
    #[serde(default)]
    pub base_asset: Option<String>,
    /// Quote asset.
    #[serde(default)]
    pub quote_asset: Option<String>,
}

/// Exchange metadata (`GET /api/v3/exchangeInfo`), reduced to the parts
/// this system reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeInfo {
    /// Server time in unix milliseconds.
    #[serde(default)]
    pub server_time: Option<i64>,
    /// Tradable symbols.
    pub symbols: Vec<SymbolInfo>,
}

impl ExchangeInfo {
    /// Collects the authoritative set of tradable symbol names.
    #[must_use]
    pub fn symbol_set(&self) -> std::collections::HashSet<String> {
        self.symbols.iter().map(|s| s.symbol.clone()).collect()
    }
}
