//! Order request and outcome types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::types::{AccountId, OrderId, Price, Quantity, Symbol, Timestamp};

/// Order side (direction).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    /// Buy order
    Buy,
    /// Sell order
    Sell,
}

impl OrderSide {
    /// Returns true if this is a buy order.
    #[must_use]
    pub const fn is_buy(&self) -> bool {
        matches!(self, Self::Buy)
    }

    /// Returns the wire value used by the exchange API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrderSide {
    type Err = ConfigError;

    /// Parses a direction value case-insensitively.
    ///
    /// Anything other than `buy` or `sell` is a configuration error; order
    /// input with an unrecognized direction must never reach the exchange.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            _ => Err(ConfigError::InvalidDirection {
                value: s.to_string(),
            }),
        }
    }
}

/// Order type. Only limit orders are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    /// Limit order
    #[default]
    Limit,
}

impl OrderType {
    /// Returns the wire value used by the exchange API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Limit => "LIMIT",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Time in force. Only GTC is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Good Till Cancel - remains active until filled or canceled
    #[default]
    GoodTillCancel,
}

impl TimeInForce {
    /// Returns the wire value used by the exchange API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::GoodTillCancel => "GTC",
        }
    }
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A limit order ready for submission.
///
/// Quantity and price arrive already quantized to the per-account scale;
/// the engine does not re-round them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Sub-account that places the order.
    pub account_id: AccountId,
    /// Trading pair symbol.
    pub symbol: Symbol,
    /// Order side.
    pub side: OrderSide,
    /// Order quantity, quantized.
    pub quantity: Quantity,
    /// Limit price, quantized.
    pub price: Price,
    /// Order type.
    #[serde(default)]
    pub order_type: OrderType,
    /// Time in force.
    #[serde(default)]
    pub time_in_force: TimeInForce,
}

impl OrderRequest {
    /// Creates a new GTC limit order request.
    #[must_use]
    pub fn limit(
        account_id: AccountId,
        symbol: Symbol,
        side: OrderSide,
        quantity: Quantity,
        price: Price,
    ) -> Self {
        Self {
            account_id,
            symbol,
            side,
            quantity,
            price,
            order_type: OrderType::Limit,
            time_in_force: TimeInForce::GoodTillCancel,
        }
    }

    /// Checks the order invariants: quantity and price strictly positive.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidOrder` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quantity.is_zero() {
            return Err(ConfigError::InvalidOrder {
                reason: format!("quantity must be positive, got {}", self.quantity),
            });
        }
        if self.price.is_zero() {
            return Err(ConfigError::InvalidOrder {
                reason: format!("price must be positive, got {}", self.price),
            });
        }
        Ok(())
    }
}

impl fmt::Display for OrderRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "account={} {} {} {}@{}",
            self.account_id, self.side, self.symbol, self.quantity, self.price
        )
    }
}

/// Terminal state of a dispatched order.
///
/// Exactly one outcome is produced per order request that was actually
/// sent to the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderOutcome {
    /// The exchange accepted the order.
    Accepted {
        /// Exchange-assigned order id.
        order_id: OrderId,
        /// Exchange transaction time.
        transact_time: Timestamp,
    },
    /// The exchange answered with a non-success HTTP status.
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Status reason, when the transport supplied one.
        reason: Option<String>,
    },
    /// HTTP 200 carrying an exchange-level error payload.
    ExchangeError {
        /// Exchange error code.
        code: i64,
        /// Exchange error message.
        message: String,
    },
}

impl OrderOutcome {
    /// Returns true if the order was accepted by the exchange.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}
