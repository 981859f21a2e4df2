//! Raw order rows and conversion into validated requests.

use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

use sirocco_core::data::{OrderRequest, OrderSide};
use sirocco_core::error::ConfigError;
use sirocco_core::types::{AccountId, Price, Quantity, Symbol};

/// One row of the tabular order input, before parsing.
///
/// Fields are kept as the raw strings so the preflight validator can
/// report malformed values as row defects instead of failing on first
/// contact. Conversion into an [`OrderRequest`] happens through
/// [`OrderRow::to_request`], which rejects anything malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRow {
    /// Sub-account placing the order.
    pub account_id: AccountId,
    /// Trading pair, e.g. "JTOUSDT".
    pub pair: String,
    /// Direction, case-insensitively "buy" or "sell".
    pub direction: String,
    /// Order quantity as written in the input.
    pub quantity: String,
    /// Limit price as written in the input.
    pub price: String,
}

impl OrderRow {
    /// Converts the row into a validated order request, quantizing
    /// quantity and price to the given decimal scales.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidDirection` for an unrecognized
    /// direction and `ConfigError::InvalidOrder` for malformed or
    /// non-positive decimals.
    pub fn to_request(
        &self,
        price_precision: u32,
        quantity_precision: u32,
    ) -> Result<OrderRequest, ConfigError> {
        let side = OrderSide::from_str(&self.direction)?;

        let symbol = Symbol::new(&self.pair).map_err(|e| ConfigError::InvalidOrder {
            reason: e.to_string(),
        })?;

        let quantity =
            Decimal::from_str(&self.quantity).map_err(|_| ConfigError::InvalidOrder {
                reason: format!("quantity '{}' is not a decimal", self.quantity),
            })?;
        let price = Decimal::from_str(&self.price).map_err(|_| ConfigError::InvalidOrder {
            reason: format!("price '{}' is not a decimal", self.price),
        })?;

        let quantity = Quantity::new(quantity.round_dp(quantity_precision)).map_err(|e| {
            ConfigError::InvalidOrder {
                reason: e.to_string(),
            }
        })?;
        let price =
            Price::new(price.round_dp(price_precision)).map_err(|e| ConfigError::InvalidOrder {
                reason: e.to_string(),
            })?;

        let request = OrderRequest::limit(self.account_id, symbol, side, quantity, price);
        request.validate()?;
        Ok(request)
    }
}

impl fmt::Display for OrderRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "account={} {} {} {}@{}",
            self.account_id, self.direction, self.pair, self.quantity, self.price
        )
    }
}
