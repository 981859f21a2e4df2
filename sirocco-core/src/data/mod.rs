//! Order data model.

mod order;

pub use order::{OrderOutcome, OrderRequest, OrderSide, OrderType, TimeInForce};
