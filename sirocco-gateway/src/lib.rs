//! # Sirocco Gateway
//!
//! Exchange endpoint clients for the Sirocco order placer.
//!
//! This crate provides:
//! - REST infrastructure: token-bucket throttling, HMAC-SHA256 request
//!   signing, endpoint configuration
//! - The Binance spot endpoint client
//! - A simulation endpoint with configurable latency and failure injection,
//!   substitutable behind the same [`sirocco_core::traits::SpotEndpoint`]
//!   trait for non-production verification

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

/// REST client infrastructure
pub mod rest;

/// Binance spot endpoint client
pub mod binance;

/// Simulation endpoint for non-production verification
pub mod mock;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::binance::{BinanceBase, BinanceSpotEndpoint};
    pub use crate::mock::MockSpotEndpoint;
    pub use crate::rest::{
        EndpointConfig, EndpointConfigBuilder, RefillRateUnit, RequestSigner, Throttler,
    };
}
