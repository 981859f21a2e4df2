//! # Sirocco Engine
//!
//! Concurrent order submission and preflight validation.
//!
//! This crate provides:
//! - [`SubmissionEngine`] - dispatches a batch of limit orders concurrently
//!   across per-account endpoint clients, cancels the batch on the first
//!   unrecoverable completion, and always reports final accounting
//! - [`PreflightValidator`] - the dry-run pass that checks credentials and
//!   order rows against exchange-reported symbols without placing anything

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_possible_truncation)]

/// Batch submission engine
pub mod batch;

/// Raw order rows and conversion into validated requests
pub mod input;

/// Dry-run preflight validation
pub mod preflight;

pub use batch::{BatchAborted, BatchReport, SubmissionEngine};
pub use input::OrderRow;
pub use preflight::{InvalidAccount, InvalidRow, PreflightValidator, RowDefect, ValidationReport};
