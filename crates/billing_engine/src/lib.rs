//! Application layer for clinic billing
//!
//! This crate wires the catalog, billing, and claims domains together
//! behind [`BillingEngine`], an in-process store with serializable
//! command execution. Commands are plain serde structs in [`commands`],
//! read models live in [`query`] and [`reporting`], and every error is
//! funneled through [`EngineError`].

pub mod commands;
pub mod engine;
pub mod error;
pub mod query;
pub mod reporting;

pub use engine::BillingEngine;
pub use error::EngineError;
pub use query::{InvoiceFilter, PaymentFilter, PaymentView};
pub use reporting::BillingSummary;
