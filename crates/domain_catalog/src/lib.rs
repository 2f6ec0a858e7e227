//! Catalog Domain - Billable Services
//!
//! This crate manages the catalog of services a clinic can bill for:
//! consultations, procedures, lab work, and so on. Each service carries a
//! unique normalized code, a pre-tax unit price, and a tax rate; invoice
//! lines copy pricing from here at billing time.

pub mod catalog;
pub mod error;
pub mod service;

pub use catalog::ServiceCatalog;
pub use error::CatalogError;
pub use service::{Service, ServiceCode};
