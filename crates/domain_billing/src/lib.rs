//! Billing Domain - Invoicing and Payment Ledger
//!
//! This crate implements the billing core for the clinic: invoice line
//! arithmetic, invoice-level aggregation, and the payment ledger, all on
//! exact decimal arithmetic.
//!
//! # Structure
//!
//! - [`InvoiceItem`] derives per-line amounts (subtotal, discount, taxable
//!   base, tax, total) from a quantity and pricing copied off a catalog
//!   service; nothing derived is ever stored.
//! - [`Invoice`] is the aggregate root: it owns its line items and its
//!   payments, recomputes cached totals inside every mutation, gates
//!   structural edits on draft status, and accumulates domain events.
//! - [`Payment`] records money received against an invoice; only completed
//!   payments count toward the balance.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_billing::{Invoice, InvoiceItem, PatientRef, PaymentTerms};
//!
//! let mut invoice = Invoice::create(number, patient, issue_date, PaymentTerms::Days30, staff);
//! invoice.add_item(InvoiceItem::for_service(&consultation))?;
//! invoice.send()?;
//! ```

pub mod error;
pub mod events;
pub mod invoice;
pub mod line;
pub mod payment;
pub mod terms;

pub use error::BillingError;
pub use events::BillingEvent;
pub use invoice::{Invoice, InvoiceStatus, PatientRef, Totals};
pub use line::InvoiceItem;
pub use payment::{Payment, PaymentMethod, PaymentStatus};
pub use terms::PaymentTerms;
