//! Core Kernel - Foundational types and utilities for the billing system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money types with precise decimal arithmetic
//! - Year-scoped document numbering with atomic sequence allocation
//! - Common identifiers and value objects

pub mod identifiers;
pub mod money;
pub mod numbering;

pub use identifiers::{
    AppointmentId, ClaimId, InvoiceId, LineItemId, PatientId, PaymentId, ServiceId, StaffId,
};
pub use money::{Money, MoneyError, Rate};
pub use numbering::{DocumentKind, DocumentNumber, NumberError, SequenceAllocator};
