//! Claims Domain - Insurance Claim Tracking
//!
//! This crate tracks third-party insurance claims filed against invoices:
//! filing, submission, the insurer's review, and the eventual approval,
//! rejection, or payout.
//!
//! # Claim Lifecycle
//!
//! ```text
//! draft -> submitted -> under_review -> approved/rejected -> paid
//! ```
//!
//! The lifecycle above is the usual path, not an enforced machine: status
//! updates arrive from insurers in whatever order their processes produce
//! them, so [`InsuranceClaim::update_status`] accepts any target. What is
//! enforced is monetary: the approved amount never exceeds the claimed
//! amount, and the engine bounds the claimed amount by the invoice total
//! at filing time.

pub mod claim;
pub mod error;

pub use claim::{ClaimStatus, InsuranceClaim};
pub use error::ClaimError;
