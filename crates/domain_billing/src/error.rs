//! Billing domain errors

use core_kernel::MoneyError;
use thiserror::Error;

/// Errors that can occur in the billing domain
#[derive(Debug, Error)]
pub enum BillingError {
    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation not allowed in the invoice's current status
    #[error("Cannot {operation} an invoice in {status} status")]
    InvalidState {
        operation: &'static str,
        status: String,
    },

    /// Line item not found on the invoice
    #[error("Line item not found: {0}")]
    ItemNotFound(String),

    /// Payment not found on the invoice
    #[error("Payment not found: {0}")]
    PaymentNotFound(String),

    /// Money arithmetic error
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),
}

impl BillingError {
    pub fn validation(message: impl Into<String>) -> Self {
        BillingError::Validation(message.into())
    }
}
