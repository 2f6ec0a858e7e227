//! Claims domain errors

use thiserror::Error;

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    /// Claim not found
    #[error("Claim not found: {0}")]
    ClaimNotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation not allowed in the claim's current status
    #[error("Cannot {operation} a claim in {status} status")]
    InvalidState {
        operation: &'static str,
        status: String,
    },
}

impl ClaimError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClaimError::Validation(message.into())
    }
}
