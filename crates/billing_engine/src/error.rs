//! Engine-level errors
//!
//! The engine wraps every domain error behind one type so callers match on
//! a single surface. The predicate helpers classify errors the way the
//! presentation layer reports them: validation, invalid state, not found,
//! or a concurrency conflict worth retrying.

use thiserror::Error;

use core_kernel::NumberError;
use domain_billing::BillingError;
use domain_catalog::CatalogError;
use domain_claims::ClaimError;

/// Errors surfaced by [`crate::BillingEngine`] operations
#[derive(Debug, Error)]
pub enum EngineError {
    /// Catalog domain error
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Billing domain error
    #[error(transparent)]
    Billing(#[from] BillingError),

    /// Claims domain error
    #[error(transparent)]
    Claim(#[from] ClaimError),

    /// Document numbering error
    #[error(transparent)]
    Number(#[from] NumberError),

    /// Referenced entity does not exist in the store
    #[error("Not found: {0}")]
    NotFound(String),

    /// A competing writer got there first; retry with a fresh read
    #[error("Concurrent modification: {0}")]
    Conflict(String),
}

impl EngineError {
    pub fn not_found(message: impl Into<String>) -> Self {
        EngineError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        EngineError::Conflict(message.into())
    }

    /// Malformed or out-of-range input, rejected before any mutation
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EngineError::Catalog(CatalogError::Validation(_))
                | EngineError::Billing(BillingError::Validation(_))
                | EngineError::Claim(ClaimError::Validation(_))
        )
    }

    /// Operation attempted against an entity whose state forbids it
    pub fn is_invalid_state(&self) -> bool {
        matches!(
            self,
            EngineError::Billing(BillingError::InvalidState { .. })
                | EngineError::Claim(ClaimError::InvalidState { .. })
                | EngineError::Catalog(CatalogError::ServiceInactive(_))
        )
    }

    /// Referenced entity missing from the store
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            EngineError::NotFound(_)
                | EngineError::Catalog(CatalogError::ServiceNotFound(_))
                | EngineError::Billing(BillingError::ItemNotFound(_))
                | EngineError::Billing(BillingError::PaymentNotFound(_))
                | EngineError::Claim(ClaimError::ClaimNotFound(_))
        )
    }

    /// Concurrency conflict; the whole operation should be retried
    pub fn is_conflict(&self) -> bool {
        matches!(self, EngineError::Conflict(_))
    }
}
