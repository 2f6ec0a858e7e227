//! Catalog domain errors

use thiserror::Error;

/// Errors that can occur in the catalog domain
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Service not found
    #[error("Service not found: {0}")]
    ServiceNotFound(String),

    /// A service with this code already exists
    #[error("A service with code {0} already exists")]
    DuplicateCode(String),

    /// Service exists but is deactivated
    #[error("Service {0} is not active")]
    ServiceInactive(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl CatalogError {
    pub fn validation(message: impl Into<String>) -> Self {
        CatalogError::Validation(message.into())
    }
}
