//! Service catalog registry
//!
//! This module provides the in-memory registry of billable services,
//! enforcing code uniqueness and activation rules.

use std::collections::HashMap;

use core_kernel::ServiceId;

use crate::error::CatalogError;
use crate::service::{Service, ServiceCode};

/// The catalog of services a clinic can bill for
///
/// The catalog is the single source of truth for service codes: codes are
/// globally unique in their normalized (uppercased) form, and a service must
/// be active to be billable.
///
/// # Invariants
///
/// - No two services share a code
/// - Services are deactivated rather than deleted, so historical invoice
///   lines keep resolving
#[derive(Debug, Default)]
pub struct ServiceCatalog {
    /// Registered services
    services: HashMap<ServiceId, Service>,
    /// Code index for uniqueness checks and lookups
    by_code: HashMap<ServiceCode, ServiceId>,
}

impl ServiceCatalog {
    /// Creates an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a service
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateCode`] if another service already
    /// uses the code.
    pub fn register(&mut self, service: Service) -> Result<ServiceId, CatalogError> {
        if self.by_code.contains_key(&service.code) {
            return Err(CatalogError::DuplicateCode(service.code.to_string()));
        }

        let id = service.id;
        self.by_code.insert(service.code.clone(), id);
        self.services.insert(id, service);
        Ok(id)
    }

    /// Gets a service by ID
    pub fn get(&self, id: &ServiceId) -> Option<&Service> {
        self.services.get(id)
    }

    /// Gets a service by its normalized code
    pub fn get_by_code(&self, code: &ServiceCode) -> Option<&Service> {
        self.by_code.get(code).and_then(|id| self.services.get(id))
    }

    /// Returns the service if it exists and is active
    ///
    /// # Errors
    ///
    /// - [`CatalogError::ServiceNotFound`] if the ID is unknown
    /// - [`CatalogError::ServiceInactive`] if the service is deactivated
    pub fn billable(&self, id: &ServiceId) -> Result<&Service, CatalogError> {
        let service = self
            .services
            .get(id)
            .ok_or_else(|| CatalogError::ServiceNotFound(id.to_string()))?;

        if !service.is_active {
            return Err(CatalogError::ServiceInactive(service.code.to_string()));
        }
        Ok(service)
    }

    /// Returns active services sorted by category, then name
    pub fn active_services(&self) -> Vec<&Service> {
        let mut services: Vec<&Service> = self
            .services
            .values()
            .filter(|s| s.is_active)
            .collect();
        services.sort_by(|a, b| {
            (a.category.as_deref(), a.name.as_str()).cmp(&(b.category.as_deref(), b.name.as_str()))
        });
        services
    }

    /// Returns all services regardless of state, sorted by category and name
    pub fn all_services(&self) -> Vec<&Service> {
        let mut services: Vec<&Service> = self.services.values().collect();
        services.sort_by(|a, b| {
            (a.category.as_deref(), a.name.as_str()).cmp(&(b.category.as_deref(), b.name.as_str()))
        });
        services
    }

    /// Applies an update to a registered service
    ///
    /// The closure receives the stored service; the code index is refreshed
    /// afterwards in case the update changed the code.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::ServiceNotFound`] if the ID is unknown
    /// - [`CatalogError::DuplicateCode`] if a code change collides with
    ///   another service
    pub fn update<F>(&mut self, id: &ServiceId, apply: F) -> Result<&Service, CatalogError>
    where
        F: FnOnce(&mut Service) -> Result<(), CatalogError>,
    {
        let service = self
            .services
            .get_mut(id)
            .ok_or_else(|| CatalogError::ServiceNotFound(id.to_string()))?;

        let old_code = service.code.clone();
        apply(service)?;

        if service.code != old_code {
            if self.by_code.contains_key(&service.code) {
                let new_code = service.code.to_string();
                // Roll the code back so the index stays consistent
                service.code = old_code;
                return Err(CatalogError::DuplicateCode(new_code));
            }
            self.by_code.remove(&old_code);
            self.by_code.insert(service.code.clone(), *id);
        }

        Ok(&self.services[id])
    }

    /// Deactivates a service, leaving it resolvable for historical lines
    pub fn deactivate(&mut self, id: &ServiceId) -> Result<(), CatalogError> {
        let service = self
            .services
            .get_mut(id)
            .ok_or_else(|| CatalogError::ServiceNotFound(id.to_string()))?;
        service.deactivate();
        Ok(())
    }

    /// Number of registered services, active or not
    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
