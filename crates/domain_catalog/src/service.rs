//! Billable service entity

use chrono::{DateTime, Utc};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{Money, Rate, ServiceId};

use crate::error::CatalogError;

/// A normalized service code
///
/// Codes are trimmed and uppercased on construction, so `"cons-01"` and
/// `"CONS-01"` are the same code. Uniqueness is enforced by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServiceCode(String);

impl ServiceCode {
    pub fn new(code: impl Into<String>) -> Result<Self, CatalogError> {
        let code = code.into().trim().to_uppercase();
        if code.is_empty() {
            return Err(CatalogError::validation("Service code cannot be empty"));
        }
        if code.len() > 50 {
            return Err(CatalogError::validation(
                "Service code cannot exceed 50 characters",
            ));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ServiceCode {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ServiceCode> for String {
    fn from(code: ServiceCode) -> String {
        code.0
    }
}

/// A billable service offered by the clinic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    /// Unique identifier
    pub id: ServiceId,
    /// Service name
    pub name: String,
    /// Description
    pub description: Option<String>,
    /// Normalized unique code
    pub code: ServiceCode,
    /// Unit price before tax
    pub price: Money,
    /// Tax rate as a percentage
    pub tax_rate: Rate,
    /// Whether the service can be billed
    pub is_active: bool,
    /// Grouping category
    pub category: Option<String>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Service {
    /// Creates a new active service
    pub fn new(
        name: impl Into<String>,
        code: ServiceCode,
        price: Money,
    ) -> Result<Self, CatalogError> {
        let name = name.into();
        validate_name(&name)?;
        validate_price(&price)?;

        let now = Utc::now();
        Ok(Self {
            id: ServiceId::new_v7(),
            name,
            description: None,
            code,
            price,
            tax_rate: Rate::zero(),
            is_active: true,
            category: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the tax rate
    pub fn with_tax_rate(mut self, tax_rate: Rate) -> Result<Self, CatalogError> {
        validate_tax_rate(&tax_rate)?;
        self.tax_rate = tax_rate;
        Ok(self)
    }

    /// Sets the category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Returns the unit price including tax
    pub fn price_with_tax(&self) -> Money {
        self.price + self.tax_rate.apply(&self.price)
    }

    /// Updates the unit price
    pub fn update_price(&mut self, price: Money) -> Result<(), CatalogError> {
        validate_price(&price)?;
        self.price = price;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Updates the tax rate
    pub fn update_tax_rate(&mut self, tax_rate: Rate) -> Result<(), CatalogError> {
        validate_tax_rate(&tax_rate)?;
        self.tax_rate = tax_rate;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Renames the service
    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), CatalogError> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Takes the service off the billable list without deleting it
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }

    /// Makes the service billable again
    pub fn reactivate(&mut self) {
        self.is_active = true;
        self.updated_at = Utc::now();
    }
}

fn validate_name(name: &str) -> Result<(), CatalogError> {
    if name.trim().is_empty() {
        return Err(CatalogError::validation("Service name cannot be empty"));
    }
    if name.len() > 200 {
        return Err(CatalogError::validation(
            "Service name cannot exceed 200 characters",
        ));
    }
    Ok(())
}

fn validate_price(price: &Money) -> Result<(), CatalogError> {
    if price.is_negative() {
        return Err(CatalogError::validation("Price cannot be negative"));
    }
    Ok(())
}

fn validate_tax_rate(tax_rate: &Rate) -> Result<(), CatalogError> {
    let percent = tax_rate.as_percent();
    if percent < dec!(0) || percent > dec!(100) {
        return Err(CatalogError::validation(
            "Tax rate must be between 0 and 100 percent",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consultation() -> Service {
        Service::new(
            "General Consultation",
            ServiceCode::new("CONS-01").unwrap(),
            Money::new(dec!(100.00)),
        )
        .unwrap()
    }

    #[test]
    fn test_code_is_uppercased_and_trimmed() {
        let code = ServiceCode::new("  cons-01  ").unwrap();
        assert_eq!(code.as_str(), "CONS-01");
    }

    #[test]
    fn test_empty_code_rejected() {
        assert!(ServiceCode::new("   ").is_err());
    }

    #[test]
    fn test_oversized_code_rejected() {
        assert!(ServiceCode::new("X".repeat(51)).is_err());
    }

    #[test]
    fn test_new_service_is_active() {
        let service = consultation();
        assert!(service.is_active);
        assert_eq!(service.tax_rate, Rate::zero());
    }

    #[test]
    fn test_negative_price_rejected() {
        let result = Service::new(
            "Bad",
            ServiceCode::new("BAD").unwrap(),
            Money::new(dec!(-1)),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_price_with_tax() {
        let service = consultation()
            .with_tax_rate(Rate::from_percent(dec!(10)))
            .unwrap();
        assert_eq!(service.price_with_tax(), Money::new(dec!(110.000)));
    }

    #[test]
    fn test_price_with_zero_tax() {
        let service = consultation();
        assert_eq!(service.price_with_tax(), service.price);
    }

    #[test]
    fn test_tax_rate_out_of_range_rejected() {
        assert!(consultation()
            .with_tax_rate(Rate::from_percent(dec!(100.01)))
            .is_err());
        assert!(consultation()
            .with_tax_rate(Rate::from_percent(dec!(-0.01)))
            .is_err());
    }

    #[test]
    fn test_deactivate_and_reactivate() {
        let mut service = consultation();
        service.deactivate();
        assert!(!service.is_active);
        service.reactivate();
        assert!(service.is_active);
    }

    #[test]
    fn test_code_deserialization_normalizes() {
        let code: ServiceCode = serde_json::from_str("\"lab-glu\"").unwrap();
        assert_eq!(code.as_str(), "LAB-GLU");
    }

    #[test]
    fn test_code_deserialization_rejects_empty() {
        assert!(serde_json::from_str::<ServiceCode>("\"  \"").is_err());
    }
}
