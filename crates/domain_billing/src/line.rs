//! Invoice line items
//!
//! A line item bills a quantity of a catalog service. Pricing is copied
//! from the service at the time the line is added, so later catalog edits
//! never change what an issued invoice says. All amounts are derived on
//! demand; nothing derived is stored.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::{LineItemId, Money, Rate, ServiceId};
use domain_catalog::Service;

use crate::error::BillingError;

/// A single billable line on an invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceItem {
    /// Unique identifier
    pub id: LineItemId,
    /// The catalog service being billed
    pub service_id: ServiceId,
    /// Service name copied at billing time
    pub service_name: String,
    /// Free-text description override
    pub description: Option<String>,
    /// Quantity billed
    pub quantity: Decimal,
    /// Unit price copied from the service
    pub unit_price: Money,
    /// Tax rate as a percentage
    pub tax_rate: Rate,
    /// Line discount as a percentage
    pub discount_rate: Rate,
}

impl InvoiceItem {
    /// Creates a line for a catalog service, copying its pricing
    pub fn for_service(service: &Service) -> Self {
        Self {
            id: LineItemId::new_v7(),
            service_id: service.id,
            service_name: service.name.clone(),
            description: None,
            quantity: Decimal::ONE,
            unit_price: service.price,
            tax_rate: service.tax_rate,
            discount_rate: Rate::zero(),
        }
    }

    /// Sets the quantity
    pub fn with_quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = quantity;
        self
    }

    /// Overrides the unit price copied from the service
    pub fn with_unit_price(mut self, unit_price: Money) -> Self {
        self.unit_price = unit_price;
        self
    }

    /// Overrides the tax rate copied from the service
    pub fn with_tax_rate(mut self, tax_rate: Rate) -> Self {
        self.tax_rate = tax_rate;
        self
    }

    /// Applies a percentage discount to this line
    pub fn with_discount_rate(mut self, discount_rate: Rate) -> Self {
        self.discount_rate = discount_rate;
        self
    }

    /// Sets a free-text description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Quantity times unit price, before discount and tax
    pub fn subtotal(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }

    /// Discount taken off the subtotal
    pub fn discount_amount(&self) -> Money {
        self.discount_rate.apply(&self.subtotal())
    }

    /// Subtotal after discount, the base for tax
    pub fn taxable_amount(&self) -> Money {
        self.subtotal() - self.discount_amount()
    }

    /// Tax charged on the taxable amount
    pub fn tax_amount(&self) -> Money {
        self.tax_rate.apply(&self.taxable_amount())
    }

    /// Line total: taxable amount plus tax
    pub fn total(&self) -> Money {
        self.taxable_amount() + self.tax_amount()
    }

    /// Checks the line is well-formed
    ///
    /// # Errors
    ///
    /// Returns [`BillingError::Validation`] when the quantity is not
    /// positive, the unit price is negative, or a rate falls outside
    /// 0 to 100 percent.
    pub fn validate(&self) -> Result<(), BillingError> {
        if self.quantity <= dec!(0) {
            return Err(BillingError::validation("Quantity must be greater than zero"));
        }
        if self.unit_price.is_negative() {
            return Err(BillingError::validation("Unit price cannot be negative"));
        }
        validate_rate(&self.tax_rate, "Tax rate")?;
        validate_rate(&self.discount_rate, "Discount rate")?;
        Ok(())
    }
}

fn validate_rate(rate: &Rate, label: &str) -> Result<(), BillingError> {
    let percent = rate.as_percent();
    if percent < dec!(0) || percent > dec!(100) {
        return Err(BillingError::validation(format!(
            "{label} must be between 0 and 100 percent"
        )));
    }
    Ok(())
}
