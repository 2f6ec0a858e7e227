//! Engine commands
//!
//! Validated commands from the presentation layer. Every command names the
//! staff member acting, for audit attribution; commands that mutate an
//! existing invoice optionally carry the version the caller last read, so
//! a stale write surfaces as a conflict instead of silently clobbering.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{
    AppointmentId, ClaimId, InvoiceId, LineItemId, Money, PatientId, PaymentId, Rate, ServiceId,
    StaffId,
};
use domain_billing::{PaymentMethod, PaymentTerms};
use domain_claims::ClaimStatus;

/// Adds a billable service to the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterService {
    pub name: String,
    pub code: String,
    pub price: Money,
    #[serde(default)]
    pub tax_rate: Rate,
    pub description: Option<String>,
    pub category: Option<String>,
    pub actor: StaffId,
}

/// Edits a catalog service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateService {
    pub service_id: ServiceId,
    pub name: Option<String>,
    pub price: Option<Money>,
    pub tax_rate: Option<Rate>,
    pub actor: StaffId,
}

/// Opens a new draft invoice for a patient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInvoice {
    pub patient_id: PatientId,
    pub patient_name: String,
    pub appointment_id: Option<AppointmentId>,
    pub issue_date: NaiveDate,
    #[serde(default)]
    pub payment_terms: PaymentTerms,
    /// Overrides the due date computed from the terms
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub terms_conditions: Option<String>,
    pub actor: StaffId,
}

/// Adds a line to a draft invoice
///
/// Price and tax default from the referenced service unless overridden.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddLine {
    pub invoice_id: InvoiceId,
    pub service_id: ServiceId,
    pub quantity: Decimal,
    pub unit_price: Option<Money>,
    pub tax_rate: Option<Rate>,
    pub discount_rate: Option<Rate>,
    pub description: Option<String>,
    pub expected_version: Option<u32>,
    pub actor: StaffId,
}

/// Edits a line on a draft invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateLine {
    pub invoice_id: InvoiceId,
    pub item_id: LineItemId,
    pub quantity: Option<Decimal>,
    pub unit_price: Option<Money>,
    pub tax_rate: Option<Rate>,
    pub discount_rate: Option<Rate>,
    pub expected_version: Option<u32>,
    pub actor: StaffId,
}

/// Removes a line from a draft invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveLine {
    pub invoice_id: InvoiceId,
    pub item_id: LineItemId,
    pub expected_version: Option<u32>,
    pub actor: StaffId,
}

/// Sets the invoice-level discount on a draft invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetDiscount {
    pub invoice_id: InvoiceId,
    pub discount_amount: Money,
    pub expected_version: Option<u32>,
    pub actor: StaffId,
}

/// Edits the header fields of a draft invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateHeader {
    pub invoice_id: InvoiceId,
    pub notes: Option<String>,
    pub terms_conditions: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub payment_terms: Option<PaymentTerms>,
    /// Overrides the due date recomputed from date or terms changes
    pub due_date: Option<NaiveDate>,
    pub expected_version: Option<u32>,
    pub actor: StaffId,
}

/// Records a payment against an invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordPayment {
    pub invoice_id: InvoiceId,
    pub amount: Money,
    pub method: PaymentMethod,
    pub payment_date: Option<DateTime<Utc>>,
    pub reference_number: Option<String>,
    pub bank_name: Option<String>,
    pub check_number: Option<String>,
    pub notes: Option<String>,
    pub expected_version: Option<u32>,
    pub actor: StaffId,
}

/// Confirms a pending payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletePayment {
    pub invoice_id: InvoiceId,
    pub payment_id: PaymentId,
    pub expected_version: Option<u32>,
    pub actor: StaffId,
}

/// Marks a pending payment as failed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailPayment {
    pub invoice_id: InvoiceId,
    pub payment_id: PaymentId,
    pub reason: String,
    pub actor: StaffId,
}

/// Refunds a completed payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundPayment {
    pub invoice_id: InvoiceId,
    pub payment_id: PaymentId,
    pub reason: String,
    pub actor: StaffId,
}

/// Files an insurance claim against an invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileClaim {
    pub invoice_id: InvoiceId,
    pub insurance_company: String,
    pub policy_number: String,
    pub claim_amount: Money,
    /// When present, the claim is submitted immediately with this date
    pub submission_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub actor: StaffId,
}

/// Applies a status update reported by the insurer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateClaimStatus {
    pub claim_id: ClaimId,
    pub status: ClaimStatus,
    pub approved_amount: Option<Money>,
    pub response_date: Option<NaiveDate>,
    pub rejection_reason: Option<String>,
    pub actor: StaffId,
}

/// One recipient of a bulk invoicing run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkRecipient {
    pub patient_id: PatientId,
    pub patient_name: String,
    pub appointment_id: Option<AppointmentId>,
}

/// Creates one single-line invoice per patient for the same service
///
/// All-or-nothing: if any recipient fails validation, no invoice is
/// created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkInvoices {
    pub recipients: Vec<BulkRecipient>,
    pub service_id: ServiceId,
    pub quantity: Decimal,
    pub issue_date: NaiveDate,
    #[serde(default)]
    pub payment_terms: PaymentTerms,
    pub actor: StaffId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_create_invoice_deserializes_with_defaults() {
        let json = format!(
            r#"{{
                "patient_id": "{}",
                "patient_name": "Laura Ortiz",
                "issue_date": "2025-01-01",
                "actor": "{}"
            }}"#,
            PatientId::new().as_uuid(),
            StaffId::new().as_uuid(),
        );

        let cmd: CreateInvoice = serde_json::from_str(&json).unwrap();
        assert_eq!(cmd.payment_terms, PaymentTerms::Days30);
        assert!(cmd.appointment_id.is_none());
        assert!(cmd.due_date.is_none());
    }

    #[test]
    fn test_add_line_round_trips() {
        let cmd = AddLine {
            invoice_id: InvoiceId::new(),
            service_id: ServiceId::new(),
            quantity: dec!(2),
            unit_price: Some(Money::new(dec!(80.00))),
            tax_rate: None,
            discount_rate: Some(Rate::from_percent(dec!(10))),
            description: None,
            expected_version: Some(3),
            actor: StaffId::new(),
        };

        let json = serde_json::to_string(&cmd).unwrap();
        let back: AddLine = serde_json::from_str(&json).unwrap();
        assert_eq!(back.quantity, dec!(2));
        assert_eq!(back.unit_price, Some(Money::new(dec!(80.00))));
        assert_eq!(back.expected_version, Some(3));
    }
}
