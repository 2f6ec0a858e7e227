//! Payment records
//!
//! Payments live inside the invoice that owns them. A payment starts out
//! pending and is later completed, failed, or refunded; only completed
//! payments count toward the invoice balance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{DocumentNumber, Money, PaymentId, StaffId};

/// How a payment was made
///
/// Serialized values match the codes stored on historical payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
    Check,
    Insurance,
    Other,
}

/// Payment lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Recorded but not yet confirmed
    Pending,
    /// Confirmed; counts toward the invoice balance
    Completed,
    /// Did not go through
    Failed,
    /// Returned to the payer
    Refunded,
}

/// A payment recorded against an invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier
    pub id: PaymentId,
    /// Receipt number, e.g. `PAY-2025-00001`
    pub payment_number: DocumentNumber,
    /// Payment amount
    pub amount: Money,
    /// When the payment was made
    pub payment_date: DateTime<Utc>,
    /// Payment method
    pub method: PaymentMethod,
    /// Status
    pub status: PaymentStatus,
    /// Reference for card or transfer payments
    pub reference_number: Option<String>,
    /// Bank, for transfers and checks
    pub bank_name: Option<String>,
    /// Check number, for check payments
    pub check_number: Option<String>,
    /// Notes
    pub notes: Option<String>,
    /// Staff member who processed the payment
    pub processed_by: StaffId,
    /// When status changed to completed
    pub completed_at: Option<DateTime<Utc>>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Creates a new pending payment
    pub fn new(
        payment_number: DocumentNumber,
        amount: Money,
        method: PaymentMethod,
        processed_by: StaffId,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: PaymentId::new_v7(),
            payment_number,
            amount,
            payment_date: now,
            method,
            status: PaymentStatus::Pending,
            reference_number: None,
            bank_name: None,
            check_number: None,
            notes: None,
            processed_by,
            completed_at: None,
            created_at: now,
        }
    }

    /// Sets the payment date
    pub fn with_payment_date(mut self, payment_date: DateTime<Utc>) -> Self {
        self.payment_date = payment_date;
        self
    }

    /// Sets the transaction reference
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference_number = Some(reference.into());
        self
    }

    /// Sets the bank name
    pub fn with_bank_name(mut self, bank_name: impl Into<String>) -> Self {
        self.bank_name = Some(bank_name.into());
        self
    }

    /// Sets the check number
    pub fn with_check_number(mut self, check_number: impl Into<String>) -> Self {
        self.check_number = Some(check_number.into());
        self
    }

    /// Sets free-text notes
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Marks the payment as completed
    pub fn complete(&mut self) {
        self.status = PaymentStatus::Completed;
        self.completed_at = Some(Utc::now());
    }

    /// Marks the payment as failed
    pub fn fail(&mut self, reason: &str) {
        self.status = PaymentStatus::Failed;
        self.notes = Some(reason.to_string());
    }

    /// Refunds the payment
    pub fn refund(&mut self, reason: &str) {
        self.status = PaymentStatus::Refunded;
        self.notes = Some(format!("Refunded: {}", reason));
    }

    /// True when the payment counts toward the invoice balance
    pub fn is_settled(&self) -> bool {
        self.status == PaymentStatus::Completed
    }
}
