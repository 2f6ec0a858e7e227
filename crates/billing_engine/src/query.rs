//! Invoice and payment queries
//!
//! Filters mirror the list views of the original billing screens: invoices
//! by status, patient, issue-date range, or overdue-only; payments by
//! method, status, and date range.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::{DocumentNumber, InvoiceId, PatientId};
use domain_billing::{Invoice, InvoiceStatus, Payment, PaymentMethod, PaymentStatus};

/// Filter over the invoice store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceFilter {
    pub status: Option<InvoiceStatus>,
    pub patient_id: Option<PatientId>,
    pub issued_from: Option<NaiveDate>,
    pub issued_to: Option<NaiveDate>,
    /// Keep only sent invoices past their due date
    #[serde(default)]
    pub overdue_only: bool,
}

impl InvoiceFilter {
    /// Whether an invoice passes this filter as of the given date
    pub fn matches(&self, invoice: &Invoice, today: NaiveDate) -> bool {
        if let Some(status) = self.status {
            if invoice.status() != status {
                return false;
            }
        }
        if let Some(patient_id) = self.patient_id {
            if invoice.patient().id != patient_id {
                return false;
            }
        }
        if let Some(from) = self.issued_from {
            if invoice.issue_date() < from {
                return false;
            }
        }
        if let Some(to) = self.issued_to {
            if invoice.issue_date() > to {
                return false;
            }
        }
        if self.overdue_only && !invoice.is_overdue_on(today) {
            return false;
        }
        true
    }
}

/// Filter over recorded payments
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentFilter {
    pub method: Option<PaymentMethod>,
    pub status: Option<PaymentStatus>,
    pub paid_from: Option<NaiveDate>,
    pub paid_to: Option<NaiveDate>,
}

impl PaymentFilter {
    /// Whether a payment passes this filter
    pub fn matches(&self, payment: &Payment) -> bool {
        if let Some(method) = self.method {
            if payment.method != method {
                return false;
            }
        }
        if let Some(status) = self.status {
            if payment.status != status {
                return false;
            }
        }
        let paid_on = payment.payment_date.date_naive();
        if let Some(from) = self.paid_from {
            if paid_on < from {
                return false;
            }
        }
        if let Some(to) = self.paid_to {
            if paid_on > to {
                return false;
            }
        }
        true
    }
}

/// A payment joined with the invoice it settles, for list views
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentView {
    pub invoice_id: InvoiceId,
    pub invoice_number: DocumentNumber,
    pub patient_name: String,
    pub payment: Payment,
}
