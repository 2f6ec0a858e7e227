//! Billing summary reporting
//!
//! The figures behind the practice dashboard: invoice counts by status,
//! revenue already realized, and money still outstanding.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::Money;
use domain_billing::{Invoice, InvoiceStatus};

/// Aggregate figures over the whole invoice store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingSummary {
    /// Invoices being drafted
    pub draft_count: usize,
    /// Invoices sent and awaiting payment
    pub sent_count: usize,
    /// Invoices settled in full
    pub paid_count: usize,
    /// Cancelled invoices
    pub cancelled_count: usize,
    /// Sent invoices past their due date as of the report date
    pub overdue_count: usize,
    /// Total of paid invoices
    pub total_revenue: Money,
    /// Pending balance across sent invoices
    pub outstanding_balance: Money,
    /// Sum of completed payment amounts across all invoices
    pub collected: Money,
}

impl BillingSummary {
    /// Builds the summary for the given report date
    pub fn compute<'a, I>(invoices: I, today: NaiveDate) -> Self
    where
        I: IntoIterator<Item = &'a Invoice>,
    {
        let mut summary = Self {
            draft_count: 0,
            sent_count: 0,
            paid_count: 0,
            cancelled_count: 0,
            overdue_count: 0,
            total_revenue: Money::zero(),
            outstanding_balance: Money::zero(),
            collected: Money::zero(),
        };

        for invoice in invoices {
            match invoice.status() {
                InvoiceStatus::Draft => summary.draft_count += 1,
                InvoiceStatus::Sent => {
                    summary.sent_count += 1;
                    summary.outstanding_balance =
                        summary.outstanding_balance + invoice.amount_pending();
                }
                InvoiceStatus::Paid => {
                    summary.paid_count += 1;
                    summary.total_revenue = summary.total_revenue + invoice.total_amount();
                }
                InvoiceStatus::Cancelled => summary.cancelled_count += 1,
                // Imported records only; the engine never writes this status
                InvoiceStatus::Overdue => summary.sent_count += 1,
            }

            if invoice.is_overdue_on(today) {
                summary.overdue_count += 1;
            }
            summary.collected = summary.collected + invoice.amount_paid();
        }

        summary
    }
}
