//! Payment terms and due date calculation

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment terms offered on an invoice
///
/// The serialized values (`"immediate"`, `"15_days"`, ...) match the codes
/// stored on historical invoices, so imported data round-trips unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentTerms {
    #[serde(rename = "immediate")]
    Immediate,
    #[serde(rename = "15_days")]
    Days15,
    #[default]
    #[serde(rename = "30_days")]
    Days30,
    #[serde(rename = "60_days")]
    Days60,
    #[serde(rename = "90_days")]
    Days90,
}

impl PaymentTerms {
    /// Number of days a patient has to pay
    pub fn days(&self) -> u64 {
        match self {
            PaymentTerms::Immediate => 0,
            PaymentTerms::Days15 => 15,
            PaymentTerms::Days30 => 30,
            PaymentTerms::Days60 => 60,
            PaymentTerms::Days90 => 90,
        }
    }

    /// Computes the due date for an invoice issued on the given date
    pub fn due_date(&self, issue_date: NaiveDate) -> NaiveDate {
        issue_date
            .checked_add_days(Days::new(self.days()))
            .unwrap_or(NaiveDate::MAX)
    }
}

impl fmt::Display for PaymentTerms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentTerms::Immediate => "immediate",
            PaymentTerms::Days15 => "15 days",
            PaymentTerms::Days30 => "30 days",
            PaymentTerms::Days60 => "60 days",
            PaymentTerms::Days90 => "90 days",
        };
        write!(f, "{label}")
    }
}
