//! Insurance claim entity
//!
//! A claim asks a third-party insurer to cover part or all of an invoice.
//! The claim references its invoice by identifier; the engine that holds
//! both enforces the claimed-amount bound against the invoice total at
//! filing time. A claim never mutates an invoice and approval never
//! creates a payment.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, DocumentNumber, InvoiceId, Money, StaffId};

use crate::error::ClaimError;

/// Claim lifecycle status
///
/// Serialized values match the codes stored on historical claims. Status
/// updates are free-form: an insurer's back office can move a claim to any
/// state in any order, so no transition matrix is enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    /// Being prepared; not yet sent to the insurer
    Draft,
    /// Sent to the insurer
    Submitted,
    /// The insurer is assessing it
    UnderReview,
    /// Approved, in full or in part
    Approved,
    /// Rejected by the insurer
    Rejected,
    /// The insurer has paid out
    Paid,
}

/// A claim filed with an insurer against an invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsuranceClaim {
    /// Unique identifier
    pub id: ClaimId,
    /// Claim number, e.g. `CLM-2025-00001`
    pub claim_number: DocumentNumber,
    /// The invoice being claimed against
    pub invoice_id: InvoiceId,
    /// Insurance company name
    pub insurance_company: String,
    /// Patient's policy number with the insurer
    pub policy_number: String,
    /// Amount claimed; never exceeds the invoice total
    pub claim_amount: Money,
    /// Amount the insurer approved; never exceeds the claimed amount
    pub approved_amount: Money,
    /// When the claim was sent to the insurer
    pub submission_date: Option<NaiveDate>,
    /// When the insurer responded
    pub response_date: Option<NaiveDate>,
    /// When the insurer paid out
    pub payment_date: Option<NaiveDate>,
    /// Status
    pub status: ClaimStatus,
    /// Notes
    pub notes: Option<String>,
    /// Why the insurer rejected the claim
    pub rejection_reason: Option<String>,
    /// Staff member who filed the claim
    pub created_by: StaffId,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl InsuranceClaim {
    /// Creates a new draft claim
    ///
    /// # Errors
    ///
    /// Returns [`ClaimError::Validation`] if the insurer or policy number
    /// is blank, or the claimed amount is not positive. The upper bound
    /// against the invoice total is checked by the caller holding the
    /// invoice.
    pub fn file(
        claim_number: DocumentNumber,
        invoice_id: InvoiceId,
        insurance_company: impl Into<String>,
        policy_number: impl Into<String>,
        claim_amount: Money,
        created_by: StaffId,
    ) -> Result<Self, ClaimError> {
        let insurance_company = insurance_company.into();
        let policy_number = policy_number.into();

        if insurance_company.trim().is_empty() {
            return Err(ClaimError::validation("Insurance company cannot be empty"));
        }
        if policy_number.trim().is_empty() {
            return Err(ClaimError::validation("Policy number cannot be empty"));
        }
        if !claim_amount.is_positive() {
            return Err(ClaimError::validation(
                "Claim amount must be greater than zero",
            ));
        }

        let now = Utc::now();
        Ok(Self {
            id: ClaimId::new_v7(),
            claim_number,
            invoice_id,
            insurance_company,
            policy_number,
            claim_amount,
            approved_amount: Money::zero(),
            submission_date: None,
            response_date: None,
            payment_date: None,
            status: ClaimStatus::Draft,
            notes: None,
            rejection_reason: None,
            created_by,
            created_at: now,
            updated_at: now,
        })
    }

    /// Sets free-text notes
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Submits the claim to the insurer, stamping the submission date once
    pub fn submit(&mut self, date: NaiveDate) {
        self.status = ClaimStatus::Submitted;
        self.submission_date.get_or_insert(date);
        self.touch();
    }

    /// Moves the claim into the insurer's review queue
    pub fn begin_review(&mut self) {
        self.status = ClaimStatus::UnderReview;
        self.touch();
    }

    /// Records the insurer's approval
    ///
    /// # Errors
    ///
    /// Returns [`ClaimError::Validation`] if the approved amount is
    /// negative or exceeds the claimed amount.
    pub fn approve(
        &mut self,
        approved_amount: Money,
        response_date: NaiveDate,
    ) -> Result<(), ClaimError> {
        self.check_approved_amount(&approved_amount)?;
        self.status = ClaimStatus::Approved;
        self.approved_amount = approved_amount;
        self.response_date = Some(response_date);
        self.touch();
        Ok(())
    }

    /// Records the insurer's rejection
    pub fn reject(&mut self, reason: impl Into<String>, response_date: NaiveDate) {
        self.status = ClaimStatus::Rejected;
        self.rejection_reason = Some(reason.into());
        self.response_date = Some(response_date);
        self.touch();
    }

    /// Records the insurer's payout
    pub fn mark_paid(&mut self, payment_date: NaiveDate) {
        self.status = ClaimStatus::Paid;
        self.payment_date = Some(payment_date);
        self.touch();
    }

    /// Applies a free-form status update
    ///
    /// Any target status is accepted. The optional fields are applied when
    /// present; the approved amount is still bounded by the claimed amount.
    pub fn update_status(
        &mut self,
        status: ClaimStatus,
        approved_amount: Option<Money>,
        response_date: Option<NaiveDate>,
        rejection_reason: Option<String>,
    ) -> Result<(), ClaimError> {
        if let Some(amount) = &approved_amount {
            self.check_approved_amount(amount)?;
        }

        self.status = status;
        if let Some(amount) = approved_amount {
            self.approved_amount = amount;
        }
        if let Some(date) = response_date {
            self.response_date = Some(date);
        }
        if let Some(reason) = rejection_reason {
            self.rejection_reason = Some(reason);
        }
        self.touch();
        Ok(())
    }

    /// Whether the insurer has reached a final answer
    pub fn is_resolved(&self) -> bool {
        matches!(
            self.status,
            ClaimStatus::Approved | ClaimStatus::Rejected | ClaimStatus::Paid
        )
    }

    fn check_approved_amount(&self, amount: &Money) -> Result<(), ClaimError> {
        if amount.is_negative() {
            return Err(ClaimError::validation(
                "Approved amount cannot be negative",
            ));
        }
        if *amount > self.claim_amount {
            return Err(ClaimError::validation(format!(
                "Approved amount {} exceeds the claimed amount {}",
                amount, self.claim_amount
            )));
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn claim() -> InsuranceClaim {
        InsuranceClaim::file(
            "CLM-2025-00001".parse().unwrap(),
            InvoiceId::new(),
            "Sanitas",
            "POL-778812",
            Money::new(dec!(150.00)),
            StaffId::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_claim_is_draft() {
        let c = claim();
        assert_eq!(c.status, ClaimStatus::Draft);
        assert!(c.approved_amount.is_zero());
        assert!(c.submission_date.is_none());
        assert!(!c.is_resolved());
    }

    #[test]
    fn test_blank_insurer_rejected() {
        let result = InsuranceClaim::file(
            "CLM-2025-00001".parse().unwrap(),
            InvoiceId::new(),
            "  ",
            "POL-1",
            Money::new(dec!(10.00)),
            StaffId::new(),
        );
        assert!(matches!(result, Err(ClaimError::Validation(_))));
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        for amount in [dec!(0), dec!(-5.00)] {
            let result = InsuranceClaim::file(
                "CLM-2025-00001".parse().unwrap(),
                InvoiceId::new(),
                "Sanitas",
                "POL-1",
                Money::new(amount),
                StaffId::new(),
            );
            assert!(result.is_err());
        }
    }

    #[test]
    fn test_submit_stamps_date_once() {
        let mut c = claim();
        c.submit(date(2025, 3, 1));
        assert_eq!(c.status, ClaimStatus::Submitted);
        assert_eq!(c.submission_date, Some(date(2025, 3, 1)));

        // Re-submitting keeps the original date
        c.submit(date(2025, 3, 9));
        assert_eq!(c.submission_date, Some(date(2025, 3, 1)));
    }

    #[test]
    fn test_approve_within_claimed_amount() {
        let mut c = claim();
        c.submit(date(2025, 3, 1));
        c.begin_review();
        c.approve(Money::new(dec!(120.00)), date(2025, 3, 20)).unwrap();

        assert_eq!(c.status, ClaimStatus::Approved);
        assert_eq!(c.approved_amount, Money::new(dec!(120.00)));
        assert_eq!(c.response_date, Some(date(2025, 3, 20)));
        assert!(c.is_resolved());
    }

    #[test]
    fn test_approve_above_claimed_amount_rejected() {
        let mut c = claim();
        let result = c.approve(Money::new(dec!(150.01)), date(2025, 3, 20));
        assert!(matches!(result, Err(ClaimError::Validation(_))));
        assert_eq!(c.status, ClaimStatus::Draft);
    }

    #[test]
    fn test_reject_records_reason() {
        let mut c = claim();
        c.submit(date(2025, 3, 1));
        c.reject("Policy lapsed", date(2025, 3, 15));

        assert_eq!(c.status, ClaimStatus::Rejected);
        assert_eq!(c.rejection_reason.as_deref(), Some("Policy lapsed"));
        assert_eq!(c.response_date, Some(date(2025, 3, 15)));
    }

    #[test]
    fn test_mark_paid_stamps_payment_date() {
        let mut c = claim();
        c.submit(date(2025, 3, 1));
        c.approve(Money::new(dec!(150.00)), date(2025, 3, 20)).unwrap();
        c.mark_paid(date(2025, 4, 2));

        assert_eq!(c.status, ClaimStatus::Paid);
        assert_eq!(c.payment_date, Some(date(2025, 4, 2)));
    }

    #[test]
    fn test_update_status_is_free_form() {
        let mut c = claim();
        // Straight from draft to paid; the tracker does not police order
        c.update_status(ClaimStatus::Paid, None, None, None).unwrap();
        assert_eq!(c.status, ClaimStatus::Paid);

        c.update_status(
            ClaimStatus::UnderReview,
            Some(Money::new(dec!(90.00))),
            Some(date(2025, 5, 1)),
            None,
        )
        .unwrap();
        assert_eq!(c.status, ClaimStatus::UnderReview);
        assert_eq!(c.approved_amount, Money::new(dec!(90.00)));
    }

    #[test]
    fn test_update_status_bounds_approved_amount() {
        let mut c = claim();
        let result = c.update_status(
            ClaimStatus::Approved,
            Some(Money::new(dec!(200.00))),
            None,
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_status_serde_codes() {
        assert_eq!(
            serde_json::to_string(&ClaimStatus::UnderReview).unwrap(),
            "\"under_review\""
        );
        assert_eq!(
            serde_json::to_string(&ClaimStatus::Draft).unwrap(),
            "\"draft\""
        );
        let parsed: ClaimStatus = serde_json::from_str("\"rejected\"").unwrap();
        assert_eq!(parsed, ClaimStatus::Rejected);
    }
}
