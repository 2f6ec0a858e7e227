//! Comprehensive tests for domain_claims

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use core_kernel::{InvoiceId, Money, StaffId};
use domain_claims::{ClaimError, ClaimStatus, InsuranceClaim};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn filed_claim(amount: &str) -> InsuranceClaim {
    InsuranceClaim::file(
        "CLM-2025-00042".parse().unwrap(),
        InvoiceId::new(),
        "Adeslas",
        "POL-2201-X",
        Money::new(amount.parse().unwrap()),
        StaffId::new(),
    )
    .unwrap()
}

// ============================================================================
// Filing
// ============================================================================

mod filing {
    use super::*;

    #[test]
    fn test_filed_claim_carries_its_number_and_invoice() {
        let invoice_id = InvoiceId::new();
        let claim = InsuranceClaim::file(
            "CLM-2025-00001".parse().unwrap(),
            invoice_id,
            "Adeslas",
            "POL-1",
            Money::new(dec!(200.00)),
            StaffId::new(),
        )
        .unwrap();

        assert_eq!(claim.claim_number.to_string(), "CLM-2025-00001");
        assert_eq!(claim.invoice_id, invoice_id);
        assert_eq!(claim.status, ClaimStatus::Draft);
    }

    #[test]
    fn test_blank_policy_number_rejected() {
        let result = InsuranceClaim::file(
            "CLM-2025-00001".parse().unwrap(),
            InvoiceId::new(),
            "Adeslas",
            "",
            Money::new(dec!(200.00)),
            StaffId::new(),
        );
        assert!(matches!(result, Err(ClaimError::Validation(_))));
    }

    #[test]
    fn test_zero_claim_amount_rejected() {
        let result = InsuranceClaim::file(
            "CLM-2025-00001".parse().unwrap(),
            InvoiceId::new(),
            "Adeslas",
            "POL-1",
            Money::zero(),
            StaffId::new(),
        );
        assert!(matches!(result, Err(ClaimError::Validation(_))));
    }

    #[test]
    fn test_notes_builder() {
        let claim = filed_claim("100.00").with_notes("resubmission of CLM-2024-00310");
        assert_eq!(
            claim.notes.as_deref(),
            Some("resubmission of CLM-2024-00310")
        );
    }
}

// ============================================================================
// Workflow
// ============================================================================

mod workflow {
    use super::*;

    #[test]
    fn test_full_approval_path() {
        let mut claim = filed_claim("300.00");

        claim.submit(date(2025, 2, 3));
        assert_eq!(claim.status, ClaimStatus::Submitted);

        claim.begin_review();
        assert_eq!(claim.status, ClaimStatus::UnderReview);

        claim
            .approve(Money::new(dec!(240.00)), date(2025, 2, 28))
            .unwrap();
        assert_eq!(claim.status, ClaimStatus::Approved);

        claim.mark_paid(date(2025, 3, 14));
        assert_eq!(claim.status, ClaimStatus::Paid);
        assert_eq!(claim.submission_date, Some(date(2025, 2, 3)));
        assert_eq!(claim.response_date, Some(date(2025, 2, 28)));
        assert_eq!(claim.payment_date, Some(date(2025, 3, 14)));
    }

    #[test]
    fn test_rejection_path() {
        let mut claim = filed_claim("300.00");
        claim.submit(date(2025, 2, 3));
        claim.reject("Treatment not covered", date(2025, 2, 10));

        assert_eq!(claim.status, ClaimStatus::Rejected);
        assert_eq!(
            claim.rejection_reason.as_deref(),
            Some("Treatment not covered")
        );
        assert!(claim.approved_amount.is_zero());
        assert!(claim.is_resolved());
    }

    #[test]
    fn test_partial_approval_keeps_claimed_amount() {
        let mut claim = filed_claim("300.00");
        claim
            .approve(Money::new(dec!(150.00)), date(2025, 2, 28))
            .unwrap();

        assert_eq!(claim.claim_amount, Money::new(dec!(300.00)));
        assert_eq!(claim.approved_amount, Money::new(dec!(150.00)));
    }

    #[test]
    fn test_full_approval_at_exact_bound() {
        let mut claim = filed_claim("300.00");
        assert!(claim
            .approve(Money::new(dec!(300.00)), date(2025, 2, 28))
            .is_ok());
    }

    #[test]
    fn test_update_status_applies_optional_fields() {
        let mut claim = filed_claim("300.00");
        claim
            .update_status(
                ClaimStatus::Rejected,
                None,
                Some(date(2025, 3, 1)),
                Some("Duplicate claim".to_string()),
            )
            .unwrap();

        assert_eq!(claim.status, ClaimStatus::Rejected);
        assert_eq!(claim.response_date, Some(date(2025, 3, 1)));
        assert_eq!(claim.rejection_reason.as_deref(), Some("Duplicate claim"));
    }

    #[test]
    fn test_update_status_rejects_negative_approved_amount() {
        let mut claim = filed_claim("300.00");
        let result = claim.update_status(
            ClaimStatus::Approved,
            Some(Money::new(dec!(-1.00))),
            None,
            None,
        );
        assert!(matches!(result, Err(ClaimError::Validation(_))));
    }
}

// ============================================================================
// Serialization
// ============================================================================

mod serialization {
    use super::*;

    #[test]
    fn test_claim_round_trips_through_json() {
        let mut claim = filed_claim("120.50");
        claim.submit(date(2025, 6, 1));

        let json = serde_json::to_string(&claim).unwrap();
        let back: InsuranceClaim = serde_json::from_str(&json).unwrap();

        assert_eq!(back.id, claim.id);
        assert_eq!(back.claim_number, claim.claim_number);
        assert_eq!(back.claim_amount, claim.claim_amount);
        assert_eq!(back.status, ClaimStatus::Submitted);
        assert_eq!(back.submission_date, Some(date(2025, 6, 1)));
    }

    #[test]
    fn test_stored_status_codes() {
        for (status, code) in [
            (ClaimStatus::Draft, "\"draft\""),
            (ClaimStatus::Submitted, "\"submitted\""),
            (ClaimStatus::UnderReview, "\"under_review\""),
            (ClaimStatus::Approved, "\"approved\""),
            (ClaimStatus::Rejected, "\"rejected\""),
            (ClaimStatus::Paid, "\"paid\""),
        ] {
            assert_eq!(serde_json::to_string(&status).unwrap(), code);
        }
    }
}
