//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for common entities across the billing
//! system. These fixtures are designed to be consistent and predictable
//! for unit tests.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use core_kernel::{InvoiceId, Money, PatientId, Rate, ServiceId, StaffId};
use domain_catalog::{Service, ServiceCatalog, ServiceCode};
use rust_decimal_macros::dec;
use uuid::Uuid;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Standard consultation fee
    pub fn consultation_fee() -> Money {
        Money::new(dec!(100.00))
    }

    /// A small copay amount for partial-payment scenarios
    pub fn copay() -> Money {
        Money::new(dec!(25.00))
    }

    /// A large amount for overpayment rejection tests
    pub fn excessive() -> Money {
        Money::new(dec!(99999.00))
    }

    /// Zero for comparison tests
    pub fn zero() -> Money {
        Money::zero()
    }
}

/// Fixture for date test data
pub struct DateFixtures;

impl DateFixtures {
    /// Standard issue date (Mar 10, 2025)
    pub fn issue_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    /// Due date matching [`DateFixtures::issue_date`] under 30-day terms
    pub fn due_date_30_days() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 9).unwrap()
    }

    /// A date safely past the 30-day due date for overdue tests
    pub fn past_due() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
    }

    /// A date safely before the due date
    pub fn before_due() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 20).unwrap()
    }

    /// Payment timestamp within the issue year
    pub fn payment_timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 15, 10, 30, 0).unwrap()
    }
}

/// Fixture for identifier test data
pub struct IdFixtures;

impl IdFixtures {
    /// Creates a deterministic patient ID for testing
    pub fn patient_id() -> PatientId {
        PatientId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").unwrap())
    }

    /// Creates a deterministic staff ID for testing
    pub fn staff_id() -> StaffId {
        StaffId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440002").unwrap())
    }

    /// Creates a deterministic service ID for testing
    pub fn service_id() -> ServiceId {
        ServiceId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440003").unwrap())
    }

    /// Creates a deterministic invoice ID for testing
    pub fn invoice_id() -> InvoiceId {
        InvoiceId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440004").unwrap())
    }
}

/// Fixture for catalog test data
pub struct ServiceFixtures;

impl ServiceFixtures {
    /// A general consultation at 100.00 with 10% tax
    pub fn consultation() -> Service {
        Service::new(
            "General Consultation",
            ServiceCode::new("CONS-GEN").unwrap(),
            MoneyFixtures::consultation_fee(),
        )
        .unwrap()
        .with_tax_rate(Rate::from_percent(dec!(10)))
        .unwrap()
        .with_category("Consultations")
    }

    /// A dental cleaning at 80.00 with 21% tax
    pub fn dental_cleaning() -> Service {
        Service::new(
            "Dental Cleaning",
            ServiceCode::new("DENT-CLN").unwrap(),
            Money::new(dec!(80.00)),
        )
        .unwrap()
        .with_tax_rate(Rate::from_percent(dec!(21)))
        .unwrap()
        .with_category("Dental")
    }

    /// A tax-exempt blood panel at 45.50
    pub fn blood_panel() -> Service {
        Service::new(
            "Complete Blood Panel",
            ServiceCode::new("LAB-CBC").unwrap(),
            Money::new(dec!(45.50)),
        )
        .unwrap()
        .with_category("Laboratory")
    }

    /// A catalog preloaded with the three standard services
    pub fn clinic_catalog() -> ServiceCatalog {
        let mut catalog = ServiceCatalog::new();
        catalog.register(Self::consultation()).unwrap();
        catalog.register(Self::dental_cleaning()).unwrap();
        catalog.register(Self::blood_panel()).unwrap();
        catalog
    }
}

/// Fixture for string test data
pub struct StringFixtures;

impl StringFixtures {
    /// Standard patient display name
    pub fn patient_name() -> &'static str {
        "Laura Ortiz"
    }

    /// Standard insurer name
    pub fn insurance_company() -> &'static str {
        "Sanitas"
    }

    /// Standard policy number
    pub fn policy_number() -> &'static str {
        "POL-88-443210"
    }

    /// Standard payment reference
    pub fn payment_reference() -> &'static str {
        "TXN-2025-000187"
    }

    /// A realistic random full name, for tests that need many patients
    pub fn random_patient_name() -> String {
        use fake::faker::name::en::Name;
        use fake::Fake;
        Name().fake()
    }
}
