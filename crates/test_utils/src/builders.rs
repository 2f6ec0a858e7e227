//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible
//! defaults. These builders allow tests to specify only the relevant
//! fields while using defaults for everything else.

use chrono::NaiveDate;
use core_kernel::{DocumentNumber, Money, PatientId, Rate, StaffId};
use domain_billing::{Invoice, InvoiceItem, PatientRef, PaymentTerms};
use domain_catalog::{Service, ServiceCode};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::fixtures::{DateFixtures, IdFixtures, ServiceFixtures, StringFixtures};

/// Builder for constructing test catalog services
pub struct ServiceBuilder {
    name: String,
    code: String,
    price: Money,
    tax_rate: Rate,
    category: Option<String>,
}

impl Default for ServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            name: "Test Service".to_string(),
            code: "TST-001".to_string(),
            price: Money::new(dec!(50.00)),
            tax_rate: Rate::zero(),
            category: None,
        }
    }

    /// Sets the service name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the service code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Sets the unit price
    pub fn with_price(mut self, price: Money) -> Self {
        self.price = price;
        self
    }

    /// Sets the tax rate
    pub fn with_tax_rate(mut self, tax_rate: Rate) -> Self {
        self.tax_rate = tax_rate;
        self
    }

    /// Sets the category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Builds the service, panicking on invalid inputs
    pub fn build(self) -> Service {
        let mut service = Service::new(
            self.name,
            ServiceCode::new(self.code).expect("invalid test service code"),
            self.price,
        )
        .expect("invalid test service")
        .with_tax_rate(self.tax_rate)
        .expect("invalid test tax rate");
        if let Some(category) = self.category {
            service = service.with_category(category);
        }
        service
    }
}

/// Builder for constructing test invoices
///
/// Defaults to a draft invoice for the fixture patient with one
/// consultation line. Use [`InvoiceBuilder::without_lines`] for an empty
/// draft and [`InvoiceBuilder::sent`] for a sent invoice.
pub struct InvoiceBuilder {
    number: DocumentNumber,
    patient_id: PatientId,
    patient_name: String,
    issue_date: NaiveDate,
    payment_terms: PaymentTerms,
    created_by: StaffId,
    lines: Vec<(Service, Decimal)>,
    discount: Option<Money>,
    send: bool,
}

impl Default for InvoiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            number: "INV-2025-00001".parse().unwrap(),
            patient_id: IdFixtures::patient_id(),
            patient_name: StringFixtures::patient_name().to_string(),
            issue_date: DateFixtures::issue_date(),
            payment_terms: PaymentTerms::Days30,
            created_by: IdFixtures::staff_id(),
            lines: vec![(ServiceFixtures::consultation(), dec!(1))],
            discount: None,
            send: false,
        }
    }

    /// Sets the invoice number
    pub fn with_number(mut self, number: &str) -> Self {
        self.number = number.parse().expect("invalid test invoice number");
        self
    }

    /// Sets the patient
    pub fn with_patient(mut self, id: PatientId, name: impl Into<String>) -> Self {
        self.patient_id = id;
        self.patient_name = name.into();
        self
    }

    /// Sets the issue date
    pub fn with_issue_date(mut self, date: NaiveDate) -> Self {
        self.issue_date = date;
        self
    }

    /// Sets the payment terms
    pub fn with_payment_terms(mut self, terms: PaymentTerms) -> Self {
        self.payment_terms = terms;
        self
    }

    /// Adds a line billing the given quantity of a service
    pub fn with_line(mut self, service: Service, quantity: Decimal) -> Self {
        self.lines.push((service, quantity));
        self
    }

    /// Drops the default consultation line
    pub fn without_lines(mut self) -> Self {
        self.lines.clear();
        self
    }

    /// Sets an invoice-level discount
    pub fn with_discount(mut self, discount: Money) -> Self {
        self.discount = Some(discount);
        self
    }

    /// Sends the invoice after building
    pub fn sent(mut self) -> Self {
        self.send = true;
        self
    }

    /// Builds the invoice with its events already drained
    pub fn build(self) -> Invoice {
        let mut invoice = Invoice::create(
            self.number,
            PatientRef::new(self.patient_id, self.patient_name),
            self.issue_date,
            self.payment_terms,
            self.created_by,
        );
        for (service, quantity) in self.lines {
            invoice
                .add_item(InvoiceItem::for_service(&service).with_quantity(quantity))
                .expect("invalid test line");
        }
        if let Some(discount) = self.discount {
            invoice.set_discount(discount).expect("invalid test discount");
        }
        if self.send {
            invoice.send().expect("cannot send test invoice");
        }
        invoice.take_events();
        invoice
    }
}
