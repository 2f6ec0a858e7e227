//! Invoice aggregate root
//!
//! The Invoice is the consistency boundary for patient billing: it owns its
//! line items and its payments, and no caller can observe a line change
//! without the matching recomputed totals.
//!
//! # Invariants
//!
//! - Lines, discount, and header fields change only while the invoice is a
//!   draft
//! - Cached totals are recomputed inside every mutating call
//! - A payment can never push the completed total past the invoice total
//! - Cancellation is terminal and does not reverse recorded payments
//!
//! # State Machine
//!
//! Valid transitions:
//! - Draft -> Sent (via send)
//! - Draft -> Cancelled (via cancel)
//! - Sent -> Paid (via mark_paid, once nothing is pending)
//! - Sent -> Cancelled (via cancel)
//!
//! `Overdue` is not a transition target: whether an invoice is overdue is
//! answered at read time by [`Invoice::is_overdue_on`]. The variant exists
//! so imported records carrying the stored value still deserialize.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{
    AppointmentId, DocumentNumber, InvoiceId, LineItemId, Money, PatientId, PaymentId, StaffId,
};

use crate::error::BillingError;
use crate::events::BillingEvent;
use crate::line::InvoiceItem;
use crate::payment::{Payment, PaymentStatus};
use crate::terms::PaymentTerms;

/// Invoice lifecycle status
///
/// Serialized values match the codes stored on historical invoices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Being drafted; lines and header are editable
    Draft,
    /// Sent to the patient; awaiting payment
    Sent,
    /// Settled in full
    Paid,
    /// Stored value on imported records; never written by this engine
    Overdue,
    /// Cancelled; terminal
    Cancelled,
}

/// The patient an invoice bills, denormalized for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRef {
    pub id: PatientId,
    pub full_name: String,
}

impl PatientRef {
    pub fn new(id: PatientId, full_name: impl Into<String>) -> Self {
        Self {
            id,
            full_name: full_name.into(),
        }
    }
}

/// Snapshot of an invoice's cached totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: Money,
    pub tax_amount: Money,
    pub discount_amount: Money,
    pub total_amount: Money,
}

/// The Invoice aggregate root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier
    id: InvoiceId,
    /// Human-readable number, e.g. `INV-2025-00001`
    invoice_number: DocumentNumber,
    /// Patient being billed
    patient: PatientRef,
    /// Appointment that generated this invoice, if any
    appointment_id: Option<AppointmentId>,
    /// Issue date
    issue_date: NaiveDate,
    /// Payment due date
    due_date: NaiveDate,
    /// Payment terms
    payment_terms: PaymentTerms,
    /// Lifecycle status
    status: InvoiceStatus,
    /// Cached sum of line taxable amounts
    subtotal: Money,
    /// Cached sum of line tax amounts
    tax_amount: Money,
    /// Invoice-level discount
    discount_amount: Money,
    /// Cached grand total
    total_amount: Money,
    /// Line items
    items: Vec<InvoiceItem>,
    /// Payments recorded against this invoice
    payments: Vec<Payment>,
    /// Notes
    notes: Option<String>,
    /// Terms and conditions text
    terms_conditions: Option<String>,
    /// Staff member who created the invoice
    created_by: StaffId,
    /// Domain events to be published
    #[serde(skip)]
    events: Vec<BillingEvent>,
    /// Version for optimistic concurrency
    version: u32,
    /// Creation timestamp
    created_at: DateTime<Utc>,
    /// Last update timestamp
    updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Creates a new draft invoice
    ///
    /// The due date is computed from the payment terms; use
    /// [`Invoice::with_due_date`] to override it.
    pub fn create(
        invoice_number: DocumentNumber,
        patient: PatientRef,
        issue_date: NaiveDate,
        payment_terms: PaymentTerms,
        created_by: StaffId,
    ) -> Self {
        let now = Utc::now();
        let id = InvoiceId::new_v7();
        let patient_id = patient.id;

        let mut invoice = Self {
            id,
            invoice_number,
            patient,
            appointment_id: None,
            issue_date,
            due_date: payment_terms.due_date(issue_date),
            payment_terms,
            status: InvoiceStatus::Draft,
            subtotal: Money::zero(),
            tax_amount: Money::zero(),
            discount_amount: Money::zero(),
            total_amount: Money::zero(),
            items: Vec::new(),
            payments: Vec::new(),
            notes: None,
            terms_conditions: None,
            created_by,
            events: Vec::new(),
            version: 1,
            created_at: now,
            updated_at: now,
        };

        invoice.events.push(BillingEvent::InvoiceCreated {
            invoice_id: id,
            invoice_number: invoice.invoice_number,
            patient_id,
            timestamp: now,
        });

        invoice
    }

    /// Overrides the computed due date
    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = due_date;
        self
    }

    /// Links the invoice to an appointment
    pub fn with_appointment(mut self, appointment_id: AppointmentId) -> Self {
        self.appointment_id = Some(appointment_id);
        self
    }

    /// Sets the notes
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Sets the terms and conditions text
    pub fn with_terms_conditions(mut self, terms_conditions: impl Into<String>) -> Self {
        self.terms_conditions = Some(terms_conditions.into());
        self
    }

    // ===== Accessors =====

    pub fn id(&self) -> InvoiceId {
        self.id
    }

    pub fn invoice_number(&self) -> DocumentNumber {
        self.invoice_number
    }

    pub fn patient(&self) -> &PatientRef {
        &self.patient
    }

    pub fn appointment_id(&self) -> Option<AppointmentId> {
        self.appointment_id
    }

    pub fn issue_date(&self) -> NaiveDate {
        self.issue_date
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    pub fn payment_terms(&self) -> PaymentTerms {
        self.payment_terms
    }

    pub fn status(&self) -> InvoiceStatus {
        self.status
    }

    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    pub fn tax_amount(&self) -> Money {
        self.tax_amount
    }

    pub fn discount_amount(&self) -> Money {
        self.discount_amount
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    pub fn items(&self) -> &[InvoiceItem] {
        &self.items
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn terms_conditions(&self) -> Option<&str> {
        self.terms_conditions.as_deref()
    }

    pub fn created_by(&self) -> StaffId {
        self.created_by
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns accumulated domain events and clears them
    pub fn take_events(&mut self) -> Vec<BillingEvent> {
        std::mem::take(&mut self.events)
    }

    /// Current totals snapshot
    pub fn totals(&self) -> Totals {
        Totals {
            subtotal: self.subtotal,
            tax_amount: self.tax_amount,
            discount_amount: self.discount_amount,
            total_amount: self.total_amount,
        }
    }

    /// Sum of completed payments
    pub fn amount_paid(&self) -> Money {
        self.payments
            .iter()
            .filter(|p| p.is_settled())
            .map(|p| p.amount)
            .sum()
    }

    /// Balance still owed
    pub fn amount_pending(&self) -> Money {
        self.total_amount - self.amount_paid()
    }

    /// Whether the invoice is past due as of the given date
    ///
    /// Only sent invoices can be overdue; drafts have not been issued and
    /// paid or cancelled invoices owe nothing.
    pub fn is_overdue_on(&self, today: NaiveDate) -> bool {
        self.status == InvoiceStatus::Sent && today > self.due_date
    }

    /// Whether the invoice is past due right now
    pub fn is_overdue(&self) -> bool {
        self.is_overdue_on(Utc::now().date_naive())
    }

    /// Days past due as of the given date; zero when not overdue
    pub fn days_overdue_on(&self, today: NaiveDate) -> i64 {
        if self.is_overdue_on(today) {
            (today - self.due_date).num_days()
        } else {
            0
        }
    }

    /// Days past due right now
    pub fn days_overdue(&self) -> i64 {
        self.days_overdue_on(Utc::now().date_naive())
    }

    // ===== Draft mutations =====

    /// Adds a line item
    ///
    /// # Errors
    ///
    /// - [`BillingError::InvalidState`] if the invoice is not a draft
    /// - [`BillingError::Validation`] if the line fails validation
    pub fn add_item(&mut self, item: InvoiceItem) -> Result<LineItemId, BillingError> {
        self.ensure_draft("add items to")?;
        item.validate()?;

        let item_id = item.id;
        let service_id = item.service_id;
        let line_total = item.total();
        self.items.push(item);
        self.recompute_totals();
        self.touch();

        self.events.push(BillingEvent::ItemAdded {
            invoice_id: self.id,
            item_id,
            service_id,
            line_total,
            timestamp: self.updated_at,
        });

        Ok(item_id)
    }

    /// Applies a change to a line item
    ///
    /// The change is rolled back if the resulting line fails validation, so
    /// totals are never recomputed from an invalid line.
    pub fn update_item<F>(&mut self, item_id: LineItemId, apply: F) -> Result<(), BillingError>
    where
        F: FnOnce(&mut InvoiceItem),
    {
        self.ensure_draft("modify items on")?;

        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| BillingError::ItemNotFound(item_id.to_string()))?;

        let previous = item.clone();
        apply(item);
        if let Err(error) = item.validate() {
            *item = previous;
            return Err(error);
        }

        let line_total = item.total();
        self.recompute_totals();
        self.touch();

        self.events.push(BillingEvent::ItemUpdated {
            invoice_id: self.id,
            item_id,
            line_total,
            timestamp: self.updated_at,
        });

        Ok(())
    }

    /// Removes a line item
    pub fn remove_item(&mut self, item_id: LineItemId) -> Result<(), BillingError> {
        self.ensure_draft("modify items on")?;

        let index = self
            .items
            .iter()
            .position(|i| i.id == item_id)
            .ok_or_else(|| BillingError::ItemNotFound(item_id.to_string()))?;

        self.items.remove(index);
        self.recompute_totals();
        self.touch();

        self.events.push(BillingEvent::ItemRemoved {
            invoice_id: self.id,
            item_id,
            timestamp: self.updated_at,
        });

        Ok(())
    }

    /// Sets the invoice-level discount
    pub fn set_discount(&mut self, discount_amount: Money) -> Result<(), BillingError> {
        self.ensure_draft("change the discount on")?;
        if discount_amount.is_negative() {
            return Err(BillingError::validation("Discount cannot be negative"));
        }

        self.discount_amount = discount_amount;
        self.recompute_totals();
        self.touch();

        self.events.push(BillingEvent::DiscountChanged {
            invoice_id: self.id,
            discount_amount,
            timestamp: self.updated_at,
        });

        Ok(())
    }

    /// Updates the notes
    pub fn set_notes(&mut self, notes: Option<String>) -> Result<(), BillingError> {
        self.ensure_draft("edit")?;
        self.notes = notes;
        self.touch();
        Ok(())
    }

    /// Updates the terms and conditions text
    pub fn set_terms_conditions(
        &mut self,
        terms_conditions: Option<String>,
    ) -> Result<(), BillingError> {
        self.ensure_draft("edit")?;
        self.terms_conditions = terms_conditions;
        self.touch();
        Ok(())
    }

    /// Changes the issue date and payment terms, recomputing the due date
    ///
    /// An explicit `due_date` overrides the computed one.
    pub fn reschedule(
        &mut self,
        issue_date: NaiveDate,
        payment_terms: PaymentTerms,
        due_date: Option<NaiveDate>,
    ) -> Result<(), BillingError> {
        self.ensure_draft("reschedule")?;

        self.issue_date = issue_date;
        self.payment_terms = payment_terms;
        self.due_date = due_date.unwrap_or_else(|| payment_terms.due_date(issue_date));
        self.touch();
        Ok(())
    }

    /// Recomputes and returns the cached totals
    ///
    /// Idempotent: recomputing without a line change leaves every figure
    /// unchanged.
    pub fn recompute_totals(&mut self) -> Totals {
        self.subtotal = self.items.iter().map(|i| i.taxable_amount()).sum();
        self.tax_amount = self.items.iter().map(|i| i.tax_amount()).sum();
        self.total_amount = self.subtotal + self.tax_amount - self.discount_amount;
        self.totals()
    }

    // ===== Transitions =====

    /// Sends the invoice to the patient
    pub fn send(&mut self) -> Result<(), BillingError> {
        match self.status {
            InvoiceStatus::Draft => {
                self.status = InvoiceStatus::Sent;
                self.touch();
                self.events.push(BillingEvent::InvoiceSent {
                    invoice_id: self.id,
                    timestamp: self.updated_at,
                });
                Ok(())
            }
            _ => Err(self.invalid_state("send")),
        }
    }

    /// Cancels the invoice
    ///
    /// Allowed from draft and sent. Terminal: recorded payments stay as
    /// they are, and nothing un-cancels an invoice.
    pub fn cancel(&mut self) -> Result<(), BillingError> {
        match self.status {
            InvoiceStatus::Draft | InvoiceStatus::Sent => {
                self.status = InvoiceStatus::Cancelled;
                self.touch();
                self.events.push(BillingEvent::InvoiceCancelled {
                    invoice_id: self.id,
                    timestamp: self.updated_at,
                });
                Ok(())
            }
            _ => Err(self.invalid_state("cancel")),
        }
    }

    /// Marks the invoice as paid
    ///
    /// # Errors
    ///
    /// - [`BillingError::InvalidState`] unless the invoice is draft or sent
    /// - [`BillingError::Validation`] while a balance is still pending
    pub fn mark_paid(&mut self) -> Result<(), BillingError> {
        match self.status {
            InvoiceStatus::Draft | InvoiceStatus::Sent => {
                let pending = self.amount_pending();
                if pending.is_positive() {
                    return Err(BillingError::validation(format!(
                        "Cannot mark invoice paid with {} still pending",
                        pending
                    )));
                }

                self.status = InvoiceStatus::Paid;
                self.touch();
                self.events.push(BillingEvent::InvoicePaid {
                    invoice_id: self.id,
                    timestamp: self.updated_at,
                });
                Ok(())
            }
            _ => Err(self.invalid_state("mark as paid")),
        }
    }

    // ===== Payments =====

    /// Records a payment against the invoice
    ///
    /// # Errors
    ///
    /// - [`BillingError::InvalidState`] if the invoice is cancelled
    /// - [`BillingError::Validation`] if the amount is not positive or
    ///   exceeds the pending balance
    pub fn record_payment(&mut self, payment: Payment) -> Result<PaymentId, BillingError> {
        if self.status == InvoiceStatus::Cancelled {
            return Err(self.invalid_state("record a payment against"));
        }
        if !payment.amount.is_positive() {
            return Err(BillingError::validation(
                "Payment amount must be greater than zero",
            ));
        }
        let pending = self.amount_pending();
        if payment.amount > pending {
            return Err(BillingError::validation(format!(
                "Payment of {} exceeds the pending balance of {}",
                payment.amount, pending
            )));
        }

        let payment_id = payment.id;
        let amount = payment.amount;
        self.payments.push(payment);
        self.touch();

        self.events.push(BillingEvent::PaymentRecorded {
            invoice_id: self.id,
            payment_id,
            amount,
            timestamp: self.updated_at,
        });

        Ok(payment_id)
    }

    /// Completes a pending payment
    ///
    /// The pending balance is re-checked here: two pending payments may
    /// each have been valid when recorded, but only completions that fit
    /// the remaining balance go through.
    pub fn complete_payment(&mut self, payment_id: PaymentId) -> Result<(), BillingError> {
        if self.status == InvoiceStatus::Cancelled {
            return Err(self.invalid_state("complete a payment on"));
        }

        let pending = self.amount_pending();
        let payment = self.find_payment_mut(payment_id)?;

        if payment.status != PaymentStatus::Pending {
            return Err(BillingError::validation(
                "Only pending payments can be completed",
            ));
        }
        if payment.amount > pending {
            return Err(BillingError::validation(format!(
                "Completing payment of {} would exceed the pending balance of {}",
                payment.amount, pending
            )));
        }

        payment.complete();
        let amount = payment.amount;
        self.touch();

        self.events.push(BillingEvent::PaymentCompleted {
            invoice_id: self.id,
            payment_id,
            amount,
            timestamp: self.updated_at,
        });

        Ok(())
    }

    /// Marks a pending payment as failed
    pub fn fail_payment(&mut self, payment_id: PaymentId, reason: &str) -> Result<(), BillingError> {
        let payment = self.find_payment_mut(payment_id)?;
        if payment.status != PaymentStatus::Pending {
            return Err(BillingError::validation("Only pending payments can fail"));
        }

        payment.fail(reason);
        self.touch();

        self.events.push(BillingEvent::PaymentFailed {
            invoice_id: self.id,
            payment_id,
            timestamp: self.updated_at,
        });

        Ok(())
    }

    /// Refunds a completed payment
    pub fn refund_payment(
        &mut self,
        payment_id: PaymentId,
        reason: &str,
    ) -> Result<(), BillingError> {
        let payment = self.find_payment_mut(payment_id)?;
        if payment.status != PaymentStatus::Completed {
            return Err(BillingError::validation(
                "Only completed payments can be refunded",
            ));
        }

        payment.refund(reason);
        let amount = payment.amount;
        self.touch();

        self.events.push(BillingEvent::PaymentRefunded {
            invoice_id: self.id,
            payment_id,
            amount,
            timestamp: self.updated_at,
        });

        Ok(())
    }

    /// Looks up a payment by its identifier
    pub fn payment(&self, payment_id: PaymentId) -> Option<&Payment> {
        self.payments.iter().find(|p| p.id == payment_id)
    }

    // ===== Internal =====

    fn ensure_draft(&self, operation: &'static str) -> Result<(), BillingError> {
        if self.status != InvoiceStatus::Draft {
            return Err(self.invalid_state(operation));
        }
        Ok(())
    }

    fn invalid_state(&self, operation: &'static str) -> BillingError {
        BillingError::InvalidState {
            operation,
            status: format!("{:?}", self.status),
        }
    }

    fn find_payment_mut(&mut self, payment_id: PaymentId) -> Result<&mut Payment, BillingError> {
        self.payments
            .iter_mut()
            .find(|p| p.id == payment_id)
            .ok_or_else(|| BillingError::PaymentNotFound(payment_id.to_string()))
    }

    fn touch(&mut self) {
        self.version += 1;
        self.updated_at = Utc::now();
    }
}
