//! The billing engine
//!
//! [`BillingEngine`] is the in-process façade the presentation layer talks
//! to. It owns the whole billing state behind one lock: the service
//! catalog, the invoices (each owning its line items and payments), the
//! insurance claims, the document-number allocator, and the audit log of
//! drained domain events.
//!
//! Every command runs under a single write-lock acquisition, which is the
//! request-scoped transaction of this store: a line mutation and its totals
//! recomputation are one atomic unit, a payment's balance check cannot race
//! another writer, and number allocation can never hand out duplicates.
//! Reads clone snapshots out, so callers never observe a half-applied
//! mutation.

use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{Datelike, NaiveDate, Utc};
use tracing::{debug, info, instrument};

use core_kernel::{
    ClaimId, DocumentKind, DocumentNumber, InvoiceId, LineItemId, SequenceAllocator, ServiceId,
    StaffId,
};
use domain_billing::{
    BillingError, BillingEvent, Invoice, InvoiceItem, InvoiceStatus, PatientRef, Payment,
};
use domain_catalog::{Service, ServiceCatalog, ServiceCode};
use domain_claims::{ClaimError, InsuranceClaim};

use crate::commands::{
    AddLine, BulkInvoices, CompletePayment, CreateInvoice, FailPayment, FileClaim, RecordPayment,
    RefundPayment, RegisterService, RemoveLine, SetDiscount, UpdateClaimStatus, UpdateHeader,
    UpdateLine, UpdateService,
};
use crate::error::EngineError;
use crate::query::{InvoiceFilter, PaymentFilter, PaymentView};
use crate::reporting::BillingSummary;

/// Everything the engine stores, guarded by one lock
#[derive(Debug, Default)]
struct EngineState {
    catalog: ServiceCatalog,
    invoices: HashMap<InvoiceId, Invoice>,
    claims: HashMap<ClaimId, InsuranceClaim>,
    allocator: SequenceAllocator,
    /// Every document number ever issued or imported, for uniqueness
    numbers: HashSet<DocumentNumber>,
    /// Audit log of drained domain events
    events: Vec<BillingEvent>,
}

/// In-process billing engine
///
/// See the module docs for the transactional model. Construction takes no
/// configuration; seed data enters through [`BillingEngine::register_service`]
/// and [`BillingEngine::import_invoice`].
#[derive(Debug, Default)]
pub struct BillingEngine {
    state: RwLock<EngineState>,
}

impl BillingEngine {
    /// Creates an empty engine
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Catalog =====

    /// Adds a billable service to the catalog
    #[instrument(skip(self, cmd), fields(code = %cmd.code, actor = %cmd.actor))]
    pub fn register_service(&self, cmd: RegisterService) -> Result<ServiceId, EngineError> {
        let code = ServiceCode::new(cmd.code)?;
        let mut service = Service::new(cmd.name, code, cmd.price)?.with_tax_rate(cmd.tax_rate)?;
        if let Some(description) = cmd.description {
            service = service.with_description(description);
        }
        if let Some(category) = cmd.category {
            service = service.with_category(category);
        }

        let mut state = self.write();
        let id = state.catalog.register(service)?;
        info!(service = %id, "service registered");
        Ok(id)
    }

    /// Edits a catalog service's name, price, or tax rate
    #[instrument(skip(self, cmd), fields(service = %cmd.service_id, actor = %cmd.actor))]
    pub fn update_service(&self, cmd: UpdateService) -> Result<(), EngineError> {
        let mut state = self.write();
        state.catalog.update(&cmd.service_id, |service| {
            if let Some(name) = cmd.name {
                service.rename(name)?;
            }
            if let Some(price) = cmd.price {
                service.update_price(price)?;
            }
            if let Some(tax_rate) = cmd.tax_rate {
                service.update_tax_rate(tax_rate)?;
            }
            Ok(())
        })?;
        Ok(())
    }

    /// Takes a service off the billable list; historical lines keep resolving
    #[instrument(skip(self), fields(service = %service_id, actor = %actor))]
    pub fn deactivate_service(
        &self,
        service_id: ServiceId,
        actor: StaffId,
    ) -> Result<(), EngineError> {
        let mut state = self.write();
        state.catalog.deactivate(&service_id)?;
        info!(service = %service_id, "service deactivated");
        Ok(())
    }

    /// Snapshot of one service
    pub fn service(&self, service_id: ServiceId) -> Result<Service, EngineError> {
        let state = self.read();
        state
            .catalog
            .get(&service_id)
            .cloned()
            .ok_or_else(|| EngineError::not_found(format!("service {service_id}")))
    }

    /// Active services, sorted by category then name
    pub fn services(&self) -> Vec<Service> {
        self.read()
            .catalog
            .active_services()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Every service including deactivated ones, for administration views
    pub fn all_services(&self) -> Vec<Service> {
        self.read()
            .catalog
            .all_services()
            .into_iter()
            .cloned()
            .collect()
    }

    // ===== Invoicing =====

    /// Opens a new draft invoice, allocating its number from the issue year
    #[instrument(skip(self, cmd), fields(patient = %cmd.patient_id, actor = %cmd.actor))]
    pub fn create_invoice(&self, cmd: CreateInvoice) -> Result<Invoice, EngineError> {
        let mut state = self.write();
        let number = state
            .allocator
            .allocate(DocumentKind::Invoice, cmd.issue_date.year())?;

        let mut invoice = Invoice::create(
            number,
            PatientRef::new(cmd.patient_id, cmd.patient_name),
            cmd.issue_date,
            cmd.payment_terms,
            cmd.actor,
        );
        if let Some(due_date) = cmd.due_date {
            invoice = invoice.with_due_date(due_date);
        }
        if let Some(appointment_id) = cmd.appointment_id {
            invoice = invoice.with_appointment(appointment_id);
        }
        if let Some(notes) = cmd.notes {
            invoice = invoice.with_notes(notes);
        }
        if let Some(terms_conditions) = cmd.terms_conditions {
            invoice = invoice.with_terms_conditions(terms_conditions);
        }

        let events = invoice.take_events();
        let snapshot = invoice.clone();
        state.numbers.insert(number);
        state.invoices.insert(invoice.id(), invoice);
        Self::record_events(&mut state, events);

        info!(invoice = %number, "invoice created");
        Ok(snapshot)
    }

    /// Inserts an invoice numbered elsewhere, advancing the allocator past it
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Conflict`] if the invoice number or any of its
    /// payment numbers is already taken.
    #[instrument(skip(self, invoice), fields(invoice = %invoice.invoice_number()))]
    pub fn import_invoice(&self, mut invoice: Invoice) -> Result<InvoiceId, EngineError> {
        let mut state = self.write();

        let number = invoice.invoice_number();
        if state.numbers.contains(&number) {
            return Err(EngineError::conflict(format!(
                "invoice number {number} is already taken"
            )));
        }
        for payment in invoice.payments() {
            if state.numbers.contains(&payment.payment_number) {
                return Err(EngineError::conflict(format!(
                    "payment number {} is already taken",
                    payment.payment_number
                )));
            }
        }

        state.numbers.insert(number);
        state.allocator.resume_from(&number);
        for payment in invoice.payments() {
            let payment_number = payment.payment_number;
            state.numbers.insert(payment_number);
            state.allocator.resume_from(&payment_number);
        }

        // Imported aggregates carry no unpublished events
        invoice.take_events();
        let id = invoice.id();
        state.invoices.insert(id, invoice);
        Ok(id)
    }

    /// Adds a line to a draft invoice, defaulting pricing from the service
    ///
    /// The service must exist and be active.
    #[instrument(skip(self, cmd), fields(invoice = %cmd.invoice_id, actor = %cmd.actor))]
    pub fn add_line(&self, cmd: AddLine) -> Result<LineItemId, EngineError> {
        let mut state = self.write();

        let service = state.catalog.billable(&cmd.service_id)?;
        let mut item = InvoiceItem::for_service(service).with_quantity(cmd.quantity);
        if let Some(unit_price) = cmd.unit_price {
            item = item.with_unit_price(unit_price);
        }
        if let Some(tax_rate) = cmd.tax_rate {
            item = item.with_tax_rate(tax_rate);
        }
        if let Some(discount_rate) = cmd.discount_rate {
            item = item.with_discount_rate(discount_rate);
        }
        if let Some(description) = cmd.description {
            item = item.with_description(description);
        }

        let invoice = Self::invoice_mut(&mut state.invoices, cmd.invoice_id)?;
        Self::ensure_version(invoice, cmd.expected_version)?;
        let item_id = invoice.add_item(item)?;
        let events = invoice.take_events();
        Self::record_events(&mut state, events);
        Ok(item_id)
    }

    /// Edits a line on a draft invoice
    #[instrument(skip(self, cmd), fields(invoice = %cmd.invoice_id, actor = %cmd.actor))]
    pub fn update_line(&self, cmd: UpdateLine) -> Result<(), EngineError> {
        let mut state = self.write();
        let invoice = Self::invoice_mut(&mut state.invoices, cmd.invoice_id)?;
        Self::ensure_version(invoice, cmd.expected_version)?;

        invoice.update_item(cmd.item_id, |item| {
            if let Some(quantity) = cmd.quantity {
                item.quantity = quantity;
            }
            if let Some(unit_price) = cmd.unit_price {
                item.unit_price = unit_price;
            }
            if let Some(tax_rate) = cmd.tax_rate {
                item.tax_rate = tax_rate;
            }
            if let Some(discount_rate) = cmd.discount_rate {
                item.discount_rate = discount_rate;
            }
        })?;

        let events = invoice.take_events();
        Self::record_events(&mut state, events);
        Ok(())
    }

    /// Removes a line from a draft invoice
    #[instrument(skip(self, cmd), fields(invoice = %cmd.invoice_id, actor = %cmd.actor))]
    pub fn remove_line(&self, cmd: RemoveLine) -> Result<(), EngineError> {
        self.mutate_invoice(cmd.invoice_id, cmd.expected_version, |invoice| {
            invoice.remove_item(cmd.item_id)
        })
    }

    /// Sets the invoice-level discount on a draft invoice
    #[instrument(skip(self, cmd), fields(invoice = %cmd.invoice_id, actor = %cmd.actor))]
    pub fn set_discount(&self, cmd: SetDiscount) -> Result<(), EngineError> {
        self.mutate_invoice(cmd.invoice_id, cmd.expected_version, |invoice| {
            invoice.set_discount(cmd.discount_amount)
        })
    }

    /// Edits the header fields of a draft invoice
    #[instrument(skip(self, cmd), fields(invoice = %cmd.invoice_id, actor = %cmd.actor))]
    pub fn update_header(&self, cmd: UpdateHeader) -> Result<(), EngineError> {
        self.mutate_invoice(cmd.invoice_id, cmd.expected_version, |invoice| {
            if let Some(notes) = cmd.notes {
                invoice.set_notes(Some(notes))?;
            }
            if let Some(terms_conditions) = cmd.terms_conditions {
                invoice.set_terms_conditions(Some(terms_conditions))?;
            }
            if cmd.issue_date.is_some() || cmd.payment_terms.is_some() || cmd.due_date.is_some() {
                let issue_date = cmd.issue_date.unwrap_or_else(|| invoice.issue_date());
                let payment_terms = cmd.payment_terms.unwrap_or_else(|| invoice.payment_terms());
                invoice.reschedule(issue_date, payment_terms, cmd.due_date)?;
            }
            Ok(())
        })
    }

    /// Sends the invoice to the patient
    #[instrument(skip(self), fields(invoice = %invoice_id, actor = %actor))]
    pub fn send_invoice(&self, invoice_id: InvoiceId, actor: StaffId) -> Result<(), EngineError> {
        self.mutate_invoice(invoice_id, None, Invoice::send)
    }

    /// Cancels the invoice; terminal and non-reversing
    #[instrument(skip(self), fields(invoice = %invoice_id, actor = %actor))]
    pub fn cancel_invoice(&self, invoice_id: InvoiceId, actor: StaffId) -> Result<(), EngineError> {
        self.mutate_invoice(invoice_id, None, Invoice::cancel)
    }

    /// Marks a settled invoice as paid
    #[instrument(skip(self), fields(invoice = %invoice_id, actor = %actor))]
    pub fn mark_invoice_paid(
        &self,
        invoice_id: InvoiceId,
        actor: StaffId,
    ) -> Result<(), EngineError> {
        self.mutate_invoice(invoice_id, None, Invoice::mark_paid)
    }

    /// Deletes an invoice together with everything it owns
    ///
    /// Line items and payments die with the aggregate; claims filed against
    /// the invoice are removed in the same transaction so none can dangle.
    #[instrument(skip(self), fields(invoice = %invoice_id, actor = %actor))]
    pub fn delete_invoice(&self, invoice_id: InvoiceId, actor: StaffId) -> Result<(), EngineError> {
        let mut state = self.write();
        let invoice = state
            .invoices
            .remove(&invoice_id)
            .ok_or_else(|| EngineError::not_found(format!("invoice {invoice_id}")))?;

        let claims_before = state.claims.len();
        state.claims.retain(|_, claim| claim.invoice_id != invoice_id);
        info!(
            invoice = %invoice.invoice_number(),
            cascaded_claims = claims_before - state.claims.len(),
            "invoice deleted"
        );
        Ok(())
    }

    /// Snapshot of one invoice with its items and payments
    pub fn invoice(&self, invoice_id: InvoiceId) -> Result<Invoice, EngineError> {
        self.read()
            .invoices
            .get(&invoice_id)
            .cloned()
            .ok_or_else(|| EngineError::not_found(format!("invoice {invoice_id}")))
    }

    /// Invoices passing the filter, newest first
    pub fn invoices(&self, filter: &InvoiceFilter) -> Vec<Invoice> {
        let today = today();
        let mut invoices: Vec<Invoice> = self
            .read()
            .invoices
            .values()
            .filter(|invoice| filter.matches(invoice, today))
            .cloned()
            .collect();
        invoices.sort_by(|a, b| {
            (b.issue_date(), b.invoice_number()).cmp(&(a.issue_date(), a.invoice_number()))
        });
        invoices
    }

    // ===== Payments =====

    /// Records a payment, allocating its number from the payment year
    ///
    /// The amount must be positive and fit inside the live pending balance,
    /// both checked under the same lock that appends the payment.
    #[instrument(skip(self, cmd), fields(invoice = %cmd.invoice_id, actor = %cmd.actor))]
    pub fn record_payment(&self, cmd: RecordPayment) -> Result<Payment, EngineError> {
        let mut state = self.write();

        // Validate against the live invoice before consuming a number
        {
            let invoice = Self::invoice_mut(&mut state.invoices, cmd.invoice_id)?;
            Self::ensure_version(invoice, cmd.expected_version)?;
            if invoice.status() == InvoiceStatus::Cancelled {
                return Err(BillingError::InvalidState {
                    operation: "record a payment against",
                    status: format!("{:?}", invoice.status()),
                }
                .into());
            }
            if !cmd.amount.is_positive() {
                return Err(
                    BillingError::validation("Payment amount must be greater than zero").into(),
                );
            }
            let pending = invoice.amount_pending();
            if cmd.amount > pending {
                return Err(BillingError::validation(format!(
                    "Payment of {} exceeds the pending balance of {}",
                    cmd.amount, pending
                ))
                .into());
            }
        }

        let payment_date = cmd.payment_date.unwrap_or_else(Utc::now);
        let number = state
            .allocator
            .allocate(DocumentKind::Payment, payment_date.date_naive().year())?;

        let mut payment = Payment::new(number, cmd.amount, cmd.method, cmd.actor)
            .with_payment_date(payment_date);
        if let Some(reference) = cmd.reference_number {
            payment = payment.with_reference(reference);
        }
        if let Some(bank_name) = cmd.bank_name {
            payment = payment.with_bank_name(bank_name);
        }
        if let Some(check_number) = cmd.check_number {
            payment = payment.with_check_number(check_number);
        }
        if let Some(notes) = cmd.notes {
            payment = payment.with_notes(notes);
        }
        let snapshot = payment.clone();

        let invoice = Self::invoice_mut(&mut state.invoices, cmd.invoice_id)?;
        invoice.record_payment(payment)?;
        let events = invoice.take_events();
        state.numbers.insert(number);
        Self::record_events(&mut state, events);

        info!(payment = %number, "payment recorded");
        Ok(snapshot)
    }

    /// Confirms a pending payment
    ///
    /// When the completion settles the balance, the engine advances the
    /// invoice to paid in the same transaction.
    #[instrument(skip(self, cmd), fields(invoice = %cmd.invoice_id, actor = %cmd.actor))]
    pub fn complete_payment(&self, cmd: CompletePayment) -> Result<(), EngineError> {
        let mut state = self.write();
        let invoice = Self::invoice_mut(&mut state.invoices, cmd.invoice_id)?;
        Self::ensure_version(invoice, cmd.expected_version)?;

        invoice.complete_payment(cmd.payment_id)?;
        if !invoice.amount_pending().is_positive() && invoice.status() != InvoiceStatus::Paid {
            invoice.mark_paid()?;
        }

        let events = invoice.take_events();
        Self::record_events(&mut state, events);
        Ok(())
    }

    /// Marks a pending payment as failed
    #[instrument(skip(self, cmd), fields(invoice = %cmd.invoice_id, actor = %cmd.actor))]
    pub fn fail_payment(&self, cmd: FailPayment) -> Result<(), EngineError> {
        self.mutate_invoice(cmd.invoice_id, None, |invoice| {
            invoice.fail_payment(cmd.payment_id, &cmd.reason)
        })
    }

    /// Refunds a completed payment
    #[instrument(skip(self, cmd), fields(invoice = %cmd.invoice_id, actor = %cmd.actor))]
    pub fn refund_payment(&self, cmd: RefundPayment) -> Result<(), EngineError> {
        self.mutate_invoice(cmd.invoice_id, None, |invoice| {
            invoice.refund_payment(cmd.payment_id, &cmd.reason)
        })
    }

    /// Payments passing the filter, joined with their invoices, newest first
    pub fn payments(&self, filter: &PaymentFilter) -> Vec<PaymentView> {
        let state = self.read();
        let mut views: Vec<PaymentView> = state
            .invoices
            .values()
            .flat_map(|invoice| {
                invoice
                    .payments()
                    .iter()
                    .filter(|payment| filter.matches(payment))
                    .map(|payment| PaymentView {
                        invoice_id: invoice.id(),
                        invoice_number: invoice.invoice_number(),
                        patient_name: invoice.patient().full_name.clone(),
                        payment: payment.clone(),
                    })
            })
            .collect();
        views.sort_by(|a, b| b.payment.payment_date.cmp(&a.payment.payment_date));
        views
    }

    // ===== Claims =====

    /// Files an insurance claim against an invoice
    ///
    /// The claimed amount is bounded by the invoice total, checked here
    /// because the engine holds both entities.
    #[instrument(skip(self, cmd), fields(invoice = %cmd.invoice_id, actor = %cmd.actor))]
    pub fn file_claim(&self, cmd: FileClaim) -> Result<InsuranceClaim, EngineError> {
        let mut state = self.write();

        let invoice = state
            .invoices
            .get(&cmd.invoice_id)
            .ok_or_else(|| EngineError::not_found(format!("invoice {}", cmd.invoice_id)))?;
        if cmd.claim_amount > invoice.total_amount() {
            return Err(ClaimError::validation(format!(
                "Claim amount {} exceeds the invoice total of {}",
                cmd.claim_amount,
                invoice.total_amount()
            ))
            .into());
        }

        let year = cmd.submission_date.unwrap_or_else(today).year();
        let number = state.allocator.allocate(DocumentKind::Claim, year)?;

        let mut claim = InsuranceClaim::file(
            number,
            cmd.invoice_id,
            cmd.insurance_company,
            cmd.policy_number,
            cmd.claim_amount,
            cmd.actor,
        )?;
        if let Some(notes) = cmd.notes {
            claim = claim.with_notes(notes);
        }
        if let Some(date) = cmd.submission_date {
            claim.submit(date);
        }

        let snapshot = claim.clone();
        state.numbers.insert(number);
        state.claims.insert(claim.id, claim);

        info!(claim = %number, "claim filed");
        Ok(snapshot)
    }

    /// Applies a status update reported by the insurer
    ///
    /// No propagation: approval never creates a payment or touches the
    /// invoice.
    #[instrument(skip(self, cmd), fields(claim = %cmd.claim_id, actor = %cmd.actor))]
    pub fn update_claim_status(&self, cmd: UpdateClaimStatus) -> Result<(), EngineError> {
        let mut state = self.write();
        let claim = state
            .claims
            .get_mut(&cmd.claim_id)
            .ok_or_else(|| ClaimError::ClaimNotFound(cmd.claim_id.to_string()))?;

        claim.update_status(
            cmd.status,
            cmd.approved_amount,
            cmd.response_date,
            cmd.rejection_reason,
        )?;
        debug!(claim = %claim.claim_number, status = ?cmd.status, "claim status updated");
        Ok(())
    }

    /// Snapshot of one claim
    pub fn claim(&self, claim_id: ClaimId) -> Result<InsuranceClaim, EngineError> {
        self.read()
            .claims
            .get(&claim_id)
            .cloned()
            .ok_or_else(|| ClaimError::ClaimNotFound(claim_id.to_string()).into())
    }

    /// Claims filed against an invoice, in claim-number order
    pub fn claims_for_invoice(&self, invoice_id: InvoiceId) -> Vec<InsuranceClaim> {
        let mut claims: Vec<InsuranceClaim> = self
            .read()
            .claims
            .values()
            .filter(|claim| claim.invoice_id == invoice_id)
            .cloned()
            .collect();
        claims.sort_by_key(|claim| claim.claim_number);
        claims
    }

    // ===== Bulk invoicing =====

    /// Creates one single-line invoice per recipient for the same service
    ///
    /// All-or-nothing under one lock: any validation failure aborts the
    /// whole batch before an invoice is inserted.
    #[instrument(skip(self, cmd), fields(recipients = cmd.recipients.len(), actor = %cmd.actor))]
    pub fn bulk_invoices(&self, cmd: BulkInvoices) -> Result<Vec<InvoiceId>, EngineError> {
        let mut state = self.write();

        if cmd.recipients.is_empty() {
            return Err(BillingError::validation(
                "Bulk invoicing needs at least one recipient",
            )
            .into());
        }

        let service = state.catalog.billable(&cmd.service_id)?;
        // One prototype validation covers every recipient's identical line
        InvoiceItem::for_service(service)
            .with_quantity(cmd.quantity)
            .validate()?;
        let service = service.clone();

        let mut created = Vec::with_capacity(cmd.recipients.len());
        for recipient in cmd.recipients {
            let number = state
                .allocator
                .allocate(DocumentKind::Invoice, cmd.issue_date.year())?;
            let mut invoice = Invoice::create(
                number,
                PatientRef::new(recipient.patient_id, recipient.patient_name),
                cmd.issue_date,
                cmd.payment_terms,
                cmd.actor,
            );
            if let Some(appointment_id) = recipient.appointment_id {
                invoice = invoice.with_appointment(appointment_id);
            }
            invoice.add_item(InvoiceItem::for_service(&service).with_quantity(cmd.quantity))?;
            created.push((number, invoice));
        }

        let mut ids = Vec::with_capacity(created.len());
        for (number, mut invoice) in created {
            let events = invoice.take_events();
            ids.push(invoice.id());
            state.numbers.insert(number);
            state.invoices.insert(invoice.id(), invoice);
            Self::record_events(&mut state, events);
        }

        info!(count = ids.len(), "bulk invoices created");
        Ok(ids)
    }

    // ===== Reporting and audit =====

    /// Dashboard figures as of today
    pub fn summary(&self) -> BillingSummary {
        self.summary_on(today())
    }

    /// Dashboard figures as of the given date
    pub fn summary_on(&self, date: NaiveDate) -> BillingSummary {
        BillingSummary::compute(self.read().invoices.values(), date)
    }

    /// Every domain event the engine has drained, in order
    pub fn event_log(&self) -> Vec<BillingEvent> {
        self.read().events.clone()
    }

    // ===== Internal =====

    /// Runs one mutation against an invoice and drains its events
    fn mutate_invoice<F>(
        &self,
        invoice_id: InvoiceId,
        expected_version: Option<u32>,
        apply: F,
    ) -> Result<(), EngineError>
    where
        F: FnOnce(&mut Invoice) -> Result<(), BillingError>,
    {
        let mut state = self.write();
        let invoice = Self::invoice_mut(&mut state.invoices, invoice_id)?;
        Self::ensure_version(invoice, expected_version)?;
        apply(invoice)?;
        let events = invoice.take_events();
        Self::record_events(&mut state, events);
        Ok(())
    }

    fn invoice_mut(
        invoices: &mut HashMap<InvoiceId, Invoice>,
        invoice_id: InvoiceId,
    ) -> Result<&mut Invoice, EngineError> {
        invoices
            .get_mut(&invoice_id)
            .ok_or_else(|| EngineError::not_found(format!("invoice {invoice_id}")))
    }

    fn ensure_version(invoice: &Invoice, expected: Option<u32>) -> Result<(), EngineError> {
        match expected {
            Some(version) if version != invoice.version() => {
                Err(EngineError::conflict(format!(
                    "invoice {} is at version {}, caller read version {}",
                    invoice.invoice_number(),
                    invoice.version(),
                    version
                )))
            }
            _ => Ok(()),
        }
    }

    fn record_events(state: &mut EngineState, events: Vec<BillingEvent>) {
        for event in &events {
            debug!(
                event = event.event_type(),
                invoice = %event.invoice_id(),
                "billing event"
            );
        }
        state.events.extend(events);
    }

    fn read(&self) -> RwLockReadGuard<'_, EngineState> {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, EngineState> {
        self.state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
