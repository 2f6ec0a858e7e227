//! Domain events for the invoice aggregate
//!
//! Domain events record significant occurrences in an invoice's life. They
//! feed the engine's audit log and structured logging.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{DocumentNumber, InvoiceId, LineItemId, Money, PatientId, PaymentId, ServiceId};

/// Domain events emitted by the Invoice aggregate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BillingEvent {
    /// Invoice created in draft
    InvoiceCreated {
        invoice_id: InvoiceId,
        invoice_number: DocumentNumber,
        patient_id: PatientId,
        timestamp: DateTime<Utc>,
    },

    /// A line was added
    ItemAdded {
        invoice_id: InvoiceId,
        item_id: LineItemId,
        service_id: ServiceId,
        line_total: Money,
        timestamp: DateTime<Utc>,
    },

    /// A line was changed
    ItemUpdated {
        invoice_id: InvoiceId,
        item_id: LineItemId,
        line_total: Money,
        timestamp: DateTime<Utc>,
    },

    /// A line was removed
    ItemRemoved {
        invoice_id: InvoiceId,
        item_id: LineItemId,
        timestamp: DateTime<Utc>,
    },

    /// The header discount changed
    DiscountChanged {
        invoice_id: InvoiceId,
        discount_amount: Money,
        timestamp: DateTime<Utc>,
    },

    /// Invoice was sent to the patient
    InvoiceSent {
        invoice_id: InvoiceId,
        timestamp: DateTime<Utc>,
    },

    /// Invoice was cancelled
    InvoiceCancelled {
        invoice_id: InvoiceId,
        timestamp: DateTime<Utc>,
    },

    /// Invoice was settled in full
    InvoicePaid {
        invoice_id: InvoiceId,
        timestamp: DateTime<Utc>,
    },

    /// A payment was recorded
    PaymentRecorded {
        invoice_id: InvoiceId,
        payment_id: PaymentId,
        amount: Money,
        timestamp: DateTime<Utc>,
    },

    /// A pending payment was confirmed
    PaymentCompleted {
        invoice_id: InvoiceId,
        payment_id: PaymentId,
        amount: Money,
        timestamp: DateTime<Utc>,
    },

    /// A payment failed
    PaymentFailed {
        invoice_id: InvoiceId,
        payment_id: PaymentId,
        timestamp: DateTime<Utc>,
    },

    /// A payment was refunded
    PaymentRefunded {
        invoice_id: InvoiceId,
        payment_id: PaymentId,
        amount: Money,
        timestamp: DateTime<Utc>,
    },
}

impl BillingEvent {
    /// Returns the invoice ID associated with this event
    pub fn invoice_id(&self) -> InvoiceId {
        match self {
            BillingEvent::InvoiceCreated { invoice_id, .. } => *invoice_id,
            BillingEvent::ItemAdded { invoice_id, .. } => *invoice_id,
            BillingEvent::ItemUpdated { invoice_id, .. } => *invoice_id,
            BillingEvent::ItemRemoved { invoice_id, .. } => *invoice_id,
            BillingEvent::DiscountChanged { invoice_id, .. } => *invoice_id,
            BillingEvent::InvoiceSent { invoice_id, .. } => *invoice_id,
            BillingEvent::InvoiceCancelled { invoice_id, .. } => *invoice_id,
            BillingEvent::InvoicePaid { invoice_id, .. } => *invoice_id,
            BillingEvent::PaymentRecorded { invoice_id, .. } => *invoice_id,
            BillingEvent::PaymentCompleted { invoice_id, .. } => *invoice_id,
            BillingEvent::PaymentFailed { invoice_id, .. } => *invoice_id,
            BillingEvent::PaymentRefunded { invoice_id, .. } => *invoice_id,
        }
    }

    /// Returns the timestamp of this event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            BillingEvent::InvoiceCreated { timestamp, .. } => *timestamp,
            BillingEvent::ItemAdded { timestamp, .. } => *timestamp,
            BillingEvent::ItemUpdated { timestamp, .. } => *timestamp,
            BillingEvent::ItemRemoved { timestamp, .. } => *timestamp,
            BillingEvent::DiscountChanged { timestamp, .. } => *timestamp,
            BillingEvent::InvoiceSent { timestamp, .. } => *timestamp,
            BillingEvent::InvoiceCancelled { timestamp, .. } => *timestamp,
            BillingEvent::InvoicePaid { timestamp, .. } => *timestamp,
            BillingEvent::PaymentRecorded { timestamp, .. } => *timestamp,
            BillingEvent::PaymentCompleted { timestamp, .. } => *timestamp,
            BillingEvent::PaymentFailed { timestamp, .. } => *timestamp,
            BillingEvent::PaymentRefunded { timestamp, .. } => *timestamp,
        }
    }

    /// Returns the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            BillingEvent::InvoiceCreated { .. } => "InvoiceCreated",
            BillingEvent::ItemAdded { .. } => "ItemAdded",
            BillingEvent::ItemUpdated { .. } => "ItemUpdated",
            BillingEvent::ItemRemoved { .. } => "ItemRemoved",
            BillingEvent::DiscountChanged { .. } => "DiscountChanged",
            BillingEvent::InvoiceSent { .. } => "InvoiceSent",
            BillingEvent::InvoiceCancelled { .. } => "InvoiceCancelled",
            BillingEvent::InvoicePaid { .. } => "InvoicePaid",
            BillingEvent::PaymentRecorded { .. } => "PaymentRecorded",
            BillingEvent::PaymentCompleted { .. } => "PaymentCompleted",
            BillingEvent::PaymentFailed { .. } => "PaymentFailed",
            BillingEvent::PaymentRefunded { .. } => "PaymentRefunded",
        }
    }
}
