use serde::{Deserialize, Serialize};

use crate::db_types::{Order, OrderId, OrderItem};

/// Event type that triggers reconciliation. Every other event type is acknowledged and ignored.
pub const PAYMENT_CAPTURED_EVENT: &str = "payment.captured";

//--------------------------------------     OrderDetail      --------------------------------------------------------
/// An order together with its immutable line-item snapshots.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

//--------------------------------------    PaymentIntent     --------------------------------------------------------
/// What the caller needs to hand to the payer after an intent has been created: the gateway's
/// reference, the amount in minor units, and the currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub gateway_reference: String,
    pub amount: i64,
    pub currency: String,
}

//--------------------------------------    WebhookOutcome    --------------------------------------------------------
/// Every way a webhook delivery can resolve without being an internal fault. The transport layer
/// acknowledges all of these; the distinction only shows up in the response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum WebhookOutcome {
    /// The capture event was applied: payment marked Success, order marked Paid.
    Processed { order_id: OrderId },
    /// The order was already Paid. Duplicate delivery, nothing changed.
    AlreadyProcessed { order_id: OrderId },
    /// The event type does not trigger state changes.
    Ignored { event: String },
    /// No local payment matches the gateway reference. Reportable, not fatal.
    PaymentRecordNotFound { reference: String },
}

//--------------------------------------     GatewayEvent     --------------------------------------------------------
/// The slice of the gateway's webhook payload the engine cares about. The payment entity is nested
/// two envelopes deep in the delivery format.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayEvent {
    pub event: String,
    #[serde(default)]
    pub payload: Option<GatewayEventPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayEventPayload {
    pub payment: GatewayPaymentEnvelope,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayPaymentEnvelope {
    pub entity: GatewayPaymentEntity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayPaymentEntity {
    /// The gateway's id for the captured payment itself.
    pub id: String,
    /// The gateway's id for the payment intent ("order" in gateway terms). This is the value
    /// stored as `Payment::gateway_reference`.
    pub order_id: String,
}

impl GatewayEvent {
    /// The intent reference buried in the event payload, if the event carries one.
    pub fn gateway_order_reference(&self) -> Option<&str> {
        self.payload.as_ref().map(|p| p.payment.entity.order_id.as_str())
    }
}
