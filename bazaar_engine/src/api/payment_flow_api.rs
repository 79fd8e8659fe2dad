use std::fmt::Debug;

use bazaar_common::INR_CURRENCY_CODE;
use log::*;

use crate::{
    api::{
        errors::PaymentFlowError,
        objects::{GatewayEvent, PaymentIntent, WebhookOutcome, PAYMENT_CAPTURED_EVENT},
    },
    db_types::{NewPayment, OrderId, OrderStatus, PaymentStatus},
    helpers::verify_webhook_signature,
    traits::{CommerceDatabase, PaymentGatewayClient},
};

/// `PaymentFlowApi` binds orders to remote payment intents and reconciles the gateway's webhook
/// events against local payment and order state.
pub struct PaymentFlowApi<B> {
    db: B,
}

impl<B> Debug for PaymentFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PaymentFlowApi")
    }
}

impl<B> PaymentFlowApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> PaymentFlowApi<B>
where B: CommerceDatabase
{
    /// Creates a remote payment intent for an order and records the pending payment locally.
    ///
    /// The order must exist and still be `Created`; an intent is created at most once per fresh
    /// order. The amount handed to the gateway is the order total in minor currency units.
    pub async fn create_payment_intent<G>(&self, order_id: &OrderId, gateway: &G) -> Result<PaymentIntent, PaymentFlowError>
    where G: PaymentGatewayClient {
        let order =
            self.db.fetch_order(order_id).await?.ok_or_else(|| PaymentFlowError::OrderNotFound(order_id.clone()))?;
        if order.status != OrderStatus::Created {
            debug!("💳️ Intent rejected for order {order_id}: status is {}", order.status);
            return Err(PaymentFlowError::InvalidOrderState { order_id: order.order_id, status: order.status });
        }
        let intent = gateway
            .create_intent(order.total_amount, INR_CURRENCY_CODE, &order.order_id)
            .await
            .map_err(|e| PaymentFlowError::Gateway(e.to_string()))?;
        trace!("💳️ Gateway issued intent {} for order {order_id}", intent.reference);
        let payment = self
            .db
            .insert_payment(NewPayment::new(order.order_id.clone(), order.total_amount, intent.reference.clone()))
            .await?;
        self.db.attach_payment(&order.order_id, payment.id).await?;
        info!("💳️ Payment intent {} created for order {order_id} ({})", intent.reference, order.total_amount);
        Ok(PaymentIntent { gateway_reference: intent.reference, amount: intent.amount, currency: intent.currency })
    }

    /// Applies a webhook delivery to local state.
    ///
    /// The signature is verified against the raw bytes before the payload is parsed; a delivery
    /// that fails the check changes nothing. Only `payment.captured` events mutate state, and
    /// re-delivery of a capture for an already-`Paid` order is a no-op
    /// ([`WebhookOutcome::AlreadyProcessed`]).
    pub async fn process_webhook(
        &self,
        payload: &[u8],
        signature: &str,
        secret: &str,
    ) -> Result<WebhookOutcome, PaymentFlowError> {
        if !verify_webhook_signature(payload, signature, secret) {
            warn!("🔔️ Webhook delivery rejected: signature verification failed");
            return Err(PaymentFlowError::SignatureVerificationFailed);
        }
        let event: GatewayEvent =
            serde_json::from_slice(payload).map_err(|e| PaymentFlowError::PayloadError(e.to_string()))?;
        if event.event != PAYMENT_CAPTURED_EVENT {
            trace!("🔔️ Ignoring webhook event type {}", event.event);
            return Ok(WebhookOutcome::Ignored { event: event.event });
        }
        let reference = event
            .gateway_order_reference()
            .ok_or_else(|| PaymentFlowError::PayloadError("capture event carries no gateway order reference".into()))?
            .to_string();
        let payment = match self.db.fetch_payment_by_gateway_reference(&reference).await? {
            Some(payment) => payment,
            None => {
                warn!("🔔️ No payment record matches gateway reference {reference}");
                return Ok(WebhookOutcome::PaymentRecordNotFound { reference });
            },
        };
        let order = self
            .db
            .fetch_order(&payment.order_id)
            .await?
            .ok_or_else(|| PaymentFlowError::OrderNotFound(payment.order_id.clone()))?;
        if order.status == OrderStatus::Paid {
            debug!("🔔️ Duplicate capture for order {}; already Paid", order.order_id);
            return Ok(WebhookOutcome::AlreadyProcessed { order_id: order.order_id });
        }
        let payment = self.db.update_payment_status(payment.id, PaymentStatus::Success).await?;
        self.db.update_order_status(&order.order_id, OrderStatus::Paid).await?;
        self.db.attach_payment(&order.order_id, payment.id).await?;
        info!("🔔️ Payment captured for order {}", order.order_id);
        Ok(WebhookOutcome::Processed { order_id: order.order_id })
    }
}
