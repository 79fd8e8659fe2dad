use bazaar_common::Paise;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db_types::OrderId;

/// A remote payment intent as reported by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayIntent {
    /// The gateway's identifier for the intent. Stored locally so webhook events can be matched
    /// back to the order.
    pub reference: String,
    /// The amount in the gateway's minor currency unit.
    pub amount: i64,
    pub currency: String,
}

/// Client for the remote payment provider. The engine only needs intent creation; webhook
/// verification happens locally against the shared secret.
#[allow(async_fn_in_trait)]
pub trait PaymentGatewayClient {
    /// Creates a payment intent for `amount`, tagged with the order reference as the receipt.
    async fn create_intent(&self, amount: Paise, currency: &str, receipt: &OrderId)
        -> Result<GatewayIntent, GatewayError>;
}

#[derive(Debug, Clone, Error)]
#[error("Payment gateway error: {0}")]
pub struct GatewayError(pub String);
