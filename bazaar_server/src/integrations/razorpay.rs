//! Adapter between the engine's gateway seam and the Razorpay REST client.
use bazaar_common::Paise;
use bazaar_engine::{
    db_types::OrderId,
    traits::{GatewayError, GatewayIntent, PaymentGatewayClient},
};
use log::trace;
use razorpay_tools::{RazorpayApi, RazorpayConfig};

use crate::errors::ServerError;

#[derive(Clone)]
pub struct RazorpayGateway {
    api: RazorpayApi,
}

impl RazorpayGateway {
    pub fn new(config: RazorpayConfig) -> Result<Self, ServerError> {
        let api = RazorpayApi::new(config).map_err(|e| ServerError::InitializeError(e.to_string()))?;
        Ok(Self { api })
    }
}

impl PaymentGatewayClient for RazorpayGateway {
    async fn create_intent(
        &self,
        amount: Paise,
        currency: &str,
        receipt: &OrderId,
    ) -> Result<GatewayIntent, GatewayError> {
        trace!("💳️ Requesting Razorpay order for receipt {receipt}");
        let order = self
            .api
            .create_order(amount.value(), currency, receipt.as_str())
            .await
            .map_err(|e| GatewayError(e.to_string()))?;
        Ok(GatewayIntent { reference: order.id, amount: order.amount, currency: order.currency })
    }
}
