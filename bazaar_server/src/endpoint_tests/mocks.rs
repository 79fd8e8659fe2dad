use bazaar_common::Paise;
use bazaar_engine::{
    db_types::OrderId,
    traits::{GatewayError, GatewayIntent, PaymentGatewayClient},
};
use mockall::mock;

mock! {
    pub Gateway {}

    impl PaymentGatewayClient for Gateway {
        async fn create_intent(
            &self,
            amount: Paise,
            currency: &str,
            receipt: &OrderId,
        ) -> Result<GatewayIntent, GatewayError>;
    }
}

/// A mock gateway that answers every intent request with a fixed reference.
pub fn gateway_returning(reference: &str) -> MockGateway {
    let reference = reference.to_string();
    let mut gateway = MockGateway::new();
    gateway.expect_create_intent().returning(move |amount, currency, _receipt| {
        Ok(GatewayIntent { reference: reference.clone(), amount: amount.value(), currency: currency.to_string() })
    });
    gateway
}
