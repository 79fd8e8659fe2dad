use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use bazaar_engine::{db_types::UserId, CheckoutApi, PaymentFlowApi, SqliteDatabase};
use serde_json::json;

use super::{
    helpers::{add_to_cart, seed_product, send_request, test_db},
    mocks::{gateway_returning, MockGateway},
};
use crate::routes::CreatePaymentRoute;

fn configure(db: SqliteDatabase, gateway: MockGateway) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(PaymentFlowApi::new(db)))
            .app_data(web::Data::new(gateway))
            .service(CreatePaymentRoute::<SqliteDatabase, MockGateway>::new());
    }
}

async fn placed_order(db: &SqliteDatabase, user: &str) -> String {
    let product = seed_product(db, "Paid Item", 150.0, 10).await;
    add_to_cart(db, user, &product.id, 2).await;
    let api = CheckoutApi::new(db.clone());
    api.create_order(&UserId::from(user)).await.expect("Checkout should succeed").order.order_id.0
}

#[actix_web::test]
async fn intent_endpoint_returns_the_gateway_reference() {
    let _ = env_logger::try_init().ok();
    let db = test_db().await;
    let order_id = placed_order(&db, "alice").await;

    let req = TestRequest::post().uri(&format!("/api/payments/{order_id}"));
    let (status, body) = send_request(req, configure(db, gateway_returning("order_mock_123"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["gateway_order_id"], json!("order_mock_123"));
    assert_eq!(body["data"]["amount"], json!(30_000));
    assert_eq!(body["data"]["currency"], json!("INR"));
}

#[actix_web::test]
async fn intent_for_an_unknown_order_is_a_404() {
    let _ = env_logger::try_init().ok();
    let db = test_db().await;
    let req = TestRequest::post().uri("/api/payments/ORD-MISSING");
    let (status, body) = send_request(req, configure(db, MockGateway::new())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["errorCode"], json!("ORDER_NOT_FOUND"));
}

#[actix_web::test]
async fn second_intent_for_the_same_order_is_rejected() {
    let _ = env_logger::try_init().ok();
    let db = test_db().await;
    let order_id = placed_order(&db, "bob").await;

    let req = TestRequest::post().uri(&format!("/api/payments/{order_id}"));
    let (status, _) = send_request(req, configure(db.clone(), gateway_returning("order_mock_a"))).await;
    assert_eq!(status, StatusCode::OK);

    // The first intent left the order linked to a pending payment, but the state gate is on the
    // order status; a Created order may still retry. Pay it and the gate closes.
    let api = PaymentFlowApi::new(db.clone());
    let payload =
        r#"{"event":"payment.captured","payload":{"payment":{"entity":{"id":"pay_1","order_id":"order_mock_a"}}}}"#
            .to_string();
    let signature = bazaar_engine::helpers::sign_webhook_payload(payload.as_bytes(), "s3cret");
    api.process_webhook(payload.as_bytes(), &signature, "s3cret").await.expect("Webhook should process");

    let req = TestRequest::post().uri(&format!("/api/payments/{order_id}"));
    let (status, body) = send_request(req, configure(db, gateway_returning("order_mock_b"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], json!("INVALID_ORDER_STATE"));
}
