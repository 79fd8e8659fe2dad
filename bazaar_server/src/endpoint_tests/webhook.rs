use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use bazaar_engine::{
    db_types::{OrderStatus, PaymentStatus, UserId},
    helpers::sign_webhook_payload,
    traits::{OrderManagement, PaymentManagement},
    CheckoutApi,
    PaymentFlowApi,
    SqliteDatabase,
};
use serde_json::json;

use super::{
    helpers::{add_to_cart, seed_product, send_request, test_db, test_webhook_settings, TEST_WEBHOOK_SECRET},
    mocks::gateway_returning,
};
use crate::routes::PaymentWebhookRoute;

fn configure(db: SqliteDatabase) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(PaymentFlowApi::new(db)))
            .app_data(web::Data::new(test_webhook_settings()))
            .service(PaymentWebhookRoute::<SqliteDatabase>::new());
    }
}

/// Places an order and creates a payment intent for it, returning (order_id, gateway_reference).
async fn order_with_intent(db: &SqliteDatabase, user: &str, reference: &str) -> String {
    let product = seed_product(db, "Webhook Item", 100.0, 10).await;
    add_to_cart(db, user, &product.id, 1).await;
    let order_id = CheckoutApi::new(db.clone())
        .create_order(&UserId::from(user))
        .await
        .expect("Checkout should succeed")
        .order
        .order_id;
    PaymentFlowApi::new(db.clone())
        .create_payment_intent(&order_id, &gateway_returning(reference))
        .await
        .expect("Intent should be created");
    order_id.0
}

fn captured_payload(reference: &str) -> String {
    format!(
        r#"{{"event":"payment.captured","payload":{{"payment":{{"entity":{{"id":"pay_hook_1","order_id":"{reference}"}}}}}}}}"#
    )
}

fn webhook_request(payload: &str, signature: &str) -> TestRequest {
    TestRequest::post()
        .uri("/webhook/razorpay")
        .insert_header(("X-Razorpay-Signature", signature))
        .insert_header(("Content-Type", "application/json"))
        .set_payload(payload.to_string())
}

#[actix_web::test]
async fn valid_capture_marks_the_order_paid() {
    let _ = env_logger::try_init().ok();
    let db = test_db().await;
    let order_id = order_with_intent(&db, "alice", "order_hook_1").await;

    let payload = captured_payload("order_hook_1");
    let signature = sign_webhook_payload(payload.as_bytes(), TEST_WEBHOOK_SECRET);
    let (status, body) = send_request(webhook_request(&payload, &signature), configure(db.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Webhook processed successfully"));

    let order = db.fetch_order(&order_id.clone().into()).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Paid);
    let payment = db.fetch_payment_by_gateway_reference("order_hook_1").await.unwrap().unwrap();
    assert_eq!(payment.status, PaymentStatus::Success);
}

#[actix_web::test]
async fn duplicate_delivery_is_acknowledged_without_side_effects() {
    let _ = env_logger::try_init().ok();
    let db = test_db().await;
    let order_id = order_with_intent(&db, "bob", "order_hook_2").await;

    let payload = captured_payload("order_hook_2");
    let signature = sign_webhook_payload(payload.as_bytes(), TEST_WEBHOOK_SECRET);
    let (status, _) = send_request(webhook_request(&payload, &signature), configure(db.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send_request(webhook_request(&payload, &signature), configure(db.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Webhook already processed"));

    let order = db.fetch_order(&order_id.into()).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Paid);
}

#[actix_web::test]
async fn invalid_signature_is_acknowledged_but_changes_nothing() {
    let _ = env_logger::try_init().ok();
    let db = test_db().await;
    let order_id = order_with_intent(&db, "carol", "order_hook_3").await;

    let payload = captured_payload("order_hook_3");
    let forged = sign_webhook_payload(payload.as_bytes(), "not_the_real_secret");
    let (status, body) = send_request(webhook_request(&payload, &forged), configure(db.clone())).await;
    // Still a 200: the gateway must never be provoked into a retry storm.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["errorCode"], json!("SIGNATURE_VERIFICATION_FAILED"));

    let order = db.fetch_order(&order_id.into()).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Created);
    let payment = db.fetch_payment_by_gateway_reference("order_hook_3").await.unwrap().unwrap();
    assert_eq!(payment.status, PaymentStatus::Pending);
}

#[actix_web::test]
async fn unknown_reference_reports_payment_record_not_found() {
    let _ = env_logger::try_init().ok();
    let db = test_db().await;

    let payload = captured_payload("order_nobody_has");
    let signature = sign_webhook_payload(payload.as_bytes(), TEST_WEBHOOK_SECRET);
    let (status, body) = send_request(webhook_request(&payload, &signature), configure(db)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Payment record not found"));
    assert_eq!(body["errorCode"], json!("PAYMENT_RECORD_NOT_FOUND"));
}

#[actix_web::test]
async fn non_capture_events_are_acknowledged_and_ignored() {
    let _ = env_logger::try_init().ok();
    let db = test_db().await;
    let order_id = order_with_intent(&db, "dave", "order_hook_4").await;

    let payload =
        r#"{"event":"order.paid","payload":{"payment":{"entity":{"id":"pay_x","order_id":"order_hook_4"}}}}"#;
    let signature = sign_webhook_payload(payload.as_bytes(), TEST_WEBHOOK_SECRET);
    let (status, body) = send_request(webhook_request(payload, &signature), configure(db.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    let order = db.fetch_order(&order_id.into()).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Created);
}
