use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use bazaar_engine::{traits::ProductManagement, CartApi, CheckoutApi, SqliteDatabase};
use serde_json::json;

use super::helpers::{add_to_cart, seed_product, send_request, test_db};
use crate::routes::{AddToCartRoute, CartItemsRoute, CreateOrderRoute, GetOrderRoute};

fn configure(db: SqliteDatabase) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(CheckoutApi::new(db.clone())))
            .app_data(web::Data::new(CartApi::new(db)))
            .service(AddToCartRoute::<SqliteDatabase>::new())
            .service(CartItemsRoute::<SqliteDatabase>::new())
            .service(CreateOrderRoute::<SqliteDatabase>::new())
            .service(GetOrderRoute::<SqliteDatabase>::new());
    }
}

#[actix_web::test]
async fn checkout_converts_the_cart_into_an_order() {
    let _ = env_logger::try_init().ok();
    let db = test_db().await;
    let product = seed_product(&db, "Espresso Machine", 100.0, 5).await;
    add_to_cart(&db, "alice", &product.id, 3).await;

    let req = TestRequest::post().uri("/api/orders").set_json(json!({ "user_id": "alice" }));
    let (status, body) = send_request(req, configure(db.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["status"], json!("Created"));
    assert_eq!(body["data"]["total_amount"], json!(300.0));
    assert_eq!(body["data"]["items"][0]["quantity"], json!(3));
    assert_eq!(body["data"]["items"][0]["unit_price"], json!(100.0));

    let product = db.fetch_product(&product.id).await.unwrap().unwrap();
    assert_eq!(product.stock, 2);

    let req = TestRequest::get().uri("/api/cart/alice");
    let (_, body) = send_request(req, configure(db)).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(0));
}

#[actix_web::test]
async fn empty_cart_checkout_is_a_400_with_a_stable_code() {
    let _ = env_logger::try_init().ok();
    let db = test_db().await;
    let req = TestRequest::post().uri("/api/orders").set_json(json!({ "user_id": "nobody" }));
    let (status, body) = send_request(req, configure(db)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["errorCode"], json!("EMPTY_CART"));
}

#[actix_web::test]
async fn oversized_order_reports_available_and_requested_quantities() {
    let _ = env_logger::try_init().ok();
    let db = test_db().await;
    let product = seed_product(&db, "Rare Item", 10.0, 5).await;
    add_to_cart(&db, "bob", &product.id, 10).await;

    let req = TestRequest::post().uri("/api/orders").set_json(json!({ "user_id": "bob" }));
    let (status, body) = send_request(req, configure(db.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], json!("INSUFFICIENT_STOCK"));
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("Rare Item"));
    assert!(message.contains("Available: 5"));
    assert!(message.contains("Required: 10"));

    // The failed attempt must leave both stock and cart untouched.
    let product = db.fetch_product(&product.id).await.unwrap().unwrap();
    assert_eq!(product.stock, 5);
    let req = TestRequest::get().uri("/api/cart/bob");
    let (_, body) = send_request(req, configure(db)).await;
    assert_eq!(body["data"][0]["quantity"], json!(10));
}

#[actix_web::test]
async fn placed_orders_can_be_fetched_by_reference() {
    let _ = env_logger::try_init().ok();
    let db = test_db().await;
    let product = seed_product(&db, "Bookshelf", 45.5, 2).await;
    add_to_cart(&db, "carol", &product.id, 2).await;

    let req = TestRequest::post().uri("/api/orders").set_json(json!({ "user_id": "carol" }));
    let (_, body) = send_request(req, configure(db.clone())).await;
    let order_id = body["data"]["order_id"].as_str().unwrap().to_string();

    let req = TestRequest::get().uri(&format!("/api/orders/{order_id}"));
    let (status, body) = send_request(req, configure(db)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["order_id"], json!(order_id));
    assert_eq!(body["data"]["total_amount"], json!(91.0));
}
