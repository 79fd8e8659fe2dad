use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use bazaar_engine::{CatalogApi, SqliteDatabase};
use serde_json::json;

use super::helpers::{seed_product, send_request, test_db};
use crate::routes::{AddProductRoute, DeactivateProductRoute, GetProductRoute, ListProductsRoute};

fn configure(db: SqliteDatabase) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(CatalogApi::new(db)))
            .service(AddProductRoute::<SqliteDatabase>::new())
            .service(ListProductsRoute::<SqliteDatabase>::new())
            .service(GetProductRoute::<SqliteDatabase>::new())
            .service(DeactivateProductRoute::<SqliteDatabase>::new());
    }
}

#[actix_web::test]
async fn add_product_returns_the_created_record() {
    let _ = env_logger::try_init().ok();
    let db = test_db().await;
    let req = TestRequest::post().uri("/api/products").set_json(json!({
        "name": "Wireless Headphones",
        "description": "Premium noise-cancelling headphones",
        "price": 2499.99,
        "stock": 50
    }));
    let (status, body) = send_request(req, configure(db)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["name"], json!("Wireless Headphones"));
    assert_eq!(body["data"]["price"], json!(2499.99));
    assert_eq!(body["data"]["stock"], json!(50));
    assert_eq!(body["data"]["in_stock"], json!(true));
}

#[actix_web::test]
async fn non_positive_price_is_rejected_with_validation_error() {
    let _ = env_logger::try_init().ok();
    let db = test_db().await;
    let req = TestRequest::post().uri("/api/products").set_json(json!({
        "name": "Free Lunch",
        "price": 0.0,
        "stock": 1
    }));
    let (status, body) = send_request(req, configure(db)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["errorCode"], json!("VALIDATION_ERROR"));
}

#[actix_web::test]
async fn unknown_product_is_a_404_with_a_stable_code() {
    let _ = env_logger::try_init().ok();
    let db = test_db().await;
    let req = TestRequest::get().uri("/api/products/prd_does_not_exist");
    let (status, body) = send_request(req, configure(db)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["errorCode"], json!("PRODUCT_NOT_FOUND"));
}

#[actix_web::test]
async fn deactivated_products_drop_out_of_the_listing_but_stay_resolvable() {
    let _ = env_logger::try_init().ok();
    let db = test_db().await;
    let product = seed_product(&db, "Fleeting", 10.0, 5).await;

    let req = TestRequest::delete().uri(&format!("/api/products/{}", product.id));
    let (status, _) = send_request(req, configure(db.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let req = TestRequest::get().uri("/api/products");
    let (_, body) = send_request(req, configure(db.clone())).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(0));

    // Soft delete only: direct fetch still resolves so order history keeps working.
    let req = TestRequest::get().uri(&format!("/api/products/{}", product.id));
    let (status, body) = send_request(req, configure(db)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["active"], json!(false));
}
