use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web::ServiceConfig, App};
use bazaar_common::{Paise, Secret};
use bazaar_engine::{
    db_types::{NewCartItem, NewProduct, Product, ProductId, UserId},
    test_utils::prepare_env::{prepare_test_env, random_db_path},
    traits::{CartManagement, ProductManagement},
    SqliteDatabase,
};
use serde_json::Value;

use crate::config::WebhookSettings;

pub const TEST_WEBHOOK_SECRET: &str = "whsec_endpoint_test";

pub async fn test_db() -> SqliteDatabase {
    let url = random_db_path();
    prepare_test_env(&url).await;
    SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating test database")
}

pub fn test_webhook_settings() -> WebhookSettings {
    WebhookSettings { secret: Secret::new(TEST_WEBHOOK_SECRET.to_string()) }
}

pub async fn seed_product(db: &SqliteDatabase, name: &str, price_rupees: f64, stock: i64) -> Product {
    db.insert_product(NewProduct::new(name, Paise::from_rupees(price_rupees), stock))
        .await
        .expect("Error seeding product")
}

pub async fn add_to_cart(db: &SqliteDatabase, user: &str, product_id: &ProductId, quantity: i64) {
    db.upsert_cart_item(NewCartItem { user_id: UserId::from(user), product_id: product_id.clone(), quantity })
        .await
        .expect("Error adding cart line");
}

/// Runs a request against an app assembled by `configure` and returns the status plus the parsed
/// response envelope.
pub async fn send_request<F>(req: TestRequest, configure: F) -> (StatusCode, Value)
where F: FnOnce(&mut ServiceConfig) {
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    let (_, res) = test::call_service(&service, req.to_request()).await.into_parts();
    let status = res.status();
    let body = res.into_body().try_into_bytes().unwrap_or_else(|_| panic!("Response body was not complete"));
    let body: Value = serde_json::from_slice(&body).expect("Response body was not valid JSON");
    (status, body)
}
