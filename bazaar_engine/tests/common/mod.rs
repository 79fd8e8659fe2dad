//! Shared fixtures for the engine integration tests. Each test binary gets a fresh sqlite store
//! under the OS temp dir.
use bazaar_common::Paise;
use bazaar_engine::{
    db_types::{CartItem, NewCartItem, NewProduct, Product, ProductId, UserId},
    test_utils::prepare_env::{prepare_test_env, random_db_path},
    traits::{CartManagement, ProductManagement},
    SqliteDatabase,
};

pub async fn new_test_db() -> SqliteDatabase {
    let url = random_db_path();
    prepare_test_env(&url).await;
    SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database")
}

pub async fn seed_product(db: &SqliteDatabase, name: &str, price_rupees: f64, stock: i64) -> Product {
    db.insert_product(NewProduct::new(name, Paise::from_rupees(price_rupees), stock))
        .await
        .expect("Error seeding product")
}

pub async fn add_to_cart(db: &SqliteDatabase, user: &str, product_id: &ProductId, quantity: i64) -> CartItem {
    db.upsert_cart_item(NewCartItem {
        user_id: UserId::from(user),
        product_id: product_id.clone(),
        quantity,
    })
    .await
    .expect("Error adding cart line")
}

pub async fn stock_of(db: &SqliteDatabase, product_id: &ProductId) -> i64 {
    db.fetch_product(product_id).await.expect("Error fetching product").expect("Product vanished").stock
}
