//! `SqliteDatabase` is the concrete storage backend for the bazaar commerce engine.
//!
//! Unsurprisingly, it uses SQLite and implements all the store traits defined in the [`traits`]
//! module. The only multi-row write is order insertion (order + item snapshots), which runs in a
//! transaction; every stock mutation is a single conditional statement, so no explicit locking is
//! needed anywhere.
use std::fmt::Debug;

use sqlx::SqlitePool;

use super::db::{carts, new_pool, orders, payments, products};
use crate::{
    db_types::{
        CartItem,
        NewCartItem,
        NewOrder,
        NewPayment,
        NewProduct,
        Order,
        OrderId,
        OrderItem,
        OrderStatus,
        Payment,
        PaymentStatus,
        Product,
        ProductId,
        UpdateProductRequest,
        UserId,
    },
    traits::{
        CartManagement,
        CommerceDatabase,
        CommerceDbError,
        OrderManagement,
        PaymentManagement,
        ProductManagement,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new connection pool for the given database URL.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, CommerceDbError> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl ProductManagement for SqliteDatabase {
    async fn insert_product(&self, product: NewProduct) -> Result<Product, CommerceDbError> {
        let mut conn = self.pool.acquire().await?;
        products::insert_product(product, &mut conn).await
    }

    async fn fetch_product(&self, id: &ProductId) -> Result<Option<Product>, CommerceDbError> {
        let mut conn = self.pool.acquire().await?;
        Ok(products::fetch_product_by_id(id, &mut conn).await?)
    }

    async fn fetch_products(&self, active_only: bool) -> Result<Vec<Product>, CommerceDbError> {
        let mut conn = self.pool.acquire().await?;
        Ok(products::fetch_products(active_only, &mut conn).await?)
    }

    async fn update_product(&self, id: &ProductId, update: UpdateProductRequest) -> Result<Product, CommerceDbError> {
        let mut conn = self.pool.acquire().await?;
        products::update_product(id, update, &mut conn).await
    }

    async fn deactivate_product(&self, id: &ProductId) -> Result<Product, CommerceDbError> {
        let mut conn = self.pool.acquire().await?;
        products::deactivate_product(id, &mut conn).await
    }

    async fn adjust_stock(&self, id: &ProductId, delta: i64) -> Result<Product, CommerceDbError> {
        let mut conn = self.pool.acquire().await?;
        products::adjust_stock(id, delta, &mut conn).await
    }

    async fn debit_stock(&self, id: &ProductId, quantity: i64) -> Result<Product, CommerceDbError> {
        let mut conn = self.pool.acquire().await?;
        products::debit_stock(id, quantity, &mut conn).await
    }
}

impl CartManagement for SqliteDatabase {
    async fn upsert_cart_item(&self, item: NewCartItem) -> Result<CartItem, CommerceDbError> {
        let mut conn = self.pool.acquire().await?;
        carts::upsert_cart_item(item, &mut conn).await
    }

    async fn fetch_cart_items(&self, user_id: &UserId) -> Result<Vec<CartItem>, CommerceDbError> {
        let mut conn = self.pool.acquire().await?;
        Ok(carts::fetch_cart_items(user_id, &mut conn).await?)
    }

    async fn remove_cart_item(&self, id: i64) -> Result<(), CommerceDbError> {
        let mut conn = self.pool.acquire().await?;
        carts::remove_cart_item(id, &mut conn).await
    }

    async fn clear_cart(&self, user_id: &UserId) -> Result<u64, CommerceDbError> {
        let mut conn = self.pool.acquire().await?;
        carts::clear_cart(user_id, &mut conn).await
    }
}

impl OrderManagement for SqliteDatabase {
    async fn insert_order(&self, order: NewOrder) -> Result<Order, CommerceDbError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::insert_order(order, &mut tx).await?;
        tx.commit().await?;
        Ok(order)
    }

    async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, CommerceDbError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_order_by_order_id(order_id, &mut conn).await?)
    }

    async fn fetch_order_items(&self, order_id: &OrderId) -> Result<Vec<OrderItem>, CommerceDbError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_order_items(order_id, &mut conn).await?)
    }

    async fn fetch_orders(&self, user_id: Option<&UserId>) -> Result<Vec<Order>, CommerceDbError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_orders(user_id, &mut conn).await?)
    }

    async fn update_order_status(&self, order_id: &OrderId, status: OrderStatus) -> Result<Order, CommerceDbError> {
        let mut conn = self.pool.acquire().await?;
        orders::update_order_status(order_id, status, &mut conn).await
    }

    async fn attach_payment(&self, order_id: &OrderId, payment_id: i64) -> Result<Order, CommerceDbError> {
        let mut conn = self.pool.acquire().await?;
        orders::attach_payment(order_id, payment_id, &mut conn).await
    }
}

impl PaymentManagement for SqliteDatabase {
    async fn insert_payment(&self, payment: NewPayment) -> Result<Payment, CommerceDbError> {
        let mut conn = self.pool.acquire().await?;
        payments::insert_payment(payment, &mut conn).await
    }

    async fn fetch_payment_by_gateway_reference(&self, reference: &str) -> Result<Option<Payment>, CommerceDbError> {
        let mut conn = self.pool.acquire().await?;
        Ok(payments::fetch_payment_by_gateway_reference(reference, &mut conn).await?)
    }

    async fn update_payment_status(&self, id: i64, status: PaymentStatus) -> Result<Payment, CommerceDbError> {
        let mut conn = self.pool.acquire().await?;
        payments::update_payment_status(id, status, &mut conn).await
    }
}

impl CommerceDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn close(&mut self) -> Result<(), CommerceDbError> {
        self.pool.close().await;
        Ok(())
    }
}
