use thiserror::Error;

use crate::db_types::{
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
};

/// Product store operations.
///
/// The one method with real contract weight is [`ProductManagement::debit_stock`]: it is the only
/// way the engine takes stock away from a product, and implementations MUST perform it as a single
/// conditional update ("decrement by N only if stock >= N") so that two concurrent checkouts can
/// never drive stock negative between a read and a write.
#[allow(async_fn_in_trait)]
pub trait ProductManagement {
    async fn insert_product(&self, product: NewProduct) -> Result<Product, CommerceDbError>;

    async fn fetch_product(&self, id: &ProductId) -> Result<Option<Product>, CommerceDbError>;

    /// All products, newest first. With `active_only`, soft-deleted entries are filtered out.
    async fn fetch_products(&self, active_only: bool) -> Result<Vec<Product>, CommerceDbError>;

    /// Applies a partial update. Fails with [`CommerceDbError::ProductUpdateNoOp`] when the request
    /// carries no fields, and [`CommerceDbError::ProductNotFound`] when the id does not resolve.
    async fn update_product(&self, id: &ProductId, update: UpdateProductRequest) -> Result<Product, CommerceDbError>;

    /// Soft delete. The record stays put so order items keep resolving.
    async fn deactivate_product(&self, id: &ProductId) -> Result<Product, CommerceDbError>;

    /// Adds `delta` units to the stock level (restocks and checkout compensation). The stock level
    /// must not go negative as a result.
    async fn adjust_stock(&self, id: &ProductId, delta: i64) -> Result<Product, CommerceDbError>;

    /// Atomically removes `quantity` units, failing with [`CommerceDbError::InsufficientStock`]
    /// when fewer than `quantity` units are on hand. Single statement, no read-modify-write.
    async fn debit_stock(&self, id: &ProductId, quantity: i64) -> Result<Product, CommerceDbError>;
}

/// Cart store operations. Carts are keyed by user id; one row per (user, product).
#[allow(async_fn_in_trait)]
pub trait CartManagement {
    /// Adds a line item. If the (user, product) pair already has a row, its quantity is
    /// incremented instead of inserting a duplicate.
    async fn upsert_cart_item(&self, item: NewCartItem) -> Result<CartItem, CommerceDbError>;

    /// The user's cart lines in insertion order. Checkout processes them in exactly this order.
    async fn fetch_cart_items(&self, user_id: &UserId) -> Result<Vec<CartItem>, CommerceDbError>;

    async fn remove_cart_item(&self, id: i64) -> Result<(), CommerceDbError>;

    /// Empties the user's cart, returning the number of lines removed.
    async fn clear_cart(&self, user_id: &UserId) -> Result<u64, CommerceDbError>;
}

/// Order store operations.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Persists the order and its item snapshots in a single transaction.
    async fn insert_order(&self, order: NewOrder) -> Result<Order, CommerceDbError>;

    async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, CommerceDbError>;

    async fn fetch_order_items(&self, order_id: &OrderId) -> Result<Vec<OrderItem>, CommerceDbError>;

    /// Orders for one user, or all orders, oldest first.
    async fn fetch_orders(&self, user_id: Option<&UserId>) -> Result<Vec<Order>, CommerceDbError>;

    async fn update_order_status(&self, order_id: &OrderId, status: OrderStatus) -> Result<Order, CommerceDbError>;

    /// Records the foreign-key-style link from an order to its payment record.
    async fn attach_payment(&self, order_id: &OrderId, payment_id: i64) -> Result<Order, CommerceDbError>;
}

/// Payment store operations.
#[allow(async_fn_in_trait)]
pub trait PaymentManagement {
    /// Persists a new payment record with `Pending` status.
    async fn insert_payment(&self, payment: NewPayment) -> Result<Payment, CommerceDbError>;

    /// Looks a payment up by the gateway's intent reference, the correlation key for webhook
    /// events.
    async fn fetch_payment_by_gateway_reference(&self, reference: &str) -> Result<Option<Payment>, CommerceDbError>;

    async fn update_payment_status(&self, id: i64, status: PaymentStatus) -> Result<Payment, CommerceDbError>;
}

/// The highest-level behaviour a backend must provide to drive the bazaar workflows.
#[allow(async_fn_in_trait)]
pub trait CommerceDatabase:
    Clone + ProductManagement + CartManagement + OrderManagement + PaymentManagement
{
    /// The URL of the database
    fn url(&self) -> &str;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), CommerceDbError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Error)]
pub enum CommerceDbError {
    #[error("We have an internal database engine error (configuration/uptime etc.): {0}")]
    DatabaseError(String),
    #[error("The requested product {0} does not exist")]
    ProductNotFound(ProductId),
    #[error("Insufficient stock for product: {product}. Available: {available}, Required: {requested}")]
    InsufficientStock { product: String, available: i64, requested: i64 },
    #[error("The requested product update would result in a no-op.")]
    ProductUpdateNoOp,
    #[error("The requested cart item (internal id {0}) does not exist")]
    CartItemNotFound(i64),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("Cannot insert payment, since it already exists with gateway reference {0}")]
    PaymentAlreadyExists(String),
    #[error("The requested payment (internal id {0}) does not exist")]
    PaymentIdNotFound(i64),
    #[error("The requested payment does not exist for gateway reference {0}")]
    PaymentNotFound(String),
}

impl From<sqlx::Error> for CommerceDbError {
    fn from(e: sqlx::Error) -> Self {
        CommerceDbError::DatabaseError(e.to_string())
    }
}
