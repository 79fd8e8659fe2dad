use thiserror::Error;

use crate::{
    db_types::{OrderId, OrderStatus, ProductId, UserId},
    traits::CommerceDbError,
};

//--------------------------------------    CheckoutError     --------------------------------------------------------
#[derive(Debug, Clone, Error)]
pub enum CheckoutError {
    #[error("Cart for user {0} is empty. Cannot create an order.")]
    EmptyCart(UserId),
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),
    #[error("Insufficient stock for product: {product}. Available: {available}, Required: {requested}")]
    InsufficientStock { product: String, available: i64, requested: i64 },
    #[error("Order not found with id: {0}")]
    OrderNotFound(OrderId),
    #[error("Order {order_id} is {status} and cannot be changed")]
    InvalidOrderState { order_id: OrderId, status: OrderStatus },
    #[error("Internal storage failure. {0}")]
    Database(String),
}

impl From<CommerceDbError> for CheckoutError {
    fn from(e: CommerceDbError) -> Self {
        match e {
            CommerceDbError::ProductNotFound(id) => Self::ProductNotFound(id),
            CommerceDbError::InsufficientStock { product, available, requested } => {
                Self::InsufficientStock { product, available, requested }
            },
            CommerceDbError::OrderNotFound(id) => Self::OrderNotFound(id),
            other => Self::Database(other.to_string()),
        }
    }
}

//--------------------------------------   PaymentFlowError   --------------------------------------------------------
#[derive(Debug, Clone, Error)]
pub enum PaymentFlowError {
    #[error("Order not found with id: {0}")]
    OrderNotFound(OrderId),
    #[error("Order {order_id} is {status}; a payment intent can only be created while it is Created")]
    InvalidOrderState { order_id: OrderId, status: OrderStatus },
    #[error("Webhook signature verification failed")]
    SignatureVerificationFailed,
    #[error("Could not read the webhook payload. {0}")]
    PayloadError(String),
    #[error("Payment gateway call failed. {0}")]
    Gateway(String),
    #[error("Internal storage failure. {0}")]
    Database(String),
}

impl From<CommerceDbError> for PaymentFlowError {
    fn from(e: CommerceDbError) -> Self {
        match e {
            CommerceDbError::OrderNotFound(id) => Self::OrderNotFound(id),
            other => Self::Database(other.to_string()),
        }
    }
}
