//! Store and gateway seams for the bazaar engine.
//!
//! A backend becomes usable by the workflow APIs by implementing the traits in
//! [`commerce_database`]; the remote payment provider is reached through
//! [`payment_gateway::PaymentGatewayClient`]. Both are narrow on purpose: the workflows own the
//! orchestration, the traits own the single-step operations.

mod commerce_database;
mod payment_gateway;

pub use commerce_database::{
    CartManagement,
    CommerceDatabase,
    CommerceDbError,
    OrderManagement,
    PaymentManagement,
    ProductManagement,
};
pub use payment_gateway::{GatewayError, GatewayIntent, PaymentGatewayClient};
