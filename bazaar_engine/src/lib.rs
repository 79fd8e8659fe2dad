//! Bazaar Commerce Engine
//!
//! The engine holds the core logic of the bazaar e-commerce backend. It is transport-agnostic; the
//! HTTP server is a thin layer over the APIs exported here.
//!
//! The crate is divided into three main sections:
//! 1. Storage ([`mod@sqlite`]). SQLite is the supported backend. You should never need to touch the
//!    database directly; go through the public APIs instead. The exception is the record types
//!    themselves, which live in [`mod@db_types`] and are public.
//! 2. The store traits ([`mod@traits`]). A backend acts as a product, cart, order and payment store
//!    by implementing these. The stock-mutation contract lives here too: every decrement is a
//!    single conditional update so that concurrent checkouts can never oversell a product.
//! 3. The workflow APIs ([`mod@api`]). [`CheckoutApi`] turns a cart into a priced, stock-committed
//!    order, and [`PaymentFlowApi`] creates gateway payment intents and reconciles the gateway's
//!    webhook events against local state.

pub mod db_types;
pub mod helpers;
pub mod traits;

mod api;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;

pub use api::{
    errors::{CheckoutError, PaymentFlowError},
    objects::{GatewayEvent, OrderDetail, PaymentIntent, WebhookOutcome, PAYMENT_CAPTURED_EVENT},
    CartApi,
    CatalogApi,
    CheckoutApi,
    PaymentFlowApi,
};
