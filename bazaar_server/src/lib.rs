//! # Bazaar server
//! This module hosts the HTTP surface of the bazaar e-commerce backend. It is responsible for:
//! Exposing the product, cart, order and payment endpoints.
//! Translating workflow errors into the uniform response envelope.
//! Listening for incoming webhook requests from the payment gateway and handing them to the
//! reconciliation workflow.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more
//! information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/api/products`, `/api/cart`, `/api/orders`, `/api/payments`: the storefront REST surface.
//! * `/webhook/razorpay`: the webhook route for receiving payment events from the gateway.

pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
