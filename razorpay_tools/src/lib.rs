//! A minimal Razorpay REST client.
//!
//! Only the slice of the Razorpay Orders API that the bazaar server needs is covered: creating a
//! payment order ("intent") for a given amount and receipt reference. Webhook signature handling
//! deliberately does not live here; the server verifies deliveries locally against the shared
//! webhook secret.
mod config;
mod error;
mod razorpay_api;

mod data_objects;

pub use config::RazorpayConfig;
pub use data_objects::{NewRazorpayOrder, RazorpayOrder};
pub use error::RazorpayApiError;
pub use razorpay_api::RazorpayApi;
