mod webhook_signature;

pub use webhook_signature::{sign_webhook_payload, verify_webhook_signature};
