use bazaar_common::Secret;
use log::*;

const DEFAULT_API_BASE: &str = "https://api.razorpay.com";

#[derive(Debug, Clone)]
pub struct RazorpayConfig {
    pub key_id: String,
    pub key_secret: Secret<String>,
    pub api_base: String,
}

impl Default for RazorpayConfig {
    fn default() -> Self {
        Self { key_id: String::default(), key_secret: Secret::default(), api_base: DEFAULT_API_BASE.to_string() }
    }
}

impl RazorpayConfig {
    pub fn new_from_env_or_default() -> Self {
        let key_id = std::env::var("RAZORPAY_KEY_ID").unwrap_or_else(|_| {
            warn!("RAZORPAY_KEY_ID not set, using a (probably useless) default");
            "rzp_test_0000000000".to_string()
        });
        let key_secret = Secret::new(std::env::var("RAZORPAY_KEY_SECRET").unwrap_or_else(|_| {
            warn!("RAZORPAY_KEY_SECRET not set, using a (probably useless) default");
            "00000000000000".to_string()
        }));
        let api_base = std::env::var("RAZORPAY_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        Self { key_id, key_secret, api_base }
    }
}
