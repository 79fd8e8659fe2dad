use std::env;

use bazaar_common::Secret;
use log::*;
use razorpay_tools::RazorpayConfig;

const DEFAULT_BZR_HOST: &str = "127.0.0.1";
const DEFAULT_BZR_PORT: u16 = 8480;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Shared secret the gateway signs webhook deliveries with. Deliveries that do not verify
    /// against it are rejected before the payload is even parsed.
    pub webhook_secret: Secret<String>,
    /// Credentials and endpoint for the Razorpay REST client.
    pub razorpay: RazorpayConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_BZR_HOST.to_string(),
            port: DEFAULT_BZR_PORT,
            database_url: String::default(),
            webhook_secret: Secret::default(),
            razorpay: RazorpayConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("BZR_HOST").ok().unwrap_or_else(|| DEFAULT_BZR_HOST.into());
        let port = env::var("BZR_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for BZR_PORT. {e} Using the default, {DEFAULT_BZR_PORT}, instead."
                    );
                    DEFAULT_BZR_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_BZR_PORT);
        let database_url = env::var("BZR_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ BZR_DATABASE_URL is not set. Please set it to the URL for the bazaar database.");
            String::default()
        });
        let webhook_secret = Secret::new(env::var("BZR_RAZORPAY_WEBHOOK_SECRET").ok().unwrap_or_else(|| {
            error!(
                "🪛️ BZR_RAZORPAY_WEBHOOK_SECRET is not set. Webhook deliveries cannot be verified without it, so \
                 every delivery will be rejected."
            );
            String::default()
        }));
        let razorpay = RazorpayConfig::new_from_env_or_default();
        Self { host, port, database_url, webhook_secret, razorpay }
    }
}

//-------------------------------------------  WebhookSettings  -------------------------------------------------------
/// The slice of the configuration the webhook handler needs. Kept small so secrets do not travel
/// with the rest of the server state.
#[derive(Clone, Debug)]
pub struct WebhookSettings {
    pub secret: Secret<String>,
}

impl WebhookSettings {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self { secret: config.webhook_secret.clone() }
    }
}
