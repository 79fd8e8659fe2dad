use serde::{Deserialize, Serialize};

/// Request body for `POST /v1/orders`. Amounts are in the minor currency unit (paise for INR).
#[derive(Debug, Clone, Serialize)]
pub struct NewRazorpayOrder {
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
}

/// The order record Razorpay returns for a created intent. Only the fields the bazaar server
/// consumes are modelled; everything else in the response is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RazorpayOrder {
    /// Razorpay's own id for the order, e.g. `order_9A33XWu170gUtm`. Webhook events reference it.
    pub id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}
