use std::fmt::Display;

use bazaar_common::Paise;
use bazaar_engine::{
    db_types::{CartItem, Order, OrderStatus, Product, UpdateProductRequest},
    OrderDetail,
    PaymentIntent,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

//--------------------------------------     ApiResponse      --------------------------------------------------------
/// The uniform response envelope. Every endpoint, success or failure, answers with this shape so
/// clients only ever need one decoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    pub error_code: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    pub fn success<S: Display>(data: T, message: S) -> Self {
        Self { success: true, message: message.to_string(), data: Some(data), error_code: None, timestamp: Utc::now() }
    }

    pub fn error<S: Display, C: Into<String>>(message: S, error_code: C) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            data: None,
            error_code: Some(error_code.into()),
            timestamp: Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    /// A successful response that carries only a message.
    pub fn message<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string(), data: None, error_code: None, timestamp: Utc::now() }
    }
}

//--------------------------------------    Product DTOs      --------------------------------------------------------
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Unit price in rupees.
    pub price: f64,
    #[serde(default)]
    pub discount_percentage: f64,
    pub stock: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdateBody {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub discount_percentage: Option<f64>,
    pub stock: Option<i64>,
}

impl ProductUpdateBody {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.discount_percentage.is_none()
            && self.stock.is_none()
    }

    pub fn into_update(self) -> UpdateProductRequest {
        UpdateProductRequest {
            name: self.name,
            description: self.description,
            price: self.price.map(Paise::from_rupees),
            discount_percentage: self.discount_percentage,
            stock: self.stock,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub discount_percentage: f64,
    /// What the customer actually pays after the promotional discount.
    pub discounted_price: f64,
    pub stock: i64,
    pub in_stock: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        let discounted_price = p.discounted_price().as_rupees();
        Self {
            id: p.id.0,
            name: p.name,
            description: p.description,
            price: p.price.as_rupees(),
            discount_percentage: p.discount_percentage,
            discounted_price,
            stock: p.stock,
            in_stock: p.stock > 0,
            active: p.active,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

//--------------------------------------      Cart DTOs       --------------------------------------------------------
#[derive(Debug, Clone, Deserialize)]
pub struct CartItemRequest {
    pub user_id: String,
    pub product_id: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CartItemResponse {
    pub id: i64,
    pub user_id: String,
    pub product_id: String,
    pub quantity: i64,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        Self { id: item.id, user_id: item.user_id.0, product_id: item.product_id.0, quantity: item.quantity }
    }
}

//--------------------------------------     Order DTOs       --------------------------------------------------------
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderRequest {
    pub user_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrdersQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderItemResponse {
    pub product_id: String,
    pub quantity: i64,
    /// The unit price at the moment of purchase, in rupees. Immune to later catalog changes.
    pub unit_price: f64,
    pub line_total: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderSummary {
    pub order_id: String,
    pub user_id: String,
    pub status: OrderStatus,
    pub total_amount: f64,
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderSummary {
    fn from(order: Order) -> Self {
        Self {
            order_id: order.order_id.0,
            user_id: order.user_id.0,
            status: order.status,
            total_amount: order.total_amount.as_rupees(),
            created_at: order.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderResponse {
    pub order_id: String,
    pub user_id: String,
    pub status: OrderStatus,
    pub total_amount: f64,
    pub items: Vec<OrderItemResponse>,
    pub created_at: DateTime<Utc>,
}

impl From<OrderDetail> for OrderResponse {
    fn from(detail: OrderDetail) -> Self {
        let items = detail
            .items
            .into_iter()
            .map(|item| OrderItemResponse {
                product_id: item.product_id.0,
                quantity: item.quantity,
                unit_price: item.unit_price.as_rupees(),
                line_total: (item.unit_price * item.quantity).as_rupees(),
            })
            .collect();
        Self {
            order_id: detail.order.order_id.0,
            user_id: detail.order.user_id.0,
            status: detail.order.status,
            total_amount: detail.order.total_amount.as_rupees(),
            items,
            created_at: detail.order.created_at,
        }
    }
}

//--------------------------------------    Payment DTOs      --------------------------------------------------------
#[derive(Debug, Clone, Serialize)]
pub struct PaymentIntentResponse {
    pub gateway_order_id: String,
    /// Amount in the gateway's minor currency unit, exactly as submitted to the gateway.
    pub amount: i64,
    pub currency: String,
}

impl From<PaymentIntent> for PaymentIntentResponse {
    fn from(intent: PaymentIntent) -> Self {
        Self { gateway_order_id: intent.gateway_reference, amount: intent.amount, currency: intent.currency }
    }
}
