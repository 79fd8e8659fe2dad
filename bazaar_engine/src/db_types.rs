use std::{fmt::Display, str::FromStr};

use bazaar_common::Paise;
use chrono::{DateTime, Utc};
use log::error;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

//--------------------------------------      ProductId       --------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct ProductId(pub String);

impl FromStr for ProductId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ProductId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A fresh identifier for a new catalog entry.
    pub fn random() -> Self {
        Self(format!("prd_{:016x}", rand::random::<u64>()))
    }
}

//--------------------------------------       UserId         --------------------------------------------------------
/// A lightweight wrapper around the string identifying a cart/order owner. No user entity exists in
/// this backend; the id is only a scope key.
#[derive(Debug, Clone, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct UserId(pub String);

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<S: Into<String>> From<S> for UserId {
    fn from(value: S) -> Self {
        Self(value.into())
    }
}

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------       OrderId        --------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct OrderId(pub String);

impl FromStr for OrderId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Generates a customer-facing order reference. Also used as the receipt field on payment
    /// intents, so it must be unique per order.
    pub fn random() -> Self {
        Self(format!("ORD-{:010X}", rand::random::<u64>() & 0xFF_FFFF_FFFF))
    }
}

//--------------------------------------      OrderStatus     --------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum OrderStatus {
    /// The order has been created from a cart and is awaiting payment.
    Created,
    /// The gateway has confirmed payment in full.
    Paid,
    /// The order was cancelled before shipping. Terminal.
    Cancelled,
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Created => write!(f, "Created"),
            OrderStatus::Paid => write!(f, "Paid"),
            OrderStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid order status: {value}. But this conversion cannot fail. Defaulting to Created");
            OrderStatus::Created
        })
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid status: {0}")]
pub struct ConversionError(String);

impl FromStr for OrderStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Created" => Ok(Self::Created),
            "Paid" => Ok(Self::Paid),
            "Cancelled" => Ok(Self::Cancelled),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

//--------------------------------------     PaymentStatus    --------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// An intent exists at the gateway, but no capture event has arrived yet.
    Pending,
    /// The gateway confirmed capture via webhook.
    Success,
    /// The gateway reported the payment as failed.
    Failed,
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "Pending"),
            PaymentStatus::Success => write!(f, "Success"),
            PaymentStatus::Failed => write!(f, "Failed"),
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid payment status: {value}. But this conversion cannot fail. Defaulting to Pending");
            PaymentStatus::Pending
        })
    }
}

impl FromStr for PaymentStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Success" => Ok(Self::Success),
            "Failed" => Ok(Self::Failed),
            s => Err(ConversionError(format!("Invalid payment status: {s}"))),
        }
    }
}

//--------------------------------------       Product        --------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    /// Unit price in paise. Strictly positive for purchasable products.
    pub price: Paise,
    /// Promotional discount in percent, in the range [0, 100].
    pub discount_percentage: f64,
    /// Units on hand. Never negative; all decrements go through the conditional-update path.
    pub stock: i64,
    /// Soft-delete flag. Deactivated products stay on record so order history keeps resolving.
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// The price a customer actually pays, after the promotional discount. Truncated to whole
    /// paise.
    pub fn discounted_price(&self) -> Paise {
        if self.discount_percentage > 0.0 {
            let discounted = self.price.value() as f64 * (1.0 - self.discount_percentage / 100.0);
            Paise::from(discounted.trunc() as i64)
        } else {
            self.price
        }
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

//--------------------------------------      NewProduct      --------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Paise,
    pub discount_percentage: f64,
    pub stock: i64,
}

impl NewProduct {
    pub fn new<S: Into<String>>(name: S, price: Paise, stock: i64) -> Self {
        Self { name: name.into(), description: None, price, discount_percentage: 0.0, stock }
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_discount(mut self, percentage: f64) -> Self {
        self.discount_percentage = percentage;
        self
    }
}

//--------------------------------------  UpdateProductRequest ------------------------------------------------------
/// A partial product update. Absent fields are left untouched; an all-absent update is rejected by
/// the store as a no-op.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Paise>,
    pub discount_percentage: Option<f64>,
    pub stock: Option<i64>,
}

impl UpdateProductRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.discount_percentage.is_none()
            && self.stock.is_none()
    }
}

//--------------------------------------       CartItem       --------------------------------------------------------
/// One (user, product, quantity) line awaiting checkout. The store keeps at most one row per
/// (user_id, product_id) pair; adding the same product again increments the quantity.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CartItem {
    pub id: i64,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------     NewCartItem      --------------------------------------------------------
#[derive(Debug, Clone, Deserialize)]
pub struct NewCartItem {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i64,
}

//--------------------------------------        Order         --------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    /// Internal row id. External callers address orders by `order_id`.
    pub id: i64,
    pub order_id: OrderId,
    pub user_id: UserId,
    /// The amount payable, fixed at checkout. Never recalculated from the catalog.
    pub total_amount: Paise,
    pub status: OrderStatus,
    /// Foreign-key-style link to the payment created for this order, if any.
    pub payment_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------      OrderItem       --------------------------------------------------------
/// An immutable snapshot of one purchased line: the product, the quantity, and the unit price at
/// the moment the order was created. Later catalog changes never touch these rows.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: ProductId,
    pub quantity: i64,
    pub unit_price: Paise,
}

//--------------------------------------      NewOrder        --------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub total_amount: Paise,
    pub items: Vec<NewOrderItem>,
}

#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub quantity: i64,
    pub unit_price: Paise,
}

//--------------------------------------       Payment        --------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Payment {
    pub id: i64,
    pub order_id: OrderId,
    pub amount: Paise,
    pub status: PaymentStatus,
    /// The gateway's identifier for the payment intent. Webhook events are correlated to local
    /// payments through this value.
    pub gateway_reference: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------      NewPayment      --------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub order_id: OrderId,
    pub amount: Paise,
    pub gateway_reference: String,
}

impl NewPayment {
    pub fn new(order_id: OrderId, amount: Paise, gateway_reference: String) -> Self {
        Self { order_id, amount, gateway_reference }
    }
}
