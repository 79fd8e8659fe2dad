use std::fmt::Debug;

use bazaar_common::Paise;
use log::*;

use crate::{
    api::{errors::CheckoutError, objects::OrderDetail},
    db_types::{CartItem, NewOrder, NewOrderItem, Order, OrderId, OrderStatus, Product, ProductId, UserId},
    traits::CommerceDatabase,
};

/// `CheckoutApi` converts a user's cart into a priced, stock-committed order, or fails cleanly
/// with all state unchanged.
///
/// The workflow is two-phase. The validate phase resolves every cart line and checks stock
/// sufficiency without mutating anything, so any validation failure has no side effects. The
/// commit phase then debits stock line by line through the store's conditional-update primitive;
/// a debit that loses a concurrent race triggers a compensating re-credit of every line already
/// debited before the failure is surfaced.
pub struct CheckoutApi<B> {
    db: B,
}

impl<B> Debug for CheckoutApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CheckoutApi")
    }
}

impl<B> CheckoutApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> CheckoutApi<B>
where B: CommerceDatabase
{
    /// Creates an order from the user's cart.
    ///
    /// Fails with [`CheckoutError::EmptyCart`] when there is nothing to check out, with
    /// [`CheckoutError::ProductNotFound`] when a cart line references a product that no longer
    /// exists, and with [`CheckoutError::InsufficientStock`] when any line asks for more units
    /// than are on hand. On success the order is persisted with `Created` status, every product's
    /// stock is reduced, and the cart is emptied.
    pub async fn create_order(&self, user_id: &UserId) -> Result<OrderDetail, CheckoutError> {
        let cart = self.db.fetch_cart_items(user_id).await?;
        if cart.is_empty() {
            debug!("🛒️ Checkout rejected for {user_id}: the cart is empty");
            return Err(CheckoutError::EmptyCart(user_id.clone()));
        }
        let lines = self.validate_stock_availability(cart).await?;
        let order = self.commit_order(user_id, lines).await?;
        let items = self.db.fetch_order_items(&order.order_id).await?;
        match self.db.clear_cart(user_id).await {
            Ok(n) => debug!("🛒️ Cleared {n} cart lines for {user_id} after order {}", order.order_id),
            // The order exists at this point, so the checkout is reported as successful even if
            // the cart sweep fails. The stale lines will be swept by the next clear.
            Err(e) => error!("🛒️ Order {} was placed but the cart for {user_id} could not be cleared. {e}", order.order_id),
        }
        info!("🛒️ Order {} created for {user_id}. Total: {}", order.order_id, order.total_amount);
        Ok(OrderDetail { order, items })
    }

    /// Validate phase. Resolves every product and checks stock for all lines before anything is
    /// mutated.
    async fn validate_stock_availability(&self, cart: Vec<CartItem>) -> Result<Vec<(CartItem, Product)>, CheckoutError> {
        let mut lines = Vec::with_capacity(cart.len());
        for item in cart {
            let product = self
                .db
                .fetch_product(&item.product_id)
                .await?
                .ok_or_else(|| CheckoutError::ProductNotFound(item.product_id.clone()))?;
            if product.stock < item.quantity {
                return Err(CheckoutError::InsufficientStock {
                    product: product.name,
                    available: product.stock,
                    requested: item.quantity,
                });
            }
            lines.push((item, product));
        }
        Ok(lines)
    }

    /// Commit phase. Debits stock line by line (in cart order, persisted immediately), snapshots
    /// unit prices, then persists the order with its item snapshots.
    async fn commit_order(&self, user_id: &UserId, lines: Vec<(CartItem, Product)>) -> Result<Order, CheckoutError> {
        let mut items = Vec::with_capacity(lines.len());
        let mut total = Paise::default();
        let mut debited: Vec<(ProductId, i64)> = Vec::with_capacity(lines.len());
        for (line, product) in &lines {
            let unit_price = product.price;
            if let Err(e) = self.db.debit_stock(&product.id, line.quantity).await {
                warn!("🛒️ Stock debit failed for {} mid-checkout. Re-crediting {} lines. {e}", product.id, debited.len());
                self.rollback_debits(&debited).await;
                return Err(e.into());
            }
            debited.push((product.id.clone(), line.quantity));
            total = total + unit_price * line.quantity;
            items.push(NewOrderItem { product_id: product.id.clone(), quantity: line.quantity, unit_price });
        }
        let new_order =
            NewOrder { order_id: OrderId::random(), user_id: user_id.clone(), total_amount: total, items };
        match self.db.insert_order(new_order).await {
            Ok(order) => Ok(order),
            Err(e) => {
                warn!("🛒️ Order could not be persisted after stock was debited. Re-crediting. {e}");
                self.rollback_debits(&debited).await;
                Err(e.into())
            },
        }
    }

    /// Best-effort compensation: re-credit every (product, quantity) pair that was already
    /// debited. A failed re-credit is logged and skipped; there is nothing further to fall back
    /// to.
    async fn rollback_debits(&self, debited: &[(ProductId, i64)]) {
        for (product_id, quantity) in debited.iter().rev() {
            if let Err(e) = self.db.adjust_stock(product_id, *quantity).await {
                error!("🛒️ Could not re-credit {quantity} units to product {product_id} during rollback. {e}");
            }
        }
    }

    /// Fetches an order with its line items.
    pub async fn order_detail(&self, order_id: &OrderId) -> Result<OrderDetail, CheckoutError> {
        let order =
            self.db.fetch_order(order_id).await?.ok_or_else(|| CheckoutError::OrderNotFound(order_id.clone()))?;
        let items = self.db.fetch_order_items(order_id).await?;
        Ok(OrderDetail { order, items })
    }

    /// Orders for one user, or all orders when no user is given.
    pub async fn orders(&self, user_id: Option<&UserId>) -> Result<Vec<Order>, CheckoutError> {
        Ok(self.db.fetch_orders(user_id).await?)
    }

    /// Cancels an order that has not shipped. Allowed from `Created` and `Paid`; `Cancelled` is
    /// terminal.
    pub async fn cancel_order(&self, order_id: &OrderId) -> Result<Order, CheckoutError> {
        let order =
            self.db.fetch_order(order_id).await?.ok_or_else(|| CheckoutError::OrderNotFound(order_id.clone()))?;
        match order.status {
            OrderStatus::Created | OrderStatus::Paid => {
                let cancelled = self.db.update_order_status(order_id, OrderStatus::Cancelled).await?;
                info!("🛒️ Order {order_id} cancelled");
                Ok(cancelled)
            },
            OrderStatus::Cancelled => {
                Err(CheckoutError::InvalidOrderState { order_id: order.order_id, status: order.status })
            },
        }
    }
}
