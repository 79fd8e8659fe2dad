use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewOrder, Order, OrderId, OrderItem, OrderStatus, UserId},
    traits::CommerceDbError,
};

/// Inserts an order and its line-item snapshots. This is not atomic on its own; the caller wraps
/// it in a transaction and passes `&mut *tx` as the connection argument.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, CommerceDbError> {
    let saved: Order = sqlx::query_as(
        r#"
            INSERT INTO orders (order_id, user_id, total_amount) VALUES ($1, $2, $3)
            RETURNING *;
        "#,
    )
    .bind(order.order_id)
    .bind(order.user_id)
    .bind(order.total_amount)
    .fetch_one(&mut *conn)
    .await?;
    for item in order.items {
        sqlx::query(
            r#"
                INSERT INTO order_items (order_id, product_id, quantity, unit_price)
                VALUES ($1, $2, $3, $4);
            "#,
        )
        .bind(saved.id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.unit_price)
        .execute(&mut *conn)
        .await?;
    }
    debug!("🗃️ Order [{}] inserted with id {}", saved.order_id, saved.id);
    Ok(saved)
}

/// Returns the entry in the orders table for the corresponding `order_id`
pub async fn fetch_order_by_order_id(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order =
        sqlx::query_as("SELECT * FROM orders WHERE order_id = $1").bind(order_id.as_str()).fetch_optional(conn).await?;
    Ok(order)
}

/// The immutable line-item snapshots for an order, in purchase order.
pub async fn fetch_order_items(order_id: &OrderId, conn: &mut SqliteConnection) -> Result<Vec<OrderItem>, sqlx::Error> {
    let items = sqlx::query_as(
        r#"
            SELECT oi.* FROM order_items oi
            JOIN orders o ON oi.order_id = o.id
            WHERE o.order_id = $1
            ORDER BY oi.id ASC
        "#,
    )
    .bind(order_id.as_str())
    .fetch_all(conn)
    .await?;
    Ok(items)
}

/// Orders for one user, or all orders, oldest first.
pub async fn fetch_orders(user_id: Option<&UserId>, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let orders = match user_id {
        Some(user_id) => {
            sqlx::query_as("SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at ASC")
                .bind(user_id.as_str())
                .fetch_all(conn)
                .await?
        },
        None => sqlx::query_as("SELECT * FROM orders ORDER BY created_at ASC").fetch_all(conn).await?,
    };
    Ok(orders)
}

pub async fn update_order_status(
    order_id: &OrderId,
    status: OrderStatus,
    conn: &mut SqliteConnection,
) -> Result<Order, CommerceDbError> {
    let status = status.to_string();
    let result: Option<Order> = sqlx::query_as(
        "UPDATE orders SET status = $1, updated_at = CURRENT_TIMESTAMP WHERE order_id = $2 RETURNING *",
    )
    .bind(status)
    .bind(order_id.as_str())
    .fetch_optional(conn)
    .await?;
    result.ok_or_else(|| CommerceDbError::OrderNotFound(order_id.clone()))
}

pub async fn attach_payment(
    order_id: &OrderId,
    payment_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Order, CommerceDbError> {
    let result: Option<Order> = sqlx::query_as(
        "UPDATE orders SET payment_id = $1, updated_at = CURRENT_TIMESTAMP WHERE order_id = $2 RETURNING *",
    )
    .bind(payment_id)
    .bind(order_id.as_str())
    .fetch_optional(conn)
    .await?;
    result.ok_or_else(|| CommerceDbError::OrderNotFound(order_id.clone()))
}
