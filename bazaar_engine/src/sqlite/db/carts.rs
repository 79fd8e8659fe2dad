use sqlx::SqliteConnection;

use crate::{
    db_types::{CartItem, NewCartItem, UserId},
    traits::CommerceDbError,
};

/// Inserts a cart line, or increments the quantity of the existing (user, product) line. The
/// uniqueness constraint on the pair makes the upsert a single statement.
pub async fn upsert_cart_item(item: NewCartItem, conn: &mut SqliteConnection) -> Result<CartItem, CommerceDbError> {
    let line = sqlx::query_as(
        r#"
            INSERT INTO cart_items (user_id, product_id, quantity) VALUES ($1, $2, $3)
            ON CONFLICT (user_id, product_id)
            DO UPDATE SET quantity = quantity + excluded.quantity, updated_at = CURRENT_TIMESTAMP
            RETURNING *;
        "#,
    )
    .bind(item.user_id)
    .bind(item.product_id)
    .bind(item.quantity)
    .fetch_one(conn)
    .await?;
    Ok(line)
}

/// The user's cart lines in insertion order. Checkout relies on this ordering.
pub async fn fetch_cart_items(user_id: &UserId, conn: &mut SqliteConnection) -> Result<Vec<CartItem>, sqlx::Error> {
    let items = sqlx::query_as("SELECT * FROM cart_items WHERE user_id = $1 ORDER BY id ASC")
        .bind(user_id.as_str())
        .fetch_all(conn)
        .await?;
    Ok(items)
}

pub async fn remove_cart_item(id: i64, conn: &mut SqliteConnection) -> Result<(), CommerceDbError> {
    let result = sqlx::query("DELETE FROM cart_items WHERE id = $1").bind(id).execute(conn).await?;
    if result.rows_affected() == 0 {
        return Err(CommerceDbError::CartItemNotFound(id));
    }
    Ok(())
}

pub async fn clear_cart(user_id: &UserId, conn: &mut SqliteConnection) -> Result<u64, CommerceDbError> {
    let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1").bind(user_id.as_str()).execute(conn).await?;
    Ok(result.rows_affected())
}
