use sqlx::SqliteConnection;

use crate::{
    db_types::{NewPayment, Payment, PaymentStatus},
    traits::CommerceDbError,
};

pub async fn insert_payment(payment: NewPayment, conn: &mut SqliteConnection) -> Result<Payment, CommerceDbError> {
    let reference = payment.gateway_reference.clone();
    let payment = sqlx::query_as(
        r#"
            INSERT INTO payments (order_id, amount, gateway_reference) VALUES ($1, $2, $3)
            RETURNING *;
        "#,
    )
    .bind(payment.order_id)
    .bind(payment.amount)
    .bind(payment.gateway_reference)
    .fetch_one(conn)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(err) if err.is_unique_violation() => CommerceDbError::PaymentAlreadyExists(reference),
        _ => CommerceDbError::from(e),
    })?;
    Ok(payment)
}

/// Looks a payment up by the gateway's intent reference. Webhook events carry this value; it is
/// the only correlation key between gateway state and local state.
pub async fn fetch_payment_by_gateway_reference(
    reference: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Payment>, sqlx::Error> {
    let payment = sqlx::query_as("SELECT * FROM payments WHERE gateway_reference = $1")
        .bind(reference)
        .fetch_optional(conn)
        .await?;
    Ok(payment)
}

pub async fn update_payment_status(
    id: i64,
    status: PaymentStatus,
    conn: &mut SqliteConnection,
) -> Result<Payment, CommerceDbError> {
    let status = status.to_string();
    let result: Option<Payment> = sqlx::query_as(
        "UPDATE payments SET status = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *",
    )
    .bind(status)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    result.ok_or(CommerceDbError::PaymentIdNotFound(id))
}
