use log::{debug, trace};
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db_types::{NewProduct, Product, ProductId, UpdateProductRequest},
    traits::CommerceDbError,
};

pub async fn insert_product(product: NewProduct, conn: &mut SqliteConnection) -> Result<Product, CommerceDbError> {
    let id = ProductId::random();
    let product = sqlx::query_as(
        r#"
            INSERT INTO products (id, name, description, price, discount_percentage, stock)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *;
        "#,
    )
    .bind(id)
    .bind(product.name)
    .bind(product.description)
    .bind(product.price)
    .bind(product.discount_percentage)
    .bind(product.stock)
    .fetch_one(conn)
    .await?;
    Ok(product)
}

pub async fn fetch_product_by_id(id: &ProductId, conn: &mut SqliteConnection) -> Result<Option<Product>, sqlx::Error> {
    let product =
        sqlx::query_as("SELECT * FROM products WHERE id = $1").bind(id.as_str()).fetch_optional(conn).await?;
    Ok(product)
}

/// Products, newest first. With `active_only`, soft-deleted entries are excluded.
pub async fn fetch_products(active_only: bool, conn: &mut SqliteConnection) -> Result<Vec<Product>, sqlx::Error> {
    let query = if active_only {
        "SELECT * FROM products WHERE active = TRUE ORDER BY created_at DESC"
    } else {
        "SELECT * FROM products ORDER BY created_at DESC"
    };
    let products = sqlx::query_as(query).fetch_all(conn).await?;
    Ok(products)
}

pub async fn update_product(
    id: &ProductId,
    update: UpdateProductRequest,
    conn: &mut SqliteConnection,
) -> Result<Product, CommerceDbError> {
    if update.is_empty() {
        debug!("🗃️ No fields to update for product {id}. Update request skipped.");
        return Err(CommerceDbError::ProductUpdateNoOp);
    }
    let mut builder = QueryBuilder::new("UPDATE products SET updated_at = CURRENT_TIMESTAMP, ");
    let mut set_clause = builder.separated(", ");
    if let Some(name) = update.name {
        set_clause.push("name = ");
        set_clause.push_bind_unseparated(name);
    }
    if let Some(description) = update.description {
        set_clause.push("description = ");
        set_clause.push_bind_unseparated(description);
    }
    if let Some(price) = update.price {
        set_clause.push("price = ");
        set_clause.push_bind_unseparated(price);
    }
    if let Some(discount) = update.discount_percentage {
        set_clause.push("discount_percentage = ");
        set_clause.push_bind_unseparated(discount);
    }
    if let Some(stock) = update.stock {
        set_clause.push("stock = ");
        set_clause.push_bind_unseparated(stock);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(id.as_str());
    builder.push(" RETURNING *");
    trace!("🗃️ Executing query: {}", builder.sql());
    let updated: Option<Product> = builder.build_query_as().fetch_optional(conn).await?;
    updated.ok_or_else(|| CommerceDbError::ProductNotFound(id.clone()))
}

pub async fn deactivate_product(id: &ProductId, conn: &mut SqliteConnection) -> Result<Product, CommerceDbError> {
    let product: Option<Product> =
        sqlx::query_as("UPDATE products SET active = FALSE, updated_at = CURRENT_TIMESTAMP WHERE id = $1 RETURNING *")
            .bind(id.as_str())
            .fetch_optional(conn)
            .await?;
    product.ok_or_else(|| CommerceDbError::ProductNotFound(id.clone()))
}

/// Adds `delta` units to the stock level, refusing any adjustment that would leave the level
/// negative. The guard rides in the statement itself, same as [`debit_stock`].
pub async fn adjust_stock(id: &ProductId, delta: i64, conn: &mut SqliteConnection) -> Result<Product, CommerceDbError> {
    let adjusted: Option<Product> = sqlx::query_as(
        r#"
            UPDATE products SET stock = stock + $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2 AND stock + $1 >= 0
            RETURNING *;
        "#,
    )
    .bind(delta)
    .bind(id.as_str())
    .fetch_optional(&mut *conn)
    .await?;
    match adjusted {
        Some(product) => Ok(product),
        None => match fetch_product_by_id(id, conn).await? {
            Some(product) => Err(CommerceDbError::InsufficientStock {
                product: product.name,
                available: product.stock,
                requested: -delta,
            }),
            None => Err(CommerceDbError::ProductNotFound(id.clone())),
        },
    }
}

/// The atomic conditional decrement behind every checkout commit: "remove `quantity` units only if
/// at least `quantity` units are on hand", as a single statement. Two concurrent checkouts racing
/// on the same product serialize here; the loser gets `InsufficientStock` and the winner's stock
/// can never be driven below zero.
pub async fn debit_stock(id: &ProductId, quantity: i64, conn: &mut SqliteConnection) -> Result<Product, CommerceDbError> {
    let debited: Option<Product> = sqlx::query_as(
        r#"
            UPDATE products SET stock = stock - $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2 AND stock >= $1
            RETURNING *;
        "#,
    )
    .bind(quantity)
    .bind(id.as_str())
    .fetch_optional(&mut *conn)
    .await?;
    match debited {
        Some(product) => {
            trace!("🗃️ Debited {quantity} units from product {id}; {} remain", product.stock);
            Ok(product)
        },
        None => match fetch_product_by_id(id, conn).await? {
            Some(product) => Err(CommerceDbError::InsufficientStock {
                product: product.name,
                available: product.stock,
                requested: quantity,
            }),
            None => Err(CommerceDbError::ProductNotFound(id.clone())),
        },
    }
}
