use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{CartItem, NewCartItem, UserId},
    traits::{CommerceDatabase, CommerceDbError},
};

/// Thin API over the cart store.
pub struct CartApi<B> {
    db: B,
}

impl<B> Debug for CartApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CartApi")
    }
}

impl<B> CartApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> CartApi<B>
where B: CommerceDatabase
{
    /// Adds a line to the user's cart. Re-adding a product the cart already holds increments the
    /// existing line's quantity rather than duplicating it.
    pub async fn add_item(&self, item: NewCartItem) -> Result<CartItem, CommerceDbError> {
        let line = self.db.upsert_cart_item(item).await?;
        debug!("🧺️ Cart line for {} now holds {}x {}", line.user_id, line.quantity, line.product_id);
        Ok(line)
    }

    pub async fn items(&self, user_id: &UserId) -> Result<Vec<CartItem>, CommerceDbError> {
        self.db.fetch_cart_items(user_id).await
    }

    pub async fn remove_item(&self, id: i64) -> Result<(), CommerceDbError> {
        self.db.remove_cart_item(id).await
    }

    pub async fn clear(&self, user_id: &UserId) -> Result<u64, CommerceDbError> {
        let removed = self.db.clear_cart(user_id).await?;
        debug!("🧺️ Cleared {removed} cart lines for {user_id}");
        Ok(removed)
    }
}
