use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewProduct, Product, ProductId, UpdateProductRequest},
    traits::{CommerceDatabase, CommerceDbError},
};

/// Thin API over the product store. All the interesting stock arithmetic happens inside the store
/// primitives; this layer only adds logging and a stable surface for the HTTP handlers.
pub struct CatalogApi<B> {
    db: B,
}

impl<B> Debug for CatalogApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogApi")
    }
}

impl<B> CatalogApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> CatalogApi<B>
where B: CommerceDatabase
{
    pub async fn add_product(&self, product: NewProduct) -> Result<Product, CommerceDbError> {
        let product = self.db.insert_product(product).await?;
        info!("🏷️ Product {} added to the catalog ({})", product.id, product.name);
        Ok(product)
    }

    pub async fn product(&self, id: &ProductId) -> Result<Product, CommerceDbError> {
        self.db.fetch_product(id).await?.ok_or_else(|| CommerceDbError::ProductNotFound(id.clone()))
    }

    pub async fn products(&self, active_only: bool) -> Result<Vec<Product>, CommerceDbError> {
        self.db.fetch_products(active_only).await
    }

    pub async fn update_product(&self, id: &ProductId, update: UpdateProductRequest) -> Result<Product, CommerceDbError> {
        let product = self.db.update_product(id, update).await?;
        debug!("🏷️ Product {} updated", product.id);
        Ok(product)
    }

    /// Soft delete: the product disappears from active listings but stays on record so existing
    /// order items keep resolving.
    pub async fn deactivate_product(&self, id: &ProductId) -> Result<Product, CommerceDbError> {
        let product = self.db.deactivate_product(id).await?;
        info!("🏷️ Product {} deactivated", product.id);
        Ok(product)
    }
}
