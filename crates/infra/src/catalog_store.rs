//! Catalog storage abstraction and its in-memory implementation.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;

use storefront_core::{Entity, ProductId};
use storefront_products::{seed_catalog, Product, ProductDraft};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("product with id '{0}' already exists")]
    Duplicate(ProductId),

    #[error("catalog store unavailable: {0}")]
    Unavailable(String),
}

/// Ordered product collection: the single source of truth for reads and writes.
///
/// `update`/`delete` return `Ok(None)` when no record has the given id.
pub trait CatalogStore: Send + Sync {
    /// Snapshot of every record, in insertion order.
    fn list(&self) -> Result<Vec<Product>, StoreError>;
    fn get(&self, id: &ProductId) -> Result<Option<Product>, StoreError>;
    /// Append a record. Fails if its id is already taken.
    fn create(&self, product: Product) -> Result<Product, StoreError>;
    fn update(&self, id: &ProductId, draft: ProductDraft) -> Result<Option<Product>, StoreError>;
    fn delete(&self, id: &ProductId) -> Result<Option<Product>, StoreError>;
}

impl<S> CatalogStore for Arc<S>
where
    S: CatalogStore + ?Sized,
{
    fn list(&self) -> Result<Vec<Product>, StoreError> {
        (**self).list()
    }

    fn get(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        (**self).get(id)
    }

    fn create(&self, product: Product) -> Result<Product, StoreError> {
        (**self).create(product)
    }

    fn update(&self, id: &ProductId, draft: ProductDraft) -> Result<Option<Product>, StoreError> {
        (**self).update(id, draft)
    }

    fn delete(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        (**self).delete(id)
    }
}

/// Process-lifetime store backed by a `Vec` (lookups are O(n) linear scans).
///
/// Each mutation holds the write lock across its whole check-then-modify sequence,
/// so concurrent requests cannot interleave between the id check and the write.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    inner: RwLock<Vec<Product>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the seed catalog.
    pub fn seeded() -> Self {
        Self::with_products(seed_catalog())
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            inner: RwLock::new(products),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Product>>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable("catalog lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Product>>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable("catalog lock poisoned".to_string()))
    }
}

fn position(products: &[Product], id: &ProductId) -> Option<usize> {
    products.iter().position(|p| p.has_id(id))
}

impl CatalogStore for InMemoryCatalogStore {
    fn list(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.read()?.clone())
    }

    fn get(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        let products = self.read()?;
        Ok(position(&products, id).map(|i| products[i].clone()))
    }

    fn create(&self, product: Product) -> Result<Product, StoreError> {
        let mut products = self.write()?;
        if position(&products, product.id()).is_some() {
            return Err(StoreError::Duplicate(product.id().clone()));
        }

        tracing::debug!(product_id = %product.id(), "catalog: product created");
        products.push(product.clone());
        Ok(product)
    }

    fn update(&self, id: &ProductId, draft: ProductDraft) -> Result<Option<Product>, StoreError> {
        let mut products = self.write()?;
        let Some(i) = position(&products, id) else {
            return Ok(None);
        };

        products[i].apply(draft);
        tracing::debug!(product_id = %id, "catalog: product updated");
        Ok(Some(products[i].clone()))
    }

    fn delete(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        let mut products = self.write()?;
        let removed = position(&products, id).map(|i| products.remove(i));
        if removed.is_some() {
            tracing::debug!(product_id = %id, "catalog: product deleted");
        }
        Ok(removed)
    }
}
