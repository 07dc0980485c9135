//! Application services: the catalog store plus the pure query functions over it.

use std::sync::Arc;

use thiserror::Error;

use storefront_core::{DomainError, ProductId};
use storefront_infra::{CatalogStore, InMemoryCatalogStore, StoreError};
use storefront_products::{
    list_products, search_by_name, CatalogStats, ListQuery, Paginated, Product, ProductDraft,
};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Shared handler state, injected via `Extension<Arc<AppServices>>`.
pub struct AppServices {
    store: Arc<dyn CatalogStore>,
}

impl AppServices {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// In-memory catalog starting from the seed records (dev/test and the default binary).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryCatalogStore::seeded()))
    }

    pub fn list_products(&self, query: &ListQuery) -> ServiceResult<Paginated<Product>> {
        let snapshot = self.store.list()?;
        Ok(list_products(&snapshot, query))
    }

    pub fn search_products(&self, term: Option<&str>) -> ServiceResult<Vec<Product>> {
        let snapshot = self.store.list()?;
        Ok(search_by_name(&snapshot, term)?)
    }

    pub fn stats(&self) -> ServiceResult<CatalogStats> {
        let snapshot = self.store.list()?;
        Ok(CatalogStats::compute(&snapshot))
    }

    pub fn get_product(&self, id: &ProductId) -> ServiceResult<Product> {
        self.store.get(id)?.ok_or_else(|| not_found(id))
    }

    /// Create a product under `id`, or a freshly generated id when none is given.
    pub fn create_product(&self, id: Option<ProductId>, draft: ProductDraft) -> ServiceResult<Product> {
        let id = id.unwrap_or_else(ProductId::generate);
        Ok(self.store.create(draft.into_product(id))?)
    }

    pub fn update_product(&self, id: &ProductId, draft: ProductDraft) -> ServiceResult<Product> {
        self.store.update(id, draft)?.ok_or_else(|| not_found(id))
    }

    pub fn delete_product(&self, id: &ProductId) -> ServiceResult<Product> {
        self.store.delete(id)?.ok_or_else(|| not_found(id))
    }
}

fn not_found(id: &ProductId) -> ServiceError {
    DomainError::not_found(format!("Product with id '{id}' not found")).into()
}
