//! Product catalog storage.
//!
//! [`ProductRepository`] is the seam between the catalog logic and the
//! document store. [`MemoryProductRepository`] keeps the collection in
//! process.

use std::collections::BTreeSet;

use async_trait::async_trait;

use super::{
    filter::{DistinctField, ProductFilter, SortOrder},
    models::Product,
};
use crate::db::{Collection, StoreError};

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Products matching `filter`, sorted, then `skip`/`limit` applied.
    async fn find(
        &self,
        filter: &ProductFilter,
        sort: SortOrder,
        skip: usize,
        limit: usize,
    ) -> Result<Vec<Product>, StoreError>;

    async fn count(&self, filter: &ProductFilter) -> Result<u64, StoreError>;

    /// Distinct values of `field` over the whole catalog, ascending.
    async fn distinct(&self, field: DistinctField) -> Result<Vec<String>, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Product>, StoreError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Product>, StoreError>;

    async fn insert(&self, product: Product) -> Result<Product, StoreError>;

    /// Replaces the stored product with the same id. `None` if it does not exist.
    async fn update(&self, product: Product) -> Result<Option<Product>, StoreError>;

    async fn delete(&self, id: &str) -> Result<Option<Product>, StoreError>;

    /// The whole catalog in insertion order.
    async fn all(&self) -> Result<Vec<Product>, StoreError>;

    async fn count_all(&self) -> Result<u64, StoreError> {
        self.count(&ProductFilter::new()).await
    }
}

pub struct MemoryProductRepository {
    products: Collection<Product>,
}

impl Default for MemoryProductRepository {
    fn default() -> Self {
        Self {
            products: Collection::with_unique_key(|p: &Product| p.slug.clone()),
        }
    }
}

impl MemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn find(
        &self,
        filter: &ProductFilter,
        sort: SortOrder,
        skip: usize,
        limit: usize,
    ) -> Result<Vec<Product>, StoreError> {
        let mut matched = self.products.find(|p| filter.matches(p));
        sort.apply(&mut matched);
        Ok(matched.into_iter().skip(skip).take(limit).collect())
    }

    async fn count(&self, filter: &ProductFilter) -> Result<u64, StoreError> {
        Ok(self.products.find(|p| filter.matches(p)).len() as u64)
    }

    async fn distinct(&self, field: DistinctField) -> Result<Vec<String>, StoreError> {
        let values: BTreeSet<String> = self
            .products
            .all()
            .iter()
            .map(|p| field.value(p).to_string())
            .collect();
        Ok(values.into_iter().collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Product>, StoreError> {
        Ok(self.products.get(id))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Product>, StoreError> {
        Ok(self.products.get_by_key(slug))
    }

    async fn insert(&self, product: Product) -> Result<Product, StoreError> {
        self.products.insert(product)
    }

    async fn update(&self, product: Product) -> Result<Option<Product>, StoreError> {
        self.products.replace(product)
    }

    async fn delete(&self, id: &str) -> Result<Option<Product>, StoreError> {
        Ok(self.products.remove(id))
    }

    async fn all(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.products.all())
    }
}
