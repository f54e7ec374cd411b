//! The product store contract.

use async_trait::async_trait;
use catalog_core::catalog::{Category, Flavor, Product, Weight};
use catalog_core::search::{FilterCriteria, ProductPage};
use catalog_core::Price;
use std::sync::Arc;

use crate::error::StoreError;

/// A queryable collection of products owning variants.
///
/// Implementations own their transport concerns (timeouts, retries). The
/// list query narrows flavor and weight independently: a product matches
/// when any variant has the flavor, or any variant has the weight.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// One page of products matching the criteria.
    async fn list_products(&self, criteria: &FilterCriteria) -> Result<ProductPage, StoreError>;

    /// A product with its full variant detail.
    async fn product_detail(&self, slug: &str) -> Result<Product, StoreError>;

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    async fn list_flavors(&self) -> Result<Vec<Flavor>, StoreError>;

    async fn list_weights(&self) -> Result<Vec<Weight>, StoreError>;

    /// Highest base price in the catalog, if the store reports one.
    async fn max_price(&self) -> Result<Option<Price>, StoreError>;
}

#[async_trait]
impl<S: ProductStore + ?Sized> ProductStore for Arc<S> {
    async fn list_products(&self, criteria: &FilterCriteria) -> Result<ProductPage, StoreError> {
        (**self).list_products(criteria).await
    }

    async fn product_detail(&self, slug: &str) -> Result<Product, StoreError> {
        (**self).product_detail(slug).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        (**self).list_categories().await
    }

    async fn list_flavors(&self) -> Result<Vec<Flavor>, StoreError> {
        (**self).list_flavors().await
    }

    async fn list_weights(&self) -> Result<Vec<Weight>, StoreError> {
        (**self).list_weights().await
    }

    async fn max_price(&self) -> Result<Option<Price>, StoreError> {
        (**self).max_price().await
    }
}
