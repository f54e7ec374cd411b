//! Test fixtures shared by the resolver, session and debounce tests.

use async_trait::async_trait;
use catalog_core::catalog::{Category, Flavor, Product, Variant, Weight};
use catalog_core::search::{FilterCriteria, ProductPage};
use catalog_core::Price;
use catalog_store::{InMemoryStore, ProductStore, StoreError};
use std::collections::HashMap;
use std::time::Duration;

pub fn variant(id: &str, flavor: &str, weight: &str) -> Variant {
    Variant::new(id, Price::from_units(999))
        .with_flavor(Flavor::new(flavor, flavor))
        .with_weight(Weight::new(weight, 1.0, "kg"))
}

/// Active product without timestamps, so date sorts keep insertion order.
pub fn product(slug: &str, price: i64, variants: Vec<Variant>) -> Product {
    let mut product = Product::new(slug, slug, slug, Price::from_units(price));
    product.created_at = None;
    product.updated_at = None;
    for v in variants {
        product.add_variant(v);
    }
    product
}

/// In-memory store whose list query is delayed per search term.
#[derive(Debug)]
pub struct DelayedStore {
    inner: InMemoryStore,
    delays: HashMap<String, Duration>,
}

impl DelayedStore {
    pub fn new(inner: InMemoryStore) -> Self {
        Self {
            inner,
            delays: HashMap::new(),
        }
    }

    pub fn with_delay(mut self, search: &str, delay: Duration) -> Self {
        self.delays.insert(search.to_string(), delay);
        self
    }
}

#[async_trait]
impl ProductStore for DelayedStore {
    async fn list_products(&self, criteria: &FilterCriteria) -> Result<ProductPage, StoreError> {
        let delay = criteria
            .search
            .as_ref()
            .and_then(|search| self.delays.get(search))
            .copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.inner.list_products(criteria).await
    }

    async fn product_detail(&self, slug: &str) -> Result<Product, StoreError> {
        self.inner.product_detail(slug).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        self.inner.list_categories().await
    }

    async fn list_flavors(&self) -> Result<Vec<Flavor>, StoreError> {
        self.inner.list_flavors().await
    }

    async fn list_weights(&self) -> Result<Vec<Weight>, StoreError> {
        self.inner.list_weights().await
    }

    async fn max_price(&self) -> Result<Option<Price>, StoreError> {
        self.inner.max_price().await
    }
}
