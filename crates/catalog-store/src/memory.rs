//! In-memory product store with the public API's server-side semantics.
//!
//! Used by tests and by the CLI's fixture mode.

use async_trait::async_trait;
use catalog_core::catalog::{descendant_slugs, Category, Flavor, Product, Weight};
use catalog_core::search::{FilterCriteria, Pagination, ProductPage, SortField, SortOrder};
use catalog_core::Price;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::time::Duration;
use tracing::debug;

use crate::endpoint::Endpoint;
use crate::error::StoreError;
use crate::store::ProductStore;

/// Serialized store contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub flavors: Vec<Flavor>,
    #[serde(default)]
    pub weights: Vec<Weight>,
    #[serde(default)]
    pub products: Vec<Product>,
}

/// Product store held in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    fixture: Fixture,
    unavailable: HashSet<Endpoint>,
    failing_details: HashSet<String>,
    latency: Option<Duration>,
    list_calls: AtomicUsize,
    detail_calls: AtomicUsize,
    details_in_flight: AtomicUsize,
    peak_details_in_flight: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixture(fixture: Fixture) -> Self {
        Self {
            fixture,
            ..Self::default()
        }
    }

    /// Parse a fixture document.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let fixture: Fixture = serde_json::from_str(json)?;
        Ok(Self::from_fixture(fixture))
    }

    /// Load a fixture file.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Request(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    pub fn with_product(mut self, product: Product) -> Self {
        self.fixture.products.push(product);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.fixture.categories.push(category);
        self
    }

    pub fn with_flavor(mut self, flavor: Flavor) -> Self {
        self.fixture.flavors.push(flavor);
        self
    }

    pub fn with_weight(mut self, weight: Weight) -> Self {
        self.fixture.weights.push(weight);
        self
    }

    /// Make every call to `endpoint` fail with a connection error.
    pub fn with_unavailable(mut self, endpoint: Endpoint) -> Self {
        self.unavailable.insert(endpoint);
        self
    }

    /// Make the detail fetch for `slug` fail.
    pub fn with_failing_detail(mut self, slug: impl Into<String>) -> Self {
        self.failing_details.insert(slug.into());
        self
    }

    /// Delay every list and detail call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn fixture(&self) -> &Fixture {
        &self.fixture
    }

    /// Number of list queries served so far.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(AtomicOrdering::SeqCst)
    }

    /// Number of detail fetches served so far.
    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(AtomicOrdering::SeqCst)
    }

    /// Highest number of detail fetches that were in flight at once.
    pub fn peak_details_in_flight(&self) -> usize {
        self.peak_details_in_flight.load(AtomicOrdering::SeqCst)
    }

    fn check_available(&self, endpoint: Endpoint) -> Result<(), StoreError> {
        if self.unavailable.contains(&endpoint) {
            return Err(StoreError::Connection(format!("{} unavailable", endpoint)));
        }
        Ok(())
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn matches(&self, product: &Product, criteria: &FilterCriteria, categories: &HashSet<&str>) -> bool {
        if !product.is_active {
            return false;
        }

        if let Some(search) = &criteria.search {
            let needle = search.to_lowercase();
            let in_name = product.name.to_lowercase().contains(&needle);
            let in_description = product
                .description
                .as_ref()
                .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !in_name && !in_description {
                return false;
            }
        }

        if criteria.category.is_some()
            && !product
                .categories
                .iter()
                .any(|c| categories.contains(c.slug.as_str()))
        {
            return false;
        }

        if !criteria.variant_filter().matches_any_attribute(product) {
            return false;
        }

        criteria.price_range().contains(product.base_price)
    }

    /// The list query, as the public API evaluates it.
    pub fn query(&self, criteria: &FilterCriteria) -> ProductPage {
        let categories: HashSet<&str> = match &criteria.category {
            Some(slug) => {
                let mut expanded: HashSet<&str> =
                    descendant_slugs(&self.fixture.categories, slug).into_iter().collect();
                expanded.insert(slug.as_str());
                expanded
            }
            None => HashSet::new(),
        };

        let mut matched: Vec<&Product> = self
            .fixture
            .products
            .iter()
            .filter(|p| self.matches(p, criteria, &categories))
            .collect();

        matched.sort_by(|a, b| {
            let ordering = compare_by(criteria.sort, a, b);
            match criteria.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total = matched.len() as u64;
        let pagination = Pagination::new(criteria.page, criteria.limit, total);
        let offset = usize::try_from(criteria.offset()).unwrap_or(usize::MAX);
        let products = matched
            .into_iter()
            .skip(offset)
            .take(criteria.limit as usize)
            .cloned()
            .collect();

        ProductPage::new(products, pagination)
    }
}

/// Counts one in-flight call until dropped, including when the caller's
/// future is dropped mid-call.
struct InFlight<'a> {
    current: &'a AtomicUsize,
}

impl<'a> InFlight<'a> {
    fn enter(current: &'a AtomicUsize, peak: &AtomicUsize) -> Self {
        let now = current.fetch_add(1, AtomicOrdering::SeqCst) + 1;
        peak.fetch_max(now, AtomicOrdering::SeqCst);
        Self { current }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.current.fetch_sub(1, AtomicOrdering::SeqCst);
    }
}

fn compare_by(field: SortField, a: &Product, b: &Product) -> Ordering {
    match field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortField::Featured => a.is_featured().cmp(&b.is_featured()),
    }
}

#[async_trait]
impl ProductStore for InMemoryStore {
    async fn list_products(&self, criteria: &FilterCriteria) -> Result<ProductPage, StoreError> {
        self.list_calls.fetch_add(1, AtomicOrdering::SeqCst);
        self.simulate_latency().await;
        self.check_available(Endpoint::ListProducts)?;

        let page = self.query(criteria);
        debug!(
            returned = page.len(),
            total = page.pagination.total,
            "in-memory list query"
        );
        Ok(page)
    }

    async fn product_detail(&self, slug: &str) -> Result<Product, StoreError> {
        self.detail_calls.fetch_add(1, AtomicOrdering::SeqCst);
        {
            let _in_flight = InFlight::enter(&self.details_in_flight, &self.peak_details_in_flight);
            self.simulate_latency().await;
        }

        self.check_available(Endpoint::ProductDetail)?;
        if self.failing_details.contains(slug) {
            return Err(StoreError::Http {
                status: 500,
                url: Endpoint::ProductDetail.path(Some(slug)),
            });
        }

        self.fixture
            .products
            .iter()
            .find(|p| p.slug == slug && p.is_active)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(slug.to_string()))
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        self.check_available(Endpoint::Categories)?;
        Ok(self.fixture.categories.clone())
    }

    async fn list_flavors(&self) -> Result<Vec<Flavor>, StoreError> {
        self.check_available(Endpoint::Flavors)?;
        Ok(self.fixture.flavors.clone())
    }

    async fn list_weights(&self) -> Result<Vec<Weight>, StoreError> {
        self.check_available(Endpoint::Weights)?;
        Ok(self.fixture.weights.clone())
    }

    async fn max_price(&self) -> Result<Option<Price>, StoreError> {
        self.check_available(Endpoint::MaxPrice)?;
        Ok(self
            .fixture
            .products
            .iter()
            .filter(|p| p.is_active)
            .map(|p| p.base_price)
            .max())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::catalog::{CategoryRef, ProductTag, Variant};

    fn variant(id: &str, flavor: &str, weight: &str) -> Variant {
        Variant::new(id, Price::from_units(999))
            .with_flavor(Flavor::new(flavor, flavor))
            .with_weight(Weight::new(weight, 1.0, "kg"))
    }

    fn product(slug: &str, price: i64, variants: Vec<Variant>) -> Product {
        let mut product = Product::new(slug, slug, slug, Price::from_units(price));
        for v in variants {
            product.add_variant(v);
        }
        product
    }

    fn store() -> InMemoryStore {
        let protein = Category::new_root("c1", "Protein", "protein");
        let whey = Category::new_child(&protein, "c2", "Whey", "whey");

        let mut a = product("a", 400, vec![variant("a1", "F1", "W1kg")]);
        a.add_category(CategoryRef {
            id: whey.id.clone(),
            name: whey.name.clone(),
            slug: whey.slug.clone(),
        });
        a.description = Some("Chocolate whey blend".to_string());

        let b = product("b", 900, vec![variant("b1", "F2", "W1kg")]);
        let mut c = product("c", 1500, vec![variant("c1", "F1", "W2kg")]);
        c.add_tag(ProductTag::Featured);
        let mut hidden = product("hidden", 100, vec![variant("h1", "F1", "W1kg")]);
        hidden.is_active = false;

        InMemoryStore::new()
            .with_category(protein)
            .with_category(whey)
            .with_product(a)
            .with_product(b)
            .with_product(c)
            .with_product(hidden)
    }

    fn slugs(page: &ProductPage) -> Vec<&str> {
        page.products.iter().map(|p| p.slug.as_str()).collect()
    }

    #[test]
    fn test_inactive_products_are_hidden() {
        let page = store().query(&FilterCriteria::new());
        assert_eq!(page.pagination.total, 3);
        assert!(!slugs(&page).contains(&"hidden"));
    }

    #[test]
    fn test_search_matches_description() {
        let page = store().query(&FilterCriteria::new().with_search("CHOCOLATE"));
        assert_eq!(slugs(&page), vec!["a"]);
    }

    #[test]
    fn test_category_includes_descendants() {
        let page = store().query(&FilterCriteria::new().with_category("protein"));
        assert_eq!(slugs(&page), vec!["a"]);
    }

    #[test]
    fn test_flavor_and_weight_are_broad() {
        let criteria = FilterCriteria::new().with_flavor("F1").with_weight("W1kg");
        let mut found = slugs(&store().query(&criteria))
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>();
        found.sort();
        assert_eq!(found, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_price_range_and_pagination() {
        let criteria = FilterCriteria::new()
            .with_price_range(Some(Price::from_units(500)), None)
            .with_sort(SortField::Name, SortOrder::Asc)
            .with_pagination(2, 1);
        let page = store().query(&criteria);
        assert_eq!(slugs(&page), vec!["c"]);
        assert_eq!(page.pagination.total, 2);
        assert_eq!(page.pagination.pages, 2);
    }

    #[test]
    fn test_featured_sort_desc_puts_featured_first() {
        let criteria = FilterCriteria::new().with_sort(SortField::Featured, SortOrder::Desc);
        assert_eq!(slugs(&store().query(&criteria)), vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_detail_and_failures() {
        let store = store()
            .with_failing_detail("b")
            .with_unavailable(Endpoint::Flavors);

        let a = store.product_detail("a").await.unwrap();
        assert_eq!(a.variants.len(), 1);
        assert!(matches!(
            store.product_detail("b").await,
            Err(StoreError::Http { status: 500, .. })
        ));
        assert!(matches!(
            store.product_detail("hidden").await,
            Err(StoreError::NotFound(_))
        ));
        assert!(store.list_flavors().await.is_err());
        assert_eq!(store.detail_calls(), 3);
        assert_eq!(store.max_price().await.unwrap(), Some(Price::from_units(1500)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_detail_fetch_leaves_no_call_in_flight() {
        let store = store().with_latency(Duration::from_millis(100));

        let abandoned = tokio::time::timeout(Duration::from_millis(10), store.product_detail("a")).await;
        assert!(abandoned.is_err());
        assert_eq!(store.details_in_flight.load(AtomicOrdering::SeqCst), 0);

        store.product_detail("a").await.unwrap();
        assert_eq!(store.peak_details_in_flight(), 1);
    }

    #[test]
    fn test_from_json_fixture() {
        let json = r#"{
            "flavors": [{"id": "f1", "name": "Chocolate"}],
            "products": [{"id": "p1", "slug": "whey", "name": "Whey", "basePrice": 999}]
        }"#;
        let store = InMemoryStore::from_json(json).unwrap();
        assert_eq!(store.fixture().flavors.len(), 1);
        assert_eq!(store.query(&FilterCriteria::new()).len(), 1);
        assert!(InMemoryStore::from_json("{").is_err());
    }
}
