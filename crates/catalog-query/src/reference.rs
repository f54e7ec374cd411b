//! Reference data for the filter controls.

use catalog_core::catalog::{Category, Flavor, Weight};
use catalog_core::search::FilterCriteria;
use catalog_core::{FlavorId, Price, WeightId};
use catalog_store::ProductStore;
use serde::Serialize;
use tracing::{debug, warn};

/// Upper price bound used when the store does not report one.
pub const DEFAULT_MAX_PRICE: Price = Price::from_units(1000);

/// The store's max price is rounded up to a multiple of this.
pub const MAX_PRICE_STEP: Price = Price::from_units(100);

/// Categories, flavors, weights and the price slider bound.
///
/// Loaded once per session. Failures degrade to empty lists and the
/// default bound.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceData {
    pub categories: Vec<Category>,
    pub flavors: Vec<Flavor>,
    pub weights: Vec<Weight>,
    pub max_price: Price,
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            flavors: Vec::new(),
            weights: Vec::new(),
            max_price: DEFAULT_MAX_PRICE,
        }
    }
}

impl ReferenceData {
    /// Fetch everything concurrently.
    pub async fn load<S: ProductStore + ?Sized>(store: &S) -> Self {
        let (categories, flavors, weights, max_price) = futures::join!(
            store.list_categories(),
            store.list_flavors(),
            store.list_weights(),
            store.max_price(),
        );

        let categories = categories.unwrap_or_else(|e| {
            warn!(error = %e, "failed to load categories");
            Vec::new()
        });
        let flavors = flavors.unwrap_or_else(|e| {
            warn!(error = %e, "failed to load flavors");
            Vec::new()
        });
        let weights = weights.unwrap_or_else(|e| {
            warn!(error = %e, "failed to load weights");
            Vec::new()
        });
        let max_price = match max_price {
            Ok(Some(price)) if !price.is_zero() => price.ceil_to(MAX_PRICE_STEP),
            Ok(_) => DEFAULT_MAX_PRICE,
            Err(e) => {
                warn!(error = %e, "failed to load max price");
                DEFAULT_MAX_PRICE
            }
        };

        debug!(
            categories = categories.len(),
            flavors = flavors.len(),
            weights = weights.len(),
            max_price = %max_price,
            "reference data loaded"
        );

        Self {
            categories,
            flavors,
            weights,
            max_price,
        }
    }

    pub fn flavor(&self, id: &FlavorId) -> Option<&Flavor> {
        self.flavors.iter().find(|f| &f.id == id)
    }

    pub fn weight(&self, id: &WeightId) -> Option<&Weight> {
        self.weights.iter().find(|w| &w.id == id)
    }

    pub fn category(&self, slug: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.slug == slug)
    }

    /// Weights ordered by physical magnitude.
    pub fn weights_by_magnitude(&self) -> Vec<&Weight> {
        let mut weights: Vec<&Weight> = self.weights.iter().collect();
        weights.sort_by(|a, b| a.cmp_magnitude(b));
        weights
    }

    /// Labels for the active filter chips. Unknown ids show as-is.
    pub fn active_filter_labels(&self, criteria: &FilterCriteria) -> Vec<String> {
        let mut labels = Vec::new();

        if let Some(search) = &criteria.search {
            labels.push(format!("Search: {}", search));
        }
        if let Some(slug) = &criteria.category {
            let name = self.category(slug).map_or(slug.as_str(), |c| c.name.as_str());
            labels.push(format!("Category: {}", name));
        }
        if let Some(id) = &criteria.flavor {
            let name = self.flavor(id).map_or(id.as_str(), |f| f.name.as_str());
            labels.push(format!("Flavor: {}", name));
        }
        if let Some(id) = &criteria.weight {
            let name = self.weight(id).map_or_else(|| id.to_string(), |w| w.label());
            labels.push(format!("Weight: {}", name));
        }
        match (criteria.min_price, criteria.max_price) {
            (Some(min), Some(max)) => labels.push(format!("Price: {} - {}", min, max)),
            (Some(min), None) => labels.push(format!("Price: from {}", min)),
            (None, Some(max)) => labels.push(format!("Price: up to {}", max)),
            (None, None) => {}
        }

        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::product;
    use catalog_store::{Endpoint, InMemoryStore};

    #[tokio::test]
    async fn test_max_price_rounds_up() {
        let store = InMemoryStore::new()
            .with_product(product("a", 499, vec![]))
            .with_product(product("b", 4_530, vec![]))
            .with_flavor(Flavor::new("f1", "Chocolate"));
        let data = ReferenceData::load(&store).await;
        assert_eq!(data.max_price, Price::from_units(4_600));
        assert_eq!(data.flavors.len(), 1);
    }

    #[tokio::test]
    async fn test_huge_max_price_does_not_overflow() {
        let mut premium = product("premium", 500, vec![]);
        premium.base_price = Price::from_decimal(1e30);
        let store = InMemoryStore::new().with_product(premium);
        let data = ReferenceData::load(&store).await;
        assert_eq!(data.max_price, Price::from_minor(i64::MAX));
    }

    #[tokio::test]
    async fn test_failures_degrade_to_defaults() {
        let store = InMemoryStore::new()
            .with_product(product("a", 4_530, vec![]))
            .with_weight(Weight::new("w1", 1.0, "kg"))
            .with_unavailable(Endpoint::MaxPrice)
            .with_unavailable(Endpoint::Flavors);
        let data = ReferenceData::load(&store).await;
        assert_eq!(data.max_price, DEFAULT_MAX_PRICE);
        assert!(data.flavors.is_empty());
        assert_eq!(data.weights.len(), 1);

        let empty = ReferenceData::load(&InMemoryStore::new()).await;
        assert_eq!(empty, ReferenceData::default());
    }

    #[test]
    fn test_active_filter_labels() {
        let data = ReferenceData {
            flavors: vec![Flavor::new("f1", "Chocolate")],
            weights: vec![Weight::new("w1", 2.0, "kg")],
            ..ReferenceData::default()
        };
        let criteria = FilterCriteria::new()
            .with_flavor("f1")
            .with_weight("w1")
            .with_category("unknown")
            .with_price_range(Some(Price::from_units(500)), None);

        assert_eq!(
            data.active_filter_labels(&criteria),
            vec![
                "Category: unknown".to_string(),
                "Flavor: Chocolate".to_string(),
                "Weight: 2 kg".to_string(),
                "Price: from ₹500.00".to_string(),
            ]
        );
    }
}
