//! Conjunctive flavor + weight re-check.
//!
//! The store narrows flavor and weight independently, so its candidates may
//! carry the flavor on one variant and the weight on another. Each candidate's
//! detail is fetched and kept only if a single variant has both.

use catalog_core::catalog::Product;
use catalog_core::search::VariantFilter;
use catalog_store::ProductStore;
use futures::stream::{self, StreamExt};
use std::pin::pin;
use tracing::{debug, warn};

use crate::error::DetailFailure;
use crate::generation::QueryToken;

/// Result of re-checking one page of candidates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recheck {
    /// Candidates with a variant matching both attributes, in store order.
    pub kept: Vec<Product>,
    /// Slugs whose variants never carry both attributes together.
    pub excluded: Vec<String>,
    /// Candidates dropped because their detail could not be fetched.
    pub failures: Vec<DetailFailure>,
}

enum Check {
    Keep(Product),
    Exclude(String),
    Failed(DetailFailure),
    Abandoned,
}

/// Re-check `candidates` against `filter`.
///
/// At most `limit` candidates are fetched, `concurrency` at a time. Returns
/// `None` once `token` is superseded; fetches not yet started are skipped and
/// in-flight ones are dropped.
pub async fn recheck<S: ProductStore + ?Sized>(
    store: &S,
    token: &QueryToken,
    candidates: Vec<Product>,
    filter: &VariantFilter,
    limit: usize,
    concurrency: usize,
) -> Option<Recheck> {
    let checks = stream::iter(candidates.into_iter().take(limit))
        .map(|candidate| async move {
            if token.is_superseded() {
                return Check::Abandoned;
            }
            match store.product_detail(&candidate.slug).await {
                Ok(detail) if filter.matches_product(&detail) => Check::Keep(candidate),
                Ok(_) => Check::Exclude(candidate.slug),
                Err(e) => Check::Failed(DetailFailure {
                    slug: candidate.slug,
                    error: e.to_string(),
                }),
            }
        })
        .buffered(concurrency.max(1));
    let mut checks = pin!(checks);

    let mut recheck = Recheck::default();
    while let Some(check) = checks.next().await {
        if token.is_superseded() {
            debug!(generation = %token.generation(), "query superseded, abandoning detail fetches");
            return None;
        }
        match check {
            Check::Keep(product) => recheck.kept.push(product),
            Check::Exclude(slug) => recheck.excluded.push(slug),
            Check::Failed(failure) => {
                warn!(
                    generation = %token.generation(),
                    slug = %failure.slug,
                    error = %failure.error,
                    "detail fetch failed, excluding candidate"
                );
                recheck.failures.push(failure);
            }
            Check::Abandoned => return None,
        }
    }

    Some(recheck)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::GenerationCounter;
    use crate::testing::{product, variant};
    use catalog_core::{FlavorId, WeightId};
    use catalog_store::InMemoryStore;
    use std::time::Duration;

    fn both() -> VariantFilter {
        VariantFilter::new(Some(FlavorId::new("F1")), Some(WeightId::new("W1kg")))
    }

    fn store() -> InMemoryStore {
        InMemoryStore::new()
            .with_product(product(
                "a",
                500,
                vec![variant("a1", "F1", "W2kg"), variant("a2", "F2", "W1kg")],
            ))
            .with_product(product("b", 500, vec![variant("b1", "F1", "W1kg")]))
            .with_product(product("c", 500, vec![variant("c1", "F1", "W1kg")]))
    }

    fn candidates(store: &InMemoryStore) -> Vec<Product> {
        store.fixture().products.clone()
    }

    #[tokio::test]
    async fn test_keeps_only_single_variant_matches() {
        let store = store();
        let token = GenerationCounter::new().begin();
        let result = recheck(&store, &token, candidates(&store), &both(), 20, 4)
            .await
            .unwrap();

        let kept: Vec<&str> = result.kept.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(kept, vec!["b", "c"]);
        assert_eq!(result.excluded, vec!["a".to_string()]);
        assert!(result.failures.is_empty());
    }

    #[tokio::test]
    async fn test_failed_detail_is_excluded() {
        let store = store().with_failing_detail("b");
        let token = GenerationCounter::new().begin();
        let result = recheck(&store, &token, candidates(&store), &both(), 20, 4)
            .await
            .unwrap();

        let kept: Vec<&str> = result.kept.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(kept, vec!["c"]);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].slug, "b");
    }

    #[tokio::test]
    async fn test_fan_out_is_bounded() {
        let store = store().with_latency(Duration::from_millis(10));
        let token = GenerationCounter::new().begin();
        let result = recheck(&store, &token, candidates(&store), &both(), 2, 1)
            .await
            .unwrap();

        assert_eq!(store.detail_calls(), 2);
        assert_eq!(store.peak_details_in_flight(), 1);
        assert_eq!(result.kept.len() + result.excluded.len(), 2);
    }

    #[tokio::test]
    async fn test_superseded_query_fetches_nothing() {
        let store = store();
        let counter = GenerationCounter::new();
        let token = counter.begin();
        let _newer = counter.begin();

        let result = recheck(&store, &token, candidates(&store), &both(), 20, 1).await;
        assert!(result.is_none());
        assert_eq!(store.detail_calls(), 0);
    }
}
