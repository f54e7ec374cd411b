//! The catalog query resolver.
//!
//! Resolves filter criteria to one page of products in stages:
//!
//! 1. Broad list query against the store.
//! 2. If both flavor and weight are selected, bounded per-candidate detail
//!    fetches and the local conjunctive check.
//! 3. `total` recomputed from the kept candidates.
//!
//! Store failures become an error state on the resolved page; nothing is
//! retried here.

use catalog_core::catalog::Product;
use catalog_core::search::{EmptyState, FilterCriteria, Pagination, ProductPage};
use catalog_store::ProductStore;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::conjunctive;
use crate::error::{DetailFailure, QueryError};
use crate::generation::{Generation, GenerationCounter, QueryToken};

/// Default number of detail fetches in flight at once.
pub const DEFAULT_DETAIL_CONCURRENCY: usize = 8;

/// Resolver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Detail fetches in flight at once during the conjunctive re-check.
    pub detail_concurrency: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            detail_concurrency: DEFAULT_DETAIL_CONCURRENCY,
        }
    }
}

/// One resolved page, tagged with the generation that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPage {
    pub generation: Generation,
    pub criteria: FilterCriteria,
    pub page: ProductPage,
    /// Set when the broad query failed; the page is then empty.
    pub error: Option<QueryError>,
    /// Broad candidates rejected by the conjunctive check.
    pub excluded: Vec<String>,
    /// Broad candidates dropped because their detail fetch failed.
    pub detail_failures: Vec<DetailFailure>,
}

impl ResolvedPage {
    fn failed(generation: Generation, criteria: FilterCriteria, error: QueryError) -> Self {
        Self {
            generation,
            page: ProductPage::empty(criteria.page, criteria.limit),
            criteria,
            error: Some(error),
            excluded: Vec::new(),
            detail_failures: Vec::new(),
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.page.products
    }

    pub fn pagination(&self) -> &Pagination {
        &self.page.pagination
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// User-visible error notification, if any.
    pub fn error_message(&self) -> Option<&'static str> {
        self.error.as_ref().map(QueryError::user_message)
    }

    /// Guidance for an empty, error-free result.
    pub fn empty_state(&self) -> Option<EmptyState> {
        if self.error.is_none() && self.page.is_empty() {
            Some(EmptyState::from_criteria(&self.criteria))
        } else {
            None
        }
    }
}

/// Outcome of one resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Completed(ResolvedPage),
    /// A newer query was initiated before this one finished.
    Superseded(Generation),
}

impl QueryOutcome {
    pub fn generation(&self) -> Generation {
        match self {
            QueryOutcome::Completed(page) => page.generation,
            QueryOutcome::Superseded(generation) => *generation,
        }
    }

    pub fn into_page(self) -> Option<ResolvedPage> {
        match self {
            QueryOutcome::Completed(page) => Some(page),
            QueryOutcome::Superseded(_) => None,
        }
    }
}

/// Resolves filter criteria against a product store.
///
/// Clones share the store handle and the generation counter, so a query
/// started from any clone supersedes queries started from the others.
#[derive(Debug, Clone)]
pub struct CatalogResolver<S> {
    store: S,
    config: ResolverConfig,
    generations: GenerationCounter,
}

impl<S: ProductStore> CatalogResolver<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            config: ResolverConfig::default(),
            generations: GenerationCounter::new(),
        }
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn generations(&self) -> &GenerationCounter {
        &self.generations
    }

    /// Start a new query generation, superseding all earlier ones.
    pub fn begin(&self) -> QueryToken {
        self.generations.begin()
    }

    /// Start a new generation and resolve `criteria` under it.
    pub async fn resolve(&self, criteria: &FilterCriteria) -> QueryOutcome {
        let token = self.begin();
        self.resolve_with(token, criteria).await
    }

    /// Resolve `criteria` under an already started generation.
    pub async fn resolve_with(&self, token: QueryToken, criteria: &FilterCriteria) -> QueryOutcome {
        let generation = token.generation();
        debug!(%generation, "resolving catalog query");

        let broad = match self.store.list_products(criteria).await {
            Ok(page) => page,
            Err(e) => {
                if token.is_superseded() {
                    return QueryOutcome::Superseded(generation);
                }
                warn!(%generation, error = %e, "product list query failed");
                return QueryOutcome::Completed(ResolvedPage::failed(
                    generation,
                    criteria.clone(),
                    e.into(),
                ));
            }
        };

        if token.is_superseded() {
            debug!(%generation, "query superseded after list fetch");
            return QueryOutcome::Superseded(generation);
        }

        let filter = criteria.variant_filter();
        if !filter.is_conjunctive() {
            info!(
                %generation,
                returned = broad.len(),
                total = broad.pagination.total,
                "catalog query resolved"
            );
            return QueryOutcome::Completed(ResolvedPage {
                generation,
                criteria: criteria.clone(),
                page: broad,
                error: None,
                excluded: Vec::new(),
                detail_failures: Vec::new(),
            });
        }

        let candidates = broad.products.len();
        let pagination = broad.pagination;
        let Some(recheck) = conjunctive::recheck(
            &self.store,
            &token,
            broad.products,
            &filter,
            criteria.limit as usize,
            self.config.detail_concurrency,
        )
        .await
        else {
            return QueryOutcome::Superseded(generation);
        };

        let pagination = pagination.with_filtered_total(recheck.kept.len() as u64);
        info!(
            %generation,
            candidates,
            kept = recheck.kept.len(),
            excluded = recheck.excluded.len(),
            failed = recheck.failures.len(),
            "conjunctive catalog query resolved"
        );

        QueryOutcome::Completed(ResolvedPage {
            generation,
            criteria: criteria.clone(),
            page: ProductPage::new(recheck.kept, pagination),
            error: None,
            excluded: recheck.excluded,
            detail_failures: recheck.failures,
        })
    }
}
