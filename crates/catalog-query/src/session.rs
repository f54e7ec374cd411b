//! Browse session: the single owner of listing state.
//!
//! Holds the current criteria, the latest applied result and the reference
//! data. Every change goes through the session and yields new criteria. A
//! query is started with [`BrowseSession::begin`] and its outcome handed back
//! through [`BrowseSession::apply`], which drops anything but the latest
//! generation.

use catalog_core::search::{
    codec, EmptyState, FilterChange, FilterCriteria, PageSlot, Pagination, SortField, SortOrder,
    SortPreset,
};
use catalog_core::{FlavorId, Price, WeightId};
use catalog_store::ProductStore;
use tracing::debug;

use crate::generation::QueryToken;
use crate::reference::ReferenceData;
use crate::resolver::{CatalogResolver, QueryOutcome, ResolvedPage};

/// Listing state for one shopper.
#[derive(Debug)]
pub struct BrowseSession<S> {
    resolver: CatalogResolver<S>,
    criteria: FilterCriteria,
    result: Option<ResolvedPage>,
    loading: bool,
    reference: ReferenceData,
}

impl<S: ProductStore> BrowseSession<S> {
    pub fn new(resolver: CatalogResolver<S>) -> Self {
        Self {
            resolver,
            criteria: FilterCriteria::default(),
            result: None,
            loading: false,
            reference: ReferenceData::default(),
        }
    }

    /// Start from criteria decoded from a shared URL.
    pub fn from_url(resolver: CatalogResolver<S>, query: &str) -> Self {
        Self {
            criteria: codec::decode(query),
            ..Self::new(resolver)
        }
    }

    pub fn resolver(&self) -> &CatalogResolver<S> {
        &self.resolver
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Latest applied result.
    pub fn result(&self) -> Option<&ResolvedPage> {
        self.result.as_ref()
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// True between starting a query and applying its outcome.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error_message(&self) -> Option<&'static str> {
        self.result.as_ref().and_then(ResolvedPage::error_message)
    }

    /// Apply a change. Returns whether the criteria changed.
    pub fn change(&mut self, change: FilterChange) -> bool {
        let next = self.criteria.apply(change);
        self.replace_criteria(next)
    }

    pub fn set_search(&mut self, search: impl Into<String>) -> bool {
        self.change(FilterChange::Search(search.into()))
    }

    pub fn set_category(&mut self, slug: Option<String>) -> bool {
        self.change(FilterChange::Category(slug))
    }

    /// Select a flavor, or clear it when it is already selected.
    pub fn toggle_flavor(&mut self, flavor: FlavorId) -> bool {
        self.change(FilterChange::ToggleFlavor(flavor))
    }

    /// Select a weight, or clear it when it is already selected.
    pub fn toggle_weight(&mut self, weight: WeightId) -> bool {
        self.change(FilterChange::ToggleWeight(weight))
    }

    pub fn set_price_range(&mut self, min: Option<Price>, max: Option<Price>) -> bool {
        self.change(FilterChange::PriceRange { min, max })
    }

    pub fn set_sort(&mut self, field: SortField, order: SortOrder) -> bool {
        self.change(FilterChange::Sort(field, order))
    }

    pub fn set_preset(&mut self, preset: SortPreset) -> bool {
        self.change(FilterChange::Preset(preset))
    }

    pub fn clear_filters(&mut self) -> bool {
        self.change(FilterChange::Clear)
    }

    /// Go to `page`, keeping all filters.
    ///
    /// Ignored when `page` is outside the last result's page range.
    pub fn set_page(&mut self, page: u32) -> bool {
        if page < 1 {
            return false;
        }
        if let Some(result) = &self.result {
            if !result.pagination().contains_page(page) {
                debug!(page, pages = result.pagination().pages, "ignoring out-of-range page");
                return false;
            }
        }
        self.change(FilterChange::Page(page))
    }

    /// Adopt the criteria encoded in a URL query string.
    ///
    /// No-op when they already match the session. The page comes from the
    /// URL, so a URL without one starts at page 1.
    pub fn sync_from_url(&mut self, query: &str) -> bool {
        let decoded = codec::decode(query);
        self.replace_criteria(decoded)
    }

    /// Shareable URL for the current criteria.
    pub fn share_url(&self, path: &str) -> String {
        codec::to_url(path, &self.criteria)
    }

    fn replace_criteria(&mut self, next: FilterCriteria) -> bool {
        if next == self.criteria {
            return false;
        }
        debug!(query = %codec::encode(&next), "criteria changed");
        self.criteria = next;
        true
    }

    /// Start a query for the current criteria, superseding earlier ones.
    pub fn begin(&mut self) -> (QueryToken, FilterCriteria) {
        self.loading = true;
        (self.resolver.begin(), self.criteria.clone())
    }

    /// Apply a query outcome. Only the latest initiated generation is
    /// accepted; returns whether the outcome was applied.
    pub fn apply(&mut self, outcome: QueryOutcome) -> bool {
        let generation = outcome.generation();
        if !self.resolver.generations().is_latest(generation) {
            debug!(%generation, latest = %self.resolver.generations().latest(), "dropping stale outcome");
            return false;
        }
        match outcome {
            QueryOutcome::Completed(page) => {
                self.result = Some(page);
                self.loading = false;
                true
            }
            QueryOutcome::Superseded(_) => false,
        }
    }

    /// Resolve the current criteria and apply the outcome.
    pub async fn refresh(&mut self) -> bool {
        let (token, criteria) = self.begin();
        let outcome = self.resolver.resolve_with(token, &criteria).await;
        self.apply(outcome)
    }

    /// Fetch categories, flavors, weights and the price bound.
    pub async fn load_reference(&mut self) {
        self.reference = ReferenceData::load(self.resolver.store()).await;
    }

    /// Guidance when the latest result is empty and error-free.
    pub fn empty_state(&self) -> Option<EmptyState> {
        self.result.as_ref().and_then(ResolvedPage::empty_state)
    }

    /// Pager layout for the latest result.
    pub fn page_window(&self) -> Vec<PageSlot> {
        self.result
            .as_ref()
            .map(|r| r.pagination().page_window())
            .unwrap_or_default()
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.result.as_ref().map(ResolvedPage::pagination)
    }
}
