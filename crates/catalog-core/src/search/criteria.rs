//! Filter criteria and sort options.

use crate::error::CatalogError;
use crate::ids::{FlavorId, WeightId};
use crate::price::Price;
use crate::search::{PriceRange, VariantFilter};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Page size used when none is given.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page size a query may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Sort fields the product store accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Name,
    Featured,
}

impl SortField {
    /// The allow-list, in display order.
    pub const ALLOWED: [SortField; 4] = [
        SortField::CreatedAt,
        SortField::UpdatedAt,
        SortField::Name,
        SortField::Featured,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
            SortField::Name => "name",
            SortField::Featured => "featured",
        }
    }

    /// Strict parse against the allow-list.
    pub fn parse(s: &str) -> Result<Self, CatalogError> {
        SortField::ALLOWED
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| CatalogError::InvalidSortField(s.to_string()))
    }

    /// Lenient parse: anything outside the allow-list becomes `createdAt`.
    pub fn parse_or_default(s: &str) -> Self {
        SortField::parse(s).unwrap_or_else(|_| {
            warn!(sort = s, "invalid sort field, using createdAt instead");
            SortField::default()
        })
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CatalogError> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(CatalogError::InvalidSortOrder(s.to_string())),
        }
    }

    pub fn parse_or_default(s: &str) -> Self {
        SortOrder::parse(s).unwrap_or_else(|_| {
            warn!(order = s, "invalid sort order, using desc instead");
            SortOrder::default()
        })
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort choices offered by the storefront's sort dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortPreset {
    Newest,
    Oldest,
    PriceLow,
    PriceHigh,
    NameAsc,
    NameDesc,
}

impl SortPreset {
    pub const ALL: [SortPreset; 6] = [
        SortPreset::Newest,
        SortPreset::Oldest,
        SortPreset::PriceLow,
        SortPreset::PriceHigh,
        SortPreset::NameAsc,
        SortPreset::NameDesc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortPreset::Newest => "newest",
            SortPreset::Oldest => "oldest",
            SortPreset::PriceLow => "price-low",
            SortPreset::PriceHigh => "price-high",
            SortPreset::NameAsc => "name-asc",
            SortPreset::NameDesc => "name-desc",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CatalogError> {
        SortPreset::ALL
            .into_iter()
            .find(|preset| preset.as_str() == s)
            .ok_or_else(|| CatalogError::InvalidSortPreset(s.to_string()))
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortPreset::Newest => "Newest",
            SortPreset::Oldest => "Oldest",
            SortPreset::PriceLow => "Price, low to high",
            SortPreset::PriceHigh => "Price, high to low",
            SortPreset::NameAsc => "Name, A-Z",
            SortPreset::NameDesc => "Name, Z-A",
        }
    }

    /// The store sort this preset maps to.
    ///
    /// Price lives on variants, which the store cannot sort by, so the price
    /// presets map onto creation date.
    pub fn sort(&self) -> (SortField, SortOrder) {
        match self {
            SortPreset::Newest => (SortField::CreatedAt, SortOrder::Desc),
            SortPreset::Oldest => (SortField::CreatedAt, SortOrder::Asc),
            SortPreset::PriceLow => (SortField::CreatedAt, SortOrder::Asc),
            SortPreset::PriceHigh => (SortField::CreatedAt, SortOrder::Desc),
            SortPreset::NameAsc => (SortField::Name, SortOrder::Asc),
            SortPreset::NameDesc => (SortField::Name, SortOrder::Desc),
        }
    }

    /// True for presets whose store sort does not actually order by price.
    pub fn is_price_approximation(&self) -> bool {
        matches!(self, SortPreset::PriceLow | SortPreset::PriceHigh)
    }

    /// Preset to show as selected for a store sort.
    pub fn from_sort(field: SortField, order: SortOrder) -> Option<Self> {
        match (field, order) {
            (SortField::CreatedAt, SortOrder::Desc) => Some(SortPreset::Newest),
            (SortField::CreatedAt, SortOrder::Asc) => Some(SortPreset::Oldest),
            (SortField::Name, SortOrder::Asc) => Some(SortPreset::NameAsc),
            (SortField::Name, SortOrder::Desc) => Some(SortPreset::NameDesc),
            _ => None,
        }
    }
}

/// User-selected listing criteria. Client-held, never persisted.
///
/// Empty strings are normalized to `None` by every setter so that
/// "absent" has exactly one representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    pub search: Option<String>,
    /// Category slug; the store expands it to descendants.
    pub category: Option<String>,
    pub flavor: Option<FlavorId>,
    pub weight: Option<WeightId>,
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
    pub sort: SortField,
    pub order: SortOrder,
    /// Current page (1-indexed).
    pub page: u32,
    /// Items per page.
    pub limit: u32,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            search: None,
            category: None,
            flavor: None,
            weight: None,
            min_price: None,
            max_price: None,
            sort: SortField::default(),
            order: SortOrder::default(),
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

fn non_empty(s: impl Into<String>) -> Option<String> {
    let s = s.into();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

impl FilterCriteria {
    /// Default criteria: everything, newest first, page 1 of 20.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search text.
    pub fn with_search(mut self, q: impl Into<String>) -> Self {
        self.search = non_empty(q);
        self
    }

    /// Set the category slug.
    pub fn with_category(mut self, slug: impl Into<String>) -> Self {
        self.category = non_empty(slug);
        self
    }

    /// Set the flavor filter.
    pub fn with_flavor(mut self, flavor: impl Into<FlavorId>) -> Self {
        let flavor = flavor.into();
        self.flavor = (!flavor.as_str().is_empty()).then_some(flavor);
        self
    }

    /// Set the weight filter.
    pub fn with_weight(mut self, weight: impl Into<WeightId>) -> Self {
        let weight = weight.into();
        self.weight = (!weight.as_str().is_empty()).then_some(weight);
        self
    }

    /// Set the inclusive price bounds.
    pub fn with_price_range(mut self, min: Option<Price>, max: Option<Price>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    /// Set the sort.
    pub fn with_sort(mut self, sort: SortField, order: SortOrder) -> Self {
        self.sort = sort;
        self.order = order;
        self
    }

    /// Set pagination. Page is at least 1; page size is clamped to 1..=100.
    pub fn with_pagination(mut self, page: u32, limit: u32) -> Self {
        self.page = page.max(1);
        self.limit = limit.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Offset of the first item on the current page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }

    /// Check if the sort is the default newest-first.
    pub fn is_default_sort(&self) -> bool {
        self.sort == SortField::default() && self.order == SortOrder::default()
    }

    /// Check if any narrowing filter is set (sort and paging excluded).
    pub fn is_filtered(&self) -> bool {
        self.search.is_some()
            || self.category.is_some()
            || self.flavor.is_some()
            || self.weight.is_some()
            || self.has_price_range()
    }

    pub fn has_price_range(&self) -> bool {
        self.min_price.is_some() || self.max_price.is_some()
    }

    pub fn price_range(&self) -> PriceRange {
        PriceRange::new(self.min_price, self.max_price)
    }

    pub fn variant_filter(&self) -> VariantFilter {
        VariantFilter::new(self.flavor.clone(), self.weight.clone())
    }

    /// Same criteria with only the page number changed.
    pub fn at_page(&self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }

    /// Apply a user change. Anything other than a page change resets to page 1.
    pub fn apply(&self, change: FilterChange) -> Self {
        let mut next = self.clone();
        match change {
            FilterChange::Page(page) => return self.at_page(page),
            FilterChange::Search(q) => next.search = non_empty(q),
            FilterChange::Category(slug) => next.category = slug.and_then(non_empty),
            FilterChange::Flavor(flavor) => {
                next.flavor = flavor.filter(|f| !f.as_str().is_empty())
            }
            FilterChange::Weight(weight) => {
                next.weight = weight.filter(|w| !w.as_str().is_empty())
            }
            FilterChange::ToggleFlavor(flavor) => {
                next.flavor = if self.flavor.as_ref() == Some(&flavor) {
                    None
                } else {
                    Some(flavor)
                }
            }
            FilterChange::ToggleWeight(weight) => {
                next.weight = if self.weight.as_ref() == Some(&weight) {
                    None
                } else {
                    Some(weight)
                }
            }
            FilterChange::MinPrice(min) => next.min_price = min,
            FilterChange::MaxPrice(max) => next.max_price = max,
            FilterChange::PriceRange { min, max } => {
                next.min_price = min;
                next.max_price = max;
            }
            FilterChange::Sort(field, order) => {
                next.sort = field;
                next.order = order;
            }
            FilterChange::Preset(preset) => {
                let (field, order) = preset.sort();
                next.sort = field;
                next.order = order;
            }
            FilterChange::PageSize(limit) => next.limit = limit.clamp(1, MAX_PAGE_SIZE),
            FilterChange::Clear => {
                next = FilterCriteria {
                    limit: self.limit,
                    ..FilterCriteria::default()
                }
            }
        }
        next.page = 1;
        next
    }

    /// Query parameters for the store's list endpoint.
    ///
    /// `page`, `limit`, `sort` and `order` are always sent; the rest only
    /// when set.
    pub fn to_store_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
            ("sort", self.sort.as_str().to_string()),
            ("order", self.order.as_str().to_string()),
        ];

        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        if let Some(category) = &self.category {
            params.push(("category", category.clone()));
        }
        if let Some(min) = self.min_price {
            params.push(("minPrice", min.amount_string()));
        }
        if let Some(max) = self.max_price {
            params.push(("maxPrice", max.amount_string()));
        }
        if let Some(flavor) = &self.flavor {
            params.push(("flavor", flavor.as_str().to_string()));
        }
        if let Some(weight) = &self.weight {
            params.push(("weight", weight.as_str().to_string()));
        }

        params
    }
}

/// A single user edit to the criteria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    Search(String),
    Category(Option<String>),
    Flavor(Option<FlavorId>),
    Weight(Option<WeightId>),
    /// Select a flavor, or clear it when it is already selected.
    ToggleFlavor(FlavorId),
    /// Select a weight, or clear it when it is already selected.
    ToggleWeight(WeightId),
    MinPrice(Option<Price>),
    MaxPrice(Option<Price>),
    PriceRange {
        min: Option<Price>,
        max: Option<Price>,
    },
    Sort(SortField, SortOrder),
    Preset(SortPreset),
    PageSize(u32),
    Page(u32),
    Clear,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_field_fallback() {
        assert_eq!(SortField::parse_or_default("name"), SortField::Name);
        assert_eq!(SortField::parse_or_default("bogus"), SortField::CreatedAt);
        assert_eq!(SortField::parse_or_default("price"), SortField::CreatedAt);
        assert!(SortField::parse("bogus").is_err());
    }

    #[test]
    fn test_sort_order_fallback() {
        assert_eq!(SortOrder::parse_or_default("ASC"), SortOrder::Asc);
        assert_eq!(SortOrder::parse_or_default("sideways"), SortOrder::Desc);
    }

    #[test]
    fn test_presets_map_to_allowed_fields() {
        for preset in SortPreset::ALL {
            let (field, _) = preset.sort();
            assert!(SortField::ALLOWED.contains(&field));
            assert_eq!(SortPreset::parse(preset.as_str()).unwrap(), preset);
        }
        assert!(SortPreset::PriceLow.is_price_approximation());
        assert_eq!(
            SortPreset::from_sort(SortField::Name, SortOrder::Desc),
            Some(SortPreset::NameDesc)
        );
        assert_eq!(SortPreset::from_sort(SortField::Featured, SortOrder::Desc), None);
    }

    #[test]
    fn test_builder_normalizes_empty_values() {
        let criteria = FilterCriteria::new()
            .with_search("")
            .with_category("")
            .with_flavor("")
            .with_weight("");
        assert_eq!(criteria, FilterCriteria::default());
        assert!(!criteria.is_filtered());
    }

    #[test]
    fn test_pagination_is_clamped() {
        let criteria = FilterCriteria::new().with_pagination(0, 1000);
        assert_eq!(criteria.page, 1);
        assert_eq!(criteria.limit, MAX_PAGE_SIZE);

        let criteria = FilterCriteria::new().with_pagination(3, 20);
        assert_eq!(criteria.offset(), 40);
    }

    #[test]
    fn test_filter_change_resets_page() {
        let base = FilterCriteria::new().with_search("whey").at_page(4);
        let changes = vec![
            FilterChange::Search("casein".into()),
            FilterChange::Category(Some("protein".into())),
            FilterChange::Flavor(Some(FlavorId::new("f1"))),
            FilterChange::Weight(Some(WeightId::new("w1"))),
            FilterChange::MinPrice(Some(Price::from_units(500))),
            FilterChange::MaxPrice(None),
            FilterChange::Sort(SortField::Name, SortOrder::Asc),
            FilterChange::Preset(SortPreset::Oldest),
            FilterChange::PageSize(40),
            FilterChange::Clear,
        ];
        for change in changes {
            assert_eq!(base.apply(change.clone()).page, 1, "{:?}", change);
        }
    }

    #[test]
    fn test_page_change_preserves_filters() {
        let base = FilterCriteria::new()
            .with_search("whey")
            .with_flavor("f1")
            .with_price_range(Some(Price::from_units(500)), None);
        let next = base.apply(FilterChange::Page(3));
        assert_eq!(next.page, 3);
        assert_eq!(next, base.at_page(3));
        assert_eq!(next.search.as_deref(), Some("whey"));
    }

    #[test]
    fn test_toggle_flavor() {
        let base = FilterCriteria::new();
        let selected = base.apply(FilterChange::ToggleFlavor(FlavorId::new("f1")));
        assert_eq!(selected.flavor, Some(FlavorId::new("f1")));

        let switched = selected.apply(FilterChange::ToggleFlavor(FlavorId::new("f2")));
        assert_eq!(switched.flavor, Some(FlavorId::new("f2")));

        let cleared = switched.apply(FilterChange::ToggleFlavor(FlavorId::new("f2")));
        assert_eq!(cleared.flavor, None);
    }

    #[test]
    fn test_clear_keeps_page_size() {
        let base = FilterCriteria::new()
            .with_search("whey")
            .with_pagination(2, 40);
        let cleared = base.apply(FilterChange::Clear);
        assert!(!cleared.is_filtered());
        assert_eq!(cleared.limit, 40);
        assert_eq!(cleared.page, 1);
    }

    #[test]
    fn test_store_params() {
        let criteria = FilterCriteria::new()
            .with_search("gold whey")
            .with_flavor("f1")
            .with_price_range(Some(Price::from_units(500)), None);
        let params = criteria.to_store_params();
        assert_eq!(params[0], ("page", "1".to_string()));
        assert_eq!(params[1], ("limit", "20".to_string()));
        assert_eq!(params[2], ("sort", "createdAt".to_string()));
        assert_eq!(params[3], ("order", "desc".to_string()));
        assert!(params.contains(&("search", "gold whey".to_string())));
        assert!(params.contains(&("minPrice", "500".to_string())));
        assert!(params.contains(&("flavor", "f1".to_string())));
        assert!(!params.iter().any(|(k, _)| *k == "maxPrice"));
        assert!(!params.iter().any(|(k, _)| *k == "weight"));
    }
}
