//! Empty-state guidance shown when a query matched nothing.

use crate::search::FilterCriteria;
use serde::{Deserialize, Serialize};

/// Why a listing came back empty, judged from the active filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyState {
    FlavorAndWeight,
    Flavor,
    Weight,
    PriceRange,
    Generic,
}

/// A shortcut offered next to the empty-state message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClearAction {
    All,
    Flavor,
    Weight,
    Price,
}

impl ClearAction {
    pub fn label(&self) -> &'static str {
        match self {
            ClearAction::All => "Clear all filters",
            ClearAction::Flavor => "Clear flavor",
            ClearAction::Weight => "Clear weight",
            ClearAction::Price => "Clear price filter",
        }
    }
}

impl EmptyState {
    /// Variant filters take precedence over the price range.
    pub fn from_criteria(criteria: &FilterCriteria) -> Self {
        match (&criteria.flavor, &criteria.weight) {
            (Some(_), Some(_)) => EmptyState::FlavorAndWeight,
            (Some(_), None) => EmptyState::Flavor,
            (None, Some(_)) => EmptyState::Weight,
            (None, None) if criteria.has_price_range() => EmptyState::PriceRange,
            (None, None) => EmptyState::Generic,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            EmptyState::FlavorAndWeight => {
                "No products match both the selected flavor and weight. \
                 Try a different combination or clear one of the filters."
            }
            EmptyState::Flavor => {
                "No products available with this flavor. \
                 Try selecting a different flavor or clear filters."
            }
            EmptyState::Weight => {
                "No products available with this weight. \
                 Try selecting a different weight or clear filters."
            }
            EmptyState::PriceRange => {
                "No products match the selected price range. Try adjusting your price filter."
            }
            EmptyState::Generic => "Try adjusting your filters or search term.",
        }
    }

    pub fn clear_actions(&self) -> &'static [ClearAction] {
        match self {
            EmptyState::FlavorAndWeight => {
                &[ClearAction::Flavor, ClearAction::Weight, ClearAction::All]
            }
            EmptyState::Flavor => &[ClearAction::Flavor, ClearAction::All],
            EmptyState::Weight => &[ClearAction::Weight, ClearAction::All],
            EmptyState::PriceRange => &[ClearAction::Price, ClearAction::All],
            EmptyState::Generic => &[ClearAction::All],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::price::Price;

    #[test]
    fn test_empty_state_precedence() {
        let both = FilterCriteria::new()
            .with_flavor("f1")
            .with_weight("w1")
            .with_price_range(Some(Price::from_units(500)), None);
        assert_eq!(EmptyState::from_criteria(&both), EmptyState::FlavorAndWeight);

        let flavor = FilterCriteria::new().with_flavor("f1");
        assert_eq!(EmptyState::from_criteria(&flavor), EmptyState::Flavor);

        let weight = FilterCriteria::new().with_weight("w1");
        assert_eq!(EmptyState::from_criteria(&weight), EmptyState::Weight);

        let price = FilterCriteria::new().with_price_range(None, Some(Price::from_units(900)));
        assert_eq!(EmptyState::from_criteria(&price), EmptyState::PriceRange);

        let search = FilterCriteria::new().with_search("nothing");
        assert_eq!(EmptyState::from_criteria(&search), EmptyState::Generic);
    }

    #[test]
    fn test_messages_are_distinct() {
        let states = [
            EmptyState::FlavorAndWeight,
            EmptyState::Flavor,
            EmptyState::Weight,
            EmptyState::PriceRange,
            EmptyState::Generic,
        ];
        for (i, a) in states.iter().enumerate() {
            for b in &states[i + 1..] {
                assert_ne!(a.message(), b.message());
            }
            assert_eq!(a.clear_actions().last(), Some(&ClearAction::All));
        }
        assert!(EmptyState::FlavorAndWeight.message().contains("both"));
    }
}
