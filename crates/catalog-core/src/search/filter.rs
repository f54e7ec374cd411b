//! Variant and price predicates.

use crate::catalog::{Product, Variant};
use crate::ids::{FlavorId, WeightId};
use crate::price::Price;
use serde::{Deserialize, Serialize};

/// Flavor/weight selection applied to a product's variants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantFilter {
    pub flavor: Option<FlavorId>,
    pub weight: Option<WeightId>,
}

impl VariantFilter {
    pub fn new(flavor: Option<FlavorId>, weight: Option<WeightId>) -> Self {
        Self { flavor, weight }
    }

    /// Check if either attribute is selected.
    pub fn is_active(&self) -> bool {
        self.flavor.is_some() || self.weight.is_some()
    }

    /// Check if both attributes are selected.
    ///
    /// The store only narrows each attribute independently, so a conjunctive
    /// filter has to be re-checked against variant detail.
    pub fn is_conjunctive(&self) -> bool {
        self.flavor.is_some() && self.weight.is_some()
    }

    /// A single variant carries every selected attribute.
    pub fn matches_variant(&self, variant: &Variant) -> bool {
        let flavor_ok = match &self.flavor {
            Some(flavor) => variant.flavor_id() == Some(flavor),
            None => true,
        };
        let weight_ok = match &self.weight {
            Some(weight) => variant.weight_id() == Some(weight),
            None => true,
        };
        flavor_ok && weight_ok
    }

    /// Some variant of the product carries every selected attribute together.
    pub fn matches_product(&self, product: &Product) -> bool {
        if !self.is_active() {
            return true;
        }
        product.variants.iter().any(|v| self.matches_variant(v))
    }

    /// The store's broad semantics: any variant has the flavor, or any
    /// variant has the weight.
    pub fn matches_any_attribute(&self, product: &Product) -> bool {
        if !self.is_active() {
            return true;
        }
        let flavor_hit = self
            .flavor
            .as_ref()
            .is_some_and(|flavor| product.has_flavor(flavor));
        let weight_hit = self
            .weight
            .as_ref()
            .is_some_and(|weight| product.has_weight(weight));
        flavor_hit || weight_hit
    }
}

/// Inclusive price bounds. An absent bound is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Option<Price>,
    pub max: Option<Price>,
}

impl PriceRange {
    pub fn new(min: Option<Price>, max: Option<Price>) -> Self {
        Self { min, max }
    }

    pub fn is_bounded(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    /// Check if `price` lies within the bounds.
    pub fn contains(&self, price: Price) -> bool {
        self.min.map_or(true, |min| price >= min) && self.max.map_or(true, |max| price <= max)
    }
}
