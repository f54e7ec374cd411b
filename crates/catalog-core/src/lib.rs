//! Catalog domain types and filter logic for the storefront product listing.
//!
//! This crate is pure (no I/O) and provides:
//!
//! - **Catalog**: Products, variants, flavors, weights, categories
//! - **Price**: Fixed-point prices with discount derivation
//! - **Search**: Filter criteria, sort allow-list, the shareable URL codec,
//!   variant predicates, pagination and empty-state guidance
//!
//! # Example
//!
//! ```rust
//! use catalog_core::prelude::*;
//!
//! let criteria = FilterCriteria::new()
//!     .with_search("whey protein")
//!     .with_flavor(FlavorId::new("chocolate"));
//!
//! let query = codec::encode(&criteria);
//! assert_eq!(query, "search=whey+protein&flavor=chocolate");
//! assert_eq!(codec::decode(&query), criteria);
//! ```

pub mod error;
pub mod ids;
pub mod price;

pub mod catalog;
pub mod search;

pub use error::CatalogError;
pub use ids::*;
pub use price::Price;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CatalogError;
    pub use crate::ids::*;
    pub use crate::price::Price;

    // Catalog
    pub use crate::catalog::{
        Category, CategoryRef, Flavor, Product, ProductTag, Variant, VariantImage, Weight,
    };

    // Search
    pub use crate::search::codec;
    pub use crate::search::{
        ClearAction, EmptyState, FilterChange, FilterCriteria, PageSlot, Pagination, PriceRange,
        ProductPage, SortField, SortOrder, SortPreset, VariantFilter,
    };
}
