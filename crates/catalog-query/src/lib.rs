//! Catalog query resolver for the storefront product listing.
//!
//! This crate provides:
//! - `CatalogResolver` - Broad list query, conjunctive flavor + weight
//!   re-check and recomputed totals
//! - `GenerationCounter` / `QueryToken` - Latest-wins query generations
//! - `debounce` - Quiet-period coalescing of search input
//! - `ReferenceData` - Categories, flavors, weights and the price bound
//! - `BrowseSession` - Filter state, URL sync and result application
//!
//! # Example
//!
//! ```rust,no_run
//! use catalog_core::search::FilterCriteria;
//! use catalog_query::{CatalogResolver, QueryOutcome};
//! use catalog_store::HttpProductStore;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = HttpProductStore::new("https://shop.example.com/api")?;
//! let resolver = CatalogResolver::new(store);
//!
//! let criteria = FilterCriteria::new().with_flavor("chocolate").with_weight("1kg");
//! if let QueryOutcome::Completed(page) = resolver.resolve(&criteria).await {
//!     println!("{} of {} products", page.products().len(), page.pagination().total);
//! }
//! # Ok(())
//! # }
//! ```

pub mod conjunctive;
pub mod debounce;
mod error;
mod generation;
mod reference;
mod resolver;
mod session;

#[cfg(test)]
mod testing;

pub use debounce::{debounce, DebounceSender, Debouncer, DEFAULT_DEBOUNCE};
pub use error::{DetailFailure, QueryError, LOAD_ERROR_MESSAGE};
pub use generation::{Generation, GenerationCounter, QueryToken};
pub use reference::{ReferenceData, DEFAULT_MAX_PRICE, MAX_PRICE_STEP};
pub use resolver::{
    CatalogResolver, QueryOutcome, ResolvedPage, ResolverConfig, DEFAULT_DETAIL_CONCURRENCY,
};
pub use session::BrowseSession;
