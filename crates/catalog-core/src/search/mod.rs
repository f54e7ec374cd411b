//! Filter criteria, the URL codec, variant predicates and pagination.

pub mod codec;
mod criteria;
mod filter;
mod guidance;
mod results;

pub use criteria::{
    FilterChange, FilterCriteria, SortField, SortOrder, SortPreset, DEFAULT_PAGE_SIZE,
    MAX_PAGE_SIZE,
};
pub use filter::{PriceRange, VariantFilter};
pub use guidance::{ClearAction, EmptyState};
pub use results::{PageSlot, Pagination, ProductPage};
