//! Catalog error types.

use thiserror::Error;

/// Errors raised while validating catalog values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Price is not a finite, non-negative decimal.
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// Sort field is not in the allow-list.
    #[error("Invalid sort field: {0}")]
    InvalidSortField(String),

    /// Sort direction is neither `asc` nor `desc`.
    #[error("Invalid sort order: {0}")]
    InvalidSortOrder(String),

    /// Unknown sort preset.
    #[error("Invalid sort preset: {0}")]
    InvalidSortPreset(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::SerializationError(e.to_string())
    }
}
