//! Query error types.

use catalog_store::StoreError;
use serde::Serialize;
use thiserror::Error;

/// Message shown to shoppers when the listing could not be loaded.
pub const LOAD_ERROR_MESSAGE: &str = "Error loading products. Please try again.";

/// Errors surfaced in a resolved page's error state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The broad list query failed.
    #[error("Product list unavailable: {0}")]
    ListUnavailable(#[source] StoreError),
}

impl QueryError {
    /// Message suitable for a user-visible notification.
    pub fn user_message(&self) -> &'static str {
        LOAD_ERROR_MESSAGE
    }
}

impl From<StoreError> for QueryError {
    fn from(e: StoreError) -> Self {
        QueryError::ListUnavailable(e)
    }
}

/// A candidate whose detail fetch failed during the conjunctive re-check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailFailure {
    pub slug: String,
    pub error: String,
}
