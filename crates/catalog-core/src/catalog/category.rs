//! Category types for product organization.

use crate::ids::CategoryId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A product category in the catalog hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Store-assigned identifier.
    pub id: CategoryId,
    /// Category name.
    pub name: String,
    /// URL-friendly slug.
    pub slug: String,
    /// Parent category ID (None for root categories).
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
    /// Category description.
    #[serde(default)]
    pub description: Option<String>,
    /// Category image path.
    #[serde(default)]
    pub image: Option<String>,
    /// Number of products in this category, when the store reports it.
    #[serde(default)]
    pub product_count: Option<i64>,
}

impl Category {
    /// Create a new root category.
    pub fn new_root(
        id: impl Into<CategoryId>,
        name: impl Into<String>,
        slug: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: slug.into(),
            parent_id: None,
            description: None,
            image: None,
            product_count: None,
        }
    }

    /// Create a new child category.
    pub fn new_child(
        parent: &Category,
        id: impl Into<CategoryId>,
        name: impl Into<String>,
        slug: impl Into<String>,
    ) -> Self {
        Self {
            parent_id: Some(parent.id.clone()),
            ..Self::new_root(id, name, slug)
        }
    }

    /// Check if this is a root category.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Slugs of the category named `slug` and all of its descendants.
///
/// Empty when the slug is unknown. Cycles in malformed parent links are
/// visited once.
pub fn descendant_slugs<'a>(categories: &'a [Category], slug: &str) -> Vec<&'a str> {
    let Some(root) = categories.iter().find(|c| c.slug == slug) else {
        return Vec::new();
    };

    let mut seen: HashSet<&CategoryId> = HashSet::new();
    let mut out = Vec::new();
    let mut frontier = vec![root];

    while let Some(category) = frontier.pop() {
        if !seen.insert(&category.id) {
            continue;
        }
        out.push(category.slug.as_str());
        frontier.extend(
            categories
                .iter()
                .filter(|c| c.parent_id.as_ref() == Some(&category.id)),
        );
    }

    out
}
