//! Query results and pagination.

use crate::catalog::Product;
use serde::{Deserialize, Serialize};

/// Pagination info, in the store's wire shape.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    /// Current page (1-indexed).
    pub page: u32,
    /// Items per page.
    pub limit: u32,
    /// Total number of matching items across all pages.
    pub total: u64,
    /// Total number of pages.
    pub pages: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: crate::search::DEFAULT_PAGE_SIZE,
            total: 0,
            pages: 0,
        }
    }
}

impl Pagination {
    /// Create pagination info. `pages` is zero when nothing matched.
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let limit = limit.max(1);
        let pages = total.div_ceil(u64::from(limit));
        Self {
            page,
            limit,
            total,
            pages: u32::try_from(pages).unwrap_or(u32::MAX),
        }
    }

    /// Empty result for the given page request.
    pub fn empty(page: u32, limit: u32) -> Self {
        Self::new(page, limit, 0)
    }

    /// Same pagination with `total` replaced by a locally filtered count.
    ///
    /// `pages` is kept: it still describes the store's broad result, which
    /// is what further page requests will walk.
    pub fn with_filtered_total(self, total: u64) -> Self {
        Self { total, ..self }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Check if `page` can be navigated to.
    pub fn contains_page(&self, page: u32) -> bool {
        page >= 1 && page <= self.pages
    }

    /// Get start item number (1-indexed), 0 when empty.
    pub fn start_item(&self) -> u64 {
        if self.total == 0 {
            0
        } else {
            u64::from(self.page.saturating_sub(1)) * u64::from(self.limit) + 1
        }
    }

    /// Get end item number.
    pub fn end_item(&self) -> u64 {
        (u64::from(self.page) * u64::from(self.limit)).min(self.total)
    }

    /// Pager layout: first and last page, the current page and its
    /// neighbours, with an ellipsis marker for each skipped run.
    pub fn page_window(&self) -> Vec<PageSlot> {
        let current = self.page;
        let last = self.pages;
        let mut slots = Vec::new();

        for page in 1..=last {
            let edge = page == 1 || page == last;
            let near = page.saturating_add(1) >= current && page <= current.saturating_add(1);
            if edge || near {
                slots.push(PageSlot::Page(page));
            } else if (page == 2 && current > 3)
                || (page.saturating_add(1) == last && current.saturating_add(2) < last)
            {
                slots.push(PageSlot::Ellipsis);
            }
        }

        slots
    }
}

/// One entry of the pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSlot {
    Page(u32),
    Ellipsis,
}

/// One page of products.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub pagination: Pagination,
}

impl ProductPage {
    pub fn new(products: Vec<Product>, pagination: Pagination) -> Self {
        Self {
            products,
            pagination,
        }
    }

    pub fn empty(page: u32, limit: u32) -> Self {
        Self::new(Vec::new(), Pagination::empty(page, limit))
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }
}
