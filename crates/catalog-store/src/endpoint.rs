//! Store endpoints and their transport defaults.

use std::time::Duration;

/// Endpoints of the public product API.
///
/// Each endpoint carries a default timeout and retry budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Paginated, filtered product list.
    ListProducts,
    /// Single product with full variant detail.
    ProductDetail,
    /// Category tree.
    Categories,
    /// Flavor reference list.
    Flavors,
    /// Weight reference list.
    Weights,
    /// Highest product price.
    MaxPrice,
}

impl Endpoint {
    /// Path relative to the store base URL. `slug` is only used by
    /// [`Endpoint::ProductDetail`].
    pub fn path(&self, slug: Option<&str>) -> String {
        match self {
            Self::ListProducts => "/public/products".to_string(),
            Self::ProductDetail => format!("/public/products/{}", slug.unwrap_or_default()),
            Self::Categories => "/public/categories".to_string(),
            Self::Flavors => "/public/flavors".to_string(),
            Self::Weights => "/public/weights".to_string(),
            Self::MaxPrice => "/public/products/max-price".to_string(),
        }
    }

    /// Get the default timeout for this endpoint.
    pub fn default_timeout(&self) -> Duration {
        match self {
            Self::ListProducts => Duration::from_secs(10),
            Self::ProductDetail => Duration::from_secs(5),
            Self::Categories | Self::Flavors | Self::Weights => Duration::from_secs(5),
            Self::MaxPrice => Duration::from_secs(3),
        }
    }

    /// Get the default max retries for this endpoint.
    pub fn default_max_retries(&self) -> u32 {
        match self {
            Self::ListProducts => 1,
            Self::ProductDetail => 0, // a failed candidate is just excluded
            _ => 2,
        }
    }

    /// Get the name of this endpoint.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ListProducts => "list_products",
            Self::ProductDetail => "product_detail",
            Self::Categories => "categories",
            Self::Flavors => "flavors",
            Self::Weights => "weights",
            Self::MaxPrice => "max_price",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(Endpoint::ListProducts.path(None), "/public/products");
        assert_eq!(
            Endpoint::ProductDetail.path(Some("gold-whey")),
            "/public/products/gold-whey"
        );
        assert_eq!(Endpoint::MaxPrice.path(None), "/public/products/max-price");
    }

    #[test]
    fn test_detail_fetches_are_not_retried() {
        assert_eq!(Endpoint::ProductDetail.default_max_retries(), 0);
        assert!(Endpoint::ListProducts.default_max_retries() > 0);
    }
}
