//! Wire envelopes of the public product API.
//!
//! Every response wraps its payload as `{ "data": { ... } }`.

use catalog_core::catalog::{Category, Flavor, Product, Weight};
use catalog_core::search::{Pagination, ProductPage};
use catalog_core::Price;
use serde::{Deserialize, Serialize};

/// Response envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// `GET /public/products`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductListData {
    #[serde(default)]
    pub products: Vec<Product>,
    pub pagination: Pagination,
}

impl From<ProductListData> for ProductPage {
    fn from(data: ProductListData) -> Self {
        ProductPage::new(data.products, data.pagination)
    }
}

impl From<ProductPage> for ProductListData {
    fn from(page: ProductPage) -> Self {
        Self {
            products: page.products,
            pagination: page.pagination,
        }
    }
}

/// `GET /public/products/{slug}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductDetailData {
    pub product: Product,
}

/// `GET /public/categories`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CategoriesData {
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// `GET /public/flavors`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FlavorsData {
    #[serde(default)]
    pub flavors: Vec<Flavor>,
}

/// `GET /public/weights`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WeightsData {
    #[serde(default)]
    pub weights: Vec<Weight>,
}

/// `GET /public/products/max-price`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MaxPriceData {
    #[serde(default)]
    pub max_price: Option<Price>,
}
