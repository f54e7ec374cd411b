//! Product and variant types.

use crate::catalog::{Flavor, Weight};
use crate::ids::{CategoryId, FlavorId, ImageId, ProductId, VariantId, WeightId};
use crate::price::Price;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Merchandising tag on a product.
///
/// The first five are the fixed vocabulary the storefront sections use;
/// anything else is an ad-hoc section tag created from the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProductTag {
    Featured,
    Bestseller,
    Trending,
    New,
    Latest,
    Section(String),
}

impl ProductTag {
    pub fn as_str(&self) -> &str {
        match self {
            ProductTag::Featured => "featured",
            ProductTag::Bestseller => "bestseller",
            ProductTag::Trending => "trending",
            ProductTag::New => "new",
            ProductTag::Latest => "latest",
            ProductTag::Section(name) => name,
        }
    }

    /// Check if the tag belongs to the fixed vocabulary.
    pub fn is_builtin(&self) -> bool {
        !matches!(self, ProductTag::Section(_))
    }
}

impl From<String> for ProductTag {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "featured" => ProductTag::Featured,
            "bestseller" => ProductTag::Bestseller,
            "trending" => ProductTag::Trending,
            "new" => ProductTag::New,
            "latest" => ProductTag::Latest,
            _ => ProductTag::Section(s),
        }
    }
}

impl From<ProductTag> for String {
    fn from(tag: ProductTag) -> Self {
        tag.as_str().to_string()
    }
}

impl fmt::Display for ProductTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category association carried on a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryRef {
    pub id: CategoryId,
    #[serde(default)]
    pub name: String,
    pub slug: String,
}

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Store-assigned identifier.
    pub id: ProductId,
    /// URL-friendly slug; the stable external key.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Full description.
    #[serde(default)]
    pub description: Option<String>,
    /// Selling price.
    #[serde(default)]
    pub base_price: Price,
    /// Pre-discount price.
    #[serde(default)]
    pub regular_price: Option<Price>,
    /// Product-level fallback image path.
    #[serde(default)]
    pub image: Option<String>,
    /// Legacy featured flag, equivalent to the `featured` tag.
    #[serde(default)]
    pub featured: bool,
    /// Category associations.
    #[serde(default)]
    pub categories: Vec<CategoryRef>,
    /// Variants owned by this product. List payloads may omit them.
    #[serde(default)]
    pub variants: Vec<Variant>,
    /// Merchandising tags.
    #[serde(default)]
    pub tags: Vec<ProductTag>,
    /// Whether the product is visible in the storefront.
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl Product {
    /// Create a new active product with no variants.
    pub fn new(
        id: impl Into<ProductId>,
        slug: impl Into<String>,
        name: impl Into<String>,
        base_price: Price,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            slug: slug.into(),
            name: name.into(),
            description: None,
            base_price,
            regular_price: None,
            image: None,
            featured: false,
            categories: Vec::new(),
            variants: Vec::new(),
            tags: Vec::new(),
            is_active: true,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// True iff the regular price is above the selling price.
    pub fn has_sale(&self) -> bool {
        self.regular_price
            .map(|regular| regular > self.base_price)
            .unwrap_or(false)
    }

    /// Derived discount percentage, `round((regular - base) / regular * 100)`.
    pub fn discount_percent(&self) -> u32 {
        match self.regular_price {
            Some(regular) => Price::discount_percent(regular, self.base_price),
            None => 0,
        }
    }

    /// Check for a tag.
    pub fn has_tag(&self, tag: &ProductTag) -> bool {
        self.tags.contains(tag)
    }

    /// Featured either through the flag or the tag.
    pub fn is_featured(&self) -> bool {
        self.featured || self.has_tag(&ProductTag::Featured)
    }

    /// Add a tag to this product.
    pub fn add_tag(&mut self, tag: ProductTag) {
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    /// Add a category to this product.
    pub fn add_category(&mut self, category: CategoryRef) {
        if !self.categories.iter().any(|c| c.id == category.id) {
            self.categories.push(category);
        }
    }

    /// Add a variant to this product.
    pub fn add_variant(&mut self, variant: Variant) {
        self.variants.push(variant);
    }

    /// Lowest variant price, if the product carries variants.
    pub fn min_variant_price(&self) -> Option<Price> {
        self.variants.iter().map(|v| v.price).min()
    }

    /// Check whether any variant carries the flavor.
    pub fn has_flavor(&self, flavor: &FlavorId) -> bool {
        self.variants.iter().any(|v| v.flavor_id() == Some(flavor))
    }

    /// Check whether any variant carries the weight.
    pub fn has_weight(&self, weight: &WeightId) -> bool {
        self.variants.iter().any(|v| v.weight_id() == Some(weight))
    }

    /// Image path to show on a product card.
    ///
    /// Primary image of the first variant that has images, else that
    /// variant's first image, else the product-level image.
    pub fn display_image(&self) -> Option<&str> {
        self.variants
            .iter()
            .find_map(|v| v.display_image())
            .map(|img| img.url.as_str())
            .or(self.image.as_deref())
    }
}

/// A purchasable variant (flavor/weight combination).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    /// Store-assigned identifier.
    pub id: VariantId,
    #[serde(default)]
    pub flavor: Option<Flavor>,
    #[serde(default)]
    pub weight: Option<Weight>,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub images: Vec<VariantImage>,
}

impl Variant {
    /// Create a variant with no attributes or images.
    pub fn new(id: impl Into<VariantId>, price: Price) -> Self {
        Self {
            id: id.into(),
            flavor: None,
            weight: None,
            price,
            images: Vec::new(),
        }
    }

    /// Set the flavor.
    pub fn with_flavor(mut self, flavor: Flavor) -> Self {
        self.flavor = Some(flavor);
        self
    }

    /// Set the weight.
    pub fn with_weight(mut self, weight: Weight) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn flavor_id(&self) -> Option<&FlavorId> {
        self.flavor.as_ref().map(|f| &f.id)
    }

    pub fn weight_id(&self) -> Option<&WeightId> {
        self.weight.as_ref().map(|w| &w.id)
    }

    /// Append an image. Marking it primary demotes any previous primary.
    pub fn add_image(&mut self, image: VariantImage) {
        if image.is_primary {
            for existing in &mut self.images {
                existing.is_primary = false;
            }
        }
        self.images.push(image);
    }

    /// Make the image at `index` the only primary image.
    pub fn set_primary_image(&mut self, index: usize) -> bool {
        if index >= self.images.len() {
            return false;
        }
        for (i, image) in self.images.iter_mut().enumerate() {
            image.is_primary = i == index;
        }
        true
    }

    /// The primary image, falling back to the first one inserted.
    pub fn display_image(&self) -> Option<&VariantImage> {
        self.images
            .iter()
            .find(|img| img.is_primary)
            .or_else(|| self.images.first())
    }
}

/// An image attached to a variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VariantImage {
    #[serde(default)]
    pub id: Option<ImageId>,
    pub url: String,
    #[serde(default)]
    pub is_primary: bool,
}

impl VariantImage {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            id: None,
            url: url.into(),
            is_primary: false,
        }
    }

    pub fn primary(url: impl Into<String>) -> Self {
        Self {
            is_primary: true,
            ..Self::new(url)
        }
    }
}

/// Resolve a stored image path against the media host.
///
/// Absolute `http(s)` URLs pass through untouched.
pub fn resolve_image_url(media_base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        media_base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(id: &str) -> Variant {
        Variant::new(id, Price::from_units(999))
    }

    #[test]
    fn test_has_sale_and_discount() {
        let mut product = Product::new("p1", "whey", "Whey", Price::from_units(750));
        assert!(!product.has_sale());
        assert_eq!(product.discount_percent(), 0);

        product.regular_price = Some(Price::from_units(1000));
        assert!(product.has_sale());
        assert_eq!(product.discount_percent(), 25);

        product.regular_price = Some(Price::from_units(700));
        assert!(!product.has_sale());
        assert_eq!(product.discount_percent(), 0);
    }

    #[test]
    fn test_single_primary_image() {
        let mut v = variant("v1");
        v.add_image(VariantImage::primary("a.png"));
        v.add_image(VariantImage::primary("b.png"));
        assert_eq!(v.images.iter().filter(|i| i.is_primary).count(), 1);
        assert_eq!(v.display_image().unwrap().url, "b.png");

        assert!(v.set_primary_image(0));
        assert_eq!(v.display_image().unwrap().url, "a.png");
        assert!(!v.set_primary_image(5));
    }

    #[test]
    fn test_display_image_falls_back_to_first() {
        let mut v = variant("v1");
        v.add_image(VariantImage::new("first.png"));
        v.add_image(VariantImage::new("second.png"));
        assert_eq!(v.display_image().unwrap().url, "first.png");
    }

    #[test]
    fn test_product_display_image_fallbacks() {
        let mut product = Product::new("p1", "whey", "Whey", Price::from_units(750));
        assert_eq!(product.display_image(), None);

        product.image = Some("products/whey.png".to_string());
        assert_eq!(product.display_image(), Some("products/whey.png"));

        let mut v = variant("v1");
        v.add_image(VariantImage::new("variants/whey-choc.png"));
        product.add_variant(v);
        assert_eq!(product.display_image(), Some("variants/whey-choc.png"));
    }

    #[test]
    fn test_resolve_image_url() {
        assert_eq!(
            resolve_image_url("https://cdn.example.com/", "/a/b.png"),
            "https://cdn.example.com/a/b.png"
        );
        assert_eq!(
            resolve_image_url("https://cdn.example.com", "https://other.example.com/x.png"),
            "https://other.example.com/x.png"
        );
    }

    #[test]
    fn test_tags_round_trip_through_strings() {
        let json = r#"["featured", "Bestseller", "monsoon-sale"]"#;
        let tags: Vec<ProductTag> = serde_json::from_str(json).unwrap();
        assert_eq!(
            tags,
            vec![
                ProductTag::Featured,
                ProductTag::Bestseller,
                ProductTag::Section("monsoon-sale".to_string()),
            ]
        );
        assert!(!tags[2].is_builtin());
    }

    #[test]
    fn test_product_from_store_json() {
        let json = r#"{
            "id": "p1",
            "slug": "gold-whey",
            "name": "Gold Whey",
            "basePrice": 2499,
            "regularPrice": "2999.00",
            "featured": true,
            "createdAt": "2024-03-01T10:00:00.000Z",
            "variants": [{
                "id": "v1",
                "flavor": {"id": "f1", "name": "Chocolate"},
                "weight": {"id": "w1", "value": 1, "unit": "kg"},
                "price": 2499,
                "images": [{"url": "a.png"}, {"url": "b.png", "isPrimary": true}]
            }]
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.is_active);
        assert!(product.is_featured());
        assert!(product.has_sale());
        assert!(product.has_flavor(&FlavorId::new("f1")));
        assert!(product.has_weight(&WeightId::new("w1")));
        assert_eq!(product.display_image(), Some("b.png"));
        assert!(product.created_at.is_some());
    }
}
