//! Product catalog module.
//!
//! Contains types for products, variants, flavors, weights and categories.

mod attribute;
mod category;
mod product;

pub use attribute::{Flavor, Weight};
pub use category::{descendant_slugs, Category};
pub use product::{resolve_image_url, CategoryRef, Product, ProductTag, Variant, VariantImage};
