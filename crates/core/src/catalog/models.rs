//! Catalog Models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::VariantRequirements;

/// A product as it appears in listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// URL slug.
    #[serde(default)]
    pub slug: String,

    /// Selling boutique.
    pub boutique_id: String,

    /// Selling boutique name.
    #[serde(default)]
    pub boutique_name: String,

    /// Category slug.
    pub category: String,

    /// Subcategory, if any.
    #[serde(default)]
    pub subcategory: Option<String>,

    /// Brand, if any.
    #[serde(default)]
    pub brand: Option<String>,

    /// List price.
    #[serde(with = "rust_decimal::serde::float")]
    pub base_price: Decimal,

    /// Discounted price, when on sale.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub sale_price: Option<Decimal>,

    /// Price a shopper pays today.
    #[serde(with = "rust_decimal::serde::float")]
    pub current_price: Decimal,

    /// Main image URL.
    #[serde(default)]
    pub main_image: String,

    /// Item condition.
    #[serde(default)]
    pub condition: String,

    /// Highlighted by the marketplace.
    #[serde(default)]
    pub is_featured: bool,

    /// Currently trending.
    #[serde(default)]
    pub is_trending: bool,

    /// Whether any variant is in stock.
    #[serde(default)]
    pub is_in_stock: bool,

    /// Units in stock across variants.
    #[serde(default)]
    pub total_stock: i64,

    /// Average rating out of five.
    #[serde(default)]
    pub rating: f64,
}

impl Product {
    /// Whether the product is currently discounted.
    pub fn is_on_sale(&self) -> bool {
        self.sale_price
            .is_some_and(|sale_price| sale_price < self.base_price)
    }
}

/// A color variant with its images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductColor {
    /// Color name.
    pub name: String,

    /// Hex code for swatches.
    #[serde(default)]
    pub hex_code: Option<String>,

    /// Images of this color.
    #[serde(default)]
    pub images: Vec<String>,
}

/// Everything known about a single product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    /// Listing fields.
    #[serde(flatten)]
    pub product: Product,

    /// Long description.
    #[serde(default)]
    pub description: String,

    /// Gallery images.
    #[serde(default)]
    pub images: Vec<String>,

    /// Color variants.
    #[serde(default)]
    pub colors: Vec<ProductColor>,

    /// Sizes the product is offered in.
    #[serde(default)]
    pub available_sizes: Vec<String>,

    /// Colors the product is offered in.
    #[serde(default)]
    pub available_colors: Vec<String>,
}

impl ProductDetail {
    /// Selections a shopper must make before adding this product to the cart.
    pub fn variant_requirements(&self) -> VariantRequirements {
        VariantRequirements {
            color: !self.available_colors.is_empty(),
            size: !self.available_sizes.is_empty(),
        }
    }
}

/// One page of a product listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    /// Products on this page.
    pub products: Vec<Product>,

    /// Products matching the query across all pages.
    pub total: u64,

    /// This page, starting at 1.
    pub page: u32,

    /// Page size.
    pub size: u32,

    /// Number of pages.
    pub total_pages: u32,

    /// Whether a later page exists.
    #[serde(default)]
    pub has_next: bool,

    /// Whether an earlier page exists.
    #[serde(default)]
    pub has_prev: bool,
}

/// A product category with its subcategories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Display name.
    pub name: String,

    /// Slug used in filters.
    pub slug: String,

    /// Products in the category.
    #[serde(default)]
    pub product_count: u64,

    /// Subcategory names.
    #[serde(default)]
    pub subcategories: Vec<String>,
}

/// A brand with catalog presence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    /// Brand name.
    pub name: String,

    /// Products of this brand.
    #[serde(default)]
    pub product_count: u64,

    /// Logo URL.
    #[serde(default)]
    pub logo: Option<String>,
}
