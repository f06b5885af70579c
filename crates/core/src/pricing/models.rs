//! Pricing Models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::{CartLineItem, CartSnapshot, LineItemKey};

/// A line item enriched by the pricing service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedItem {
    /// Product identifier.
    pub product_id: String,

    /// Product display name.
    #[serde(default)]
    pub product_name: String,

    /// Main product image URL.
    #[serde(default)]
    pub product_image: Option<String>,

    /// Name of the boutique selling the product.
    #[serde(default)]
    pub boutique_name: Option<String>,

    /// Color the price was resolved for.
    #[serde(default)]
    pub color: Option<String>,

    /// Size the price was resolved for.
    #[serde(default)]
    pub size: Option<String>,

    /// Price of one unit of this variant.
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,

    /// Requested quantity.
    pub quantity: u32,

    /// `unit_price * quantity`.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,

    /// Whether the product can currently be bought at all.
    pub is_in_stock: bool,

    /// Units the catalog reports as available.
    #[serde(default)]
    pub available_stock: i64,
}

impl PricedItem {
    /// Identity tuple this price was computed for.
    pub fn key(&self) -> LineItemKey<'_> {
        LineItemKey::new(
            &self.product_id,
            self.color.as_deref(),
            self.size.as_deref(),
        )
    }

    /// Availability of the requested quantity.
    pub fn stock_status(&self) -> StockStatus {
        if !self.is_in_stock || self.available_stock <= 0 {
            return StockStatus::OutOfStock;
        }

        if self.available_stock < i64::from(self.quantity) {
            return StockStatus::Limited {
                available: u32::try_from(self.available_stock).unwrap_or(u32::MAX),
            };
        }

        StockStatus::InStock
    }
}

/// Availability of a priced line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockStatus {
    /// The requested quantity can be fulfilled.
    InStock,

    /// In stock, but fewer units than requested.
    Limited {
        /// Units available.
        available: u32,
    },

    /// Cannot be bought.
    OutOfStock,
}

/// Authoritative totals for a set of line items, as computed by the pricing service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartPricing {
    /// Priced line items. Products unknown to the catalog are omitted by the service.
    pub items: Vec<PricedItem>,

    /// Sum of priced quantities.
    pub total_items: u64,

    /// Sum of line totals.
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,

    /// Shipping cost; zero when shipping is free.
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping_cost: Decimal,

    /// Tax applied to the subtotal.
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,

    /// Grand total.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
}

impl CartPricing {
    /// Whether shipping is free for this cart.
    pub fn has_free_shipping(&self) -> bool {
        self.shipping_cost.is_zero()
    }

    /// Priced items that cannot be bought.
    pub fn out_of_stock(&self) -> impl Iterator<Item = &PricedItem> {
        self.items
            .iter()
            .filter(|item| item.stock_status() == StockStatus::OutOfStock)
    }

    /// Priced entry for the given identity.
    pub fn find(&self, key: &LineItemKey<'_>) -> Option<&PricedItem> {
        self.items.iter().find(|item| item.key() == *key)
    }

    /// Line items of `snapshot` the service returned no price for.
    pub fn unpriced<'a>(&self, snapshot: &'a CartSnapshot) -> Vec<&'a CartLineItem> {
        snapshot
            .items()
            .iter()
            .filter(|item| self.find(&item.key()).is_none())
            .collect()
    }
}
