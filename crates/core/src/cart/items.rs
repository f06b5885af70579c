//! Cart line items

use serde::{Deserialize, Serialize};

/// One entry in the cart: a purchasable product variant and its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Opaque product identifier issued by the catalog.
    pub product_id: String,

    /// Number of units, always at least one once stored.
    pub quantity: u32,

    /// Selected color, when the product comes in several.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Selected size, when the product comes in several.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl CartLineItem {
    /// Create a line item without variant selections.
    pub fn new(product_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            color: None,
            size: None,
        }
    }

    /// Set the selected color.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set the selected size.
    #[must_use]
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    /// Identity tuple of this line item.
    pub fn key(&self) -> LineItemKey<'_> {
        LineItemKey {
            product_id: &self.product_id,
            color: self.color.as_deref(),
            size: self.size.as_deref(),
        }
    }

    /// Whether this line item has the given identity.
    pub fn matches(&self, key: &LineItemKey<'_>) -> bool {
        self.key() == *key
    }
}

/// The `(product, color, size)` triple that decides whether two cart entries refer to the
/// same purchasable variant.
///
/// An absent color or size is its own value: it never matches a present one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineItemKey<'a> {
    /// Product identifier.
    pub product_id: &'a str,

    /// Color selection.
    pub color: Option<&'a str>,

    /// Size selection.
    pub size: Option<&'a str>,
}

impl<'a> LineItemKey<'a> {
    /// Build an identity tuple.
    pub const fn new(product_id: &'a str, color: Option<&'a str>, size: Option<&'a str>) -> Self {
        Self {
            product_id,
            color,
            size,
        }
    }
}

/// Ordered view of the cart's line items, in storage (insertion) order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartSnapshot {
    items: Vec<CartLineItem>,
}

impl CartSnapshot {
    /// Wrap the given line items.
    pub fn new(items: Vec<CartLineItem>) -> Self {
        Self { items }
    }

    /// Line items in storage order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Consume the snapshot, returning its line items.
    pub fn into_items(self) -> Vec<CartLineItem> {
        self.items
    }

    /// Total number of units across all line items.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Number of distinct line items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart holds no line items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find the line item with the given identity.
    pub fn find(&self, key: &LineItemKey<'_>) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.matches(key))
    }
}

impl From<Vec<CartLineItem>> for CartSnapshot {
    fn from(items: Vec<CartLineItem>) -> Self {
        Self::new(items)
    }
}
