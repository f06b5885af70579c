//! Cart errors.

use std::fmt::{Display, Formatter, Result as FmtResult};

use thiserror::Error;

use crate::cart::{items::CartLineItem, storage::StorageError};

/// Errors raised by cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The storage medium could not be read or written.
    #[error("cart storage error")]
    Storage(#[from] StorageError),

    /// Line items could not be serialised for storage.
    #[error("failed to encode cart")]
    Encode(#[source] serde_json::Error),

    /// A line item was added with a zero quantity.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// A required variant selection is missing.
    #[error("a {0} must be selected before adding this product")]
    MissingSelection(VariantAttribute),
}

/// Variant attribute a shopper picks before adding a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantAttribute {
    /// Color choice.
    Color,

    /// Size choice.
    Size,
}

impl Display for VariantAttribute {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Color => f.write_str("color"),
            Self::Size => f.write_str("size"),
        }
    }
}

/// Selections a product demands before it may enter the cart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VariantRequirements {
    /// The product is offered in more than one color.
    pub color: bool,

    /// The product is offered in more than one size.
    pub size: bool,
}

impl VariantRequirements {
    /// Pre-flight check run before any cart mutation.
    ///
    /// Empty strings count as no selection.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::MissingSelection`] naming the first missing attribute, color
    /// first.
    pub fn validate(&self, item: &CartLineItem) -> Result<(), CartError> {
        if self.color && item.color.as_deref().is_none_or(str::is_empty) {
            return Err(CartError::MissingSelection(VariantAttribute::Color));
        }

        if self.size && item.size.as_deref().is_none_or(str::is_empty) {
            return Err(CartError::MissingSelection(VariantAttribute::Size));
        }

        Ok(())
    }
}
