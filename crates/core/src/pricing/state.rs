//! Pricing state

use std::sync::Arc;

use thiserror::Error;

use crate::pricing::{errors::PricingError, models::CartPricing};

/// Whether the cached pricing result reflects the current line items.
///
/// ```text
/// Empty ──add──▶ Stale ──refresh──▶ Aggregating ──ok──▶ Fresh
///                  ▲                     │                │
///                  └──── mutation ◀──────┴──err──▶ Error ─┘
/// ```
///
/// Only [`PricingState::Fresh`] carries a result; a superseded result is dropped rather than
/// kept around where it could be mistaken for the current one.
#[derive(Debug, Clone, Default)]
pub enum PricingState {
    /// The cart holds no line items; there is nothing to price.
    #[default]
    Empty,

    /// Line items changed since the last successful aggregation.
    Stale,

    /// An aggregation call for the current line items is in flight.
    Aggregating,

    /// The result matches the current line items.
    Fresh(Arc<CartPricing>),

    /// The last aggregation for the current line items failed.
    Error(Arc<PricingError>),
}

impl PricingState {
    /// The current pricing result, if fresh.
    pub fn pricing(&self) -> Option<&Arc<CartPricing>> {
        match self {
            Self::Fresh(pricing) => Some(pricing),
            Self::Empty | Self::Stale | Self::Aggregating | Self::Error(_) => None,
        }
    }

    /// Whether a result matching the current line items is held.
    pub fn is_fresh(&self) -> bool {
        matches!(self, Self::Fresh(_))
    }

    /// Whether the state asks for a new aggregation.
    pub fn needs_refresh(&self) -> bool {
        matches!(self, Self::Stale)
    }

    /// Short label for logs and status lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Stale => "stale",
            Self::Aggregating => "aggregating",
            Self::Fresh(_) => "fresh",
            Self::Error(_) => "pricing unavailable",
        }
    }
}

/// Why the cart cannot proceed to checkout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutBlocker {
    /// Nothing to order.
    #[error("the cart is empty")]
    EmptyCart,

    /// Totals are not known for the current line items.
    #[error("cart pricing is not up to date")]
    PricingNotFresh,

    /// Some products can no longer be bought.
    #[error("out of stock: {}", .0.join(", "))]
    OutOfStock(Vec<String>),

    /// Some products were not recognised by the pricing service.
    #[error("unavailable products: {}", .0.join(", "))]
    Unavailable(Vec<String>),
}
