//! Cart pricing service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    cart::CartLineItem,
    pricing::{errors::PricingError, models::CartPricing},
};

/// External service computing cart totals.
#[automock]
#[async_trait]
pub trait CartPricer: Send + Sync {
    /// Compute authoritative totals and stock annotations for the given line items.
    async fn compute_totals(&self, items: &[CartLineItem]) -> Result<CartPricing, PricingError>;
}
