//! Cart pricing

pub mod errors;
pub mod models;
pub mod service;
pub mod state;

pub use errors::PricingError;
pub use models::{CartPricing, PricedItem, StockStatus};
pub use service::*;
pub use state::{CheckoutBlocker, PricingState};
