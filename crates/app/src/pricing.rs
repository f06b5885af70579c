//! HTTP cart pricing

use async_trait::async_trait;
use modedz::{
    cart::CartLineItem,
    pricing::{CartPricer, CartPricing, PricingError},
};
use reqwest::Method;

use crate::api::{ApiClient, ApiError};

/// [`CartPricer`] backed by `POST /orders/cart/calculate`.
#[derive(Debug, Clone)]
pub struct HttpCartPricer {
    api: ApiClient,
}

impl HttpCartPricer {
    /// Price carts through `api`.
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl CartPricer for HttpCartPricer {
    async fn compute_totals(&self, items: &[CartLineItem]) -> Result<CartPricing, PricingError> {
        let request = self
            .api
            .request(
                Method::POST,
                self.api.endpoint(&["orders", "cart", "calculate"]),
            )
            .json(items);

        Ok(ApiClient::send_json(request).await?)
    }
}

impl From<ApiError> for PricingError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Transport(source) => Self::Transport(Box::new(source)),
            ApiError::Status { status, message } => Self::UnexpectedResponse {
                status: status.as_u16(),
                message,
            },
            ApiError::Decode(source) => Self::Decode(Box::new(source)),
        }
    }
}
