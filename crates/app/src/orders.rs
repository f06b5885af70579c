//! HTTP order service

use async_trait::async_trait;
use modedz::orders::{NewOrder, Order, OrderError, OrderList, OrderService, OrderStatus};
use reqwest::{Method, StatusCode, Url};
use serde::Serialize;

use crate::api::{ApiClient, ApiError};

#[derive(Debug, Serialize)]
struct StatusUpdate {
    status: OrderStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
}

/// [`OrderService`] backed by the `/orders` endpoints.
#[derive(Debug, Clone)]
pub struct HttpOrderService {
    api: ApiClient,
}

impl HttpOrderService {
    /// Manage orders through `api`.
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Order listing URL.
    pub fn list_url(&self, page: u32, size: u32, status: Option<OrderStatus>) -> Url {
        let mut url = self.api.endpoint(&["orders"]);

        {
            let mut pairs = url.query_pairs_mut();

            pairs
                .append_pair("page", &page.max(1).to_string())
                .append_pair("size", &size.to_string());

            if let Some(status) = status {
                pairs.append_pair("status", status.as_str());
            }
        }

        url
    }
}

#[async_trait]
impl OrderService for HttpOrderService {
    async fn create_order(&self, order: NewOrder) -> Result<Order, OrderError> {
        let request = self
            .api
            .request(Method::POST, self.api.endpoint(&["orders"]))
            .json(&order);

        Ok(ApiClient::send_json(request).await?)
    }

    async fn list_orders(
        &self,
        page: u32,
        size: u32,
        status: Option<OrderStatus>,
    ) -> Result<OrderList, OrderError> {
        let request = self
            .api
            .request(Method::GET, self.list_url(page, size, status));

        Ok(ApiClient::send_json(request).await?)
    }

    async fn get_order(&self, order_id: String) -> Result<Order, OrderError> {
        let request = self
            .api
            .request(Method::GET, self.api.endpoint(&["orders", order_id.as_str()]));

        Ok(ApiClient::send_json(request).await?)
    }

    async fn update_status(
        &self,
        order_id: String,
        status: OrderStatus,
        notes: Option<String>,
    ) -> Result<Order, OrderError> {
        let request = self
            .api
            .request(
                Method::PUT,
                self.api.endpoint(&["orders", order_id.as_str(), "status"]),
            )
            .json(&StatusUpdate { status, notes });

        Ok(ApiClient::send_json(request).await?)
    }

    async fn cancel_order(&self, order_id: String) -> Result<(), OrderError> {
        let request = self
            .api
            .request(Method::DELETE, self.api.endpoint(&["orders", order_id.as_str()]));

        ApiClient::send(request).await?;

        Ok(())
    }
}

impl From<ApiError> for OrderError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Transport(source) => Self::Transport(Box::new(source)),
            ApiError::Status { status, .. } if status == StatusCode::NOT_FOUND => Self::NotFound,
            ApiError::Status { status, message } if status == StatusCode::BAD_REQUEST => {
                Self::Rejected(message)
            }
            ApiError::Status { status, message } => Self::UnexpectedResponse {
                status: status.as_u16(),
                message,
            },
            ApiError::Decode(source) => Self::Decode(Box::new(source)),
        }
    }
}
