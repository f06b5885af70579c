//! Order service.

use std::error::Error as StdError;

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use crate::orders::models::{NewOrder, Order, OrderList, OrderStatus};

/// Errors returned by the order service.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The order does not exist or belongs to someone else.
    #[error("order not found")]
    NotFound,

    /// The service refused the request, for example cancelling a shipped order.
    #[error("order rejected: {0}")]
    Rejected(String),

    /// The order service could not be reached.
    #[error("order service unreachable")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// The order service answered with an unexpected status.
    #[error("order service returned status {status}: {message}")]
    UnexpectedResponse {
        /// HTTP status code.
        status: u16,

        /// Response body or reason.
        message: String,
    },

    /// The order service response could not be decoded.
    #[error("failed to decode order response")]
    Decode(#[source] Box<dyn StdError + Send + Sync>),
}

/// Customer orders.
#[automock]
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Submit a new order.
    async fn create_order(&self, order: NewOrder) -> Result<Order, OrderError>;

    /// Retrieve a page of the customer's orders, optionally restricted to one status.
    async fn list_orders(
        &self,
        page: u32,
        size: u32,
        status: Option<OrderStatus>,
    ) -> Result<OrderList, OrderError>;

    /// Retrieve a single order.
    async fn get_order(&self, order_id: String) -> Result<Order, OrderError>;

    /// Move an order to another status.
    async fn update_status(
        &self,
        order_id: String,
        status: OrderStatus,
        notes: Option<String>,
    ) -> Result<Order, OrderError>;

    /// Cancel an order that has not shipped.
    async fn cancel_order(&self, order_id: String) -> Result<(), OrderError>;
}
