//! Product catalog service.

use std::error::Error as StdError;

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use crate::catalog::{
    models::{Brand, Category, ProductDetail, ProductPage},
    query::ListingQuery,
};

/// Errors returned by the product catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The product does not exist.
    #[error("product not found")]
    NotFound,

    /// The catalog could not be reached.
    #[error("catalog service unreachable")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// The catalog answered with a non-success status.
    #[error("catalog service returned status {status}: {message}")]
    UnexpectedResponse {
        /// HTTP status code.
        status: u16,

        /// Response body or reason.
        message: String,
    },

    /// The catalog response could not be decoded.
    #[error("failed to decode catalog response")]
    Decode(#[source] Box<dyn StdError + Send + Sync>),
}

/// Read access to the product catalog.
#[automock]
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Retrieve one page of products matching `query`.
    async fn list_products(
        &self,
        query: &ListingQuery,
        page_size: u32,
    ) -> Result<ProductPage, CatalogError>;

    /// Retrieve a single product.
    async fn get_product(&self, product_id: &str) -> Result<ProductDetail, CatalogError>;

    /// Retrieve all categories.
    async fn categories(&self) -> Result<Vec<Category>, CatalogError>;

    /// Retrieve all brands.
    async fn brands(&self) -> Result<Vec<Brand>, CatalogError>;
}
