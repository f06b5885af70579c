//! HTTP product catalog

use async_trait::async_trait;
use modedz::catalog::{
    Brand, CatalogError, Category, ListingQuery, ProductCatalog, ProductDetail, ProductPage,
};
use reqwest::{Method, StatusCode, Url};

use crate::api::{ApiClient, ApiError};

/// [`ProductCatalog`] backed by the `/products` endpoints.
#[derive(Debug, Clone)]
pub struct HttpProductCatalog {
    api: ApiClient,
}

impl HttpProductCatalog {
    /// Browse the catalog through `api`.
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Listing request URL for `query`.
    pub fn listing_url(&self, query: &ListingQuery, page_size: u32) -> Url {
        let mut url = self.api.endpoint(&["products"]);

        url.query_pairs_mut()
            .extend_pairs(query.service_params(page_size));

        url
    }
}

#[async_trait]
impl ProductCatalog for HttpProductCatalog {
    async fn list_products(
        &self,
        query: &ListingQuery,
        page_size: u32,
    ) -> Result<ProductPage, CatalogError> {
        let request = self
            .api
            .request(Method::GET, self.listing_url(query, page_size));

        Ok(ApiClient::send_json(request).await?)
    }

    async fn get_product(&self, product_id: &str) -> Result<ProductDetail, CatalogError> {
        let request = self
            .api
            .request(Method::GET, self.api.endpoint(&["products", product_id]));

        Ok(ApiClient::send_json(request).await?)
    }

    async fn categories(&self) -> Result<Vec<Category>, CatalogError> {
        let request = self
            .api
            .request(Method::GET, self.api.endpoint(&["products", "categories"]));

        Ok(ApiClient::send_json(request).await?)
    }

    async fn brands(&self) -> Result<Vec<Brand>, CatalogError> {
        let request = self
            .api
            .request(Method::GET, self.api.endpoint(&["products", "brands"]));

        Ok(ApiClient::send_json(request).await?)
    }
}

impl From<ApiError> for CatalogError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Transport(source) => Self::Transport(Box::new(source)),
            ApiError::Status { status, .. } if status == StatusCode::NOT_FOUND => Self::NotFound,
            ApiError::Status { status, message } => Self::UnexpectedResponse {
                status: status.as_u16(),
                message,
            },
            ApiError::Decode(source) => Self::Decode(Box::new(source)),
        }
    }
}
