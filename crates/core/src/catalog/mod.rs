//! Product catalog

pub mod browser;
pub mod filters;
pub mod models;
pub mod query;
pub mod service;

pub use browser::{CatalogBrowser, ListingState};
pub use filters::{ProductFilters, ProductSort};
pub use models::{Brand, Category, Product, ProductColor, ProductDetail, ProductPage};
pub use query::{DEFAULT_PAGE_SIZE, ListingQuery, QueryParams, from_query_params, to_query_params};
pub use service::*;
