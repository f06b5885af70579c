//! App Context

use std::sync::Arc;

use modedz::{
    CartController,
    catalog::ProductCatalog,
    orders::{Checkout, OrderService},
};
use thiserror::Error;

use crate::{
    api::{ApiClient, ApiClientError},
    catalog::HttpProductCatalog,
    config::AppConfig,
    orders::HttpOrderService,
    pricing::HttpCartPricer,
    storage::FileStorage,
};

/// Errors raised while assembling the application.
#[derive(Debug, Error)]
pub enum AppInitError {
    /// The API client could not be built.
    #[error("failed to configure API client")]
    Api(#[from] ApiClientError),
}

/// Services shared by every command.
#[derive(Clone)]
pub struct AppContext {
    /// The shopper's cart, persisted on disk.
    pub cart: Arc<CartController<FileStorage>>,

    /// Product catalog.
    pub catalog: Arc<dyn ProductCatalog>,

    /// Order service.
    pub orders: Arc<dyn OrderService>,
}

impl AppContext {
    /// Build the application context from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the API client cannot be configured.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppInitError> {
        let api = ApiClient::new(&config.api)?;
        let storage = FileStorage::new(&config.storage.data_dir);

        Ok(Self {
            cart: Arc::new(CartController::new(
                storage,
                Arc::new(HttpCartPricer::new(api.clone())),
            )),
            catalog: Arc::new(HttpProductCatalog::new(api.clone())),
            orders: Arc::new(HttpOrderService::new(api)),
        })
    }

    /// Checkout over this context's order service.
    pub fn checkout(&self) -> Checkout {
        Checkout::new(Arc::clone(&self.orders))
    }
}
