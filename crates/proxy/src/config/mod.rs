//! Proxy configuration

use clap::Parser;

use crate::config::{backend::BackendConfig, logging::LoggingConfig, server::ListenConfig};

pub(crate) mod backend;
pub(crate) mod logging;
pub(crate) mod server;

/// Mode DZ reverse proxy configuration
#[derive(Debug, Parser)]
#[command(name = "modedz-proxy", about = "Mode DZ API reverse proxy", long_about = None)]
pub struct ProxyConfig {
    /// Listener settings.
    #[command(flatten)]
    pub server: ListenConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Upstream API settings.
    #[command(flatten)]
    pub backend: BackendConfig,
}

impl ProxyConfig {
    /// Load configuration from `.env`, the environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}
