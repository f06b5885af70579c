//! Backend Config

use std::time::Duration;

use clap::Args;
use reqwest::Url;

/// Where requests are forwarded.
#[derive(Debug, Args)]
pub struct BackendConfig {
    /// Base URL of the storefront API; request paths are appended to it
    #[arg(
        long,
        env = "BACKEND_URL",
        default_value = "https://mode-dz-backend.onrender.com"
    )]
    pub backend_url: Url,

    /// Upstream request timeout in seconds
    #[arg(long, env = "BACKEND_TIMEOUT_SECONDS", default_value_t = 30_u64)]
    pub backend_timeout_seconds: u64,

    /// Largest request body forwarded, in bytes
    #[arg(long, env = "MAX_BODY_BYTES", default_value_t = 10 * 1024 * 1024)]
    pub max_body_bytes: usize,
}

impl BackendConfig {
    /// Upstream request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.backend_timeout_seconds)
    }
}
