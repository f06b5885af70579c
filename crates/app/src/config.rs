//! App Config

use std::{path::PathBuf, time::Duration};

use clap::{Args, ValueEnum};

/// Storefront API connection settings.
#[derive(Debug, Clone, Args)]
pub struct ApiConfig {
    /// Base URL of the storefront REST API
    #[arg(
        long,
        env = "MODEDZ_API_URL",
        default_value = "http://localhost:8000/api/v1",
        global = true
    )]
    pub api_url: String,

    /// Bearer token sent with every API request
    #[arg(long, env = "MODEDZ_API_TOKEN", hide_env_values = true, global = true)]
    pub api_token: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(
        long,
        env = "MODEDZ_HTTP_TIMEOUT_SECONDS",
        default_value_t = 30,
        global = true
    )]
    pub http_timeout_seconds: u64,
}

impl ApiConfig {
    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }
}

/// Local storage settings.
#[derive(Debug, Clone, Args)]
pub struct StorageConfig {
    /// Directory holding the persisted cart
    #[arg(long, env = "MODEDZ_DATA_DIR", default_value = ".modedz", global = true)]
    pub data_dir: PathBuf,
}

/// Log output format.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    #[default]
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,
}

/// Everything the storefront client needs to start.
#[derive(Debug, Clone, Args)]
pub struct AppConfig {
    /// API connection.
    #[command(flatten)]
    pub api: ApiConfig,

    /// Local storage.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Logging.
    #[command(flatten)]
    pub logging: LoggingConfig,
}
