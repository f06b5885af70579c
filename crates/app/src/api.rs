//! Storefront API client
//!
//! Thin wrapper over [`reqwest::Client`] shared by the HTTP adapters: it resolves endpoint
//! paths against the configured base URL, attaches the bearer token and turns responses into
//! decoded bodies or an [`ApiError`].

use std::str::FromStr;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::debug;

use crate::config::ApiConfig;

/// Errors raised while building the client.
#[derive(Debug, Error)]
pub enum ApiClientError {
    /// The base URL could not be parsed.
    #[error("invalid API URL {url}")]
    InvalidUrl {
        /// The configured value.
        url: String,

        /// Parser error.
        #[source]
        source: <Url as FromStr>::Err,
    },

    /// The base URL cannot have paths appended to it.
    #[error("API URL {0} cannot be used as a base")]
    NotABase(String),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),
}

/// Errors raised by an API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the response could not be read.
    #[error("http error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("unexpected status {status}: {message}")]
    Status {
        /// HTTP status.
        status: StatusCode,

        /// Error detail extracted from the body.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("failed to decode response body")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// HTTP client bound to the storefront API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: Url,
    token: Option<String>,
    http: Client,
}

impl ApiClient {
    /// Create a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL is invalid or the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiClientError> {
        let base = Url::parse(&config.api_url).map_err(|source| ApiClientError::InvalidUrl {
            url: config.api_url.clone(),
            source,
        })?;

        if base.cannot_be_a_base() {
            return Err(ApiClientError::NotABase(config.api_url.clone()));
        }

        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(ApiClientError::Client)?;

        Ok(Self {
            base,
            token: config.api_token.clone().filter(|token| !token.is_empty()),
            http,
        })
    }

    /// Base URL.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// URL of the endpoint made of `segments` below the base URL. Segments are
    /// percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();

        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }

        url
    }

    /// Start a request to `url`, authenticated when a token is configured.
    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let request = self.http.request(method, url);

        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send `request` and decode a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status or undecodable body.
    pub async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
        let response = Self::send(request).await?;
        let body = response.bytes().await?;

        Ok(serde_json::from_slice(&body)?)
    }

    /// Send `request`, keeping the response when its status is a success.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-success status.
    pub async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        debug!(%status, url = %response.url(), "api response");

        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();

        Err(ApiError::Status {
            status,
            message: error_message(&text),
        })
    }
}

/// The `detail` of an API error body, or the raw body when it has none.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map_or_else(|_| body.trim().to_string(), |error| error.detail)
}
