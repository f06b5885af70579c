//! Request forwarding
//!
//! Every request that is not answered locally is replayed against the backend: same method,
//! path, query, headers (minus `Host` and hop-by-hop headers) and, except for `GET` and `HEAD`,
//! the same body. The backend's status, headers and body are copied back verbatim. When the
//! backend cannot be reached the proxy answers `503` with a JSON error body.

use std::{error::Error as StdError, sync::Arc, time::Duration};

use reqwest::{Client, Url, redirect::Policy};
use salvo::{
    http::{HeaderMap, HeaderName, Method, ParseError, StatusCode, header},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::state::State;

/// Errors raised while building the forwarder.
#[derive(Debug, Error)]
pub(crate) enum ForwarderError {
    /// The backend URL has no path to append request paths to.
    #[error("backend URL {0} cannot be used as a base")]
    NotABase(Url),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Errors raised while relaying a single request.
#[derive(Debug, Error)]
pub(crate) enum UpstreamError {
    /// The incoming body could not be read.
    #[error("could not read request body")]
    Payload(#[source] ParseError),

    /// The backend could not be reached or did not answer.
    #[error("backend request failed")]
    Unavailable(#[source] reqwest::Error),
}

/// Body of the `503` answer sent when the backend is unreachable.
#[derive(Debug, Serialize, Deserialize)]
pub struct UnavailableResponse {
    /// Fixed error label.
    pub error: String,

    /// Cause reported by the HTTP client.
    pub message: String,
}

/// Forwards requests to one backend.
#[derive(Debug, Clone)]
pub(crate) struct Forwarder {
    backend: Url,
    http: Client,
    max_body_bytes: usize,
}

impl Forwarder {
    pub(crate) fn new(
        backend: Url,
        timeout: Duration,
        max_body_bytes: usize,
    ) -> Result<Self, ForwarderError> {
        if backend.cannot_be_a_base() {
            return Err(ForwarderError::NotABase(backend));
        }

        // Redirects are the client's business.
        let http = Client::builder()
            .timeout(timeout)
            .redirect(Policy::none())
            .build()
            .map_err(ForwarderError::Client)?;

        Ok(Self {
            backend,
            http,
            max_body_bytes,
        })
    }

    /// Base URL requests are forwarded to.
    pub(crate) fn backend(&self) -> &Url {
        &self.backend
    }

    /// Backend URL for a request path and query.
    pub(crate) fn target_url(&self, path: &str, query: Option<&str>) -> Url {
        let mut url = self.backend.clone();
        let prefix = self.backend.path().trim_end_matches('/');

        url.set_path(&format!("{prefix}{path}"));
        url.set_query(query);
        url.set_fragment(None);

        url
    }

    async fn send(&self, req: &mut Request) -> Result<reqwest::Response, UpstreamError> {
        let method = req.method().clone();
        let url = self.target_url(req.uri().path(), req.uri().query());

        debug!(%method, %url, "forwarding request");

        let mut request = self
            .http
            .request(method.clone(), url)
            .headers(forwardable(req.headers(), true));

        if method != Method::GET && method != Method::HEAD {
            let body = req
                .payload_with_max_size(self.max_body_bytes)
                .await
                .map_err(UpstreamError::Payload)?
                .clone();

            request = request.body(body);
        }

        request.send().await.map_err(UpstreamError::Unavailable)
    }

    async fn relay(&self, req: &mut Request, res: &mut Response) -> Result<(), UpstreamError> {
        let upstream = self.send(req).await?;
        let status = upstream.status();
        let headers = forwardable(upstream.headers(), false);
        let body = upstream
            .bytes()
            .await
            .map_err(UpstreamError::Unavailable)?;

        res.status_code(status);
        res.headers_mut().extend(headers);
        res.body(body);

        Ok(())
    }
}

fn is_hop_by_hop(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "connection"
            | "keep-alive"
            | "proxy-authenticate"
            | "proxy-authorization"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
    )
}

fn forwardable(headers: &HeaderMap, outgoing: bool) -> HeaderMap {
    let mut kept = HeaderMap::with_capacity(headers.len());

    for (name, value) in headers {
        // The HTTP client sets `Host` for the backend.
        if is_hop_by_hop(name) || (outgoing && name == header::HOST) {
            continue;
        }

        kept.append(name.clone(), value.clone());
    }

    kept
}

fn describe(error: &dyn StdError) -> String {
    let mut message = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    message
}

/// Catch-all handler relaying the request to the backend.
#[handler]
pub(crate) async fn handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let Ok(state) = depot.obtain::<Arc<State>>() else {
        error!("proxy state missing from depot");
        res.render(StatusError::internal_server_error());
        return;
    };

    let forwarder = state.forwarder.clone();

    match forwarder.relay(req, res).await {
        Ok(()) => {}
        Err(UpstreamError::Payload(ParseError::PayloadTooLarge)) => {
            warn!(
                limit = forwarder.max_body_bytes,
                "rejecting request body over the size limit"
            );
            res.render(StatusError::payload_too_large());
        }
        Err(UpstreamError::Payload(source)) => {
            warn!("rejecting request body: {source}");
            res.render(StatusError::bad_request().brief("Could not read request body"));
        }
        Err(UpstreamError::Unavailable(source)) => {
            let message = describe(&source);

            error!("backend unavailable: {message}");

            res.status_code(StatusCode::SERVICE_UNAVAILABLE);
            res.render(Json(UnavailableResponse {
                error: "Backend service unavailable".to_string(),
                message,
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use salvo::{
        affix_state::inject,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener as TokioListener,
        task::JoinHandle,
    };

    use super::*;

    const ORDER_JSON: &str = r#"{"id":"o-1"}"#;

    fn forwarder(backend: &str) -> Result<Forwarder, Box<dyn StdError>> {
        Ok(Forwarder::new(
            backend.parse()?,
            Duration::from_secs(5),
            1024 * 1024,
        )?)
    }

    fn service(forwarder: Forwarder) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(State::shared(forwarder)))
                .push(Router::with_path("{**rest}").goal(handler)),
        )
    }

    fn request_complete(received: &[u8]) -> bool {
        let text = String::from_utf8_lossy(received);

        let Some((head, body)) = text.split_once("\r\n\r\n") else {
            return false;
        };

        let length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        body.len() >= length
    }

    /// Accepts one connection, answers `201` with [`ORDER_JSON`] and returns the raw request.
    async fn one_shot_backend() -> io::Result<(String, JoinHandle<io::Result<String>>)> {
        let listener = TokioListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let task = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await?;
            let mut received = Vec::new();

            while !request_complete(&received) {
                if stream.read_buf(&mut received).await? == 0 {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 201 Created\r\ncontent-type: application/json\r\nx-backend: fastapi\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{ORDER_JSON}",
                ORDER_JSON.len()
            );

            stream.write_all(response.as_bytes()).await?;
            stream.shutdown().await?;

            Ok(String::from_utf8_lossy(&received).into_owned())
        });

        Ok((format!("http://{addr}"), task))
    }

    #[test]
    fn target_url_appends_path_and_query_to_backend() -> TestResult {
        let forwarder = forwarder("https://api.example.com/")?;

        assert_eq!(
            forwarder
                .target_url("/api/v1/products", Some("category=robes&page=2"))
                .as_str(),
            "https://api.example.com/api/v1/products?category=robes&page=2"
        );

        Ok(())
    }

    #[test]
    fn target_url_keeps_backend_path_prefix() -> TestResult {
        let forwarder = forwarder("https://example.com/backend")?;

        assert_eq!(
            forwarder.target_url("/api/v1/orders", None).as_str(),
            "https://example.com/backend/api/v1/orders"
        );

        Ok(())
    }

    #[test]
    fn hop_by_hop_and_host_headers_are_not_forwarded() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, header::HeaderValue::from_static("mode.dz"));
        headers.insert(header::CONNECTION, header::HeaderValue::from_static("keep-alive"));
        headers.insert(header::AUTHORIZATION, header::HeaderValue::from_static("Bearer t"));

        let outgoing = forwardable(&headers, true);

        assert!(outgoing.get(header::HOST).is_none(), "host must be dropped");
        assert!(outgoing.get(header::CONNECTION).is_none(), "connection must be dropped");
        assert!(outgoing.get(header::AUTHORIZATION).is_some(), "auth must be kept");

        let incoming = forwardable(&headers, false);

        assert!(incoming.get(header::HOST).is_some(), "host is only dropped outgoing");
    }

    #[tokio::test]
    async fn forwards_request_and_copies_response() -> TestResult {
        let (backend, upstream) = one_shot_backend().await?;

        let mut response = TestClient::post("http://mode.dz/api/v1/orders?notify=true")
            .add_header("host", "mode.dz", true)
            .add_header("authorization", "Bearer secret", true)
            .raw_json(r#"{"items":[]}"#)
            .send(&service(forwarder(&backend)?))
            .await;

        let seen = upstream.await??;

        assert_eq!(response.status_code, Some(StatusCode::CREATED));
        assert_eq!(
            response
                .headers()
                .get("x-backend")
                .and_then(|value| value.to_str().ok()),
            Some("fastapi")
        );
        assert_eq!(response.take_string().await?, ORDER_JSON);

        assert!(
            seen.starts_with("POST /api/v1/orders?notify=true HTTP/1.1"),
            "unexpected request line: {seen}"
        );
        assert!(
            !seen.to_ascii_lowercase().contains("host: mode.dz"),
            "original host leaked upstream: {seen}"
        );
        assert!(
            seen.contains("Bearer secret"),
            "authorization not forwarded: {seen}"
        );
        assert!(seen.ends_with(r#"{"items":[]}"#), "body not forwarded: {seen}");

        Ok(())
    }

    #[tokio::test]
    async fn get_requests_are_forwarded_without_body() -> TestResult {
        let (backend, upstream) = one_shot_backend().await?;

        let response = TestClient::get("http://mode.dz/api/v1/products?size=M")
            .send(&service(forwarder(&backend)?))
            .await;

        let seen = upstream.await??;

        assert_eq!(response.status_code, Some(StatusCode::CREATED));
        assert!(
            seen.starts_with("GET /api/v1/products?size=M HTTP/1.1"),
            "unexpected request line: {seen}"
        );
        assert!(seen.ends_with("\r\n\r\n"), "GET carried a body: {seen}");

        Ok(())
    }

    #[tokio::test]
    async fn unreachable_backend_answers_503_json() -> TestResult {
        let mut response = TestClient::get("http://mode.dz/api/v1/products")
            .send(&service(forwarder("http://127.0.0.1:9")?))
            .await;

        assert_eq!(response.status_code, Some(StatusCode::SERVICE_UNAVAILABLE));

        let body: UnavailableResponse = response.take_json().await?;

        assert_eq!(body.error, "Backend service unavailable");
        assert!(!body.message.is_empty(), "expected a cause in the message");

        Ok(())
    }

    #[tokio::test]
    async fn oversized_body_answers_413_without_forwarding() -> TestResult {
        let small = Forwarder::new("http://127.0.0.1:9".parse()?, Duration::from_secs(1), 16)?;

        let response = TestClient::post("http://mode.dz/api/v1/orders")
            .raw_json(r#"{"items":[{"product_id":"p1","quantity":2}]}"#)
            .send(&service(small))
            .await;

        assert_eq!(response.status_code, Some(StatusCode::PAYLOAD_TOO_LARGE));

        Ok(())
    }

    #[test]
    fn rejects_backend_that_cannot_be_a_base() -> TestResult {
        let result = Forwarder::new(
            "mailto:ops@mode.dz".parse()?,
            Duration::from_secs(1),
            1024,
        );

        assert!(
            matches!(result, Err(ForwarderError::NotABase(_))),
            "expected NotABase, got {result:?}"
        );

        Ok(())
    }
}
