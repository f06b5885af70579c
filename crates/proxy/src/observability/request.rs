//! Per-request logging.

use std::time::{Duration, Instant};

use salvo::{
    Request, handler,
    http::StatusCode,
    prelude::{Depot, FlowCtrl, Response},
};
use tracing::{Instrument as _, error, info, warn};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Logs every request with its status and latency, and flags slow ones.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RequestLogging {
    slow_threshold: Duration,
}

impl RequestLogging {
    pub(crate) fn new(slow_threshold: Duration) -> Self {
        Self { slow_threshold }
    }
}

#[handler]
impl RequestLogging {
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        let started = Instant::now();

        // Clients may tag requests; the header is forwarded upstream untouched.
        let request_id = req
            .header::<String>(REQUEST_ID_HEADER)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_default();

        let method = req.method().to_string();
        let path = req.uri().path().to_owned();

        let span = tracing::info_span!(
            parent: None,
            "http.request",
            request_id = %request_id,
            method = %method,
            path = %path,
            status = tracing::field::Empty,
            duration_ms = tracing::field::Empty
        );

        ctrl.call_next(req, depot, res).instrument(span.clone()).await;

        let _enter = span.enter();

        let duration = started.elapsed();
        let status = res.status_code.unwrap_or(StatusCode::OK);
        let duration_ms = duration.as_millis();

        span.record("status", status.as_u16());
        span.record("duration_ms", duration_ms);

        info!(status = status.as_u16(), duration_ms, "request.completed");

        if status.is_server_error() {
            error!(status = status.as_u16(), method = %method, path = %path, "server error response");
        }

        if duration > self.slow_threshold {
            warn!(
                method = %method,
                path = %path,
                duration_ms,
                threshold_ms = self.slow_threshold.as_millis(),
                "slow request detected"
            );
        }
    }
}
