//! Proxy healthcheck
//!
//! Answered by the proxy itself; the backend is named but never contacted, so a failing
//! backend does not take the proxy out of rotation.

use std::sync::Arc;

use salvo::prelude::*;
use serde::{Deserialize, Serialize};

use crate::state::State;

/// Healthcheck body.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok` while the proxy is serving.
    pub status: String,

    /// Backend requests are forwarded to.
    pub backend: Option<String>,
}

#[handler]
pub(crate) async fn handler(depot: &mut Depot) -> Json<HealthResponse> {
    let backend = depot
        .obtain::<Arc<State>>()
        .ok()
        .map(|state| state.forwarder.backend().to_string());

    Json(HealthResponse {
        status: "ok".to_string(),
        backend,
    })
}
