//! Mode DZ API reverse proxy

use std::{process, time::Duration};

use salvo::{affix_state::inject, prelude::*};
use tracing::{error, info};

use crate::{
    config::ProxyConfig, forward::Forwarder, observability::RequestLogging, state::State,
};

mod config;
mod forward;
mod healthcheck;
mod observability;
mod shutdown;
mod state;

/// Builds the proxy router: the healthcheck is answered locally, everything else is forwarded.
fn router(forwarder: Forwarder, logging: RequestLogging) -> Router {
    Router::new()
        .hoop(CatchPanic::new())
        .hoop(logging)
        .hoop(inject(State::shared(forwarder)))
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("{**rest}").goal(forward::handler))
}

/// Proxy entry point
#[tokio::main]
pub async fn main() {
    let config = ProxyConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    if let Err(init_error) = observability::init(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialize, must use eprintln"
        )]
        {
            eprintln!("{init_error}");
        }

        process::exit(1);
    }

    let forwarder = match Forwarder::new(
        config.backend.backend_url.clone(),
        config.backend.timeout(),
        config.backend.max_body_bytes,
    ) {
        Ok(forwarder) => forwarder,
        Err(init_error) => {
            error!("failed to configure backend: {init_error}");

            process::exit(1);
        }
    };

    let logging = RequestLogging::new(Duration::from_millis(
        config.logging.slow_request_threshold_ms,
    ));

    let addr = config.server.socket_addr();

    info!(backend = %config.backend.backend_url, %addr, "starting proxy");

    let listener = TcpListener::new(addr).bind().await;
    let server = Server::new(listener);
    let handle = server.handle();

    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    server.serve(router(forwarder, logging)).await;
}
