//! HTTP Server

use std::time::Duration;

use anyhow::Result;
use axum::async_trait;
use axum_server::Handle;
use clap::Parser;
use tokio::signal;
use tracing::{debug, error};

pub mod errors;
mod handlers;
mod open_api;
pub mod servers;
pub mod state;

/// Configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
pub struct HttpServerConfig {
    /// The port to listen on
    #[clap(long, env = "HTTP_PORT", default_value = "8083")]
    pub http_port: u16,

    /// Largest request body accepted, in bytes
    #[clap(long, env = "MAX_REQUEST_BYTES", default_value = "16777216")]
    pub max_request_bytes: usize,
}

/// A server that runs until shut down
#[async_trait]
pub trait Server: Send + Sized {
    /// Serve requests until a shutdown signal arrives
    async fn run(self) -> Result<()>;
}

/// Waits for Ctrl+C or SIGTERM, then starts draining `handle`.
#[mutants::skip]
async fn shutdown_signal(handle: Option<Handle>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("failed to listen for Ctrl+C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!("failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    if let Some(handle) = handle {
        debug!("shutting down gracefully");
        handle.graceful_shutdown(Some(Duration::from_secs(10)));
    }
}
