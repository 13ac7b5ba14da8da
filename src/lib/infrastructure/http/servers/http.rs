//! The gateway's HTTP server.

use std::net::{SocketAddr, TcpListener};

use anyhow::{Context, Result};
use axum::{async_trait, extract::DefaultBodyLimit, extract::Request, routing::get, Router};
use axum_server::Handle;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{debug, info, info_span};

use crate::{
    domain::communication::emails::EmailService,
    infrastructure::http::{
        handlers::{health, panic_handler, v1},
        shutdown_signal,
        state::AppState,
        Server,
    },
};

/// The gateway's HTTP server
#[derive(Debug)]
pub struct HttpServer {
    router: Router,
    listener: TcpListener,
}

impl HttpServer {
    /// Returns a new HTTP server bound to `address`.
    pub async fn new(address: SocketAddr, state: AppState<impl EmailService>) -> Result<Self> {
        let listener = TcpListener::bind(address)
            .with_context(|| format!("failed to listen on {address}"))?;

        listener
            .set_nonblocking(true)
            .context("failed to make the listener non-blocking")?;

        Ok(Self {
            router: router(state),
            listener,
        })
    }
}

#[async_trait]
impl Server for HttpServer {
    #[mutants::skip]
    async fn run(self) -> Result<()> {
        info!(
            "HTTP Server listening on {}",
            self.listener
                .local_addr()
                .context("failed to get local address")?
        );

        let handle = Handle::new();

        tokio::spawn(shutdown_signal(Some(handle.clone())));

        axum_server::from_tcp(self.listener)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await
            .context("server error")?;

        debug!("HTTP server stopped");

        Ok(())
    }
}

/// Create the router for the HTTP server
pub fn router<E: EmailService>(state: AppState<E>) -> Router {
    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
        let uri = request.uri().to_string();
        info_span!("http_request", method = ?request.method(), uri)
    });

    Router::new()
        .route("/api/ccg/healthz", get(health::handler::<E>))
        .nest("/api/ccg/v1", v1::router())
        .layer(DefaultBodyLimit::max(state.config.max_request_bytes))
        .layer(CatchPanicLayer::custom(panic_handler))
        .layer(trace_layer)
        .with_state(state)
}
