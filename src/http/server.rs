//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the forwarding handler as catch-all
//! - Wire up middleware (tracing)
//! - Bind server to listener
//! - Drain in-flight requests on shutdown

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::{ConfigError, RelayConfig};
use crate::http::forward::Forwarder;
use crate::lifecycle::shutdown;

/// HTTP server hosting the forwarding handler.
pub struct RelayServer {
    router: Router,
    config: RelayConfig,
    forwarder: Arc<Forwarder>,
}

impl RelayServer {
    /// Create a new server with the given configuration.
    pub fn new(config: RelayConfig) -> Result<Self, ConfigError> {
        let forwarder = Arc::new(Forwarder::new(&config)?);

        match forwarder.origin() {
            Some(origin) => tracing::info!(origin = %origin, "Forwarding to origin"),
            None => tracing::warn!(
                binding = %config.origin.env_var,
                "No origin configured; every request will fail with 500"
            ),
        }

        let router = Self::build_router(forwarder.clone());
        Ok(Self {
            router,
            config,
            forwarder,
        })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// The response deadline is enforced by the forwarder, not a layer, so
    /// that a slow origin is reported as 502.
    fn build_router(forwarder: Arc<Forwarder>) -> Router {
        // Fallback rather than a path route so that every method and
        // request-target form reaches the handler.
        Router::new()
            .fallback(forward_handler)
            .with_state(forwarder)
            .layer(TraceLayer::new_for_http())
    }

    /// The fully layered router, for serving in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Get the forwarding handler.
    pub fn forwarder(&self) -> &Forwarder {
        &self.forwarder
    }
}

async fn forward_handler(State(forwarder): State<Arc<Forwarder>>, request: Request<Body>) -> Response {
    forwarder.forward(request).await
}
