//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the query handler on every path
//! - Wire up middleware (tracing, request ID, CORS fallback, timeout, body limit)
//! - Bind server to listener
//! - Drain gracefully on shutdown

use axum::{routing::any, Router};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::RagProxyConfig;
use crate::http::cors;
use crate::http::handler::query_handler;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::search::SearchBackend;

/// Slack between the handler's search timeout and the outer request timeout,
/// so a slow backend is reported by the handler rather than cut by the layer.
const OUTER_TIMEOUT_GRACE_SECS: u64 = 5;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn SearchBackend>,
    pub rag_name: Arc<str>,
    /// Upper bound on waiting for the backend's reply head.
    pub search_timeout: Duration,
}

/// HTTP server for the RAG proxy.
pub struct HttpServer {
    router: Router,
    config: RagProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server forwarding queries to `backend`.
    pub fn new(config: RagProxyConfig, backend: Arc<dyn SearchBackend>) -> Self {
        let state = AppState {
            backend,
            rag_name: Arc::from(config.search.rag_name.as_str()),
            search_timeout: Duration::from_secs(config.timeouts.request_secs),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RagProxyConfig, state: AppState) -> Router {
        let outer_timeout =
            Duration::from_secs(config.timeouts.request_secs + OUTER_TIMEOUT_GRACE_SECS);

        let router = Router::new()
            .route("/{*path}", any(query_handler))
            .route("/", any(query_handler))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_size))
            .layer(TimeoutLayer::new(outer_timeout));

        cors::fallback_layers()
            .into_iter()
            .fold(router, |router, layer| router.layer(layer))
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
            .layer(TraceLayer::new_for_http())
    }

    /// Router with all layers applied, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            rag = %self.config.search.rag_name,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
