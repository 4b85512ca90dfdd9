//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the Caddyfile API and static assets
//! - Wire up middleware (tracing, limits, timeouts, request ID)
//! - Bind server to listener and shut down gracefully

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::EditorConfig;
use crate::control::ControlApiClient;
use crate::http::handlers::{api_not_found, get_caddyfile, update_caddyfile, validate_caddyfile};
use crate::http::request::{request_id, RequestUuid};
use crate::store::CaddyfileStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CaddyfileStore>,
    pub control: ControlApiClient,
}

/// HTTP server for the Caddyfile editor.
pub struct HttpServer {
    router: Router,
    config: EditorConfig,
}

impl HttpServer {
    /// Create a new HTTP server. The store should already be bootstrapped.
    pub fn new(config: EditorConfig, store: Arc<CaddyfileStore>, control: ControlApiClient) -> Self {
        let state = AppState { store, control };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &EditorConfig, state: AppState) -> Router {
        let api = Router::new()
            .route("/caddyfile", get(get_caddyfile))
            .route("/caddyfile/validate", post(validate_caddyfile))
            .route("/caddyfile/update", post(update_caddyfile))
            .fallback(api_not_found);

        let max_body = config.limits.max_body_bytes;

        Router::new()
            .nest("/api", api)
            .fallback_service(ServeDir::new(&config.storage.static_dir))
            .with_state(state)
            .layer(DefaultBodyLimit::max(max_body))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(RequestUuid))
                    .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        tracing::info_span!(
                            "request",
                            request_id = %request_id(request),
                            method = %request.method(),
                            path = %request.uri().path(),
                        )
                    }))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(RequestBodyLimitLayer::new(max_body))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.limits.request_timeout_secs,
                    ))),
            )
    }

    /// The router, for in-process use (tests, embedding).
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
            caddyfile = %self.config.storage.caddyfile_path,
            static_dir = %self.config.storage.static_dir,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }
}
