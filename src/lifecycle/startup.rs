//! Startup orchestration.
//!
//! Order: bootstrap the Caddyfile, build the control API client, start
//! metrics, then hand a ready server back to the caller to bind. Any
//! failure here is fatal.

use metrics_exporter_prometheus::BuildError;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;

use crate::config::EditorConfig;
use crate::control::{ControlApiClient, ControlApiError};
use crate::http::HttpServer;
use crate::observability::metrics;
use crate::store::{BootstrapOutcome, CaddyfileStore, StoreError};

/// Reasons the editor could not start.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("cannot prepare Caddyfile: {0}")]
    Store(#[from] StoreError),

    #[error("cannot build control API client: {0}")]
    Control(#[from] ControlApiError),

    #[error("cannot start metrics endpoint: {0}")]
    Metrics(#[from] BuildError),

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("cannot bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Make sure the Caddyfile exists, creating it empty if missing.
pub async fn bootstrap_store(config: &EditorConfig) -> Result<Arc<CaddyfileStore>, StartupError> {
    let store = CaddyfileStore::new(&config.storage.caddyfile_path);

    match store.bootstrap().await? {
        BootstrapOutcome::Existing(bytes) => {
            tracing::info!(path = %store.path().display(), bytes, "Caddyfile found");
        }
        BootstrapOutcome::Created => {
            tracing::warn!(path = %store.path().display(), "Caddyfile missing, created an empty one");
        }
    }

    Ok(Arc::new(store))
}

/// Initialize every subsystem and return a server ready to run.
pub async fn prepare(config: EditorConfig) -> Result<HttpServer, StartupError> {
    let store = bootstrap_store(&config).await?;

    let control = ControlApiClient::new(&config.control_api, config.limits.max_control_response_bytes)?;
    tracing::info!(
        control_api = %control.base_url(),
        connect_timeout_secs = config.control_api.connect_timeout_secs,
        request_timeout_secs = config.control_api.request_timeout_secs,
        "Control API client ready"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    Ok(HttpServer::new(config, store, control))
}

/// Bind the configured listener address.
pub async fn bind(config: &EditorConfig) -> Result<tokio::net::TcpListener, StartupError> {
    let address = config.listener.bind_address.clone();
    tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })
}
