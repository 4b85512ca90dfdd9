//! Metrics collection and exposition.
//!
//! # Metrics
//! - `caddyfile_requests_total` (counter): API requests by route, status
//! - `caddyfile_request_duration_seconds` (histogram): API latency by route
//! - `caddyfile_control_calls_total` (counter): control API calls by endpoint, outcome
//! - `caddyfile_control_call_duration_seconds` (histogram): control API latency
//!
//! Recording is a no-op until a recorder is installed, so handlers and tests
//! can call these freely.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus scrape endpoint. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one handled API request.
pub fn record_request(route: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "caddyfile_requests_total",
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("caddyfile_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

/// Record one control API call. `outcome` is the status code or "error".
pub fn record_control_call(endpoint: &'static str, outcome: &str, start: Instant) {
    metrics::counter!(
        "caddyfile_control_calls_total",
        "endpoint" => endpoint,
        "outcome" => outcome.to_string()
    )
    .increment(1);
    metrics::histogram!("caddyfile_control_call_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}
