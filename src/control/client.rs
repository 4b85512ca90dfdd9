//! HTTP client for the Caddy control API.
//!
//! # Responsibilities
//! - POST candidate Caddyfiles to `/adapt` and `/load`
//! - Enforce connect and total timeouts on every call
//! - Cap how much of an error body is kept

use axum::body::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{StatusCode, Url};
use std::fmt;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::config::ControlApiConfig;
use crate::observability::metrics;

/// Content type the control API expects for raw Caddyfiles.
pub const CADDYFILE_CONTENT_TYPE: &str = "text/caddyfile";

/// Control API operations used by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEndpoint {
    /// Convert a Caddyfile to JSON without applying it.
    Adapt,
    /// Replace the running configuration.
    Load,
}

impl ControlEndpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlEndpoint::Adapt => "adapt",
            ControlEndpoint::Load => "load",
        }
    }
}

impl fmt::Display for ControlEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors talking to the control API.
#[derive(Debug, Error)]
pub enum ControlApiError {
    /// The outbound request could not be built (bad base URL, client setup).
    #[error("{0}")]
    Build(String),

    /// Connect failure, timeout, or broken connection.
    #[error("{0}")]
    Transport(#[source] reqwest::Error),
}

/// Status and (possibly truncated) body returned by the control API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ControlResponse {
    /// Only an exact 200 counts as acceptance.
    pub fn is_accepted(&self) -> bool {
        self.status == StatusCode::OK
    }
}

/// Client for one control API base URL.
#[derive(Debug, Clone)]
pub struct ControlApiClient {
    http: reqwest::Client,
    base_url: String,
    max_response_bytes: usize,
}

impl ControlApiClient {
    /// Build a client from settings. The base URL is checked per call so a
    /// bad value surfaces as a request construction failure.
    pub fn new(config: &ControlApiConfig, max_response_bytes: usize) -> Result<Self, ControlApiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ControlApiError::Build(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
            max_response_bytes,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an endpoint, resolved under any path prefix of the base.
    pub fn endpoint_url(&self, endpoint: ControlEndpoint) -> Result<Url, ControlApiError> {
        let invalid = |reason: String| {
            ControlApiError::Build(format!("invalid control API URL '{}': {reason}", self.base_url))
        };

        let mut base = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(invalid("not a hierarchical URL".to_string()));
        }
        if base.query().is_some() || base.fragment().is_some() {
            return Err(invalid("query strings and fragments are not allowed".to_string()));
        }

        // `join` replaces the last segment unless the path ends in '/'.
        let dir = format!("{}/", base.path().trim_end_matches('/'));
        base.set_path(&dir);
        base.join(endpoint.as_str()).map_err(|e| invalid(e.to_string()))
    }

    /// Ask the control API to adapt (syntax check) a Caddyfile.
    pub async fn adapt(&self, caddyfile: Bytes) -> Result<ControlResponse, ControlApiError> {
        self.post(ControlEndpoint::Adapt, caddyfile).await
    }

    /// Ask the control API to load (activate) a Caddyfile.
    pub async fn load(&self, caddyfile: Bytes) -> Result<ControlResponse, ControlApiError> {
        self.post(ControlEndpoint::Load, caddyfile).await
    }

    async fn post(
        &self,
        endpoint: ControlEndpoint,
        caddyfile: Bytes,
    ) -> Result<ControlResponse, ControlApiError> {
        let start = Instant::now();
        let url = self.endpoint_url(endpoint)?;

        tracing::debug!(
            endpoint = %endpoint,
            url = %url,
            bytes = caddyfile.len(),
            "Calling control API"
        );

        let response = match self
            .http
            .post(url)
            .header(CONTENT_TYPE, CADDYFILE_CONTENT_TYPE)
            .body(caddyfile)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                metrics::record_control_call(endpoint.as_str(), "error", start);
                return Err(ControlApiError::Transport(e));
            }
        };

        let status = response.status();
        let body = self.read_body(endpoint, response).await;
        metrics::record_control_call(endpoint.as_str(), status.as_str(), start);

        tracing::debug!(
            endpoint = %endpoint,
            status = %status,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Control API responded"
        );

        Ok(ControlResponse { status, body })
    }

    /// Read up to `max_response_bytes` of the body. A body that fails midway
    /// keeps whatever arrived.
    async fn read_body(&self, endpoint: ControlEndpoint, mut response: reqwest::Response) -> String {
        let mut buf: Vec<u8> = Vec::new();
        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => {
                    let room = self.max_response_bytes.saturating_sub(buf.len());
                    if chunk.len() >= room {
                        buf.extend_from_slice(&chunk[..room]);
                        if chunk.len() > room {
                            tracing::warn!(
                                endpoint = %endpoint,
                                limit = self.max_response_bytes,
                                "Control API response truncated"
                            );
                        }
                        break;
                    }
                    buf.extend_from_slice(&chunk);
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(endpoint = %endpoint, error = %e, "Failed to read control API response body");
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}
