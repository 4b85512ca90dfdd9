//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. All errors are
//! collected rather than stopping at the first one.

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::EditorConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("control API base URL is not set (use CADDY_API)")]
    MissingControlApi,

    #[error("control API base URL '{url}' is invalid: {reason}")]
    InvalidControlApi { url: String, reason: String },

    #[error("bind address '{0}' is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("metrics address '{0}' is not a valid socket address")]
    InvalidMetricsAddress(String),

    #[error("caddyfile path must not be empty")]
    EmptyCaddyfilePath,

    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),

    #[error(
        "limits.request_timeout_secs ({request}) must exceed control_api.request_timeout_secs ({control})"
    )]
    RequestTimeoutTooShort { request: u64, control: u64 },
}

/// Validate a fully merged configuration.
pub fn validate_config(config: &EditorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let base_url = config.control_api.base_url.trim();
    if base_url.is_empty() {
        errors.push(ValidationError::MissingControlApi);
    } else {
        match Url::parse(base_url) {
            Ok(url) if url.query().is_some() || url.fragment().is_some() => {
                errors.push(ValidationError::InvalidControlApi {
                    url: base_url.to_string(),
                    reason: "query strings and fragments are not allowed".to_string(),
                })
            }
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(ValidationError::InvalidControlApi {
                url: base_url.to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            }),
            Err(e) => errors.push(ValidationError::InvalidControlApi {
                url: base_url.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.storage.caddyfile_path.trim().is_empty() {
        errors.push(ValidationError::EmptyCaddyfilePath);
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroValue("limits.max_body_bytes"));
    }
    if config.limits.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue("limits.request_timeout_secs"));
    }
    if config.control_api.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue("control_api.request_timeout_secs"));
    }

    if config.limits.request_timeout_secs <= config.control_api.request_timeout_secs {
        errors.push(ValidationError::RequestTimeoutTooShort {
            request: config.limits.request_timeout_secs,
            control: config.control_api.request_timeout_secs,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
