//! Error responses.
//!
//! Every failure is answered in plain text. Control API rejections keep the
//! control API's status code; local failures map to 400/413/500.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::control::ControlApiError;
use crate::store::StoreError;

/// Content type of every plain-text API response.
pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Failure of an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The inbound body could not be read or was too large.
    #[error("{context}: {message}")]
    Body {
        context: &'static str,
        status: StatusCode,
        message: String,
    },

    /// Reading or writing the Caddyfile failed.
    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        #[source]
        source: StoreError,
    },

    /// The control API could not be reached.
    #[error("{context}: {source}")]
    Control {
        context: &'static str,
        #[source]
        source: ControlApiError,
    },

    /// The control API answered with something other than 200.
    #[error("{label}:\n{body}")]
    Rejected {
        label: &'static str,
        status: StatusCode,
        body: String,
    },

    /// A background task panicked or was cancelled.
    #[error("{context}: {message}")]
    Internal {
        context: &'static str,
        message: String,
    },

    /// Unknown path under `/api`.
    #[error("Not found")]
    NotFound,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Body { status, .. } => *status,
            ApiError::Store { .. } | ApiError::Control { .. } | ApiError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Rejected { status, .. } => passthrough_status(*status),
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

/// Control API statuses are relayed unless they cannot be a final response.
fn passthrough_status(status: StatusCode) -> StatusCode {
    if status.is_informational() || status.as_u16() > 599 {
        StatusCode::BAD_GATEWAY
    } else {
        status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        match &self {
            ApiError::Store { .. } | ApiError::Control { .. } | ApiError::Internal { .. } => {
                tracing::error!(status = status.as_u16(), error = %message, "Request failed");
            }
            _ => {
                tracing::warn!(status = status.as_u16(), error = %message, "Request rejected");
            }
        }

        (status, [(header::CONTENT_TYPE, TEXT_PLAIN)], message).into_response()
    }
}
