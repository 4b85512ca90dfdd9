//! Caddyfile API handlers.
//!
//! Each handler performs at most one disk sequence and one control API
//! call, and stops at the first failure.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::time::Instant;

use crate::control::ControlApiError;
use crate::http::response::{ApiError, TEXT_PLAIN};
use crate::http::server::AppState;
use crate::observability::metrics;

/// Messages for one forwarding route.
struct Forward {
    route: &'static str,
    body_error: &'static str,
    build_error: &'static str,
    send_error: &'static str,
    rejected: &'static str,
    accepted: &'static str,
}

const VALIDATE: Forward = Forward {
    route: "validate",
    body_error: "Failed to validate Caddyfile",
    build_error: "Failed to create validation request",
    send_error: "Failed to send validation request",
    rejected: "Validation failed",
    accepted: "Validation successful",
};

const UPDATE: Forward = Forward {
    route: "update",
    body_error: "Failed to read request body",
    build_error: "Failed to create reload request",
    send_error: "Failed to send reload request",
    rejected: "Reload failed",
    accepted: "Reload successful",
};

impl Forward {
    fn body(&self, body: Result<Bytes, BytesRejection>) -> Result<Bytes, ApiError> {
        body.map_err(|rejection| ApiError::Body {
            context: self.body_error,
            status: rejection.status(),
            message: rejection.body_text(),
        })
    }

    fn control_error(&self, source: ControlApiError) -> ApiError {
        let context = match source {
            ControlApiError::Build(_) => self.build_error,
            ControlApiError::Transport(_) => self.send_error,
        };
        ApiError::Control { context, source }
    }
}

/// `GET /api/caddyfile`
pub async fn get_caddyfile(State(state): State<AppState>) -> Response {
    let start = Instant::now();

    let response = match state.store.read().await {
        Ok(contents) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain")],
            contents,
        )
            .into_response(),
        Err(source) => ApiError::Store {
            context: "Failed to read Caddyfile",
            source,
        }
        .into_response(),
    };

    metrics::record_request("read", response.status().as_u16(), start);
    response
}

/// `POST /api/caddyfile/validate`
pub async fn validate_caddyfile(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let start = Instant::now();
    let response = finish(validate(&state, body).await, &VALIDATE);
    metrics::record_request(VALIDATE.route, response.status().as_u16(), start);
    response
}

async fn validate(state: &AppState, body: Result<Bytes, BytesRejection>) -> Result<(), ApiError> {
    let caddyfile = VALIDATE.body(body)?;

    let outcome = state
        .control
        .adapt(caddyfile)
        .await
        .map_err(|e| VALIDATE.control_error(e))?;

    tracing::info!(status = outcome.status.as_u16(), "Validation response");

    if !outcome.is_accepted() {
        return Err(ApiError::Rejected {
            label: VALIDATE.rejected,
            status: outcome.status,
            body: outcome.body,
        });
    }
    Ok(())
}

/// `POST /api/caddyfile/update`
///
/// The new document becomes the on-disk Caddyfile only after the control
/// API accepted it.
pub async fn update_caddyfile(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let start = Instant::now();
    let response = finish(update(&state, body).await, &UPDATE);
    metrics::record_request(UPDATE.route, response.status().as_u16(), start);
    response
}

async fn update(state: &AppState, body: Result<Bytes, BytesRejection>) -> Result<(), ApiError> {
    let caddyfile = UPDATE.body(body)?;

    // Once `/load` may have been called the rename must happen, so the
    // sequence runs in its own task and survives a dropped request.
    let state = state.clone();
    tokio::spawn(async move { apply_update(&state, caddyfile).await })
        .await
        .map_err(|e| ApiError::Internal {
            context: "Update task failed",
            message: e.to_string(),
        })?
}

async fn apply_update(state: &AppState, caddyfile: Bytes) -> Result<(), ApiError> {
    let permit = state.store.lock_for_update().await;

    let staged = state
        .store
        .stage(&permit, caddyfile.clone())
        .await
        .map_err(|source| ApiError::Store {
            context: "Failed to write file",
            source,
        })?;

    let outcome = state
        .control
        .load(caddyfile)
        .await
        .map_err(|e| UPDATE.control_error(e))?;

    if !outcome.is_accepted() {
        tracing::info!(
            status = outcome.status.as_u16(),
            "Reload rejected, keeping current Caddyfile"
        );
        return Err(ApiError::Rejected {
            label: UPDATE.rejected,
            status: outcome.status,
            body: outcome.body,
        });
    }

    staged.commit().await.map_err(|source| ApiError::Store {
        context: "Failed to write file",
        source,
    })?;

    tracing::info!(path = %state.store.path().display(), "Caddyfile reloaded and saved");
    Ok(())
}

fn finish(result: Result<(), ApiError>, forward: &Forward) -> Response {
    match result {
        Ok(()) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, TEXT_PLAIN)],
            forward.accepted,
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Fallback for unknown `/api` paths.
pub async fn api_not_found() -> ApiError {
    ApiError::NotFound
}
