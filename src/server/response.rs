//! HTTP rendering of service errors
//!
//! The only place error kinds meet status codes.

use crate::core::{ErrorKind, PostedError};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

/// Get the HTTP status code for an error kind
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Validation | ErrorKind::Decode => StatusCode::BAD_REQUEST,
        ErrorKind::Transient | ErrorKind::NotImplemented => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl From<&PostedError> for ErrorResponse {
    fn from(err: &PostedError) -> Self {
        Self {
            code: err.error_code().to_string(),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for PostedError {
    fn into_response(self) -> Response {
        let status = status_for(self.kind());
        if status.is_server_error() {
            tracing::warn!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }

        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}
