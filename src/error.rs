//! Error handling for the HugDimon backend
//!
//! This module provides idiomatic Rust error types using thiserror, plus the
//! mapping onto HTTP responses. The taxonomy separates client input errors
//! (4xx, surfaced as structured JSON) from server-side failures (5xx). External
//! collaborator failures never reach this layer: they are contained at the
//! resilient call wrapper or the orchestrator boundary and turned into canned
//! replies instead.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

/// API-level error type surfaced by route handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("The request was invalid or malformed: {0}")]
    BadRequest(String),

    #[error("Validation failed for field '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("An unexpected error occurred")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Stable machine-readable error code for clients.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Validation { .. } => "validation_error",
            ApiError::Internal(_) => "internal_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Shorthand for a validation failure on a named field.
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        ApiError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal errors are logged with full context but never leak detail
        // to the caller.
        let message = match &self {
            ApiError::Internal(e) => {
                tracing::error!(error = %e, "unhandled internal error");
                "An unexpected error occurred".to_string()
            }
            other => other.to_string(),
        };

        let mut body = json!({
            "error": self.error_code(),
            "message": message,
        });
        if let ApiError::Validation { field, .. } = &self {
            body["details"] = json!({ "field": field });
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::validation("message", "empty").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(ApiError::BadRequest("x".into()).error_code(), "bad_request");
        assert_eq!(
            ApiError::validation("message", "empty").error_code(),
            "validation_error"
        );
    }
}
