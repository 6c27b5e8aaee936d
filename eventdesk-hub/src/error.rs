//! Error types for eventdesk-hub

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use eventdesk_common::Error;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400), for problems caught in the HTTP layer
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Domain error, mapped by variant
    #[error(transparent)]
    Common(#[from] Error),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Common(err) => match err {
                err if err.is_storage() => (StatusCode::SERVICE_UNAVAILABLE, "STORAGE_ERROR"),
                Error::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                Error::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                Error::AuthRequired => (StatusCode::UNAUTHORIZED, "AUTH_REQUIRED"),
                Error::DeviceUnavailable(_) => (StatusCode::BAD_GATEWAY, "DEVICE_UNAVAILABLE"),
                Error::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.parts();
        if status.is_server_error() {
            error!(code = error_code, "Request failed: {}", self);
        }

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
