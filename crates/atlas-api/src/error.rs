//! HTTP error mapping for the registry API.
//!
//! Engine errors carry a status kind; this module translates them into
//! HTTP responses with a stable `error_code` string in the JSON payload.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use atlas_core::error::Error as RegistryError;

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error detail payload.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorDetail {
    /// Stable error code identifier.
    pub error_code: String,
    /// Human readable message.
    pub message: String,
}

/// Error response wrapper.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error detail.
    pub error: ErrorDetail,
}

/// An engine error crossing the HTTP boundary.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ApiError(#[from] pub RegistryError);

impl ApiError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self.0 {
            RegistryError::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
            RegistryError::NotFound { .. } => StatusCode::NOT_FOUND,
            RegistryError::AlreadyExists { .. } | RegistryError::Aborted { .. } => {
                StatusCode::CONFLICT
            }
            RegistryError::Serialization { .. } | RegistryError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let payload = ErrorResponse {
            error: ErrorDetail {
                error_code: self.0.code().to_string(),
                message: self.0.to_string(),
            },
        };
        (status, Json(payload)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let cases = [
            (RegistryError::invalid_argument("x"), StatusCode::BAD_REQUEST),
            (RegistryError::not_found("x"), StatusCode::NOT_FOUND),
            (RegistryError::already_exists("x"), StatusCode::CONFLICT),
            (RegistryError::aborted("x"), StatusCode::CONFLICT),
            (
                RegistryError::internal("x"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(ApiError(error).status_code(), status);
        }
    }

    #[test]
    fn response_carries_stable_error_code() {
        let response = ApiError(RegistryError::not_found("projects/p")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
