//! Error types for coursehub-api
//!
//! Every error leaves the service as the failure envelope
//! `{ "success": false, "message": ... }`. Storage failures are logged and
//! answered with a fixed message so database details never reach clients.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use coursehub_common::api::ErrorResponse;
use thiserror::Error;
use tracing::error;

/// Message returned for any unexpected server-side failure
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong";

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Optional collaborator not configured (503)
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Upstream quota exhausted (429)
    #[error("Too many requests: {0}")]
    TooManyRequests(String),

    /// Upstream service failed (502)
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Storage or other shared-layer failure (500, generic message)
    #[error(transparent)]
    Storage(#[from] coursehub_common::Error),
}

impl ApiError {
    /// HTTP status and client-facing message
    ///
    /// Storage failures are logged here and replaced by the generic message.
    pub fn into_status_and_message(self) -> (StatusCode, String) {
        match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::TooManyRequests(msg) => (StatusCode::TOO_MANY_REQUESTS, msg),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::Storage(err) => {
                error!(error = %err, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    GENERIC_FAILURE_MESSAGE.to_string(),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.into_status_and_message();
        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::Unavailable("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (ApiError::TooManyRequests("x".into()), StatusCode::TOO_MANY_REQUESTS),
            (ApiError::Upstream("x".into()), StatusCode::BAD_GATEWAY),
            (
                ApiError::Storage(coursehub_common::Error::Database(sqlx::Error::PoolClosed)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
