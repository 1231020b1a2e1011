//! HTTP API handlers for coursehub-api

pub mod catalog;
pub mod courses;
pub mod extract;
pub mod health;
pub mod transcript;
pub mod users;

use axum::http::{Method, Uri};
use axum::response::{IntoResponse, Response};

pub use catalog::catalog_routes;
pub use courses::course_routes;
pub use health::health_routes;
pub use transcript::transcript_routes;
pub use users::user_routes;

use crate::error::ApiError;

/// Fallback for unknown routes
pub async fn route_not_found(method: Method, uri: Uri) -> Response {
    tracing::warn!(%method, %uri, "Route not found");
    ApiError::NotFound(format!("Route not found: {} {}", method, uri.path())).into_response()
}
