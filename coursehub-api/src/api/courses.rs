//! Course detail endpoint

use axum::{extract::State, routing::get, Json, Router};
use coursehub_common::api::ApiResponse;
use tracing::info;

use super::extract::PathId;
use crate::course_tree::{get_course_detail, CourseDetailView};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// GET /courses/:id
///
/// Course with its modules, top-level sections and resolved content.
pub async fn course_detail(
    State(state): State<AppState>,
    PathId(course_id): PathId,
) -> ApiResult<Json<ApiResponse<CourseDetailView>>> {
    let detail = get_course_detail(state.store.as_ref(), course_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    info!(
        course_id,
        modules = detail.modules.len(),
        sections = detail.modules.iter().map(|m| m.sections.len()).sum::<usize>(),
        "Assembled course detail"
    );

    Ok(Json(ApiResponse::ok(detail)))
}

/// Build course detail routes
pub fn course_routes() -> Router<AppState> {
    Router::new().route("/courses/:id", get(course_detail))
}
