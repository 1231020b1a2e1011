//! User endpoints
//!
//! `GET /users` is a plain catalog listing; the single-user views below
//! pull in related rows.

use axum::{extract::State, routing::get, Json, Router};
use coursehub_common::api::ApiResponse;
use coursehub_common::db::{
    fetch_enrolled_courses, fetch_one, fetch_user_metadata, Course, User, UserMetadata,
};
use serde::Serialize;

use super::extract::PathId;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// User with its metadata row, `null` when none exists
#[derive(Debug, Clone, Serialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    pub metadata: Option<UserMetadata>,
}

async fn require_user(state: &AppState, id: i64) -> ApiResult<User> {
    fetch_one::<User>(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

/// GET /users/:id
pub async fn user_detail(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> ApiResult<Json<ApiResponse<UserDetail>>> {
    let user = require_user(&state, id).await?;
    let metadata = fetch_user_metadata(&state.db, id).await?;

    Ok(Json(ApiResponse::ok(UserDetail { user, metadata })))
}

/// GET /users/:id/courses
///
/// Courses the user is enrolled in, ascending by id.
pub async fn user_courses(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> ApiResult<Json<ApiResponse<Vec<Course>>>> {
    require_user(&state, id).await?;
    let courses = fetch_enrolled_courses(&state.db, id).await?;

    Ok(Json(ApiResponse::ok(courses)))
}

/// Build user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/:id", get(user_detail))
        .route("/users/:id/courses", get(user_courses))
}
