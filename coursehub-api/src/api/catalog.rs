//! Catalog list and lookup endpoints
//!
//! One generic pair of handlers serves every catalog table:
//! `GET /<collection>` and `GET /<collection>/:id`.

use axum::{extract::State, routing::get, Json, Router};
use coursehub_common::api::ApiResponse;
use coursehub_common::db::{
    fetch_all, fetch_one, Assignment, CatalogEntity, Course, Enrollment, Event, Example, Module,
    Program, Resource, Section, User, UserMetadata, Video,
};

use super::extract::PathId;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// GET /<collection>
///
/// All rows ascending by id.
pub async fn list_entities<T: CatalogEntity>(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<T>>>> {
    let rows = fetch_all::<T>(&state.db).await?;
    Ok(Json(ApiResponse::ok(rows)))
}

/// GET /<collection>/:id
pub async fn get_entity<T: CatalogEntity>(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> ApiResult<Json<ApiResponse<T>>> {
    match fetch_one::<T>(&state.db, id).await? {
        Some(row) => Ok(Json(ApiResponse::ok(row))),
        None => Err(ApiError::NotFound(format!("{} not found", T::LABEL))),
    }
}

fn collection<T: CatalogEntity>(path: &str) -> Router<AppState> {
    Router::new()
        .route(path, get(list_entities::<T>))
        .route(&format!("{}/:id", path), get(get_entity::<T>))
}

/// Build catalog routes
///
/// `/courses/:id` and `/users/:id` have dedicated handlers instead.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .merge(collection::<Program>("/programs"))
        .route("/courses", get(list_entities::<Course>))
        .merge(collection::<Module>("/modules"))
        .merge(collection::<Section>("/sections"))
        .merge(collection::<Video>("/videos"))
        .merge(collection::<Resource>("/resources"))
        .merge(collection::<Example>("/examples"))
        .merge(collection::<Event>("/events"))
        .merge(collection::<Enrollment>("/enrollments"))
        .merge(collection::<Assignment>("/assignments"))
        .route("/users", get(list_entities::<User>))
        .merge(collection::<UserMetadata>("/usermetadatas"))
}
