//! coursehub-api library - course catalog HTTP service
//!
//! Read-only REST endpoints over the course catalog, the nested course
//! detail view, and transcript question answering.

use std::sync::Arc;

use axum::Router;
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod api;
pub mod course_tree;
pub mod db;
pub mod error;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use crate::db::{CourseStore, SqliteCourseStore};
use crate::services::AnswerModel;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Catalog database pool
    pub db: SqlitePool,
    /// Storage used by the course detail assembler
    pub store: Arc<dyn CourseStore>,
    /// Model for transcript questions; `None` when no API key is configured
    pub answer_model: Option<Arc<dyn AnswerModel>>,
}

impl AppState {
    /// Create new application state backed by `db`
    pub fn new(db: SqlitePool) -> Self {
        let store = Arc::new(SqliteCourseStore::new(db.clone()));
        Self {
            db,
            store,
            answer_model: None,
        }
    }

    /// Replace the course detail storage
    pub fn with_store(mut self, store: Arc<dyn CourseStore>) -> Self {
        self.store = store;
        self
    }

    /// Enable transcript question answering
    pub fn with_answer_model(mut self, model: Arc<dyn AnswerModel>) -> Self {
        self.answer_model = Some(model);
        self
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::course_routes())
        .merge(api::catalog_routes())
        .merge(api::transcript_routes())
        .merge(api::user_routes())
        .fallback(api::route_not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
