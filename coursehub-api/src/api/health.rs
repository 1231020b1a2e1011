//! Health check endpoints
//!
//! Neither route fails: database trouble is reported in the body.

use axum::{extract::State, routing::get, Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub success: bool,
    pub status: String,
    pub timestamp: String,
    pub database: String,
    pub ai_transcript: String,
    pub version: String,
}

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({
        "status": "success",
        "health": "OK",
    }))
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&state.db)
        .await
    {
        Ok(_) => "Connected",
        Err(e) => {
            warn!(error = %e, "Health check database query failed");
            "Disconnected"
        }
    };

    let ai_transcript = if state.answer_model.is_some() {
        "Available"
    } else {
        "Not configured"
    };

    Json(HealthResponse {
        success: true,
        status: "UP".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        database: database.to_string(),
        ai_transcript: ai_transcript.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
}
