use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tracing::error;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// Liveness plus a round trip to the profile store.
pub async fn health(State(state): State<AppState>) -> Response {
    match state.profiles.count().await {
        Ok(profiles) => Json(json!({
            "status": "ok",
            "message": "FitnessPoint API is running",
            "database": { "connected": true, "profiles": profiles },
        }))
        .into_response(),
        Err(e) => {
            error!(error = ?e, "health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "error",
                    "message": "Database connection failed",
                    "error": format!("{e:#}"),
                })),
            )
                .into_response()
        }
    }
}
