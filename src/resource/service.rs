use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::backend::Backend;
use crate::error::{ApiError, Severity};
use crate::startup::AppState;
use axum::http::StatusCode;

/// Liveness probe; runs a trivial query against the pool.
pub async fn health(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    state.backend.health_check().await.map_err(|e| {
        ApiError::fault(&e, "Database unavailable").with_area("HEALTH")
    })?;
    Ok(Json(json!({ "status": "ok" })))
}

/// Catch-all for unmatched routes.
pub async fn route_not_found() -> ApiError {
    ApiError::route_not_found()
}

/// Answer for a matched path with an unsupported method.
pub async fn method_not_allowed() -> ApiError {
    ApiError::new(StatusCode::METHOD_NOT_ALLOWED, Severity::Error, "Method not allowed")
}
