use crate::services::get_metrics;
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use service_core::error::AppError;

pub async fn index() -> &'static str {
    "Snippet API is running!"
}

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "snippet-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Reflects whether the snippet store answers right now.
pub async fn readiness_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    state
        .snippets
        .health_check()
        .await
        .map_err(|e| AppError::ServiceUnavailable(anyhow::Error::new(e)))?;

    Ok(Json(json!({ "status": "ready" })))
}

pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}
