use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use std::time::SystemTime;

/// Global server start time for uptime calculation
static SERVER_START_TIME: once_cell::sync::Lazy<SystemTime> =
    once_cell::sync::Lazy::new(SystemTime::now);

fn uptime_seconds() -> u64 {
    SERVER_START_TIME
        .elapsed()
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Health check endpoint (liveness)
/// Returns 200 while the process is running, model or not
pub async fn health_check(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "trackrec-server",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": uptime_seconds(),
        "model": state.model_metadata().status,
    }))
}

/// Readiness check endpoint
/// Returns 503 until the model artifacts have loaded
pub async fn readiness_check(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<impl IntoResponse> {
    state.recommender.model()?;

    Ok(Json(json!({
        "status": "ready",
        "service": "trackrec-server",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": uptime_seconds(),
        "model": state.model_metadata(),
    })))
}

/// Prometheus metrics endpoint
pub async fn metrics(State(state): State<Arc<ServerState>>) -> ServerResult<String> {
    match (&state.metrics, state.config.metrics_enabled) {
        (Some(handle), true) => Ok(handle.render()),
        _ => Err(ServerError::NotFound),
    }
}

/// Model metadata endpoint
/// Returns 503 when the model failed to load
pub async fn model_info(State(state): State<Arc<ServerState>>) -> ServerResult<impl IntoResponse> {
    state.recommender.model()?;

    let config = state.recommender.config();
    let mut value = serde_json::to_value(state.model_metadata())?;
    if let Some(obj) = value.as_object_mut() {
        obj.insert("metric".to_string(), json!(index::artifacts::EUCLIDEAN));
        obj.insert("result_count".to_string(), json!(config.result_count));
        obj.insert("max_result_count".to_string(), json!(config.max_result_count));
    }
    Ok(Json(value))
}
