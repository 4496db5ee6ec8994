//! API route handlers
//!
//! - `health`: liveness, readiness, metrics and model metadata
//! - `recommend`: playlist recommendations

pub mod health;
pub mod recommend;

use crate::error::{ServerError, ServerResult};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// API version and base info (GET /)
pub async fn api_info() -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "trackrec",
        "version": env!("CARGO_PKG_VERSION"),
        "api_version": "v1",
        "endpoints": [
            "/predict",
            "/api/v1/recommend",
            "/api/v1/model",
            "/health",
            "/ready",
            "/metrics"
        ]
    })))
}

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
