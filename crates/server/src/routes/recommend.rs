use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Recommendation request body
#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    /// Playlist track identifiers, in any order
    pub track_uris: Vec<String>,
    /// Optional result count; defaults to the configured count
    #[serde(default)]
    pub k: Option<usize>,
}

/// Recommendation response body
#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub recommendations: Vec<String>,
}

/// Recommend tracks for a playlist (POST /predict, POST /api/v1/recommend)
///
/// A body without `track_uris` is a validation error. A playlist whose
/// tracks are all unknown yields an empty list, not an error.
pub async fn recommend(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> ServerResult<Json<RecommendResponse>> {
    let Json(request) = payload?;

    let recommender = &state.recommender;
    let k = match request.k {
        Some(k) => recommender.config().check_count(k)?,
        None => recommender.config().result_count,
    };

    // Search is CPU bound; keep it off the async workers.
    let worker = recommender.clone();
    let track_uris = request.track_uris;
    let recommendations = tokio::task::spawn_blocking(move || worker.recommend(&track_uris, k))
        .await
        .map_err(|e| ServerError::Internal(format!("recommend task failed: {e}")))??;

    tracing::debug!(k, returned = recommendations.len(), "recommend served");

    Ok(Json(RecommendResponse { recommendations }))
}
