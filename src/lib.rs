//! Workspace umbrella crate for trackrec playlist recommendations.
//!
//! This crate stitches together artifact loading (`index`) and the
//! recommendation engine (`recommender`) so callers can go from a model
//! directory to a ready [`Recommender`] with a single call.

pub use index::{
    load_model, write_model, AnnConfig, ArtifactPaths, EmbeddingTable, IndexError, Neighbor,
    NeighborIndex, SearchMode, TrackModel, Vocabulary,
};
pub use recommender::{
    set_recommend_metrics, ModelState, RecommendConfig, RecommendError, RecommendMetrics,
    RecommendStats, Recommender,
};

/// Load the model artifacts under `paths` and wrap them in a [`Recommender`].
///
/// A failed load does not abort: the returned recommender is marked
/// unavailable and reports the load error on every call.
pub fn open_recommender(
    paths: &ArtifactPaths,
    ann: AnnConfig,
    config: RecommendConfig,
) -> Recommender {
    let result = load_model(paths, ann);
    match &result {
        Ok(model) => tracing::info!(
            tracks = model.len(),
            dimension = model.dimension(),
            mode = ?model.neighbors().mode(),
            dir = %paths.dir.display(),
            "model loaded"
        ),
        Err(err) => tracing::error!(
            error = %err,
            dir = %paths.dir.display(),
            "model load failed; serving unavailable"
        ),
    }
    Recommender::from_load(result, config)
}

/// Recommend up to `k` tracks for `track_ids` against an already opened
/// recommender.
pub fn recommend<S: AsRef<str>>(
    recommender: &Recommender,
    track_ids: &[S],
    k: usize,
) -> Result<Vec<String>, RecommendError> {
    recommender.recommend(track_ids, k)
}
