use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use index::{IndexError, TrackModel};

use crate::metrics::{metrics_recorder, RecommendStats};
use crate::types::{ModelState, RecommendConfig, RecommendError};


/// Playlist recommender over a loaded [`TrackModel`].
///
/// Cloning is cheap; all clones share the same read-only model.
#[derive(Debug, Clone)]
pub struct Recommender {
    state: ModelState,
    config: RecommendConfig,
}

impl Recommender {
    /// Construct a recommender over a loaded model.
    pub fn new(model: Arc<TrackModel>, config: RecommendConfig) -> Self {
        Self::with_state(ModelState::Ready(model), config)
    }

    /// Construct a recommender whose model failed to load. Every call
    /// reports `reason` as [`RecommendError::ModelUnavailable`].
    pub fn unavailable(reason: impl Into<String>, config: RecommendConfig) -> Self {
        Self::with_state(ModelState::Unavailable(reason.into()), config)
    }

    /// Construct from the outcome of a startup load.
    pub fn from_load(result: Result<TrackModel, IndexError>, config: RecommendConfig) -> Self {
        Self::with_state(ModelState::from_load(result), config)
    }

    pub fn with_state(state: ModelState, config: RecommendConfig) -> Self {
        Self { state, config }
    }

    pub fn state(&self) -> &ModelState {
        &self.state
    }

    pub fn config(&self) -> &RecommendConfig {
        &self.config
    }

    pub fn is_available(&self) -> bool {
        self.state.is_ready()
    }

    /// The loaded model, or the startup failure as an error.
    pub fn model(&self) -> Result<&Arc<TrackModel>, RecommendError> {
        match &self.state {
            ModelState::Ready(model) => Ok(model),
            ModelState::Unavailable(reason) => {
                Err(RecommendError::ModelUnavailable(reason.clone()))
            }
        }
    }

    /// Recommend using the configured default result count.
    pub fn recommend_default<S: AsRef<str>>(
        &self,
        track_ids: &[S],
    ) -> Result<Vec<String>, RecommendError> {
        self.recommend(track_ids, self.config.result_count)
    }

    /// Up to `k` tracks nearest to the mean embedding of `track_ids`,
    /// nearest first, none of which appear in `track_ids`.
    ///
    /// Unknown identifiers are ignored for the taste vector but still
    /// excluded from the output. When nothing resolves the result is empty.
    pub fn recommend<S: AsRef<str>>(
        &self,
        track_ids: &[S],
        k: usize,
    ) -> Result<Vec<String>, RecommendError> {
        let model = match self.model() {
            Ok(model) => model,
            Err(err) => {
                if let Some(recorder) = metrics_recorder() {
                    recorder.record_unavailable();
                }
                return Err(err);
            }
        };

        let start = Instant::now();
        let vocab = model.vocabulary();

        let exclude: HashSet<&str> = track_ids.iter().map(|id| id.as_ref()).collect();
        let resolved: Vec<usize> = track_ids
            .iter()
            .filter_map(|id| vocab.resolve(id.as_ref()))
            .collect();

        if resolved.len() < track_ids.len() {
            tracing::debug!(
                requested = track_ids.len(),
                resolved = resolved.len(),
                "dropped unknown track ids"
            );
        }

        let recommendations = if resolved.is_empty() || k == 0 {
            Vec::new()
        } else {
            self.rank(model, &resolved, &exclude, k)?
        };

        if let Some(recorder) = metrics_recorder() {
            recorder.record_recommend(
                start.elapsed(),
                RecommendStats {
                    requested: track_ids.len(),
                    resolved: resolved.len(),
                    returned: recommendations.len(),
                },
            );
        }

        Ok(recommendations)
    }

    fn rank(
        &self,
        model: &TrackModel,
        resolved: &[usize],
        exclude: &HashSet<&str>,
        k: usize,
    ) -> Result<Vec<String>, RecommendError> {
        let Some(taste) = model.embeddings().aggregate(resolved)? else {
            return Ok(Vec::new());
        };
        let query = taste.to_vec();

        // Inputs sit closest to their own mean, so fetch enough extra
        // neighbours to survive filtering them out.
        let distinct_inputs = resolved.iter().collect::<HashSet<_>>().len();
        let neighbours = model.neighbors().search(&query, k.saturating_add(distinct_inputs))?;

        let vocab = model.vocabulary();
        let mut seen: HashSet<&str> = HashSet::with_capacity(neighbours.len());
        let mut out = Vec::with_capacity(k);
        for neighbour in neighbours {
            let id = vocab
                .reverse(neighbour.index)
                .ok_or(IndexError::UnknownIndex(neighbour.index))?;
            if exclude.contains(id) || !seen.insert(id) {
                continue;
            }
            out.push(id.to_string());
            if out.len() == k {
                break;
            }
        }
        Ok(out)
    }
}
