use crate::config::ServerConfig;
use index::SearchMode;
use metrics_exporter_prometheus::PrometheusHandle;
use recommender::{ModelState, Recommender};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Recommendation engine (shared across requests, read-only model)
    pub recommender: Recommender,

    /// Prometheus render handle, present when the recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl ServerState {
    /// Create new server state, loading the model artifacts named in `config`.
    ///
    /// Load failures are kept inside the recommender so the process stays up
    /// and reports 503 rather than exiting.
    pub fn new(config: ServerConfig) -> Self {
        let recommender =
            trackrec::open_recommender(&config.artifacts, config.ann, config.recommender);
        Self::with_recommender(config, recommender)
    }

    /// Create state around an already constructed recommender.
    pub fn with_recommender(config: ServerConfig, recommender: Recommender) -> Self {
        Self {
            config: Arc::new(config),
            recommender,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Describe the loaded model for the metadata endpoint.
    pub fn model_metadata(&self) -> ModelMetadata {
        match self.recommender.state() {
            ModelState::Ready(model) => ModelMetadata {
                status: "ready".to_string(),
                tracks: Some(model.len()),
                dimension: Some(model.dimension()),
                search_mode: Some(model.neighbors().mode()),
                reason: None,
            },
            ModelState::Unavailable(reason) => ModelMetadata {
                status: "unavailable".to_string(),
                tracks: None,
                dimension: None,
                search_mode: None,
                reason: Some(reason.clone()),
            },
        }
    }
}

/// Model description for metadata and readiness responses
#[derive(Debug, serde::Serialize)]
pub struct ModelMetadata {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracks: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_mode: Option<SearchMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
