use std::sync::Arc;

use index::{IndexError, TrackModel};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Engine-level tuning knobs.
///
/// `RecommendConfig` is cheap to clone and serde-friendly so it can be
/// embedded in higher-level service configs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecommendConfig {
    /// Number of tracks returned when the caller does not ask for a count.
    #[serde(default = "RecommendConfig::default_result_count")]
    pub result_count: usize,
    /// Largest per-request count a caller may ask for.
    #[serde(default = "RecommendConfig::default_max_result_count")]
    pub max_result_count: usize,
}

impl RecommendConfig {
    pub(crate) fn default_result_count() -> usize {
        10
    }

    pub(crate) fn default_max_result_count() -> usize {
        100
    }

    /// Validate invariants for this configuration.
    pub fn validate(&self) -> Result<(), RecommendError> {
        if self.result_count == 0 {
            return Err(RecommendError::InvalidConfig(
                "result_count must be greater than zero".into(),
            ));
        }
        if self.result_count > self.max_result_count {
            return Err(RecommendError::InvalidConfig(format!(
                "result_count {} exceeds max_result_count {}",
                self.result_count, self.max_result_count
            )));
        }
        Ok(())
    }

    /// Check a per-request count override against `max_result_count`.
    pub fn check_count(&self, k: usize) -> Result<usize, RecommendError> {
        if k == 0 || k > self.max_result_count {
            return Err(RecommendError::InvalidCount {
                requested: k,
                max: self.max_result_count,
            });
        }
        Ok(k)
    }
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            result_count: Self::default_result_count(),
            max_result_count: Self::default_max_result_count(),
        }
    }
}

/// Whether the process-wide model artifacts are usable.
#[derive(Debug, Clone)]
pub enum ModelState {
    Ready(Arc<TrackModel>),
    /// Loading failed at startup; the reason is reported on every call.
    Unavailable(String),
}

impl ModelState {
    /// Record the outcome of a startup load.
    pub fn from_load(result: Result<TrackModel, IndexError>) -> Self {
        match result {
            Ok(model) => ModelState::Ready(Arc::new(model)),
            Err(err) => ModelState::Unavailable(err.to_string()),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ModelState::Ready(_))
    }
}

/// Errors emitted by the recommendation layer.
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),
    #[error("requested {requested} recommendations; allowed range is 1..={max}")]
    InvalidCount { requested: usize, max: usize },
    #[error("invalid recommender config: {0}")]
    InvalidConfig(String),
    #[error("index error: {0}")]
    Index(#[from] IndexError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = RecommendConfig::default();
        assert_eq!(cfg.result_count, 10);
        assert_eq!(cfg.max_result_count, 100);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn config_rejects_zero_and_oversized_counts() {
        let zero = RecommendConfig {
            result_count: 0,
            ..Default::default()
        };
        assert!(matches!(zero.validate(), Err(RecommendError::InvalidConfig(_))));

        let too_big = RecommendConfig {
            result_count: 200,
            max_result_count: 100,
        };
        assert!(too_big.validate().is_err());
    }

    #[test]
    fn check_count_bounds() {
        let cfg = RecommendConfig::default();
        assert_eq!(cfg.check_count(1).unwrap(), 1);
        assert_eq!(cfg.check_count(100).unwrap(), 100);
        assert!(matches!(
            cfg.check_count(0),
            Err(RecommendError::InvalidCount { requested: 0, .. })
        ));
        assert!(cfg.check_count(101).is_err());
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let cfg: RecommendConfig = serde_json::from_str(r#"{"result_count": 5}"#).unwrap();
        assert_eq!(cfg.result_count, 5);
        assert_eq!(cfg.max_result_count, 100);
    }

    #[test]
    fn failed_load_becomes_unavailable() {
        let state = ModelState::from_load(Err(IndexError::MissingArtifact(
            "model/embeddings.bin".into(),
        )));
        assert!(!state.is_ready());
        match state {
            ModelState::Unavailable(reason) => assert!(reason.contains("embeddings.bin")),
            ModelState::Ready(_) => panic!("expected unavailable"),
        }
    }
}
