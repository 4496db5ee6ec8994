// Metrics hooks for the `recommender` crate.
//
// Callers install a global `RecommendMetrics` implementation via
// [`set_recommend_metrics`], then every `Recommender` reports per-request
// latency and result sizes. This keeps instrumentation decoupled from any
// specific metrics backend.
use std::sync::{Arc, RwLock};
use std::time::Duration;

use once_cell::sync::OnceCell;

/// Sizes observed while serving one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendStats {
    /// Identifiers supplied by the caller, duplicates included.
    pub requested: usize,
    /// Identifiers found in the vocabulary.
    pub resolved: usize,
    /// Tracks returned after filtering and truncation.
    pub returned: usize,
}

/// Metrics observer for recommendation calls.
pub trait RecommendMetrics: Send + Sync {
    /// Record a completed call. `latency` covers resolution through
    /// truncation.
    fn record_recommend(&self, latency: Duration, stats: RecommendStats);

    /// Record a call rejected because the model is not loaded.
    fn record_unavailable(&self);
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn RecommendMetrics>>> {
    static METRICS: OnceCell<RwLock<Option<Arc<dyn RecommendMetrics>>>> = OnceCell::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn RecommendMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the global recommendation metrics recorder.
///
/// This is typically called once during service startup so all
/// `Recommender` instances share the same metrics backend.
pub fn set_recommend_metrics(recorder: Option<Arc<dyn RecommendMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}
