//! Prometheus-backed recorder for recommendation metrics.

use std::sync::Arc;
use std::time::Duration;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use recommender::{set_recommend_metrics, RecommendMetrics, RecommendStats};

pub const REQUESTS_TOTAL: &str = "trackrec_recommend_requests_total";
pub const LATENCY_SECONDS: &str = "trackrec_recommend_latency_seconds";
pub const RETURNED_TRACKS: &str = "trackrec_recommend_returned_tracks";
pub const UNRESOLVED_TRACKS: &str = "trackrec_recommend_unresolved_tracks_total";

/// Forwards engine observations to the `metrics` facade.
#[derive(Debug, Default)]
pub struct PrometheusMetrics;

impl RecommendMetrics for PrometheusMetrics {
    fn record_recommend(&self, latency: Duration, stats: RecommendStats) {
        let outcome = if stats.resolved == 0 { "empty" } else { "ok" };
        metrics::counter!(REQUESTS_TOTAL, "outcome" => outcome).increment(1);
        metrics::counter!(UNRESOLVED_TRACKS)
            .increment((stats.requested - stats.resolved) as u64);
        metrics::histogram!(LATENCY_SECONDS).record(latency.as_secs_f64());
        metrics::histogram!(RETURNED_TRACKS).record(stats.returned as f64);
    }

    fn record_unavailable(&self) {
        metrics::counter!(REQUESTS_TOTAL, "outcome" => "unavailable").increment(1);
    }
}

/// Install the global Prometheus recorder and hook the engine into it.
pub fn install() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    metrics::describe_counter!(REQUESTS_TOTAL, "Recommendation calls by outcome");
    metrics::describe_counter!(
        UNRESOLVED_TRACKS,
        "Request track ids missing from the vocabulary"
    );
    metrics::describe_histogram!(LATENCY_SECONDS, "Recommendation compute time");
    metrics::describe_histogram!(RETURNED_TRACKS, "Tracks returned per call");
    set_recommend_metrics(Some(Arc::new(PrometheusMetrics)));
    Ok(handle)
}
