//! # trackrec recommender (`recommender`)
//!
//! ## Purpose
//!
//! `recommender` sits on top of the loaded model in `index`. Given a
//! playlist (an ordered list of track identifiers) it builds a taste vector
//! from the tracks it knows, searches for the nearest catalog tracks, and
//! returns the closest ones the playlist does not already contain.
//!
//! ## Core Types
//!
//! - [`Recommender`]: the engine; cheap to clone, safe to share across threads.
//! - [`RecommendConfig`]: default and maximum result counts.
//! - [`ModelState`]: whether startup loading produced a usable model.
//! - [`RecommendError`]: `ModelUnavailable` when loading failed, plus
//!   count validation and internal index errors.
//!
//! ## Example Usage
//!
//! ```
//! use std::sync::Arc;
//! use index::{AnnConfig, EmbeddingTable, TrackModel, Vocabulary};
//! use ndarray::array;
//! use recommender::{RecommendConfig, Recommender};
//!
//! let vocab = Vocabulary::from_ordered(["A", "B", "C"]).unwrap();
//! let table = EmbeddingTable::new(array![[1.0, 0.0], [0.0, 1.0], [1.2, 1.2]]).unwrap();
//! let model = TrackModel::assemble(vocab, table, AnnConfig::default()).unwrap();
//!
//! let rec = Recommender::new(Arc::new(model), RecommendConfig::default());
//! assert_eq!(rec.recommend(&["A", "B"], 1).unwrap(), vec!["C"]);
//! assert!(rec.recommend(&["Z"], 1).unwrap().is_empty());
//! ```
//!
//! ## Observability
//!
//! Install a [`RecommendMetrics`] implementation via
//! [`set_recommend_metrics`] to record per-request latency and result sizes.

pub mod engine;
pub mod metrics;
pub mod types;

pub use crate::engine::Recommender;
pub use crate::metrics::{set_recommend_metrics, RecommendMetrics, RecommendStats};
pub use crate::types::{ModelState, RecommendConfig, RecommendError};
