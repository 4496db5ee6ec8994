//! Nearest-neighbour search over the embedding table.
//!
//! Distances are Euclidean (L2) everywhere. Small tables are scanned
//! exactly; larger ones go through a Hierarchical Navigable Small World
//! (HNSW) graph built once at load time.
//!
//! ## Trade-offs
//!
//! - **Speed**: ~100-1000x faster than linear scan for large catalogs
//! - **Recall**: Typically 95-99% (some true neighbours may be missed)
//! - **Memory**: The graph is kept next to the embedding rows
//!
//! ## Ordering
//!
//! Results are always ascending by distance, ties broken by ascending
//! internal index, so one query against one index state always yields the
//! same sequence regardless of which search path served it.

use std::cmp::Ordering;
use std::sync::Arc;

use hnsw_rs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::embedding::EmbeddingTable;
use crate::IndexError;

/// Configuration for ANN index construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnConfig {
    /// Number of neighbors per node (higher = better recall, slower build).
    /// Default: 16
    pub m: usize,
    /// Size of dynamic candidate list during construction (higher = better recall, slower build).
    /// Default: 200
    pub ef_construction: usize,
    /// Size of dynamic candidate list during search (higher = better recall, slower search).
    /// Raised to the requested neighbour count when that is larger.
    /// Default: 50
    pub ef_search: usize,
    /// Whether to use ANN or fall back to linear scan.
    /// Default: true (use ANN when beneficial)
    pub enabled: bool,
    /// Minimum number of vectors before ANN is used.
    /// Below this threshold, linear scan is used even if enabled=true.
    /// Default: 1000
    pub min_vectors_for_ann: usize,
}

impl Default for AnnConfig {
    fn default() -> Self {
        Self {
            m: 16,
            ef_construction: 200,
            ef_search: 50,
            enabled: true,
            min_vectors_for_ann: 1000,
        }
    }
}

impl AnnConfig {
    pub fn with_m(mut self, m: usize) -> Self {
        self.m = m;
        self
    }

    pub fn with_ef_construction(mut self, ef: usize) -> Self {
        self.ef_construction = ef;
        self
    }

    pub fn with_ef_search(mut self, ef: usize) -> Self {
        self.ef_search = ef;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_min_vectors_for_ann(mut self, min: usize) -> Self {
        self.min_vectors_for_ann = min;
        self
    }

    /// Reject build or search parameters that would silently shrink results.
    pub fn validate(&self) -> Result<(), String> {
        if self.m == 0 {
            return Err("ann.m must be greater than zero".into());
        }
        if self.ef_construction == 0 {
            return Err("ann.ef_construction must be greater than zero".into());
        }
        if self.ef_search == 0 {
            return Err("ann.ef_search must be greater than zero".into());
        }
        Ok(())
    }

    /// Check if ANN should be used given the current dataset size.
    pub fn should_use_ann(&self, num_vectors: usize) -> bool {
        self.enabled && num_vectors >= self.min_vectors_for_ann
    }
}

/// Which path answers queries for a built index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Exact,
    Hnsw,
}

/// One search hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Row of the embedding table.
    pub index: usize,
    /// Euclidean distance to the query (lower = closer).
    pub distance: f32,
}

/// Read-only k-NN index over an [`EmbeddingTable`].
pub struct NeighborIndex {
    config: AnnConfig,
    table: Arc<EmbeddingTable>,
    hnsw: Option<Hnsw<'static, f32, DistL2>>,
}

impl std::fmt::Debug for NeighborIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NeighborIndex")
            .field("config", &self.config)
            .field("rows", &self.table.len())
            .field("mode", &self.mode())
            .finish()
    }
}

impl NeighborIndex {
    /// Build the index over `table`. The HNSW graph is only constructed when
    /// the configuration calls for it at this table size.
    pub fn build(table: Arc<EmbeddingTable>, config: AnnConfig) -> Self {
        let nb_elem = table.len();
        // HNSW needs a handful of points to form layers; below that linear
        // search is used regardless of configuration.
        let hnsw = if config.should_use_ann(nb_elem) && nb_elem >= 10 {
            let nb_layer = 16.min((nb_elem as f32).ln().trunc() as usize);
            let hnsw = Hnsw::<f32, DistL2>::new(
                config.m,
                nb_elem,
                nb_layer,
                config.ef_construction,
                DistL2 {},
            );

            let owned: Vec<Vec<f32>> = table
                .as_array()
                .rows()
                .into_iter()
                .map(|r| r.to_vec())
                .collect();
            let data_for_insertion: Vec<(&Vec<f32>, usize)> =
                owned.iter().enumerate().map(|(idx, vec)| (vec, idx)).collect();
            hnsw.parallel_insert(&data_for_insertion);

            log::info!(
                "built HNSW graph over {nb_elem} vectors (m={}, ef_construction={}, layers={nb_layer})",
                config.m,
                config.ef_construction
            );
            Some(hnsw)
        } else {
            log::info!("using exact linear search over {nb_elem} vectors");
            None
        };

        Self {
            config,
            table,
            hnsw,
        }
    }

    /// Up to `m` nearest rows to `query`, nearest first.
    pub fn search(&self, query: &[f32], m: usize) -> Result<Vec<Neighbor>, IndexError> {
        if query.len() != self.table.dimension() {
            return Err(IndexError::DimensionMismatch {
                expected: self.table.dimension(),
                got: query.len(),
            });
        }

        let m = m.min(self.table.len());
        if m == 0 {
            return Ok(Vec::new());
        }

        match self.hnsw {
            Some(ref hnsw) => Ok(self.hnsw_search(hnsw, query, m)),
            None => Ok(self.linear_search(query, m)),
        }
    }

    /// HNSW-based approximate search.
    fn hnsw_search(
        &self,
        hnsw: &Hnsw<'static, f32, DistL2>,
        query: &[f32],
        m: usize,
    ) -> Vec<Neighbor> {
        let ef = self.config.ef_search.max(m);
        let mut results: Vec<Neighbor> = hnsw
            .search(query, m, ef)
            .into_iter()
            .map(|neighbour| Neighbor {
                index: neighbour.get_origin_id(),
                distance: neighbour.distance,
            })
            .collect();

        results.sort_by(by_distance_then_index);
        results.truncate(m);
        results
    }

    /// Linear search (exact, slow but accurate).
    fn linear_search(&self, query: &[f32], m: usize) -> Vec<Neighbor> {
        let mut distances: Vec<Neighbor> = self
            .table
            .as_array()
            .rows()
            .into_iter()
            .enumerate()
            .map(|(index, row)| Neighbor {
                index,
                distance: l2(query.iter().zip(row.iter())),
            })
            .collect();

        distances.sort_by(by_distance_then_index);
        distances.truncate(m);
        distances
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.table.dimension()
    }

    pub fn mode(&self) -> SearchMode {
        if self.hnsw.is_some() {
            SearchMode::Hnsw
        } else {
            SearchMode::Exact
        }
    }

    /// Get current configuration.
    pub fn config(&self) -> &AnnConfig {
        &self.config
    }
}

fn by_distance_then_index(a: &Neighbor, b: &Neighbor) -> Ordering {
    a.distance
        .total_cmp(&b.distance)
        .then_with(|| a.index.cmp(&b.index))
}

/// Euclidean (L2) distance; matches `hnsw_rs::DistL2`.
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    l2(a.iter().zip(b.iter()))
}

fn l2<'a>(pairs: impl Iterator<Item = (&'a f32, &'a f32)>) -> f32 {
    pairs.map(|(x, y)| (x - y) * (x - y)).sum::<f32>().sqrt()
}
