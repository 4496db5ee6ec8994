//! # trackrec index
//!
//! Read-only lookup structures for a trained track-embedding model:
//!
//! - [`Vocabulary`]: track identifier ⇄ dense internal index.
//! - [`EmbeddingTable`]: one latent vector per internal index, plus the
//!   mean aggregation used to build a playlist's taste vector.
//! - [`NeighborIndex`]: Euclidean k-nearest-neighbour search over the table,
//!   exact for small catalogs and HNSW-backed for large ones.
//! - [`TrackModel`]: the three above, validated against each other and
//!   frozen for the lifetime of the process.
//!
//! Artifacts are loaded from disk with [`load_model`]; see [`artifacts`] for
//! the file layout.
//!
//! ## Example Usage
//!
//! ```
//! use index::{AnnConfig, EmbeddingTable, TrackModel, Vocabulary};
//! use ndarray::array;
//!
//! let vocab = Vocabulary::from_ordered(["a", "b", "c"]).unwrap();
//! let table = EmbeddingTable::new(array![[1.0, 0.0], [0.0, 1.0], [1.2, 1.2]]).unwrap();
//! let model = TrackModel::assemble(vocab, table, AnnConfig::default()).unwrap();
//!
//! let taste = model.embeddings().aggregate(&[0, 1]).unwrap().unwrap();
//! let nearest = model.neighbors().search(taste.as_slice().unwrap(), 3).unwrap();
//! assert_eq!(nearest[2].index, 2);
//! ```

pub mod ann;
pub mod artifacts;
pub mod embedding;
pub mod vocab;

use std::sync::Arc;

use bincode::error::{DecodeError, EncodeError};
use thiserror::Error;

pub use crate::ann::{AnnConfig, Neighbor, NeighborIndex, SearchMode};
pub use crate::artifacts::{load_model, write_model, ArtifactPaths};
pub use crate::embedding::EmbeddingTable;
pub use crate::vocab::Vocabulary;

/// Errors returned by index construction, artifact I/O, and search.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("missing model artifacts: {0}")]
    MissingArtifact(String),
    #[error("invalid model artifact: {0}")]
    InvalidArtifact(String),
    #[error("vocabulary directions disagree: {0}")]
    VocabularyMismatch(String),
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("internal index {0} has no track")]
    UnknownIndex(usize),
    #[error("io error: {0}")]
    Io(String),
    #[error("encode error: {0}")]
    Encode(String),
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<EncodeError> for IndexError {
    fn from(value: EncodeError) -> Self {
        IndexError::Encode(value.to_string())
    }
}

impl From<DecodeError> for IndexError {
    fn from(value: DecodeError) -> Self {
        IndexError::Decode(value.to_string())
    }
}

/// Vocabulary, embeddings, and neighbour index of one trained model.
///
/// Immutable once assembled; share it behind an `Arc` across any number of
/// concurrent readers.
#[derive(Debug)]
pub struct TrackModel {
    vocab: Vocabulary,
    embeddings: Arc<EmbeddingTable>,
    neighbors: NeighborIndex,
}

impl TrackModel {
    /// Check that vocabulary and embeddings describe the same rows, then
    /// build the neighbour index over them.
    pub fn assemble(
        vocab: Vocabulary,
        embeddings: EmbeddingTable,
        ann: AnnConfig,
    ) -> Result<Self, IndexError> {
        if vocab.len() != embeddings.len() {
            return Err(IndexError::InvalidArtifact(format!(
                "vocabulary has {} tracks but embedding table has {} rows",
                vocab.len(),
                embeddings.len()
            )));
        }
        ann.validate().map_err(IndexError::InvalidArtifact)?;
        let embeddings = Arc::new(embeddings);
        let neighbors = NeighborIndex::build(Arc::clone(&embeddings), ann);
        Ok(Self {
            vocab,
            embeddings,
            neighbors,
        })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn embeddings(&self) -> &EmbeddingTable {
        &self.embeddings
    }

    pub fn neighbors(&self) -> &NeighborIndex {
        &self.neighbors
    }

    pub fn dimension(&self) -> usize {
        self.embeddings.dimension()
    }

    pub fn len(&self) -> usize {
        self.vocab.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocab.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn assemble_rejects_row_count_mismatch() {
        let vocab = Vocabulary::from_ordered(["a", "b"]).unwrap();
        let table = EmbeddingTable::new(array![[1.0, 0.0]]).unwrap();
        let err = TrackModel::assemble(vocab, table, AnnConfig::default()).unwrap_err();
        assert!(matches!(err, IndexError::InvalidArtifact(_)));
    }

    #[test]
    fn assemble_rejects_degenerate_ann_config() {
        for ann in [
            AnnConfig::default().with_m(0),
            AnnConfig::default().with_ef_construction(0),
            AnnConfig::default().with_ef_search(0),
        ] {
            let vocab = Vocabulary::from_ordered(["a", "b"]).unwrap();
            let table = EmbeddingTable::new(array![[1.0, 0.0], [0.0, 1.0]]).unwrap();
            let err = TrackModel::assemble(vocab, table, ann).unwrap_err();
            assert!(matches!(err, IndexError::InvalidArtifact(_)));
        }
    }

    #[test]
    fn assembled_model_exposes_parts() {
        let vocab = Vocabulary::from_ordered(["a", "b"]).unwrap();
        let table = EmbeddingTable::new(array![[1.0, 0.0], [0.0, 1.0]]).unwrap();
        let model = TrackModel::assemble(vocab, table, AnnConfig::default()).unwrap();
        assert_eq!(model.len(), 2);
        assert_eq!(model.dimension(), 2);
        assert_eq!(model.neighbors().len(), 2);
        assert_eq!(model.neighbors().mode(), SearchMode::Exact);
    }

    #[test]
    fn errors_render_context() {
        let err = IndexError::DimensionMismatch {
            expected: 32,
            got: 16,
        };
        assert_eq!(err.to_string(), "dimension mismatch: expected 32, got 16");
        assert!(IndexError::UnknownIndex(9).to_string().contains('9'));
    }
}
