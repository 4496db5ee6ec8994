//! On-disk artifacts for a trained model.
//!
//! A model directory holds four files:
//!
//! | file                | contents                                              |
//! |---------------------|-------------------------------------------------------|
//! | `track_to_idx.json` | JSON object `{track_id: index}`                       |
//! | `idx_to_track.json` | JSON array (position = index) or `{"<index>": id}`    |
//! | `embeddings.bin`    | zstd-compressed bincode [`EmbeddingArtifact`]         |
//! | `neighbors.json`    | [`NeighborManifest`] describing the neighbour index   |
//!
//! The HNSW graph itself is rebuilt from the embeddings at load time; the
//! manifest pins the metric and build parameters and must agree with the
//! embedding shape.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use zstd::{decode_all, encode_all};

use crate::ann::AnnConfig;
use crate::embedding::EmbeddingTable;
use crate::vocab::Vocabulary;
use crate::{IndexError, TrackModel};

/// Only metric the neighbour index supports.
pub const EUCLIDEAN: &str = "euclidean";

/// Location of the four model artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactPaths {
    /// Directory the file names below are resolved against.
    pub dir: PathBuf,
    pub embeddings: String,
    pub neighbors: String,
    pub track_to_idx: String,
    pub idx_to_track: String,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self::in_dir("model")
    }
}

impl ArtifactPaths {
    /// Default file names inside `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            embeddings: "embeddings.bin".into(),
            neighbors: "neighbors.json".into(),
            track_to_idx: "track_to_idx.json".into(),
            idx_to_track: "idx_to_track.json".into(),
        }
    }

    pub fn embeddings_path(&self) -> PathBuf {
        self.dir.join(&self.embeddings)
    }

    pub fn neighbors_path(&self) -> PathBuf {
        self.dir.join(&self.neighbors)
    }

    pub fn track_to_idx_path(&self) -> PathBuf {
        self.dir.join(&self.track_to_idx)
    }

    pub fn idx_to_track_path(&self) -> PathBuf {
        self.dir.join(&self.idx_to_track)
    }

    /// Required files that do not exist.
    pub fn missing(&self) -> Vec<PathBuf> {
        [
            self.embeddings_path(),
            self.neighbors_path(),
            self.track_to_idx_path(),
            self.idx_to_track_path(),
        ]
        .into_iter()
        .filter(|p| !p.is_file())
        .collect()
    }
}

/// Serialized embedding matrix, row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingArtifact {
    pub dimension: usize,
    pub rows: usize,
    pub data: Vec<f32>,
}

/// Description of the neighbour index persisted next to the embeddings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborManifest {
    pub metric: String,
    pub rows: usize,
    pub dimension: usize,
    /// Build parameters. When absent the caller's fallback config is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ann: Option<AnnConfig>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InverseVocab {
    Ordered(Vec<String>),
    Keyed(BTreeMap<String, String>),
}

/// Load and validate all four artifacts. `fallback_ann` is used when the
/// manifest carries no build parameters.
pub fn load_model(
    paths: &ArtifactPaths,
    fallback_ann: AnnConfig,
) -> Result<TrackModel, IndexError> {
    let missing = paths.missing();
    if !missing.is_empty() {
        let list: Vec<String> = missing.iter().map(|p| p.display().to_string()).collect();
        return Err(IndexError::MissingArtifact(list.join(", ")));
    }

    let forward: HashMap<String, usize> = read_json(&paths.track_to_idx_path())?;
    let inverse = read_inverse(&paths.idx_to_track_path())?;
    let vocab = Vocabulary::from_parts(forward, inverse)?;

    let embeddings = read_embeddings(&paths.embeddings_path())?;
    let manifest: NeighborManifest = read_json(&paths.neighbors_path())?;
    check_manifest(&manifest, &embeddings)?;

    log::info!(
        "loaded {} tracks ({}-d embeddings) from {}",
        vocab.len(),
        embeddings.dimension(),
        paths.dir.display()
    );

    TrackModel::assemble(vocab, embeddings, manifest.ann.unwrap_or(fallback_ann))
}

/// Persist a model's vocabulary and embeddings in the layout
/// [`load_model`] expects.
pub fn write_model(
    paths: &ArtifactPaths,
    vocab: &Vocabulary,
    embeddings: &EmbeddingTable,
    ann: Option<AnnConfig>,
) -> Result<(), IndexError> {
    fs::create_dir_all(&paths.dir).map_err(|e| io_error(&paths.dir, e))?;

    let forward: BTreeMap<&str, usize> = vocab
        .ids()
        .iter()
        .enumerate()
        .map(|(idx, id)| (id.as_str(), idx))
        .collect();
    write_json(&paths.track_to_idx_path(), &forward)?;
    write_json(&paths.idx_to_track_path(), vocab.ids())?;

    let artifact = EmbeddingArtifact {
        dimension: embeddings.dimension(),
        rows: embeddings.len(),
        data: embeddings.as_array().iter().copied().collect(),
    };
    let encoded = encode_to_vec(&artifact, standard())?;
    let compressed =
        encode_all(&encoded[..], 0).map_err(|e| IndexError::Encode(e.to_string()))?;
    let path = paths.embeddings_path();
    fs::write(&path, compressed).map_err(|e| io_error(&path, e))?;

    let manifest = NeighborManifest {
        metric: EUCLIDEAN.into(),
        rows: embeddings.len(),
        dimension: embeddings.dimension(),
        ann,
    };
    write_json(&paths.neighbors_path(), &manifest)
}

fn read_embeddings(path: &Path) -> Result<EmbeddingTable, IndexError> {
    let compressed = fs::read(path).map_err(|e| io_error(path, e))?;
    let bytes = decode_all(&compressed[..]).map_err(|e| IndexError::Decode(e.to_string()))?;
    let (artifact, _): (EmbeddingArtifact, usize) = decode_from_slice(&bytes, standard())?;
    let expected = artifact.rows.checked_mul(artifact.dimension);
    if expected != Some(artifact.data.len()) {
        return Err(IndexError::InvalidArtifact(format!(
            "embeddings declare {}x{} but hold {} values",
            artifact.rows,
            artifact.dimension,
            artifact.data.len()
        )));
    }
    EmbeddingTable::from_flat(artifact.dimension, artifact.data)
}

fn read_inverse(path: &Path) -> Result<Vec<String>, IndexError> {
    match read_json::<InverseVocab>(path)? {
        InverseVocab::Ordered(ids) => Ok(ids),
        InverseVocab::Keyed(map) => {
            let mut slots: Vec<Option<String>> = vec![None; map.len()];
            for (key, id) in map {
                let idx: usize = key.parse().map_err(|_| {
                    IndexError::VocabularyMismatch(format!("inverse key {key:?} is not an index"))
                })?;
                let slot = slots
                    .get_mut(idx)
                    .filter(|slot| slot.is_none())
                    .ok_or_else(|| {
                        IndexError::VocabularyMismatch(format!(
                            "inverse index {idx} is duplicated or out of range"
                        ))
                    })?;
                *slot = Some(id);
            }
            Ok(slots.into_iter().flatten().collect())
        }
    }
}

fn check_manifest(
    manifest: &NeighborManifest,
    embeddings: &EmbeddingTable,
) -> Result<(), IndexError> {
    if !manifest.metric.eq_ignore_ascii_case(EUCLIDEAN) {
        return Err(IndexError::InvalidArtifact(format!(
            "unsupported neighbour metric {:?}; expected {EUCLIDEAN:?}",
            manifest.metric
        )));
    }
    if manifest.rows != embeddings.len() || manifest.dimension != embeddings.dimension() {
        return Err(IndexError::InvalidArtifact(format!(
            "neighbour index covers {}x{} but embeddings are {}x{}",
            manifest.rows,
            manifest.dimension,
            embeddings.len(),
            embeddings.dimension()
        )));
    }
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, IndexError> {
    let bytes = fs::read(path).map_err(|e| io_error(path, e))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| IndexError::InvalidArtifact(format!("{}: {e}", path.display())))
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), IndexError> {
    let bytes = serde_json::to_vec_pretty(value).map_err(|e| IndexError::Encode(e.to_string()))?;
    fs::write(path, bytes).map_err(|e| io_error(path, e))
}

fn io_error(path: &Path, err: std::io::Error) -> IndexError {
    IndexError::Io(format!("{}: {err}", path.display()))
}
