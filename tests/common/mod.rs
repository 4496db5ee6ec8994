//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::path::Path;

use trackrec::{ArtifactPaths, EmbeddingTable, Vocabulary};

/// Five tracks: mean(A, B) sits nearest C, then D, then E.
pub fn playlist_fixture() -> (Vocabulary, EmbeddingTable) {
    let vocab = Vocabulary::from_ordered(["A", "B", "C", "D", "E"]).unwrap();
    let table = EmbeddingTable::from_rows(&[
        vec![1.0, 0.0],
        vec![0.0, 1.0],
        vec![1.2, 1.2],
        vec![2.0, 2.0],
        vec![-3.0, -3.0],
    ])
    .unwrap();
    (vocab, table)
}

/// `count` tracks on a jittered 3-d grid, named `spotify:track:NNNN`.
pub fn catalog_fixture(count: usize) -> (Vocabulary, EmbeddingTable) {
    let ids: Vec<String> = (0..count).map(track_id).collect();
    let rows: Vec<Vec<f32>> = (0..count)
        .map(|i| {
            vec![
                (i % 25) as f32,
                (i / 25) as f32,
                ((i * 37) % 11) as f32 * 0.1,
            ]
        })
        .collect();
    (
        Vocabulary::from_ordered(ids).unwrap(),
        EmbeddingTable::from_rows(&rows).unwrap(),
    )
}

pub fn track_id(i: usize) -> String {
    format!("spotify:track:{i:04}")
}

/// Write the playlist fixture under `dir` and return its paths.
pub fn write_playlist_model(dir: &Path) -> ArtifactPaths {
    let paths = ArtifactPaths::in_dir(dir);
    let (vocab, table) = playlist_fixture();
    trackrec::write_model(&paths, &vocab, &table, None).unwrap();
    paths
}
