//! Concurrent readers over one shared model.

mod common;

use std::sync::Arc;
use std::thread;

use trackrec::{AnnConfig, RecommendConfig, Recommender, TrackModel};

use common::{catalog_fixture, playlist_fixture, track_id};

#[test]
fn threads_see_identical_answers() {
    let (vocab, table) = playlist_fixture();
    let model = Arc::new(TrackModel::assemble(vocab, table, AnnConfig::default()).unwrap());
    let rec = Recommender::new(model, RecommendConfig::default());

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let rec = rec.clone();
            thread::spawn(move || rec.recommend(&["A", "B"], 1).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), vec!["C"]);
    }
}

#[test]
fn mixed_playlists_across_threads_over_hnsw() {
    let (vocab, table) = catalog_fixture(1200);
    let model = Arc::new(TrackModel::assemble(vocab, table, AnnConfig::default()).unwrap());
    let rec = Recommender::new(model, RecommendConfig::default());

    // Serial answers first, then the same requests in parallel.
    let playlists: Vec<Vec<String>> = (0..8)
        .map(|t| (0..3).map(|j| track_id(t * 100 + j * 7)).collect())
        .collect();
    let expected: Vec<Vec<String>> = playlists
        .iter()
        .map(|p| rec.recommend(p, 10).unwrap())
        .collect();

    let handles: Vec<_> = playlists
        .into_iter()
        .map(|playlist| {
            let rec = rec.clone();
            thread::spawn(move || rec.recommend(&playlist, 10).unwrap())
        })
        .collect();

    for (handle, want) in handles.into_iter().zip(expected) {
        let got = handle.join().unwrap();
        assert_eq!(got, want);
        assert_eq!(got.len(), 10);
    }
}
