mod common;

use std::sync::Arc;

use trackrec::{
    open_recommender, AnnConfig, RecommendConfig, Recommender, TrackModel,
};

use common::{catalog_fixture, track_id, write_playlist_model};

#[test]
fn loaded_model_answers_the_reference_playlist() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_playlist_model(dir.path());
    let rec = open_recommender(&paths, AnnConfig::default(), RecommendConfig::default());

    assert_eq!(rec.recommend(&["A", "B"], 1).unwrap(), vec!["C"]);
    assert!(rec.recommend(&["Z"], 10).unwrap().is_empty());
}

#[test]
fn repeated_calls_on_one_model_agree() {
    let (vocab, table) = catalog_fixture(1500);
    let ann = AnnConfig::default();
    let model = TrackModel::assemble(vocab, table, ann).unwrap();
    let rec = Recommender::new(Arc::new(model), RecommendConfig::default());

    let playlist: Vec<String> = [12, 480, 481, 999].into_iter().map(track_id).collect();
    let first = rec.recommend(&playlist, 20).unwrap();
    for _ in 0..5 {
        assert_eq!(rec.recommend(&playlist, 20).unwrap(), first);
    }
}

#[test]
fn exact_search_is_reproducible_across_loads() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_playlist_model(dir.path());
    let ann = AnnConfig::default().with_enabled(false);

    let first = open_recommender(&paths, ann, RecommendConfig::default());
    let second = open_recommender(&paths, ann, RecommendConfig::default());
    assert_eq!(
        first.recommend(&["C", "E"], 3).unwrap(),
        second.recommend(&["C", "E"], 3).unwrap()
    );
}

#[test]
fn playlist_order_does_not_change_results() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_playlist_model(dir.path());
    let rec = open_recommender(&paths, AnnConfig::default(), RecommendConfig::default());

    assert_eq!(
        rec.recommend(&["A", "B", "D"], 2).unwrap(),
        rec.recommend(&["D", "B", "A"], 2).unwrap()
    );
}
