use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use std::sync::Arc;
use trackrec::{AnnConfig, EmbeddingTable, RecommendConfig, Recommender, TrackModel, Vocabulary};

const DIM: usize = 32;

/// Deterministic pseudo-random rows so runs are comparable
fn catalog(size: usize) -> (Vocabulary, EmbeddingTable) {
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state >> 40) as f32 / (1u64 << 24) as f32 - 0.5
    };
    let data: Vec<f32> = (0..size * DIM).map(|_| next()).collect();
    let ids: Vec<String> = (0..size).map(|i| format!("spotify:track:{i:06}")).collect();
    (
        Vocabulary::from_ordered(ids).expect("unique ids"),
        EmbeddingTable::from_flat(DIM, data).expect("rectangular table"),
    )
}

fn recommender(size: usize, ann: AnnConfig) -> Recommender {
    let (vocab, table) = catalog(size);
    let model = TrackModel::assemble(vocab, table, ann).expect("model");
    Recommender::new(Arc::new(model), RecommendConfig::default())
}

/// Exact scan against HNSW at the same catalog sizes
fn bench_search_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("recommend");
    let playlist: Vec<String> = [3, 17, 256, 900]
        .iter()
        .map(|i| format!("spotify:track:{i:06}"))
        .collect();

    for size in [1_000, 10_000, 50_000] {
        group.throughput(Throughput::Elements(1));

        let exact = recommender(size, AnnConfig::default().with_enabled(false));
        group.bench_with_input(BenchmarkId::new("exact", size), &size, |b, _| {
            b.iter(|| exact.recommend(black_box(&playlist), 10));
        });

        let hnsw = recommender(size, AnnConfig::default().with_min_vectors_for_ann(1));
        group.bench_with_input(BenchmarkId::new("hnsw", size), &size, |b, _| {
            b.iter(|| hnsw.recommend(black_box(&playlist), 10));
        });
    }

    group.finish();
}

/// Cost of assembling the neighbour index at startup
fn bench_model_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble");
    group.sample_size(10);

    for size in [1_000, 10_000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("hnsw", size), &size, |b, &size| {
            b.iter_with_setup(
                || catalog(size),
                |(vocab, table)| TrackModel::assemble(vocab, table, AnnConfig::default()),
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_search_modes, bench_model_assembly);
criterion_main!(benches);
