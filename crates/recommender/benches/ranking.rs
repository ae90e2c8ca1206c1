//! Benchmarks for similarity ranking
//!
//! Run with: cargo bench --package recommender
//!
//! Uses a synthetic 5000-movie catalog, roughly the size of the TMDB 5000 dump.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::{Catalog, DataIndex, SimilarityMatrix};
use recommender::{rank_row, SimilarityRecommender};
use std::sync::Arc;

const MOVIES: usize = 5000;

fn build_test_data() -> Arc<DataIndex> {
    let mut catalog = Catalog::new();
    for i in 0..MOVIES {
        catalog.insert_movie(i as u32, format!("Movie {}", i), "drama");
    }
    catalog.build_secondary_indices();

    let scores = (0..MOVIES * MOVIES)
        .map(|cell| ((cell * 7919) % 10_007) as f32 / 10_007.0)
        .collect();
    let matrix = SimilarityMatrix::new(MOVIES, scores).expect("Failed to build matrix");

    Arc::new(DataIndex::new(catalog, matrix).expect("Failed to build data index"))
}

fn bench_rank_row(c: &mut Criterion) {
    let data_index = build_test_data();
    let row = data_index.similarity().row(42).expect("Row out of range");

    c.bench_function("rank_row_5000", |b| {
        b.iter(|| {
            let ranked = rank_row(black_box(row));
            black_box(ranked)
        })
    });
}

fn bench_recommend(c: &mut Criterion) {
    let data_index = build_test_data();
    let recommender = SimilarityRecommender::new(data_index);

    c.bench_function("recommend_top5", |b| {
        b.iter(|| {
            let results = recommender
                .recommend(black_box("Movie 4242"), black_box(5))
                .unwrap();
            black_box(results)
        })
    });
}

criterion_group!(benches, bench_rank_row, bench_recommend);
criterion_main!(benches);
