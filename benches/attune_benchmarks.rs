//! # Attune Performance Benchmarks
//!
//! Benchmarks for the three expensive stages of an analysis run: building
//! the attribute catalog, building the graph, and the recommendation walk
//! search.
//!
//! ## Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//!
//! # Run specific benchmark group
//! cargo bench catalog
//! cargo bench graph
//! cargo bench recommend
//! ```

use attune::analysis;
use attune::catalog::AttributeCatalog;
use attune::config::AnalysisConfig;
use attune::graph::{similarity, SongGraph};
use attune::repository::SongRepository;
use attune::song::{Provenance, Song, FEATURE_COUNT};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

/// Deterministic synthetic songs: feature values fan out from a per-song
/// phase so the catalog gets a spread distribution without a RNG.
fn create_test_songs(count: usize) -> Vec<Song> {
    (0..count)
        .map(|i| {
            let phase = i as f64 / count as f64;
            let mut features = [0.0; FEATURE_COUNT];
            for (f, value) in features.iter_mut().enumerate() {
                *value = ((phase * 7.0 + f as f64 * 1.3).sin() + 1.0) * 50.0;
            }
            Song {
                id: format!("song{i:05}"),
                title: format!("Song {i:05}"),
                artists: format!("Artist {}", i % 50),
                features,
                provenance: Provenance::Catalog,
            }
        })
        .collect()
}

fn bench_config() -> AnalysisConfig {
    AnalysisConfig {
        min_similarity: 0.95,
        ..AnalysisConfig::default()
    }
}

/// Benchmark attribute catalog construction
fn benchmark_catalog_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog");

    for size in [100, 1000, 5000] {
        let songs = create_test_songs(size);
        group.bench_with_input(BenchmarkId::new("build", size), &songs, |b, songs| {
            b.iter(|| AttributeCatalog::build(black_box(songs), black_box(10)).unwrap())
        });
    }

    // Classification is the hot path of membership edge construction.
    let songs = create_test_songs(1000);
    let catalog = AttributeCatalog::build(&songs, 10).unwrap();
    group.bench_function("classify", |b| {
        b.iter(|| {
            for feature in 0..FEATURE_COUNT {
                black_box(catalog.classify(feature, black_box(42.0)));
            }
        })
    });

    group.finish();
}

/// Benchmark similarity scoring and graph construction
fn benchmark_graph_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph");

    let songs = create_test_songs(1000);
    let catalog = AttributeCatalog::build(&songs, 10).unwrap();
    let weights = [1.0; FEATURE_COUNT];

    group.bench_function("similarity_pair", |b| {
        b.iter(|| {
            similarity(
                black_box(&songs[1]),
                black_box(&songs[500]),
                &catalog,
                &weights,
            )
        })
    });

    for size in [100, 500, 2000] {
        let songs = create_test_songs(size);
        let repo = SongRepository::from_reference(songs);
        let catalog = AttributeCatalog::build(repo.songs(), 10).unwrap();
        let config = bench_config();

        group.bench_with_input(
            BenchmarkId::new("build", size),
            &(repo, catalog),
            |b, (repo, catalog)| {
                b.iter(|| SongGraph::build(black_box(repo), black_box(catalog), &config))
            },
        );
    }

    group.finish();
}

/// Benchmark the full pipeline including the recommendation walk search
fn benchmark_recommend(c: &mut Criterion) {
    let mut group = c.benchmark_group("recommend");
    group.sample_size(20);

    for size in [500, 2000] {
        let reference = create_test_songs(size);
        let playlist: Vec<Song> = create_test_songs(8)
            .into_iter()
            .enumerate()
            .map(|(i, mut song)| {
                song.id = format!("pl{i:02}");
                song
            })
            .collect();
        let config = bench_config();

        group.bench_with_input(
            BenchmarkId::new("analyze_playlist", size),
            &(reference, playlist),
            |b, (reference, playlist)| {
                b.iter(|| {
                    analysis::analyze_playlist(
                        black_box(reference.clone()),
                        black_box(playlist.clone()),
                        &config,
                    )
                    .unwrap()
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_catalog_build,
    benchmark_graph_build,
    benchmark_recommend
);

criterion_main!(benches);
