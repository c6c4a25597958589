//! # Recommendation Engine Module
//!
//! Derives a playlist profile and a ranked recommendation list from the
//! analysis graph.
//!
//! ## Algorithm
//!
//! 1. Profile the playlist: per-feature summary statistics, deviation from
//!    the reference distribution, and the characteristic (medoid) song(s),
//!    the playlist members with maximum total similarity to the rest of the
//!    playlist, ties kept and ordered by id.
//! 2. From each characteristic song, walk the graph breadth-first up to
//!    `max_path_depth` hops, counting *walks* into every reachable
//!    non-playlist song node. Walk counting (rather than simple-path
//!    enumeration) keeps the search a per-depth frontier fold instead of a
//!    combinatorial explosion; the per-candidate count saturates at
//!    `max_paths_per_candidate` and is read as "at least this many".
//! 3. Each walk contributes the product of its edge weights to the
//!    candidate's score, so many strong connecting routes through similar
//!    songs and shared attribute extremes outrank few weak ones.
//! 4. Rank by score descending, ties by id; return the top `k`.
//!
//! Every step is deterministic: frontiers are ordered maps, adjacency lists
//! are sorted, and all ties break on song id.

use crate::catalog::AttributeCatalog;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::graph::{similarity, NodeKind, SongGraph};
use crate::repository::SongRepository;
use crate::song::{FEATURES, FEATURE_COUNT};
use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeMap;

/// Summary of one feature over the playlist.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureProfile {
    pub feature: &'static str,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
    /// Distance of the playlist mean from the reference mean, in reference
    /// standard deviations. `None` for features the catalog skipped.
    pub deviation: Option<f64>,
}

/// Derived, per-run aggregate over the playlist. Never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct PlaylistProfile {
    /// Number of playlist songs.
    pub size: usize,
    pub features: Vec<FeatureProfile>,
    /// Ids of the characteristic (medoid) song(s), ordered by id.
    pub characteristic: Vec<String>,
    /// Labeled extremes of the features most deviated from the reference
    /// distribution, strongest first (e.g. `"very low energy"`).
    pub distinctive: Vec<String>,
}

/// One ranked candidate.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub id: String,
    /// Walk-weight mass: the sum over counted walks of the product of edge
    /// weights along each walk.
    pub score: f64,
    /// Number of counted walks, saturated at `max_paths_per_candidate`.
    pub paths: u64,
}

/// The full result of a recommendation run.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendations {
    pub profile: PlaylistProfile,
    /// Top candidates, score-descending, at most `k`.
    pub ranked: Vec<Recommendation>,
    /// True when the graph had no similarity edges and the ranking rests on
    /// attribute connectivity alone.
    pub attribute_only: bool,
}

/// Walk accumulator per candidate.
#[derive(Debug, Clone, Copy, Default)]
struct WalkTally {
    count: u64,
    mass: f64,
}

/// Produce the playlist profile and ranked recommendations.
///
/// # Errors
///
/// Returns [`AnalysisError::EmptyPlaylist`] if the repository holds no
/// playlist songs.
pub fn recommend(
    graph: &SongGraph,
    repository: &SongRepository,
    catalog: &AttributeCatalog,
    config: &AnalysisConfig,
) -> Result<Recommendations, AnalysisError> {
    let playlist = repository.playlist_indices();
    if playlist.is_empty() {
        return Err(AnalysisError::EmptyPlaylist);
    }

    let profile = build_profile(repository, catalog, config, &playlist);
    debug!(
        "searching a graph of {} nodes from {} origin(s)",
        graph.node_count(),
        profile.characteristic.len()
    );

    // Per-candidate tallies over all origins, keyed by dense song index.
    let mut tallies: BTreeMap<usize, WalkTally> = BTreeMap::new();
    let cap = config.max_paths_per_candidate;

    for id in &profile.characteristic {
        let origin = repository
            .index_of(id)
            .and_then(|index| graph.song_node(index))
            .expect("characteristic song is always in the graph");

        count_walks_from(graph, repository, origin, config, &mut tallies);
    }

    let mut ranked: Vec<Recommendation> = tallies
        .into_iter()
        .filter(|(_, tally)| tally.count > 0)
        .map(|(index, tally)| Recommendation {
            id: repository.songs()[index].id.clone(),
            score: tally.mass,
            paths: tally.count.min(cap),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    ranked.truncate(config.k);

    info!(
        "{} recommendations for a playlist of {} (characteristic: {})",
        ranked.len(),
        profile.size,
        profile.characteristic.join(", ")
    );

    Ok(Recommendations {
        profile,
        ranked,
        attribute_only: graph.is_attribute_only(),
    })
}

/// Frontier walk counting from one origin node.
///
/// `frontier[v]` after `d` expansions holds the number of length-`d` walks
/// from the origin ending at `v` and their summed edge-weight products.
/// Counts saturate at the per-candidate cap, which also bounds the numbers
/// carried through deeper frontiers.
fn count_walks_from(
    graph: &SongGraph,
    repository: &SongRepository,
    origin: usize,
    config: &AnalysisConfig,
    tallies: &mut BTreeMap<usize, WalkTally>,
) {
    let cap = config.max_paths_per_candidate;
    let mut frontier: BTreeMap<usize, WalkTally> = BTreeMap::new();
    frontier.insert(
        origin,
        WalkTally {
            count: 1,
            mass: 1.0,
        },
    );

    for depth in 1..=config.max_path_depth {
        let mut next: BTreeMap<usize, WalkTally> = BTreeMap::new();

        for (&node, walk) in &frontier {
            for &(neighbor, weight) in graph.neighbors(node) {
                let entry = next.entry(neighbor).or_default();
                entry.count = entry.count.saturating_add(walk.count).min(cap);
                entry.mass += walk.mass * weight;
            }
        }

        for (&node, walk) in &next {
            if let NodeKind::Song(index) = graph.node_kind(node) {
                if repository.songs()[index].provenance.is_candidate() {
                    let tally = tallies.entry(index).or_default();
                    tally.count = tally.count.saturating_add(walk.count).min(cap);
                    tally.mass += walk.mass;
                }
            }
        }

        debug!(
            "depth {depth}: frontier of {} nodes from origin {origin}",
            next.len()
        );
        frontier = next;
    }
}

/// Compute the playlist profile: stats, deviations and the medoid set.
fn build_profile(
    repository: &SongRepository,
    catalog: &AttributeCatalog,
    config: &AnalysisConfig,
    playlist: &[usize],
) -> PlaylistProfile {
    let songs = repository.songs();
    let weights = config.resolved_weights();

    let mut features = Vec::with_capacity(FEATURE_COUNT);
    for (index, name) in FEATURES.iter().enumerate() {
        let values: Vec<f64> = playlist
            .iter()
            .map(|&song| songs[song].feature(index))
            .collect();

        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let variance = values
            .iter()
            .map(|value| (value - mean).powi(2))
            .sum::<f64>()
            / values.len() as f64;

        let deviation = catalog.stats(index).and_then(|stats| {
            (stats.std_dev > 0.0).then(|| (mean - stats.mean).abs() / stats.std_dev)
        });

        features.push(FeatureProfile {
            feature: name,
            mean,
            min,
            max,
            std_dev: variance.sqrt(),
            deviation,
        });
    }

    // Most deviated features, strongest first, labeled by the bin holding
    // the playlist mean.
    let mut deviated: Vec<(usize, f64)> = features
        .iter()
        .enumerate()
        .filter_map(|(index, profile)| profile.deviation.map(|dev| (index, dev)))
        .collect();
    deviated.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    let distinctive: Vec<String> = deviated
        .iter()
        .take(3)
        .filter_map(|&(index, _)| {
            let bin = catalog.classify(index, features[index].mean)?;
            Some(catalog.bins(index)[bin].label())
        })
        .collect();

    PlaylistProfile {
        size: playlist.len(),
        features,
        characteristic: characteristic_songs(repository, catalog, &weights, playlist),
        distinctive,
    }
}

/// The medoid set: playlist songs with maximum total similarity to the rest
/// of the playlist, ordered by id. A single-song playlist is its own medoid.
fn characteristic_songs(
    repository: &SongRepository,
    catalog: &AttributeCatalog,
    weights: &[f64; FEATURE_COUNT],
    playlist: &[usize],
) -> Vec<String> {
    let songs = repository.songs();

    if playlist.len() == 1 {
        return vec![songs[playlist[0]].id.clone()];
    }

    let totals: Vec<f64> = playlist
        .iter()
        .map(|&song| {
            playlist
                .iter()
                .filter(|&&other| other != song)
                .map(|&other| similarity(&songs[song], &songs[other], catalog, weights))
                .sum()
        })
        .collect();

    let best = totals.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut medoids: Vec<String> = playlist
        .iter()
        .zip(&totals)
        .filter(|(_, &total)| total == best)
        .map(|(&song, _)| songs[song].id.clone())
        .collect();
    medoids.sort();
    medoids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::song::{Provenance, Song};

    fn song(id: &str, primary: f64) -> Song {
        let mut features = [0.0; FEATURE_COUNT];
        features[0] = primary;
        features[1] = primary * 2.0;
        for value in features.iter_mut().skip(2) {
            *value = primary / 2.0;
        }
        Song {
            id: id.to_string(),
            title: id.to_string(),
            artists: "test".to_string(),
            features,
            provenance: Provenance::Catalog,
        }
    }

    /// Two clusters at opposite extremes: "a*" near 0, "b*" near 100. With
    /// two quantile bins the boundary falls between the clusters, so each
    /// cluster shares bins only internally.
    fn clustered_reference() -> Vec<Song> {
        vec![
            song("a1", 0.0),
            song("a2", 0.5),
            song("a3", 1.0),
            song("b1", 100.0),
            song("b2", 100.5),
            song("b3", 101.0),
        ]
    }

    fn cluster_config() -> AnalysisConfig {
        AnalysisConfig {
            quantile_bin_count: 2,
            notable_percentile: 0.5,
            min_similarity: 0.9,
            ..AnalysisConfig::default()
        }
    }

    fn run(
        reference: Vec<Song>,
        playlist: Vec<Song>,
        config: &AnalysisConfig,
    ) -> Result<Recommendations, AnalysisError> {
        let catalog =
            AttributeCatalog::build(&reference, config.quantile_bin_count).unwrap();
        let mut repo = SongRepository::from_reference(reference);
        repo.add_playlist_songs(playlist);
        let graph = SongGraph::build(&repo, &catalog, config);
        recommend(&graph, &repo, &catalog, config)
    }

    #[test]
    fn empty_playlist_is_an_error() {
        let result = run(clustered_reference(), Vec::new(), &cluster_config());
        assert!(matches!(result, Err(AnalysisError::EmptyPlaylist)));
    }

    #[test]
    fn recommendations_come_from_the_playlist_cluster() {
        let playlist = vec![song("p1", 0.25)];
        let result = run(clustered_reference(), playlist, &cluster_config()).unwrap();

        assert!(!result.ranked.is_empty());
        for rec in &result.ranked {
            assert!(
                rec.id.starts_with('a'),
                "unexpected cross-cluster recommendation {}",
                rec.id
            );
        }
        assert!(!result.attribute_only);
    }

    #[test]
    fn recommendations_never_include_playlist_songs() {
        let playlist = vec![song("a2", 0.5), song("p1", 0.25)];
        let result = run(clustered_reference(), playlist, &cluster_config()).unwrap();

        for rec in &result.ranked {
            assert_ne!(rec.id, "a2");
            assert_ne!(rec.id, "p1");
        }
    }

    #[test]
    fn depth_one_counts_direct_similarity_edges_once() {
        let config = AnalysisConfig {
            max_path_depth: 1,
            ..cluster_config()
        };
        let playlist = vec![song("p1", 0.25)];
        let result = run(clustered_reference(), playlist, &config).unwrap();

        // Exactly the three directly-connected cluster members, one walk
        // each; attribute hops cannot reach another song in one step.
        let ids: Vec<&str> = result.ranked.iter().map(|rec| rec.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
        for rec in &result.ranked {
            assert_eq!(rec.paths, 1, "candidate {} path count", rec.id);
        }
        assert!(ids.contains(&"a1"));
        assert!(ids.contains(&"a2"));
        assert!(ids.contains(&"a3"));
    }

    #[test]
    fn ranking_is_sorted_and_truncated_to_k() {
        let config = AnalysisConfig {
            k: 2,
            ..cluster_config()
        };
        let playlist = vec![song("p1", 0.25)];
        let result = run(clustered_reference(), playlist, &config).unwrap();

        assert!(result.ranked.len() <= 2);
        for pair in result.ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn results_are_reproducible() {
        let playlist = vec![song("p1", 0.25)];
        let first = run(clustered_reference(), playlist.clone(), &cluster_config()).unwrap();
        let second = run(clustered_reference(), playlist, &cluster_config()).unwrap();

        let firsts: Vec<(String, u64)> = first
            .ranked
            .iter()
            .map(|rec| (rec.id.clone(), rec.paths))
            .collect();
        let seconds: Vec<(String, u64)> = second
            .ranked
            .iter()
            .map(|rec| (rec.id.clone(), rec.paths))
            .collect();
        assert_eq!(firsts, seconds);
        for (a, b) in first.ranked.iter().zip(&second.ranked) {
            assert_eq!(a.score, b.score);
        }
    }

    #[test]
    fn attribute_only_fallback_still_recommends() {
        // An impossible similarity threshold leaves membership edges as the
        // only connectivity; two hops reach co-members of a notable bin.
        let config = AnalysisConfig {
            min_similarity: 1.0,
            max_path_depth: 2,
            ..cluster_config()
        };
        let playlist = vec![song("p1", 0.25)];
        let result = run(clustered_reference(), playlist, &config).unwrap();

        assert!(result.attribute_only);
        assert!(!result.ranked.is_empty());
        for rec in &result.ranked {
            assert!(rec.id.starts_with('a'));
        }
    }

    #[test]
    fn medoid_is_the_most_central_playlist_song() {
        let playlist = vec![song("p1", 0.0), song("p2", 1.0), song("p3", 4.0)];
        let result = run(clustered_reference(), playlist, &cluster_config()).unwrap();

        assert_eq!(result.profile.characteristic, vec!["p2".to_string()]);
    }

    #[test]
    fn single_song_playlist_is_its_own_medoid() {
        let playlist = vec![song("p1", 0.25)];
        let result = run(clustered_reference(), playlist, &cluster_config()).unwrap();

        assert_eq!(result.profile.characteristic, vec!["p1".to_string()]);
        assert_eq!(result.profile.size, 1);
    }

    #[test]
    fn path_counts_saturate_at_the_cap() {
        let config = AnalysisConfig {
            max_paths_per_candidate: 2,
            max_path_depth: 4,
            ..cluster_config()
        };
        let playlist = vec![song("p1", 0.25)];
        let result = run(clustered_reference(), playlist, &config).unwrap();

        for rec in &result.ranked {
            assert!(rec.paths <= 2, "cap exceeded for {}", rec.id);
        }
    }

    #[test]
    fn profile_flags_deviated_features() {
        // Playlist pinned at the far extreme of every feature.
        let playlist = vec![song("p1", 100.0), song("p2", 100.5)];
        let result = run(clustered_reference(), playlist, &cluster_config()).unwrap();

        assert_eq!(result.profile.distinctive.len(), 3);
        for label in &result.profile.distinctive {
            // Quantifier + feature name, e.g. "high tempo".
            assert!(label.contains(' '), "unlabeled distinctive entry {label}");
        }
        for profile in &result.profile.features {
            if let Some(dev) = profile.deviation {
                assert!(dev >= 0.0);
            }
        }
    }
}
