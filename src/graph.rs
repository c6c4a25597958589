//! # Graph Builder Module
//!
//! Builds the heterogeneous analysis graph: song nodes linked to each other
//! by similarity and to attribute nodes by notable-bin membership.
//!
//! ## Shape
//!
//! Nodes are a tagged variant, [`NodeKind`]: a song node wraps a dense
//! repository index, an attribute node wraps a (feature, bin) key. The graph
//! is undirected and stores at most one edge per unordered node pair, with
//! no self-loops.
//!
//! ## Construction
//!
//! 1. One song node per repository song.
//! 2. One attribute node per *notable* bin of the catalog, i.e. bins whose
//!    percentile range lies in the configured extremes. Mid-range bins are
//!    not materialized, which bounds graph size.
//! 3. Membership edges (weight 1.0): each song's value is classified into
//!    its bin per feature by binary search; if that bin has a node, the song
//!    links to it. One `O(songs x features)` pass.
//! 4. Similarity edges: candidate pairs are limited to songs sharing at
//!    least one notable-bin membership, which avoids the all-pairs sweep
//!    over the full catalog. Each candidate pair is scored with
//!    [`similarity`] and linked iff the score reaches `min_similarity`.
//!    Pair scoring fans out across cores with rayon.
//!
//! A graph with zero similarity edges is reported as degraded (attribute
//! connectivity only), not treated as a failure.

use crate::catalog::AttributeCatalog;
use crate::config::AnalysisConfig;
use crate::repository::SongRepository;
use crate::song::{Song, FEATURE_COUNT};
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Similarity score between two songs, in [0, 1].
///
/// Weighted mean of per-feature closeness, where closeness is
/// `1 - |a - b| / reference range`. Features skipped by the catalog
/// (zero variance) and features with weight 0 do not participate. Closeness
/// is clamped at 0 for values farther apart than the reference range, which
/// can happen when playlist values fall outside it.
///
/// The metric is symmetric, deterministic, and maximal (1.0) for a song
/// compared with itself. If no feature participates at all, the score is 0.
#[must_use]
pub fn similarity(
    a: &Song,
    b: &Song,
    catalog: &AttributeCatalog,
    weights: &[f64; FEATURE_COUNT],
) -> f64 {
    let mut net = 0.0;
    let mut total_weight = 0.0;

    for feature in 0..FEATURE_COUNT {
        let weight = weights[feature];
        if weight == 0.0 {
            continue;
        }
        let Some(range) = catalog.range(feature) else {
            continue;
        };

        let closeness = 1.0 - (a.feature(feature) - b.feature(feature)).abs() / range;
        net += weight * closeness.clamp(0.0, 1.0);
        total_weight += weight;
    }

    if total_weight == 0.0 {
        0.0
    } else {
        net / total_weight
    }
}

/// Tagged node variant: a song or an attribute bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Dense repository index of the wrapped song.
    Song(usize),
    /// Notable bin key: feature index and bin position.
    Attribute { feature: usize, bin: usize },
}

/// Node and edge counts, the diagnostics surface for callers.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GraphSummary {
    pub song_nodes: usize,
    pub attribute_nodes: usize,
    pub membership_edges: usize,
    pub similarity_edges: usize,
}

/// The built analysis graph. Immutable once constructed.
#[derive(Debug)]
pub struct SongGraph {
    nodes: Vec<NodeKind>,
    /// Per-node neighbor lists `(node id, edge weight)`, sorted by node id.
    adjacency: Vec<Vec<(usize, f64)>>,
    song_nodes: HashMap<usize, usize>,
    membership_edges: usize,
    similarity_edges: usize,
}

impl SongGraph {
    /// Build the graph from a frozen repository and catalog.
    ///
    /// `config` is assumed validated. The repository may contain playlist
    /// songs; they get nodes and edges like any other song, the distinction
    /// only matters to the recommendation engine.
    #[must_use]
    pub fn build(
        repository: &SongRepository,
        catalog: &AttributeCatalog,
        config: &AnalysisConfig,
    ) -> Self {
        let songs = repository.songs();
        let weights = config.resolved_weights();

        let mut nodes: Vec<NodeKind> = Vec::with_capacity(songs.len());
        let mut song_nodes = HashMap::with_capacity(songs.len());
        for index in 0..songs.len() {
            song_nodes.insert(index, nodes.len());
            nodes.push(NodeKind::Song(index));
        }

        // Only notable bins become nodes.
        let mut attribute_nodes: HashMap<(usize, usize), usize> = HashMap::new();
        for bin in catalog.notable_bins(config.notable_percentile) {
            attribute_nodes.insert((bin.feature, bin.bin), nodes.len());
            nodes.push(NodeKind::Attribute {
                feature: bin.feature,
                bin: bin.bin,
            });
        }

        let mut graph = Self {
            adjacency: vec![Vec::new(); nodes.len()],
            nodes,
            song_nodes,
            membership_edges: 0,
            similarity_edges: 0,
        };

        // Membership edges, and per-attribute member lists for pruning.
        let mut members: HashMap<usize, Vec<usize>> = HashMap::new();
        for (index, song) in songs.iter().enumerate() {
            for feature in 0..FEATURE_COUNT {
                let Some(bin) = catalog.classify(feature, song.feature(feature)) else {
                    continue;
                };
                if let Some(&attr_node) = attribute_nodes.get(&(feature, bin)) {
                    let song_node = graph.song_nodes[&index];
                    graph.add_edge(song_node, attr_node, 1.0);
                    graph.membership_edges += 1;
                    members.entry(attr_node).or_default().push(index);
                }
            }
        }

        // Candidate pairs: songs sharing at least one notable bin. The set
        // dedupes pairs that co-occur in several bins.
        let mut candidates: BTreeSet<(usize, usize)> = BTreeSet::new();
        for list in members.values() {
            for (pos, &left) in list.iter().enumerate() {
                for &right in &list[pos + 1..] {
                    let pair = if left < right { (left, right) } else { (right, left) };
                    candidates.insert(pair);
                }
            }
        }
        debug!(
            "{} candidate pairs from {} attribute nodes",
            candidates.len(),
            attribute_nodes.len()
        );

        let scored: Vec<(usize, usize, f64)> = candidates
            .into_iter()
            .collect::<Vec<_>>()
            .into_par_iter()
            .filter_map(|(left, right)| {
                let score = similarity(&songs[left], &songs[right], catalog, &weights);
                (score >= config.min_similarity).then_some((left, right, score))
            })
            .collect();

        for (left, right, score) in scored {
            let u = graph.song_nodes[&left];
            let v = graph.song_nodes[&right];
            graph.add_edge(u, v, score);
            graph.similarity_edges += 1;
        }

        // Deterministic traversal order regardless of insertion order.
        for neighbors in &mut graph.adjacency {
            neighbors.sort_by(|a, b| a.0.cmp(&b.0));
        }

        if graph.similarity_edges == 0 {
            warn!(
                "no song-song edges above min_similarity={}; \
                 recommendations degrade to attribute-based matching",
                config.min_similarity
            );
        }
        info!(
            "graph built: {} song nodes, {} attribute nodes, {} membership edges, {} similarity edges",
            songs.len(),
            attribute_nodes.len(),
            graph.membership_edges,
            graph.similarity_edges
        );

        graph
    }

    fn add_edge(&mut self, u: usize, v: usize, weight: f64) {
        debug_assert_ne!(u, v);
        self.adjacency[u].push((v, weight));
        self.adjacency[v].push((u, weight));
    }

    /// Neighbors of a node with edge weights, sorted by node id.
    #[must_use]
    pub fn neighbors(&self, node: usize) -> &[(usize, f64)] {
        &self.adjacency[node]
    }

    /// Node id of a song by dense repository index.
    #[must_use]
    pub fn song_node(&self, song_index: usize) -> Option<usize> {
        self.song_nodes.get(&song_index).copied()
    }

    /// The variant of a node.
    #[must_use]
    pub fn node_kind(&self, node: usize) -> NodeKind {
        self.nodes[node]
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph carries similarity connectivity at all. When false,
    /// any recommendation derived from it is attribute-only and the result
    /// is flagged accordingly.
    #[must_use]
    pub fn is_attribute_only(&self) -> bool {
        self.similarity_edges == 0
    }

    /// Node/edge counts for diagnostics.
    #[must_use]
    pub fn summary(&self) -> GraphSummary {
        GraphSummary {
            song_nodes: self.song_nodes.len(),
            attribute_nodes: self.nodes.len() - self.song_nodes.len(),
            membership_edges: self.membership_edges,
            similarity_edges: self.similarity_edges,
        }
    }
}
