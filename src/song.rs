//! The `Song` entity and the fixed attribute-vector layout shared by the
//! whole catalog.
//!
//! Every song carries the same ordered set of numeric features. The order is
//! fixed process-wide: component `i` of one song's vector is always the same
//! feature as component `i` of another's, so vectors can be compared
//! directly without consulting a schema.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ordered list of the numeric features every song carries.
///
/// Index into a song's feature vector with [`feature_index`], or by position
/// in this array. The order is part of the catalog contract and must not
/// change between loading and analysis.
pub const FEATURES: [&str; 11] = [
    "acousticness",
    "danceability",
    "energy",
    "instrumentalness",
    "liveness",
    "loudness",
    "popularity",
    "speechiness",
    "tempo",
    "valence",
    "year",
];

/// Number of features in every song's attribute vector.
pub const FEATURE_COUNT: usize = FEATURES.len();

lazy_static::lazy_static! {
    /// Reverse lookup from feature name to vector index.
    static ref FEATURE_INDEX: HashMap<&'static str, usize> = FEATURES
        .iter()
        .enumerate()
        .map(|(i, name)| (*name, i))
        .collect();
}

/// Return the vector index of a feature name, if it is a known feature.
#[must_use]
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_INDEX.get(name).copied()
}

/// Where a song came from.
///
/// A song that appears in the reference catalog *and* in the user's playlist
/// is kept as one entity marked `Both`: it still participates in similarity
/// comparisons, but is never offered back as a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Reference catalog only.
    Catalog,
    /// User playlist only.
    Playlist,
    /// Present in both the catalog and the playlist.
    Both,
}

impl Provenance {
    /// Whether the song belongs to the analyzed playlist.
    #[must_use]
    pub fn in_playlist(self) -> bool {
        matches!(self, Provenance::Playlist | Provenance::Both)
    }

    /// Whether the song may be recommended. Playlist members never are.
    #[must_use]
    pub fn is_candidate(self) -> bool {
        matches!(self, Provenance::Catalog)
    }
}

/// One track with its display metadata and attribute vector.
///
/// Immutable once created; analysis never mutates songs, it only reads their
/// vectors. The `id` is the stable identifier used for deduplication, node
/// keys and deterministic tie-breaking; `title` and `artists` are opaque to
/// the algorithm and only surface in reports.
#[derive(Debug, Clone, Serialize)]
pub struct Song {
    pub id: String,
    pub title: String,
    pub artists: String,
    /// Numeric attributes in [`FEATURES`] order.
    pub features: [f64; FEATURE_COUNT],
    pub provenance: Provenance,
}

impl Song {
    /// Value of one feature by vector index.
    #[must_use]
    pub fn feature(&self, index: usize) -> f64 {
        self.features[index]
    }
}
