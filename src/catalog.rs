//! # Attribute Catalog Module
//!
//! Immutable percentile statistics over the reference catalog, computed once
//! per analysis session.
//!
//! For each feature the catalog holds summary statistics (min, max, mean,
//! standard deviation) and a sorted array of quantile boundaries splitting
//! the reference distribution into `quantile_bin_count` bins of roughly
//! equal population. Classifying any later value into its bin is a binary
//! search over the boundary array; no reference data is retained.
//!
//! Only reference songs feed the catalog. Playlist songs are classified
//! against it but never shift its thresholds, so two users with the same
//! reference dataset see the same bins.
//!
//! A feature that is constant across the reference set carries no
//! information and is skipped: it gets no statistics and no bins, and every
//! later query about it answers `None`. The exterior bins are unbounded, so
//! a playlist value outside the observed reference range still classifies
//! (into the first or last bin).

use crate::error::AnalysisError;
use crate::song::{Song, FEATURES, FEATURE_COUNT};
use log::{debug, warn};
use serde::Serialize;

/// Summary statistics of one feature over the reference set.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FeatureStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

/// One percentile bucket of one feature.
///
/// `value_low`/`value_high` are the half-open value bounds `[low, high)`;
/// the first bin's lower bound and the last bin's upper bound are infinite
/// so classification is total. `pct_low`/`pct_high` are the percentile
/// bounds in [0, 1].
#[derive(Debug, Clone, Serialize)]
pub struct AttributeBin {
    /// Feature index into [`FEATURES`].
    pub feature: usize,
    /// Bin position within the feature, `0..quantile_bin_count`.
    pub bin: usize,
    pub pct_low: f64,
    pub pct_high: f64,
    pub value_low: f64,
    pub value_high: f64,
}

impl AttributeBin {
    /// Whether this bin lies in a distribution extreme of width `notable`.
    ///
    /// Only notable bins are materialized as graph nodes; mid-range
    /// memberships say little about a song and would densify the graph.
    #[must_use]
    pub fn is_notable(&self, notable: f64) -> bool {
        self.pct_high <= notable + 1e-9 || self.pct_low >= 1.0 - notable - 1e-9
    }

    /// Human-readable label like `"very low tempo"`.
    #[must_use]
    pub fn label(&self) -> String {
        let quantifiers = ["very low", "low", "medium low", "medium high", "high", "very high"];
        let midpoint = (self.pct_low + self.pct_high) / 2.0;
        let slot = ((midpoint * quantifiers.len() as f64) as usize).min(quantifiers.len() - 1);
        format!("{} {}", quantifiers[slot], FEATURES[self.feature])
    }
}

/// Per-feature distribution: stats plus interior quantile boundaries.
#[derive(Debug, Clone)]
struct FeatureDistribution {
    stats: FeatureStats,
    /// Sorted interior boundaries, length `bin_count - 1`. Bin `i` covers
    /// `[boundaries[i-1], boundaries[i])` with unbounded exteriors.
    boundaries: Vec<f64>,
}

/// Immutable percentile catalog over the reference set.
///
/// Built once with [`AttributeCatalog::build`] and shared read-only by every
/// analysis using the same reference dataset.
#[derive(Debug, Clone)]
pub struct AttributeCatalog {
    bin_count: usize,
    features: Vec<Option<FeatureDistribution>>,
}

impl AttributeCatalog {
    /// Build the catalog from the reference-only song set.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InsufficientData`] if `reference` is empty.
    /// A constant (zero-variance) feature is skipped with a warning, not an
    /// error.
    pub fn build(
        reference: &[Song],
        quantile_bin_count: usize,
    ) -> Result<Self, AnalysisError> {
        if reference.is_empty() {
            return Err(AnalysisError::InsufficientData(
                "reference set is empty".to_string(),
            ));
        }

        let mut features = Vec::with_capacity(FEATURE_COUNT);

        for (index, name) in FEATURES.iter().enumerate() {
            let mut values: Vec<f64> =
                reference.iter().map(|song| song.feature(index)).collect();
            values.sort_by(|a, b| a.total_cmp(b));

            let min = values[0];
            let max = values[values.len() - 1];

            if min == max {
                warn!("feature '{name}' is constant across the reference set; skipping");
                features.push(None);
                continue;
            }

            let mean = values.iter().sum::<f64>() / values.len() as f64;
            let variance = values
                .iter()
                .map(|value| (value - mean).powi(2))
                .sum::<f64>()
                / values.len() as f64;

            // Nearest-rank quantile boundaries. Repeated values may yield
            // equal adjacent boundaries (empty interior bins); classification
            // stays total and unambiguous under the half-open convention.
            let boundaries: Vec<f64> = (1..quantile_bin_count)
                .map(|i| values[i * values.len() / quantile_bin_count])
                .collect();

            debug!(
                "feature '{name}': min={min:.3} max={max:.3} mean={mean:.3} over {} songs",
                values.len()
            );

            features.push(Some(FeatureDistribution {
                stats: FeatureStats {
                    min,
                    max,
                    mean,
                    std_dev: variance.sqrt(),
                },
                boundaries,
            }));
        }

        Ok(Self {
            bin_count: quantile_bin_count,
            features,
        })
    }

    /// Summary statistics of a feature, or `None` if it was skipped.
    #[must_use]
    pub fn stats(&self, feature: usize) -> Option<&FeatureStats> {
        self.features[feature].as_ref().map(|dist| &dist.stats)
    }

    /// Observed value range of a feature, or `None` if it was skipped.
    #[must_use]
    pub fn range(&self, feature: usize) -> Option<f64> {
        self.stats(feature).map(|stats| stats.max - stats.min)
    }

    /// Classify a value into its bin index for a feature.
    ///
    /// Returns `None` only for skipped features. Values below or above the
    /// observed reference range land in the first or last bin.
    #[must_use]
    pub fn classify(&self, feature: usize, value: f64) -> Option<usize> {
        let dist = self.features[feature].as_ref()?;
        Some(dist.boundaries.partition_point(|b| *b <= value))
    }

    /// Materialize the [`AttributeBin`] descriptors of one feature.
    ///
    /// Returns an empty vector for skipped features.
    #[must_use]
    pub fn bins(&self, feature: usize) -> Vec<AttributeBin> {
        let Some(dist) = self.features[feature].as_ref() else {
            return Vec::new();
        };

        (0..self.bin_count)
            .map(|bin| AttributeBin {
                feature,
                bin,
                pct_low: bin as f64 / self.bin_count as f64,
                pct_high: (bin + 1) as f64 / self.bin_count as f64,
                value_low: if bin == 0 {
                    f64::NEG_INFINITY
                } else {
                    dist.boundaries[bin - 1]
                },
                value_high: if bin == self.bin_count - 1 {
                    f64::INFINITY
                } else {
                    dist.boundaries[bin]
                },
            })
            .collect()
    }

    /// All bins across all features whose percentile range lies in the
    /// configured extremes.
    #[must_use]
    pub fn notable_bins(&self, notable: f64) -> Vec<AttributeBin> {
        (0..FEATURE_COUNT)
            .flat_map(|feature| self.bins(feature))
            .filter(|bin| bin.is_notable(notable))
            .collect()
    }
}
