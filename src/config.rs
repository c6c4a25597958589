//! # Configuration Module
//!
//! Tuning knobs for the whole analysis pipeline: quantile binning, notable
//! extremes, the similarity threshold, per-feature weights and the bounds on
//! the recommendation path search.
//!
//! A configuration can come from three places, later ones overriding
//! earlier ones:
//! - the built-in defaults ([`AnalysisConfig::default`]),
//! - a JSON file loaded with [`AnalysisConfig::from_path`] (missing fields
//!   fall back to defaults),
//! - individual CLI flags applied by the binary.
//!
//! Every loaded configuration must pass [`AnalysisConfig::validate`] before
//! use; the graph builder and recommendation engine assume validated values.

use crate::error::AnalysisError;
use crate::song::{self, FEATURE_COUNT};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Configuration for one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Number of quantile bins per feature in the attribute catalog.
    pub quantile_bin_count: usize,
    /// Fraction of the distribution at each end considered "notable".
    /// Only bins inside these extremes become attribute nodes.
    pub notable_percentile: f64,
    /// Minimum similarity score for a song-song edge, in [0, 1].
    pub min_similarity: f64,
    /// Per-feature weights for the similarity metric, keyed by feature name.
    /// Features not listed keep weight 1.0.
    pub feature_weights: HashMap<String, f64>,
    /// Maximum number of hops explored by the recommendation path search.
    pub max_path_depth: usize,
    /// Per-candidate cap on counted paths; counting saturates here.
    pub max_paths_per_candidate: u64,
    /// Number of recommendations to return.
    pub k: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            quantile_bin_count: 10,
            notable_percentile: 0.1,
            min_similarity: 0.9,
            feature_weights: HashMap::new(),
            max_path_depth: 3,
            max_paths_per_candidate: 10_000,
            k: 10,
        }
    }
}

impl AnalysisConfig {
    /// Load a configuration from a JSON file, validating it.
    ///
    /// Fields missing from the file keep their default values.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, is not valid JSON, or fails
    /// [`AnalysisConfig::validate`].
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        let config: AnalysisConfig = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Check every value against its documented range.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Config`] naming the first offending value.
    pub fn validate(&self) -> std::result::Result<(), AnalysisError> {
        if self.quantile_bin_count < 2 {
            return Err(AnalysisError::Config(format!(
                "quantile_bin_count must be at least 2, got {}",
                self.quantile_bin_count
            )));
        }
        if !(self.notable_percentile > 0.0 && self.notable_percentile <= 0.5) {
            return Err(AnalysisError::Config(format!(
                "notable_percentile must be in (0, 0.5], got {}",
                self.notable_percentile
            )));
        }
        if !(0.0..=1.0).contains(&self.min_similarity) {
            return Err(AnalysisError::Config(format!(
                "min_similarity must be in [0, 1], got {}",
                self.min_similarity
            )));
        }
        if self.max_path_depth == 0 {
            return Err(AnalysisError::Config(
                "max_path_depth must be at least 1".to_string(),
            ));
        }
        if self.max_paths_per_candidate == 0 {
            return Err(AnalysisError::Config(
                "max_paths_per_candidate must be at least 1".to_string(),
            ));
        }
        if self.k == 0 {
            return Err(AnalysisError::Config("k must be at least 1".to_string()));
        }
        for (name, weight) in &self.feature_weights {
            if song::feature_index(name).is_none() {
                return Err(AnalysisError::Config(format!(
                    "unknown feature '{name}' in feature_weights"
                )));
            }
            if !weight.is_finite() || *weight < 0.0 {
                return Err(AnalysisError::Config(format!(
                    "weight for '{name}' must be a non-negative number, got {weight}"
                )));
            }
        }
        Ok(())
    }

    /// Resolve the weight map into a dense per-feature array.
    ///
    /// Unlisted features get weight 1.0. Assumes [`AnalysisConfig::validate`]
    /// has passed, so every listed name resolves.
    #[must_use]
    pub fn resolved_weights(&self) -> [f64; FEATURE_COUNT] {
        let mut weights = [1.0; FEATURE_COUNT];
        for (name, weight) in &self.feature_weights {
            if let Some(index) = song::feature_index(name) {
                weights[index] = *weight;
            }
        }
        weights
    }
}
