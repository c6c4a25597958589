//! Playlist analysis and graph-based song recommendations.
//!
//! Core modules:
//! - [`catalog`] - Percentile statistics over the reference set
//! - [`repository`] - In-memory song index
//! - [`graph`] - Heterogeneous song/attribute graph construction
//! - [`recommend`] - Playlist profiling and path-count ranking
//!
//! ### Supporting Modules
//!
//! - [`analysis`] - One-shot pipeline wiring
//! - [`config`] - Analysis configuration with validation
//! - [`dataset`] - CSV loading for catalog and playlist files
//! - [`error`] - Typed failure taxonomy
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation
//!
//! ## Quick Start Example
//!
//! ```no_run
//! use attune::{analysis, config::AnalysisConfig, dataset};
//! use std::path::Path;
//!
//! let reference = dataset::load_reference(Path::new("data/songs.csv"))?;
//! let playlist = dataset::load_playlist(Path::new("playlist.csv"))?;
//!
//! let config = AnalysisConfig::default();
//! let report = analysis::analyze_playlist(reference, playlist, &config)?;
//!
//! for rec in &report.recommendations {
//!     println!("{} by {} (score {:.3})", rec.title, rec.artists, rec.score);
//! }
//! # Ok::<(), attune::error::AnalysisError>(())
//! ```
//!
//! ## Algorithm Overview
//!
//! Attune builds a heterogeneous graph for every analysis run:
//!
//! 1. The **attribute catalog** splits each numeric feature of the reference
//!    set into quantile bins; only the *notable* bins at the distribution
//!    extremes become graph nodes.
//! 2. The **graph builder** links every song to the notable bins holding its
//!    values, then links songs to each other where their weighted
//!    vector similarity clears a threshold. Candidate pairs are pruned to
//!    songs sharing at least one notable bin, avoiding the all-pairs sweep.
//! 3. The **recommendation engine** finds the playlist's characteristic
//!    (medoid) songs and counts bounded-depth walks from them into catalog
//!    songs. Many strong connecting routes mean a high score; ties break on
//!    id so runs are reproducible.
//!
//! Both the depth and the per-candidate count of the walk search are capped
//! by configuration, so the search always terminates in bounded time.
//!
//! ## Error Handling
//!
//! Construction problems scoped to a single feature or row (constant
//! feature, malformed CSV line) are skipped with a logged warning. Problems
//! that make the requested operation meaningless (empty reference set, empty
//! playlist, invalid configuration) surface as [`error::AnalysisError`].
//! A graph without similarity edges degrades to attribute-only matching and
//! the result is flagged, never silently partial.

pub mod analysis;
pub mod catalog;
pub mod cli;
pub mod completion;
pub mod config;
pub mod dataset;
pub mod error;
pub mod graph;
pub mod recommend;
pub mod repository;
pub mod song;
