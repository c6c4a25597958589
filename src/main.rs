//! # Attune - Playlist Analysis & Song Recommendations
//!
//! Attune characterizes a playlist against a large reference catalog and
//! recommends catalog songs connected to it through a graph of similarity
//! and shared attribute extremes.
//!
//! ## Architecture
//!
//! - `cli`: Command-line interface definitions
//! - `dataset`: CSV loading for catalog and playlist files
//! - `catalog`: Percentile statistics over the reference set
//! - `repository`: In-memory song index
//! - `graph`: Heterogeneous song/attribute graph construction
//! - `recommend`: Playlist profile and bounded path-count ranking
//! - `analysis`: One-shot pipeline wiring
//! - `config`: Analysis configuration
//!
//! ## Usage
//!
//! ```bash
//! # Analyze a playlist
//! attune analyze --catalog data/songs.csv --playlist playlist.csv
//!
//! # Same, as JSON for downstream tooling
//! attune analyze --catalog data/songs.csv --playlist playlist.csv --json
//!
//! # Graph diagnostics only
//! attune graph-stats --catalog data/songs.csv --playlist playlist.csv
//! ```

mod analysis;
mod catalog;
mod cli;
mod completion;
mod config;
mod dataset;
mod error;
mod graph;
mod recommend;
mod repository;
mod song;

use analysis::AnalysisReport;
use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use config::AnalysisConfig;
use log::info;
use std::path::{Path, PathBuf};

/// Load the configuration, or fall back to defaults when no file is given.
fn load_config(path: Option<&PathBuf>) -> Result<AnalysisConfig> {
    match path {
        Some(path) => AnalysisConfig::from_path(path),
        None => Ok(AnalysisConfig::default()),
    }
}

/// Load both CSVs and run the full pipeline.
fn run_analysis(
    catalog_path: &Path,
    playlist_path: &Path,
    config: &AnalysisConfig,
) -> Result<AnalysisReport> {
    let reference = dataset::load_reference(catalog_path)
        .with_context(|| format!("failed to load catalog {}", catalog_path.display()))?;
    let playlist = dataset::load_playlist(playlist_path)
        .with_context(|| format!("failed to load playlist {}", playlist_path.display()))?;

    let report = analysis::analyze_playlist(reference, playlist, config)?;
    Ok(report)
}

/// Render the report as a human-readable text summary.
fn print_report(report: &AnalysisReport) {
    println!("Playlist profile ({} songs)", report.profile.size);
    println!("  characteristic: {}", report.profile.characteristic.join(", "));
    if !report.profile.distinctive.is_empty() {
        println!("  distinctive features: {}", report.profile.distinctive.join(", "));
    }
    println!();

    println!("  {:<18} {:>10} {:>10} {:>10} {:>10}", "feature", "mean", "min", "max", "deviation");
    for feature in &report.profile.features {
        let deviation = feature
            .deviation
            .map_or_else(|| "-".to_string(), |dev| format!("{dev:.2}"));
        println!(
            "  {:<18} {:>10.3} {:>10.3} {:>10.3} {:>10}",
            feature.feature, feature.mean, feature.min, feature.max, deviation
        );
    }
    println!();

    if report.attribute_only {
        println!("note: no similarity edges above the threshold; ranking uses attribute connectivity only");
        println!();
    }

    if report.recommendations.is_empty() {
        println!("No recommendations reachable within the configured depth.");
    } else {
        println!("Recommendations:");
        for (rank, rec) in report.recommendations.iter().enumerate() {
            println!(
                "  {:>2}. {} by {}  (score {:.3}, {} paths)",
                rank + 1,
                rec.title,
                rec.artists,
                rec.score,
                rec.paths
            );
        }
    }
    println!();
    println!(
        "Graph: {} song nodes, {} attribute nodes, {} membership edges, {} similarity edges",
        report.graph.song_nodes,
        report.graph.attribute_nodes,
        report.graph.membership_edges,
        report.graph.similarity_edges
    );
}

/// Main entry point for the Attune application.
///
/// Initializes logging, parses command-line arguments, and routes commands
/// to the appropriate module functions. All operations return Results for
/// consistent error handling throughout the application.
///
/// # Logging
///
/// Initializes environment logger which can be controlled via `RUST_LOG`:
/// - `RUST_LOG=debug attune analyze ...` - Enable debug logging
/// - `RUST_LOG=attune::graph=trace attune analyze ...` - Module-specific logging
fn main() -> Result<()> {
    env_logger::init();

    let args = cli::Args::parse();

    match args.command {
        cli::Command::Analyze {
            catalog,
            playlist,
            config,
            top,
            json,
        } => {
            let mut config = load_config(config.as_ref())?;
            if let Some(top) = top {
                config.k = top;
                config.validate()?;
            }

            info!(
                "analyzing {} against {}",
                playlist.display(),
                catalog.display()
            );
            let report = run_analysis(&catalog, &playlist, &config)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        cli::Command::GraphStats {
            catalog,
            playlist,
            config,
        } => {
            let config = load_config(config.as_ref())?;
            let report = run_analysis(&catalog, &playlist, &config)?;

            println!("{}", serde_json::to_string_pretty(&report.graph)?);
        }
        cli::Command::Completion { shell } => {
            let mut cmd = cli::Args::command();
            completion::generate_completions(
                completion::shell_to_completion_shell(&shell),
                &mut cmd,
            );
        }
    }

    Ok(())
}
