//! # Command-Line Interface Module
//!
//! This module defines the command-line interface for Attune using Clap
//! derive macros. It provides a type-safe way to parse command-line
//! arguments and route them to appropriate functionality.
//!
//! ## Commands
//!
//! - `analyze`: Profile a playlist against a reference catalog and print
//!   ranked recommendations
//! - `graph-stats`: Print node/edge diagnostics for the analysis graph
//! - `completion`: Generate shell completion scripts
//!
//! ## Examples
//!
//! ```bash
//! attune analyze --catalog data/songs.csv --playlist my_playlist.csv
//! attune analyze --catalog data/songs.csv --playlist my_playlist.csv --top 5 --json
//! attune graph-stats --catalog data/songs.csv --playlist my_playlist.csv
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// Main application arguments structure.
///
/// Uses Clap derive macros to automatically generate argument parsing,
/// help text, and validation. The main structure contains only a subcommand
/// since all functionality is accessed through specific commands.
#[derive(Parser)]
#[command(name = "attune")]
#[command(about = "Attune: playlist profiling & graph-based song recommendations")]
#[command(version)]
pub struct Args {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Enumeration of all available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Analyze a playlist and print ranked recommendations
    ///
    /// Builds the attribute catalog from the reference CSV, links catalog
    /// and playlist songs into the analysis graph, and ranks catalog songs
    /// by the number and strength of connecting routes from the playlist's
    /// characteristic songs.
    Analyze {
        /// Path to the reference catalog CSV
        #[arg(long)]
        catalog: PathBuf,

        /// Path to the playlist CSV (same column layout as the catalog)
        #[arg(long)]
        playlist: PathBuf,

        /// Path to a JSON configuration file
        ///
        /// Fields missing from the file keep their built-in defaults.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Number of recommendations to return (overrides the config file)
        #[arg(long)]
        top: Option<usize>,

        /// Emit the full report as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print node/edge diagnostics for the analysis graph
    ///
    /// Builds the same graph `analyze` would and prints its summary
    /// statistics without running the recommendation search. Useful for
    /// tuning `notable_percentile` and `min_similarity`.
    GraphStats {
        /// Path to the reference catalog CSV
        #[arg(long)]
        catalog: PathBuf,

        /// Path to the playlist CSV
        #[arg(long)]
        playlist: PathBuf,

        /// Path to a JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        shell: Shell,
    },
}
