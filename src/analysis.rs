//! One-shot analysis pipeline: catalog, repository, graph, recommendations.
//!
//! Each run wires the immutable pieces together in the documented order and
//! returns a single [`AnalysisReport`] for the caller (CLI, or whatever
//! report layer sits on top). Nothing here is cached between runs; the
//! inputs are plain song vectors and a validated configuration.

use crate::catalog::AttributeCatalog;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::graph::{GraphSummary, SongGraph};
use crate::recommend::{self, PlaylistProfile};
use crate::repository::SongRepository;
use crate::song::Song;
use log::info;
use serde::Serialize;

/// One ranked candidate with display metadata resolved.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendedSong {
    pub id: String,
    pub title: String,
    pub artists: String,
    pub score: f64,
    pub paths: u64,
}

/// Everything a report layer needs from one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub profile: PlaylistProfile,
    pub recommendations: Vec<RecommendedSong>,
    pub graph: GraphSummary,
    /// True when the ranking rests on attribute connectivity alone.
    pub attribute_only: bool,
}

/// Run the full pipeline over already-loaded songs.
///
/// The attribute catalog is computed from `reference` only, before the
/// playlist is merged in, so playlist songs never shift the percentile
/// thresholds.
///
/// # Errors
///
/// Fails on invalid configuration, an empty reference set, or an empty
/// playlist.
pub fn analyze_playlist(
    reference: Vec<Song>,
    playlist: Vec<Song>,
    config: &AnalysisConfig,
) -> Result<AnalysisReport, AnalysisError> {
    config.validate()?;

    info!(
        "analyzing a playlist of {} against {} reference songs",
        playlist.len(),
        reference.len()
    );

    let catalog = AttributeCatalog::build(&reference, config.quantile_bin_count)?;

    let mut repository = SongRepository::from_reference(reference);
    repository.add_playlist_songs(playlist);
    info!("repository holds {} songs after merge", repository.len());

    let graph = SongGraph::build(&repository, &catalog, config);
    let summary = graph.summary();

    let result = recommend::recommend(&graph, &repository, &catalog, config)?;

    let recommendations = result
        .ranked
        .into_iter()
        .map(|rec| {
            // Ranked ids always resolve; they came from the repository.
            let song = repository.get(&rec.id).expect("ranked song id resolves");
            RecommendedSong {
                id: rec.id,
                title: song.title.clone(),
                artists: song.artists.clone(),
                score: rec.score,
                paths: rec.paths,
            }
        })
        .collect();

    Ok(AnalysisReport {
        profile: result.profile,
        recommendations,
        graph: summary,
        attribute_only: result.attribute_only,
    })
}
