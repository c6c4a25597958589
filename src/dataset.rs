//! CSV loading for the reference catalog and playlist exports.
//!
//! Both inputs share one shape: a header row naming `id`, `name`, `artists`
//! and every feature in [`crate::song::FEATURES`], then one row per song.
//! Column order does not matter; rows are matched to columns by header name.
//!
//! A malformed row is a per-row problem: it is skipped with a warning and
//! the load continues. A missing file or a header missing required columns
//! makes the whole load meaningless and fails with a dataset error.

use crate::error::{AnalysisError, Result};
use crate::song::{Provenance, Song, FEATURES, FEATURE_COUNT};
use log::{info, warn};
use serde::Deserialize;
use std::path::Path;

/// One CSV row, matched by header name.
#[derive(Debug, Deserialize)]
struct SongRecord {
    id: String,
    name: String,
    artists: String,
    acousticness: f64,
    danceability: f64,
    energy: f64,
    instrumentalness: f64,
    liveness: f64,
    loudness: f64,
    popularity: f64,
    speechiness: f64,
    tempo: f64,
    valence: f64,
    year: f64,
}

impl SongRecord {
    fn into_song(self, provenance: Provenance) -> Song {
        // Same order as FEATURES.
        let features: [f64; FEATURE_COUNT] = [
            self.acousticness,
            self.danceability,
            self.energy,
            self.instrumentalness,
            self.liveness,
            self.loudness,
            self.popularity,
            self.speechiness,
            self.tempo,
            self.valence,
            self.year,
        ];
        Song {
            id: self.id,
            title: self.name,
            artists: self.artists,
            features,
            provenance,
        }
    }
}

/// Load the reference catalog CSV.
///
/// # Errors
///
/// Fails if the file cannot be opened or its header lacks required columns.
pub fn load_reference(path: &Path) -> Result<Vec<Song>> {
    load_songs(path, Provenance::Catalog)
}

/// Load a playlist CSV (same shape as the reference catalog).
///
/// # Errors
///
/// Fails if the file cannot be opened or its header lacks required columns.
pub fn load_playlist(path: &Path) -> Result<Vec<Song>> {
    load_songs(path, Provenance::Playlist)
}

fn load_songs(path: &Path, provenance: Provenance) -> Result<Vec<Song>> {
    let display = path.display().to_string();

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|err| AnalysisError::dataset(&display, err.to_string()))?;

    let headers = reader
        .headers()
        .map_err(|err| AnalysisError::dataset(&display, err.to_string()))?
        .clone();
    let missing: Vec<&str> = ["id", "name", "artists"]
        .into_iter()
        .chain(FEATURES)
        .filter(|column| !headers.iter().any(|header| header == *column))
        .collect();
    if !missing.is_empty() {
        return Err(AnalysisError::dataset(
            &display,
            format!("missing columns: {}", missing.join(", ")),
        ));
    }

    let mut songs = Vec::new();
    let mut skipped = 0usize;

    for (row, record) in reader.deserialize::<SongRecord>().enumerate() {
        match record {
            Ok(record) if record.id.is_empty() => {
                warn!("{display}: row {} has an empty id; skipped", row + 2);
                skipped += 1;
            }
            Ok(record) => songs.push(record.into_song(provenance)),
            Err(err) => {
                warn!("{display}: row {} is malformed ({err}); skipped", row + 2);
                skipped += 1;
            }
        }
    }

    info!(
        "loaded {} songs from {display} ({skipped} rows skipped)",
        songs.len()
    );
    Ok(songs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "id,name,artists,acousticness,danceability,energy,instrumentalness,\
                          liveness,loudness,popularity,speechiness,tempo,valence,year";

    fn write_csv(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file
    }

    #[test]
    fn loads_well_formed_rows() {
        let file = write_csv(&[
            "s1,Song One,Artist A,0.1,0.2,0.3,0.4,0.5,-6.0,50,0.05,120.0,0.6,1995",
            "s2,Song Two,Artist B,0.9,0.8,0.7,0.6,0.5,-4.0,70,0.04,95.0,0.4,2005",
        ]);

        let songs = load_reference(file.path()).unwrap();
        assert_eq!(songs.len(), 2);
        assert_eq!(songs[0].id, "s1");
        assert_eq!(songs[0].title, "Song One");
        assert_eq!(songs[0].provenance, Provenance::Catalog);

        let tempo = crate::song::feature_index("tempo").unwrap();
        assert_eq!(songs[0].feature(tempo), 120.0);
        assert_eq!(songs[1].feature(tempo), 95.0);
    }

    #[test]
    fn playlist_rows_get_playlist_provenance() {
        let file = write_csv(&[
            "p1,Track,Someone,0.1,0.2,0.3,0.4,0.5,-6.0,50,0.05,120.0,0.6,1995",
        ]);
        let songs = load_playlist(file.path()).unwrap();
        assert_eq!(songs[0].provenance, Provenance::Playlist);
    }

    #[test]
    fn malformed_rows_are_skipped_not_fatal() {
        let file = write_csv(&[
            "s1,Good,Artist,0.1,0.2,0.3,0.4,0.5,-6.0,50,0.05,120.0,0.6,1995",
            "s2,Bad,Artist,not_a_number,0.2,0.3,0.4,0.5,-6.0,50,0.05,120.0,0.6,1995",
            ",NoId,Artist,0.1,0.2,0.3,0.4,0.5,-6.0,50,0.05,120.0,0.6,1995",
        ]);

        let songs = load_reference(file.path()).unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].id, "s1");
    }

    #[test]
    fn missing_columns_fail_the_load() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "id,name,artists,tempo").unwrap();
        writeln!(file, "s1,Song,Artist,120.0").unwrap();

        let result = load_reference(file.path());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("missing columns"));
        assert!(err.to_string().contains("energy"));
    }

    #[test]
    fn missing_file_fails_the_load() {
        let result = load_reference(Path::new("/nonexistent/songs.csv"));
        assert!(matches!(result, Err(AnalysisError::Dataset { .. })));
    }
}
