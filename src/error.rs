//! Error types for playlist analysis.
//!
//! Error strategy:
//! - Per-feature and per-row problems (constant feature, malformed CSV row):
//!   recoverable, skip and continue with a logged warning.
//! - Problems that make the requested operation meaningless (empty reference
//!   set, empty playlist, invalid configuration): surfaced to the caller.
//!
//! Unknown song lookups are not errors at all: [`crate::repository::SongRepository::get`]
//! returns an `Option`.

use thiserror::Error;

/// Top-level error type for analysis operations.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The reference set cannot support percentile statistics.
    #[error("insufficient reference data: {0}")]
    InsufficientData(String),

    /// A recommendation was requested for a playlist with no songs.
    #[error("the playlist contains no songs; nothing to analyze")]
    EmptyPlaylist,

    /// A configuration value is out of its documented range.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A dataset file could not be read or has the wrong shape.
    #[error("dataset error for '{path}': {reason}")]
    Dataset { path: String, reason: String },
}

impl AnalysisError {
    /// Build a [`AnalysisError::Dataset`] from a path and cause.
    pub fn dataset(path: impl Into<String>, reason: impl Into<String>) -> Self {
        AnalysisError::Dataset {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failure() {
        let err = AnalysisError::InsufficientData("reference set is empty".to_string());
        assert!(err.to_string().contains("reference set is empty"));

        let err = AnalysisError::dataset("songs.csv", "missing header 'tempo'");
        assert!(err.to_string().contains("songs.csv"));
        assert!(err.to_string().contains("missing header 'tempo'"));
    }
}
