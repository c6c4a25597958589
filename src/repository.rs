//! In-memory song index: every song of the session (reference catalog plus
//! playlist), keyed by stable id.
//!
//! The repository is frozen once the playlist is added. The graph builder
//! addresses songs by dense index, so lookup is a `HashMap` hit followed by
//! a slice access.

use crate::song::{Provenance, Song};
use log::debug;
use std::collections::HashMap;

/// Dense store of all songs with an id → index map.
#[derive(Debug, Default)]
pub struct SongRepository {
    songs: Vec<Song>,
    index: HashMap<String, usize>,
}

impl SongRepository {
    /// Build the repository from the reference catalog.
    ///
    /// Duplicate reference ids keep the first occurrence; later duplicates
    /// are dropped with a debug note.
    #[must_use]
    pub fn from_reference(reference: Vec<Song>) -> Self {
        let mut repo = Self::default();
        for mut song in reference {
            song.provenance = Provenance::Catalog;
            if repo.index.contains_key(&song.id) {
                debug!("duplicate reference id '{}' dropped", song.id);
                continue;
            }
            repo.index.insert(song.id.clone(), repo.songs.len());
            repo.songs.push(song);
        }
        repo
    }

    /// Merge the playlist songs in.
    ///
    /// A playlist song whose id already exists in the reference set is not
    /// stored twice: the existing entity is re-marked [`Provenance::Both`],
    /// so it keeps one node in the graph and is excluded from the candidate
    /// set. Unknown ids are appended as [`Provenance::Playlist`].
    pub fn add_playlist_songs(&mut self, playlist: Vec<Song>) {
        for mut song in playlist {
            match self.index.get(&song.id) {
                Some(&existing) => {
                    self.songs[existing].provenance = Provenance::Both;
                }
                None => {
                    song.provenance = Provenance::Playlist;
                    self.index.insert(song.id.clone(), self.songs.len());
                    self.songs.push(song);
                }
            }
        }
    }

    /// Look up a song by id. Unknown ids are a `None`, not an error.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Song> {
        self.index.get(id).map(|&index| &self.songs[index])
    }

    /// Dense index of a song id, for graph node addressing.
    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// All songs in dense-index order.
    #[must_use]
    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    /// Dense indices of the playlist members, in index order.
    #[must_use]
    pub fn playlist_indices(&self) -> Vec<usize> {
        self.songs
            .iter()
            .enumerate()
            .filter(|(_, song)| song.provenance.in_playlist())
            .map(|(index, _)| index)
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::song::FEATURE_COUNT;

    fn song(id: &str) -> Song {
        Song {
            id: id.to_string(),
            title: id.to_string(),
            artists: "test".to_string(),
            features: [0.0; FEATURE_COUNT],
            provenance: Provenance::Catalog,
        }
    }

    #[test]
    fn lookup_by_id() {
        let repo = SongRepository::from_reference(vec![song("a"), song("b")]);
        assert_eq!(repo.len(), 2);
        assert!(repo.get("a").is_some());
        assert!(repo.get("missing").is_none());
        assert_eq!(repo.index_of("b"), Some(1));
    }

    #[test]
    fn duplicate_reference_ids_keep_first() {
        let mut second = song("a");
        second.title = "other".to_string();
        let repo = SongRepository::from_reference(vec![song("a"), second]);
        assert_eq!(repo.len(), 1);
        assert_eq!(repo.get("a").unwrap().title, "a");
    }

    #[test]
    fn playlist_overlap_marks_both_without_duplicating() {
        let mut repo = SongRepository::from_reference(vec![song("a"), song("b")]);
        repo.add_playlist_songs(vec![song("b"), song("c")]);

        assert_eq!(repo.len(), 3);
        assert_eq!(repo.get("a").unwrap().provenance, Provenance::Catalog);
        assert_eq!(repo.get("b").unwrap().provenance, Provenance::Both);
        assert_eq!(repo.get("c").unwrap().provenance, Provenance::Playlist);

        assert_eq!(repo.playlist_indices(), vec![1, 2]);
    }

}
