//! JSON library files
//!
//! ```json
//! {
//!   "tracks": [{ "id": "t1", "title": "Hello", "author": "Adele", ... }],
//!   "liked": ["t1"],
//!   "playlists": [{ "id": "p1", "name": "Morning", "tracks": ["t1"] }]
//! }
//! ```

use crate::error::{Result, StorageError};
use melody_core::{Track, TrackId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// A saved, ordered list of tracks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tracks: Vec<TrackId>,
}

/// Contents of a library file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LibraryFile {
    pub tracks: Vec<Track>,

    /// Liked track ids, most recently liked first
    #[serde(default)]
    pub liked: Vec<TrackId>,

    #[serde(default)]
    pub playlists: Vec<Playlist>,
}

impl LibraryFile {
    /// Reject duplicate ids and references to unknown tracks
    pub fn validate(&self) -> Result<()> {
        let mut ids = HashSet::new();
        for track in &self.tracks {
            if !ids.insert(&track.id) {
                return Err(StorageError::invalid(format!(
                    "duplicate track id {}",
                    track.id
                )));
            }
        }

        if let Some(id) = self.liked.iter().find(|id| !ids.contains(id)) {
            return Err(StorageError::invalid(format!(
                "liked track {} is not in the library",
                id
            )));
        }
        if let Some(id) = first_repeat(&self.liked) {
            return Err(StorageError::invalid(format!("track {} is liked twice", id)));
        }

        let mut playlist_ids = HashSet::new();
        for playlist in &self.playlists {
            if !playlist_ids.insert(playlist.id.as_str()) {
                return Err(StorageError::invalid(format!(
                    "duplicate playlist id {}",
                    playlist.id
                )));
            }
            if let Some(id) = playlist.tracks.iter().find(|id| !ids.contains(id)) {
                return Err(StorageError::invalid(format!(
                    "playlist {} references unknown track {}",
                    playlist.id, id
                )));
            }
            if let Some(id) = first_repeat(&playlist.tracks) {
                return Err(StorageError::invalid(format!(
                    "playlist {} lists track {} twice",
                    playlist.id, id
                )));
            }
        }

        Ok(())
    }
}

// Queues are keyed by track id, so a list may name each track once
fn first_repeat(ids: &[TrackId]) -> Option<&TrackId> {
    let mut seen = HashSet::new();
    ids.iter().find(|id| !seen.insert(*id))
}

/// Read and validate a library file
pub async fn load_library(path: impl AsRef<Path>) -> Result<LibraryFile> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path).await?;
    let library: LibraryFile = serde_json::from_str(&contents)?;
    library.validate()?;

    info!(
        path = %path.display(),
        tracks = library.tracks.len(),
        playlists = library.playlists.len(),
        "Library loaded"
    );
    Ok(library)
}

/// Write a library file (pretty-printed)
pub async fn save_library(path: impl AsRef<Path>, library: &LibraryFile) -> Result<()> {
    let path = path.as_ref();
    let contents = serde_json::to_string_pretty(library)?;
    tokio::fs::write(path, contents).await?;

    debug!(path = %path.display(), "Library saved");
    Ok(())
}
