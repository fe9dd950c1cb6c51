use crate::error::Result as StorageResult;
use crate::library::{load_library, save_library, LibraryFile, Playlist};
use async_trait::async_trait;
use melody_core::{MelodyError, Result, Track, TrackContext, TrackId, TrackStore};
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory track store seeded from a library file
///
/// Listings come back newest first. Play counts live in memory until
/// [`MemoryTrackStore::save`] writes them back.
pub struct MemoryTrackStore {
    inner: RwLock<Inner>,
}

struct Inner {
    /// Newest first
    tracks: Vec<Track>,
    index: HashMap<TrackId, usize>,
    liked: Vec<TrackId>,
    playlists: Vec<Playlist>,
}

impl Inner {
    fn by_ids(&self, ids: &[TrackId]) -> Vec<Track> {
        ids.iter()
            .filter_map(|id| self.index.get(id).map(|&i| self.tracks[i].clone()))
            .collect()
    }

    fn filtered(&self, mut keep: impl FnMut(&Track) -> bool) -> Vec<Track> {
        self.tracks.iter().filter(|&t| keep(t)).cloned().collect()
    }
}

impl MemoryTrackStore {
    /// Build a store from an already validated library
    pub fn new(library: LibraryFile) -> Self {
        let mut tracks = library.tracks;
        tracks.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let index = tracks
            .iter()
            .enumerate()
            .map(|(i, track)| (track.id.clone(), i))
            .collect();

        Self {
            inner: RwLock::new(Inner {
                tracks,
                index,
                liked: library.liked,
                playlists: library.playlists,
            }),
        }
    }

    /// Load a library file and build a store from it
    pub async fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let library = load_library(path).await?;
        Ok(Self::new(library))
    }

    /// Write the current state, play counts included, to a library file
    pub async fn save(&self, path: impl AsRef<Path>) -> StorageResult<()> {
        let library = self.snapshot().await;
        save_library(path, &library).await
    }

    /// Current state as a library file
    pub async fn snapshot(&self) -> LibraryFile {
        let inner = self.inner.read().await;
        LibraryFile {
            tracks: inner.tracks.clone(),
            liked: inner.liked.clone(),
            playlists: inner.playlists.clone(),
        }
    }

    pub async fn playlists(&self) -> Vec<Playlist> {
        self.inner.read().await.playlists.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.tracks.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.tracks.is_empty()
    }
}

#[async_trait]
impl TrackStore for MemoryTrackStore {
    async fn fetch_tracks_by_context(&self, context: &TrackContext) -> Result<Vec<Track>> {
        let inner = self.inner.read().await;

        let tracks = match context {
            TrackContext::Library => inner.tracks.clone(),
            TrackContext::Liked => inner.by_ids(&inner.liked),
            // A blank query lists the whole library
            TrackContext::Search { title } if title.trim().is_empty() => inner.tracks.clone(),
            TrackContext::Search { title } => {
                let needle = title.trim().to_lowercase();
                inner.filtered(|t| t.title.to_lowercase().contains(&needle))
            }
            TrackContext::Author { author } if author.trim().is_empty() => inner.tracks.clone(),
            TrackContext::Author { author } => {
                let needle = author.trim().to_lowercase();
                inner.filtered(|t| t.author.to_lowercase().contains(&needle))
            }
            TrackContext::Playlist { id } => {
                let playlist = inner
                    .playlists
                    .iter()
                    .find(|p| &p.id == id)
                    .ok_or_else(|| MelodyError::PlaylistNotFound(id.clone()))?;
                inner.by_ids(&playlist.tracks)
            }
        };

        debug!(context = %context, tracks = tracks.len(), "Fetched tracks");
        Ok(tracks)
    }

    async fn get_track(&self, id: &TrackId) -> Result<Option<Track>> {
        let inner = self.inner.read().await;
        Ok(inner.index.get(id).map(|&i| inner.tracks[i].clone()))
    }

    async fn update_play_count(&self, id: &TrackId) -> Result<u64> {
        let mut inner = self.inner.write().await;
        let i = *inner
            .index
            .get(id)
            .ok_or_else(|| MelodyError::TrackNotFound(id.clone()))?;

        let track = &mut inner.tracks[i];
        track.play_count = track.play_count.saturating_add(1);
        debug!(track_id = %id, play_count = track.play_count, "Play count updated");
        Ok(track.play_count)
    }
}
