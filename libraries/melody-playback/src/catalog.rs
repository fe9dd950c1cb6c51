//! Local track catalog
//!
//! Metadata for the tracks of the loaded context, eagerly loaded so that
//! navigation never waits on the store. Play counts here are the local,
//! possibly optimistic view.

use melody_core::{Track, TrackId};
use std::collections::HashMap;

/// Tracks known to the player, by ID
#[derive(Debug, Clone, Default)]
pub struct TrackCatalog {
    tracks: HashMap<TrackId, Track>,
}

impl TrackCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or refresh tracks
    pub fn extend(&mut self, tracks: impl IntoIterator<Item = Track>) {
        for track in tracks {
            self.tracks.insert(track.id.clone(), track);
        }
    }

    pub fn get(&self, id: &TrackId) -> Option<&Track> {
        self.tracks.get(id)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Optimistically count one more play; returns the new local count
    pub fn bump_play_count(&mut self, id: &TrackId) -> Option<u64> {
        let track = self.tracks.get_mut(id)?;
        track.play_count = track.play_count.saturating_add(1);
        Some(track.play_count)
    }

    /// Undo an optimistic bump after the store refused it
    pub fn rollback_play_count(&mut self, id: &TrackId) -> Option<u64> {
        let track = self.tracks.get_mut(id)?;
        track.play_count = track.play_count.saturating_sub(1);
        Some(track.play_count)
    }

    /// Adopt the count confirmed by the store
    pub fn set_play_count(&mut self, id: &TrackId, play_count: u64) -> Option<u64> {
        let track = self.tracks.get_mut(id)?;
        track.play_count = play_count;
        Some(track.play_count)
    }
}
