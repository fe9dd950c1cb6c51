//! Track store trait
//!
//! The persistent store (a hosted backend in production, memory in tests) is
//! an external collaborator. The playback core only talks to it through this
//! request/response interface.

use crate::error::Result;
use crate::types::{Track, TrackContext, TrackId};
use async_trait::async_trait;

/// Request/response access to persisted tracks
#[async_trait]
pub trait TrackStore: Send + Sync {
    /// Load the tracks that make up a playback context, in display order
    async fn fetch_tracks_by_context(&self, context: &TrackContext) -> Result<Vec<Track>>;

    /// Get a single track by ID
    async fn get_track(&self, id: &TrackId) -> Result<Option<Track>>;

    /// Increment a track's play count, returning the stored value afterwards
    ///
    /// Callers treat this as best effort: a failure is reported, never retried.
    async fn update_play_count(&self, id: &TrackId) -> Result<u64>;
}
