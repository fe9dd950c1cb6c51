//! Error types for playback management

use melody_core::{MelodyError, TrackId};
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The active track is missing from the queue (queue changed underneath)
    #[error("Track {0} not found in queue")]
    TrackNotInQueue(TrackId),

    /// The active track is missing from the shuffle order
    #[error("Track {0} not found in shuffle order")]
    TrackNotInShuffleOrder(TrackId),

    /// Track metadata was never loaded into the catalog
    #[error("Unknown track: {0}")]
    UnknownTrack(TrackId),

    /// No track is currently active
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Playback speed must be a positive, finite multiplier
    #[error("Invalid playback speed: {0}")]
    InvalidSpeed(f64),

    /// Audio resource error
    #[error("Audio resource error: {0}")]
    AudioResource(String),

    /// Error reported by a core collaborator
    #[error(transparent)]
    Core(#[from] MelodyError),
}

impl PlaybackError {
    /// Navigation errors are recovered locally with a no-op
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            PlaybackError::TrackNotInQueue(_) | PlaybackError::TrackNotInShuffleOrder(_)
        )
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
