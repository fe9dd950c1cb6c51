//! Core types for playback management

use melody_core::TrackId;
use serde::{Deserialize, Serialize};

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No track loaded
    Stopped,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,
}

/// Outcome of a navigation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Active track changed
    Moved {
        from: Option<TrackId>,
        to: TrackId,
    },

    /// Shuffle order was exhausted and regenerated; `to` is its first element
    Reshuffled {
        from: Option<TrackId>,
        to: TrackId,
    },

    /// The active track stays and should start again from zero (loop)
    Restart(TrackId),

    /// Nothing happened (empty queue, single-entry history, ...)
    Unchanged,
}

impl Transition {
    /// Track that is active after the transition, when it changed or restarted
    pub fn target(&self) -> Option<&TrackId> {
        match self {
            Transition::Moved { to, .. } | Transition::Reshuffled { to, .. } => Some(to),
            Transition::Restart(id) => Some(id),
            Transition::Unchanged => None,
        }
    }

    /// Track that was being listened to before the transition
    pub fn left(&self) -> Option<&TrackId> {
        match self {
            Transition::Moved { from, .. } | Transition::Reshuffled { from, .. } => from.as_ref(),
            Transition::Restart(id) => Some(id),
            Transition::Unchanged => None,
        }
    }
}

/// Snapshot of the user-facing playback settings
///
/// `loop_enabled` and `shuffle` are never both true.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSettings {
    /// Output volume in [0, 1]
    pub volume: f64,

    /// Repeat the active track forever
    pub loop_enabled: bool,

    /// Play the queue in shuffled order
    pub shuffle: bool,

    /// Playback rate multiplier (> 0)
    pub speed: f64,
}

/// Configuration for the playback manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Maximum play history size (default: 500)
    pub history_size: usize,

    /// Initial volume in [0, 1] (default: 0.5)
    pub volume: f64,

    /// Initial speed multiplier (default: 1.0)
    pub speed: f64,

    /// Fraction of a track that must be heard before it counts as played
    /// (default: 0.8)
    pub attribution_threshold: f64,

    /// Fixed seed for shuffle orders; entropy when unset
    pub shuffle_seed: Option<u64>,

    /// Start with loop enabled (default: false)
    pub loop_enabled: bool,

    /// Start with shuffle enabled (default: false); wins over `loop_enabled`
    pub shuffle: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            history_size: 500,
            volume: 0.5,
            speed: 1.0,
            attribution_threshold: 0.8,
            shuffle_seed: None,
            loop_enabled: false,
            shuffle: false,
        }
    }
}
