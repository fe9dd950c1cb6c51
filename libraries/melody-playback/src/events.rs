//! Playback Events
//!
//! Event-based communication for UI synchronization. The manager queues
//! events as it handles intents and timer ticks; the host drains them.

use crate::types::{PlaybackSettings, PlaybackState};
use melody_core::TrackId;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Playback state changed (playing, paused, stopped)
    StateChanged {
        /// The new playback state
        state: PlaybackState,
    },

    /// A different track became active, or the active one restarted
    TrackChanged {
        /// ID of the new (current) track
        track_id: TrackId,
        /// ID of the previous track (if any)
        previous_track_id: Option<TrackId>,
    },

    /// Position update, one per timer tick
    PositionUpdate {
        /// Elapsed seconds
        elapsed: f64,
        /// Total seconds (0 while unknown)
        total: f64,
    },

    /// Elapsed reached total; the timer can stop until the next track
    TrackFinished {
        /// ID of the finished track
        track_id: TrackId,
    },

    /// Volume, speed, loop or shuffle changed
    SettingsChanged {
        /// Snapshot after the change
        settings: PlaybackSettings,
    },

    /// Queue replaced by a new context
    QueueChanged {
        /// New queue length
        length: usize,
    },

    /// Listening threshold met: the host should dispatch a play-count update
    PlayCountDue {
        /// Track whose count was optimistically bumped
        track_id: TrackId,
    },

    /// Transient, user-visible message (failed attribution, navigation problem)
    Notification {
        /// Message for the user
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_variant_tag() {
        let event = PlaybackEvent::PlayCountDue {
            track_id: TrackId::new("t1"),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"PlayCountDue":{"track_id":"t1"}}"#);
    }
}
