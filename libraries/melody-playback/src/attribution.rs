//! Play-count attribution
//!
//! A track counts as played once enough of it was heard. The decision is
//! synchronous (made by the manager on every transition); the store update is
//! a best-effort async call the host fires and forgets. Updates are two-phase:
//! the local catalog is bumped first and rolled back if the store refuses.

use melody_core::{TrackId, TrackStore};
use std::sync::Arc;
use tracing::{debug, error};

/// Default share of a track that must elapse before it counts as played
pub const DEFAULT_THRESHOLD: f64 = 0.8;

/// When leaving a track counts as a play
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributionPolicy {
    threshold: f64,
}

impl AttributionPolicy {
    /// Threshold is clamped into [0, 1]; NaN falls back to the default
    pub fn new(threshold: f64) -> Self {
        let threshold = if threshold.is_nan() {
            DEFAULT_THRESHOLD
        } else {
            threshold.clamp(0.0, 1.0)
        };
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// `elapsed / duration >= threshold`; never due for unknown durations
    pub fn is_due(&self, elapsed: f64, duration: f64) -> bool {
        duration > 0.0 && elapsed / duration >= self.threshold
    }
}

impl Default for AttributionPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

/// Result of one store update, sent back to the player for reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributionReport {
    pub track_id: TrackId,

    /// Confirmed play count, or the error message to show the user
    pub outcome: Result<u64, String>,
}

/// Pushes play-count increments to the track store
pub struct PlayCountAttributor<S: TrackStore + ?Sized> {
    store: Arc<S>,
}

impl<S: TrackStore + ?Sized> PlayCountAttributor<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Ask the store to count one play. Never retried.
    pub async fn attribute(&self, track_id: TrackId) -> AttributionReport {
        let outcome = match self.store.update_play_count(&track_id).await {
            Ok(count) => {
                debug!(track_id = %track_id, play_count = count, "Play count updated");
                Ok(count)
            }
            Err(e) => {
                error!(track_id = %track_id, error = %e, "Play count update failed");
                Err(e.to_string())
            }
        };

        AttributionReport { track_id, outcome }
    }
}

impl<S: TrackStore + ?Sized> Clone for PlayCountAttributor<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}
