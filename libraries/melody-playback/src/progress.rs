//! Playback progress tracking
//!
//! Elapsed/total time for the active track, advanced by a polling timer
//! rather than read back from the audio primitive.

use crate::error::Result;
use crate::source::AudioResource;
use std::time::Duration;
use tracing::debug;

/// Seconds added to `elapsed` per timer tick
pub const TICK_SECONDS: f64 = 0.55;

/// Timer period at 1x speed
const BASE_TICK_INTERVAL: Duration = Duration::from_millis(500);

/// Floor for the timer period at high speeds
const MIN_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Timer period for a playback speed: `max(100ms, 500ms / speed)`
pub fn tick_interval(speed: f64) -> Duration {
    if !speed.is_finite() || speed <= 0.0 {
        return BASE_TICK_INTERVAL;
    }
    BASE_TICK_INTERVAL.div_f64(speed).max(MIN_TICK_INTERVAL)
}

/// Result of a timer tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Elapsed moved forward
    Advanced { elapsed: f64 },

    /// Elapsed reached total; the host should stop its timer
    Finished,

    /// Total still unknown; duration will be re-read on the next tick
    WaitingForDuration,
}

/// What to do when the audio primitive reports end of track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndAction {
    /// Loop is on: elapsed was reset, start the same track again
    Restart,

    /// Move on to the next track
    Advance,
}

/// Elapsed/total seconds of the active track
///
/// Invariant: `0 <= elapsed <= total`. `total` is 0 while unknown.
#[derive(Debug, Clone, Default)]
pub struct PlaybackProgressTracker {
    elapsed: f64,
    total: f64,
    /// Seconds actually heard through ticks, seeks excluded
    listened: f64,
}

impl PlaybackProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn listened(&self) -> f64 {
        self.listened
    }

    pub fn is_total_known(&self) -> bool {
        self.total > 0.0
    }

    /// Fraction of the track elapsed, 0 while the total is unknown
    pub fn fraction(&self) -> f64 {
        if self.is_total_known() {
            self.elapsed / self.total
        } else {
            0.0
        }
    }

    /// A new track was loaded: reset and try to read its duration
    pub fn on_track_load(&mut self, audio: Option<&dyn AudioResource>) {
        self.elapsed = 0.0;
        self.listened = 0.0;
        self.total = 0.0;
        self.refresh_total(audio);
    }

    /// Advance elapsed by one nominal tick, clamped to total
    pub fn on_tick(&mut self, audio: Option<&dyn AudioResource>) -> TickOutcome {
        if !self.is_total_known() {
            self.refresh_total(audio);
            if !self.is_total_known() {
                return TickOutcome::WaitingForDuration;
            }
        }

        if self.elapsed >= self.total {
            return TickOutcome::Finished;
        }

        let before = self.elapsed;
        self.elapsed = (self.elapsed + TICK_SECONDS).min(self.total);
        self.listened += self.elapsed - before;

        if self.elapsed >= self.total {
            TickOutcome::Finished
        } else {
            TickOutcome::Advanced {
                elapsed: self.elapsed,
            }
        }
    }

    /// User scrubbed to `fraction` of the track
    ///
    /// The fraction is clamped to [0, 1] and the seek forwarded to the audio
    /// resource. Returns the new elapsed position.
    pub fn on_seek(&mut self, fraction: f64, audio: Option<&mut dyn AudioResource>) -> Result<f64> {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        let target = fraction * self.total;

        if let Some(audio) = audio {
            audio.seek(target)?;
        }

        self.elapsed = target;
        debug!(elapsed = self.elapsed, total = self.total, "Seek");
        Ok(self.elapsed)
    }

    /// The audio primitive reached the end of the track
    pub fn on_track_end(&mut self, loop_enabled: bool) -> EndAction {
        if loop_enabled {
            self.restart();
            EndAction::Restart
        } else {
            EndAction::Advance
        }
    }

    /// Back to zero for a loop restart; the known total is kept
    pub fn restart(&mut self) {
        self.elapsed = 0.0;
        self.listened = 0.0;
    }

    /// Re-read the duration; totals are floored to whole seconds
    fn refresh_total(&mut self, audio: Option<&dyn AudioResource>) {
        let Some(duration) = audio.and_then(|audio| audio.duration()) else {
            return;
        };
        if !duration.is_finite() || duration <= 0.0 {
            return;
        }

        self.total = duration.floor();
        self.elapsed = self.elapsed.min(self.total);
        debug!(total = self.total, "Track duration known");
    }
}
