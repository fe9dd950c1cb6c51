//! Volume and speed controls
//!
//! Volume is a linear fraction in [0, 1] handed straight to the audio
//! collaborator. Mute remembers the level it replaced so unmuting restores it.

use crate::error::{PlaybackError, Result};

/// Volume restored by unmute when nothing better is known
const DEFAULT_RESTORE_LEVEL: f64 = 0.5;

/// Volume controller
#[derive(Debug, Clone)]
pub struct Volume {
    /// Current level in [0, 1]
    level: f64,

    /// Level to restore when unmuting
    previous: f64,
}

impl Volume {
    /// Create new volume controller, clamping `level` into [0, 1]
    pub fn new(level: f64) -> Self {
        Self {
            level: clamp_unit(level),
            previous: DEFAULT_RESTORE_LEVEL,
        }
    }

    /// Set volume level (clamped to [0, 1])
    pub fn set_level(&mut self, level: f64) {
        self.level = clamp_unit(level);
    }

    /// Get current volume level
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Muted means the level is exactly zero
    pub fn is_muted(&self) -> bool {
        self.level == 0.0
    }

    /// Toggle mute
    ///
    /// Muting stores the current level; unmuting restores the stored level.
    pub fn toggle_mute(&mut self) {
        if self.is_muted() {
            self.level = self.previous;
        } else {
            self.previous = self.level;
            self.level = 0.0;
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(DEFAULT_RESTORE_LEVEL)
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Smallest speed reached by cycling
pub const MIN_CYCLE_SPEED: f64 = 0.5;

/// Largest speed reached by cycling, after which it wraps to the minimum
pub const MAX_CYCLE_SPEED: f64 = 4.0;

/// Step used by the speed button
pub const SPEED_STEP: f64 = 0.25;

/// Playback rate multiplier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackSpeed(f64);

impl PlaybackSpeed {
    /// Validate a speed: positive and finite
    pub fn new(speed: f64) -> Result<Self> {
        if speed.is_finite() && speed > 0.0 {
            Ok(Self(speed))
        } else {
            Err(PlaybackError::InvalidSpeed(speed))
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }

    /// Next value of the speed button: +0.25 up to 4x, then back to 0.5x
    #[must_use]
    pub fn cycled(self) -> Self {
        if self.0 >= MAX_CYCLE_SPEED {
            Self(MIN_CYCLE_SPEED)
        } else {
            Self((self.0 + SPEED_STEP).min(MAX_CYCLE_SPEED))
        }
    }
}

impl Default for PlaybackSpeed {
    fn default() -> Self {
        Self(1.0)
    }
}
