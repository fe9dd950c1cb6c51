//! Platform-agnostic audio resource trait
//!
//! The audio primitive (decoding, output) belongs to the host environment.
//! The playback core only needs play/pause/seek and a duration that may show
//! up late.

use crate::error::{PlaybackError, Result};

/// Opaque audio playback capability supplied by the host
///
/// End of track is not polled: the host calls
/// [`crate::PlaybackManager::track_ended`] when its primitive fires.
pub trait AudioResource: Send {
    /// Load an audio resource by reference (path or URL)
    fn load(&mut self, url: &str) -> Result<()>;

    /// Start or resume output
    fn play(&mut self) -> Result<()>;

    /// Pause output
    fn pause(&mut self);

    /// Seek to an absolute position in seconds
    fn seek(&mut self, seconds: f64) -> Result<()>;

    /// Total duration in seconds, `None` while still unknown
    fn duration(&self) -> Option<f64>;

    /// Output volume in [0, 1]
    fn set_volume(&mut self, volume: f64);

    /// Playback rate multiplier
    fn set_rate(&mut self, rate: f64);
}

/// Audio resource that produces no sound
///
/// Used by headless hosts and tests. The duration can be configured to
/// stay unknown for a number of reads, mimicking a backend that reports it
/// late.
#[derive(Debug, Clone, Default)]
pub struct SimulatedAudio {
    url: Option<String>,
    duration: f64,
    hidden_reads: u32,
    reads: std::cell::Cell<u32>,
    position: f64,
    playing: bool,
    volume: f64,
    rate: f64,
}

impl SimulatedAudio {
    /// Audio whose duration is known as soon as something is loaded
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            rate: 1.0,
            volume: 1.0,
            ..Self::default()
        }
    }

    /// Report `None` for the first `reads` duration queries after each load
    #[must_use]
    pub fn with_late_duration(mut self, reads: u32) -> Self {
        self.hidden_reads = reads;
        self
    }

    /// Change the duration reported for the next load
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = duration;
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl AudioResource for SimulatedAudio {
    fn load(&mut self, url: &str) -> Result<()> {
        // A failed load leaves nothing loaded
        self.url = None;
        self.playing = false;
        self.position = 0.0;
        if url.is_empty() {
            return Err(PlaybackError::AudioResource(
                "empty audio reference".to_string(),
            ));
        }
        self.url = Some(url.to_string());
        self.position = 0.0;
        self.reads.set(0);
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        if self.url.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, seconds: f64) -> Result<()> {
        if self.url.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }
        self.position = seconds.clamp(0.0, self.duration.max(0.0));
        Ok(())
    }

    fn duration(&self) -> Option<f64> {
        self.url.as_ref()?;
        let reads = self.reads.get();
        if reads < self.hidden_reads {
            self.reads.set(reads + 1);
            return None;
        }
        Some(self.duration)
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
    }

    fn set_rate(&mut self, rate: f64) {
        self.rate = rate;
    }
}
