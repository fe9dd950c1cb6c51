/// Audio resource for headless sessions
use melody_core::Track;
use melody_playback::{AudioResource, PlaybackError, Result};
use std::collections::HashMap;
use tracing::debug;

/// Silent audio output that knows each track's catalogued duration
///
/// End of track is detected by the session from the progress tracker, so this
/// resource never signals it on its own.
#[derive(Debug, Default)]
pub struct HeadlessAudio {
    durations: HashMap<String, f64>,
    current: Option<String>,
    position: f64,
    playing: bool,
    volume: f64,
    rate: f64,
}

impl HeadlessAudio {
    pub fn new<'a>(tracks: impl IntoIterator<Item = &'a Track>) -> Self {
        let durations = tracks
            .into_iter()
            .filter(|track| !track.audio.is_empty())
            .map(|track| (track.audio.clone(), track.duration))
            .collect();

        Self {
            durations,
            volume: 1.0,
            rate: 1.0,
            ..Self::default()
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

impl AudioResource for HeadlessAudio {
    fn load(&mut self, url: &str) -> Result<()> {
        self.current = None;
        self.playing = false;
        self.position = 0.0;
        if !self.durations.contains_key(url) {
            return Err(PlaybackError::AudioResource(format!(
                "No audio at '{}'",
                url
            )));
        }

        self.current = Some(url.to_string());
        debug!(url, "Audio loaded");
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        if self.current.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, seconds: f64) -> Result<()> {
        if self.current.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }
        let duration = self.duration().unwrap_or(f64::INFINITY);
        self.position = seconds.clamp(0.0, duration);
        Ok(())
    }

    fn duration(&self) -> Option<f64> {
        let url = self.current.as_ref()?;
        self.durations
            .get(url)
            .copied()
            .filter(|duration| *duration > 0.0)
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
    }

    fn set_rate(&mut self, rate: f64) {
        self.rate = rate;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracks() -> Vec<Track> {
        vec![
            Track::new("a", "A", "X")
                .with_duration(120.0)
                .with_audio("/a.mp3"),
            Track::new("b", "B", "X").with_duration(0.0).with_audio("/b.mp3"),
            Track::new("c", "C", "X").with_duration(30.0),
        ]
    }

    #[test]
    fn reports_catalogued_duration() {
        let tracks = tracks();
        let mut audio = HeadlessAudio::new(&tracks);
        assert!(audio.duration().is_none());

        audio.load("/a.mp3").unwrap();
        assert_eq!(audio.duration(), Some(120.0));
        assert_eq!(audio.current(), Some("/a.mp3"));
    }

    #[test]
    fn zero_duration_stays_unknown() {
        let tracks = tracks();
        let mut audio = HeadlessAudio::new(&tracks);
        audio.load("/b.mp3").unwrap();
        assert!(audio.duration().is_none());
    }

    #[test]
    fn unknown_url_fails_to_load() {
        let tracks = tracks();
        let mut audio = HeadlessAudio::new(&tracks);
        assert!(matches!(
            audio.load("/missing.mp3"),
            Err(PlaybackError::AudioResource(_))
        ));
        assert!(audio.play().is_err());
    }

    #[test]
    fn failed_load_drops_previous_track() {
        let tracks = tracks();
        let mut audio = HeadlessAudio::new(&tracks);
        audio.load("/a.mp3").unwrap();
        audio.play().unwrap();

        assert!(audio.load("").is_err());
        assert!(audio.current().is_none());
        assert!(audio.duration().is_none());
        assert!(!audio.is_playing());
    }

    #[test]
    fn seek_is_clamped_to_duration() {
        let tracks = tracks();
        let mut audio = HeadlessAudio::new(&tracks);
        audio.load("/a.mp3").unwrap();
        audio.play().unwrap();
        audio.seek(500.0).unwrap();
        assert_eq!(audio.position(), 120.0);
        assert!(audio.is_playing());
    }
}
