//! Playback manager - core orchestration
//!
//! Coordinates the queue engine, progress tracker, audio resource, local
//! catalog and play-count attribution. Every mutation enters through one of
//! the intent methods below; resulting UI updates are queued as events.

use crate::{
    attribution::{AttributionPolicy, AttributionReport},
    catalog::TrackCatalog,
    engine::PlaybackQueueEngine,
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    progress::{tick_interval, EndAction, PlaybackProgressTracker, TickOutcome},
    source::AudioResource,
    types::{PlaybackConfig, PlaybackSettings, PlaybackState, Transition},
};
use melody_core::{Track, TrackId};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Central playback management
///
/// Owned by the host (one per session) and driven by:
/// - user intents (`next`, `previous`, `select`, `toggle_shuffle`, ...)
/// - the host timer (`tick`, period from `tick_interval`)
/// - audio callbacks (`track_loaded`, `track_ended`)
pub struct PlaybackManager {
    state: PlaybackState,

    engine: PlaybackQueueEngine,
    progress: PlaybackProgressTracker,
    catalog: TrackCatalog,
    audio: Option<Box<dyn AudioResource>>,

    policy: AttributionPolicy,
    // Whether the current activation was already counted
    attributed: bool,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,
}

impl PlaybackManager {
    /// Create new playback manager
    pub fn new(config: PlaybackConfig) -> Self {
        Self {
            state: PlaybackState::Stopped,
            engine: PlaybackQueueEngine::new(&config),
            progress: PlaybackProgressTracker::new(),
            catalog: TrackCatalog::new(),
            audio: None,
            policy: AttributionPolicy::new(config.attribution_threshold),
            attributed: false,
            pending_events: Vec::new(),
        }
    }

    /// Attach the host's audio primitive
    pub fn set_audio_resource(&mut self, mut audio: Box<dyn AudioResource>) {
        let settings = self.engine.settings();
        audio.set_volume(settings.volume);
        audio.set_rate(settings.speed);
        self.audio = Some(audio);
    }

    // ===== Accessors =====

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn engine(&self) -> &PlaybackQueueEngine {
        &self.engine
    }

    pub fn progress(&self) -> &PlaybackProgressTracker {
        &self.progress
    }

    pub fn catalog(&self) -> &TrackCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> PlaybackSettings {
        self.engine.settings()
    }

    pub fn active_track(&self) -> Option<&Track> {
        self.engine.active().and_then(|id| self.catalog.get(id))
    }

    /// Timer period for the current speed
    pub fn tick_interval(&self) -> Duration {
        tick_interval(self.engine.settings().speed)
    }

    /// Tracks that will play after the active one, in playback order
    pub fn up_next(&self, limit: usize) -> Vec<&Track> {
        let order = self.engine.playback_order();
        let start = self
            .engine
            .active()
            .and_then(|active| order.iter().position(|id| id == active))
            .map_or(0, |index| index + 1);

        order
            .iter()
            .skip(start)
            .filter_map(|id| self.catalog.get(id))
            .take(limit)
            .collect()
    }

    /// Take all events queued since the last call
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ===== Context =====

    /// Load a new playback context (library, search result, playlist)
    ///
    /// With `start` the picked track becomes active immediately; otherwise the
    /// active track keeps playing over the new queue.
    pub fn load_context(&mut self, tracks: Vec<Track>, start: Option<&TrackId>) -> Result<()> {
        if let Some(start) = start {
            if !tracks.iter().any(|track| &track.id == start) {
                return Err(PlaybackError::TrackNotInQueue(start.clone()));
            }
        }

        let ids: Vec<TrackId> = tracks.iter().map(|track| track.id.clone()).collect();
        self.catalog.extend(tracks);

        match start {
            Some(start) => {
                let previous = self.engine.active().cloned();
                if let Some(previous) = &previous {
                    self.attribute_leaving(previous);
                }
                self.engine.set_queue_with_active(ids, Some(start.clone()));
                let length = self.engine.queue().len();
                self.emit(PlaybackEvent::QueueChanged { length });
                self.activate(start.clone(), previous)?;
            }
            None => {
                self.engine.set_queue(ids);
                let length = self.engine.queue().len();
                self.emit(PlaybackEvent::QueueChanged { length });
            }
        }

        info!(length = self.engine.queue().len(), "Playback context loaded");
        Ok(())
    }

    // ===== Navigation =====

    /// Skip to next track
    pub fn next(&mut self) -> Result<Transition> {
        let transition = self.engine.advance()?;
        self.apply(&transition)?;
        Ok(transition)
    }

    /// Go to previous track
    pub fn previous(&mut self) -> Result<Transition> {
        let transition = self.engine.retreat()?;
        self.apply(&transition)?;
        Ok(transition)
    }

    /// Play a track the user picked from the list
    pub fn select(&mut self, id: &TrackId) -> Result<Transition> {
        let transition = self.engine.jump_to(id)?;
        self.apply(&transition)?;
        Ok(transition)
    }

    // ===== Playback Control =====

    /// Start or resume playback
    ///
    /// With nothing active, playback starts from the head of the queue.
    pub fn play(&mut self) -> Result<()> {
        if self.engine.active().is_none() {
            return match self.next()? {
                Transition::Unchanged => Err(PlaybackError::NoTrackLoaded),
                _ => Ok(()),
            };
        }

        if self.state != PlaybackState::Playing {
            if let Some(audio) = self.audio.as_mut() {
                audio.play()?;
            }
            self.set_state(PlaybackState::Playing);
        }
        Ok(())
    }

    /// Pause playback
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            if let Some(audio) = self.audio.as_mut() {
                audio.pause();
            }
            self.set_state(PlaybackState::Paused);
        }
    }

    /// Play/pause button
    pub fn toggle_play(&mut self) -> Result<()> {
        if self.state == PlaybackState::Playing {
            self.pause();
            Ok(())
        } else {
            self.play()
        }
    }

    /// Seek to a fraction of the active track, returning the new position
    pub fn seek_to_fraction(&mut self, fraction: f64) -> Result<f64> {
        if self.engine.active().is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }

        let audio = self
            .audio
            .as_mut()
            .map(|audio| &mut **audio as &mut dyn AudioResource);
        let elapsed = self.progress.on_seek(fraction, audio)?;
        self.emit(PlaybackEvent::PositionUpdate {
            elapsed,
            total: self.progress.total(),
        });
        Ok(elapsed)
    }

    // ===== Settings =====

    pub fn toggle_shuffle(&mut self) -> bool {
        let enabled = self.engine.toggle_shuffle();
        self.emit_settings();
        enabled
    }

    pub fn toggle_loop(&mut self) -> bool {
        let enabled = self.engine.toggle_loop();
        self.emit_settings();
        enabled
    }

    /// Set volume (clamped to [0, 1])
    pub fn set_volume(&mut self, level: f64) {
        self.engine.set_volume(level);
        self.push_volume();
    }

    /// Mute, or restore the volume from before muting
    pub fn toggle_mute(&mut self) {
        self.engine.toggle_mute();
        self.push_volume();
    }

    /// Set playback speed (positive, finite)
    ///
    /// The host should recreate its timer with the new `tick_interval`.
    pub fn set_speed(&mut self, speed: f64) -> Result<()> {
        self.engine.set_speed(speed)?;
        self.push_speed();
        Ok(())
    }

    /// Step the speed button
    pub fn cycle_speed(&mut self) -> f64 {
        let speed = self.engine.cycle_speed();
        self.push_speed();
        speed
    }

    // ===== Timer & Audio Callbacks =====

    /// Timer tick; `None` while not playing
    pub fn tick(&mut self) -> Option<TickOutcome> {
        if self.state != PlaybackState::Playing {
            return None;
        }

        let audio = self
            .audio
            .as_ref()
            .map(|audio| &**audio as &dyn AudioResource);
        let outcome = self.progress.on_tick(audio);

        match outcome {
            TickOutcome::Advanced { elapsed } => {
                self.emit(PlaybackEvent::PositionUpdate {
                    elapsed,
                    total: self.progress.total(),
                });
            }
            TickOutcome::Finished => {
                self.emit(PlaybackEvent::PositionUpdate {
                    elapsed: self.progress.elapsed(),
                    total: self.progress.total(),
                });
                if let Some(id) = self.engine.active().cloned() {
                    self.emit(PlaybackEvent::TrackFinished { track_id: id });
                }
            }
            TickOutcome::WaitingForDuration => {}
        }

        Some(outcome)
    }

    /// Audio resource finished loading; elapsed restarts and duration is read
    pub fn track_loaded(&mut self) {
        let audio = self
            .audio
            .as_ref()
            .map(|audio| &**audio as &dyn AudioResource);
        self.progress.on_track_load(audio);
    }

    /// Audio resource reached end of track
    ///
    /// Loop restarts the same track; otherwise the queue advances.
    pub fn track_ended(&mut self) -> Result<Transition> {
        let Some(active) = self.engine.active().cloned() else {
            return Ok(Transition::Unchanged);
        };
        self.attribute_leaving(&active);

        match self.progress.on_track_end(self.engine.is_loop()) {
            EndAction::Restart => {
                self.restart_audio()?;
                self.attributed = false;
                self.emit(PlaybackEvent::TrackChanged {
                    track_id: active.clone(),
                    previous_track_id: Some(active.clone()),
                });
                Ok(Transition::Restart(active))
            }
            EndAction::Advance => self.next(),
        }
    }

    // ===== Attribution =====

    /// Reconcile the optimistic local play count with the store's answer
    ///
    /// Failures roll the local count back and surface a notification.
    pub fn apply_attribution(&mut self, report: AttributionReport) {
        match report.outcome {
            Ok(count) => {
                self.catalog.set_play_count(&report.track_id, count);
            }
            Err(message) => {
                self.catalog.rollback_play_count(&report.track_id);
                warn!(track_id = %report.track_id, "Rolled back play count");
                self.emit(PlaybackEvent::Notification { message });
            }
        }
    }

    // ===== Internals =====

    fn apply(&mut self, transition: &Transition) -> Result<()> {
        match transition {
            Transition::Unchanged => Ok(()),
            Transition::Restart(id) => {
                self.attribute_leaving(id);
                self.progress.restart();
                self.attributed = false;
                self.restart_audio()?;
                self.emit(PlaybackEvent::TrackChanged {
                    track_id: id.clone(),
                    previous_track_id: Some(id.clone()),
                });
                Ok(())
            }
            Transition::Moved { from, to } | Transition::Reshuffled { from, to } => {
                if let Some(from) = from {
                    self.attribute_leaving(from);
                }
                self.activate(to.clone(), from.clone())
            }
        }
    }

    /// Count a play for the track being left when enough of it elapsed
    fn attribute_leaving(&mut self, id: &TrackId) {
        if self.attributed {
            return;
        }

        let duration = self
            .catalog
            .get(id)
            .map(|track| track.duration)
            .filter(|duration| *duration > 0.0)
            .unwrap_or_else(|| self.progress.total());

        if self.policy.is_due(self.progress.elapsed(), duration) {
            self.attributed = true;
            self.catalog.bump_play_count(id);
            debug!(track_id = %id, "Play count due");
            self.emit(PlaybackEvent::PlayCountDue {
                track_id: id.clone(),
            });
        }
    }

    /// Load the new active track into the audio resource and start it
    ///
    /// A track whose audio fails to load stays active but stopped, with an
    /// unknown total, so nothing ticks or counts until it is left.
    fn activate(&mut self, id: TrackId, previous: Option<TrackId>) -> Result<()> {
        self.attributed = false;
        let loaded = self.load_audio(&id);

        let audio = match loaded {
            Ok(()) => self
                .audio
                .as_ref()
                .map(|audio| &**audio as &dyn AudioResource),
            Err(_) => None,
        };
        self.progress.on_track_load(audio);

        self.emit(PlaybackEvent::TrackChanged {
            track_id: id.clone(),
            previous_track_id: previous,
        });

        if let Err(e) = loaded {
            warn!(track_id = %id, error = %e, "Audio failed to load");
            if let Some(audio) = self.audio.as_mut() {
                audio.pause();
            }
            if self.state != PlaybackState::Stopped {
                self.set_state(PlaybackState::Stopped);
            }
            return Err(e);
        }

        if self.state != PlaybackState::Playing {
            self.set_state(PlaybackState::Playing);
        }
        Ok(())
    }

    fn load_audio(&mut self, id: &TrackId) -> Result<()> {
        let Some(audio) = self.audio.as_mut() else {
            return Ok(());
        };
        let track = self
            .catalog
            .get(id)
            .ok_or_else(|| PlaybackError::UnknownTrack(id.clone()))?;

        audio.load(&track.audio)?;
        audio.play()
    }

    fn restart_audio(&mut self) -> Result<()> {
        if let Some(audio) = self.audio.as_mut() {
            audio.seek(0.0)?;
            audio.play()?;
        }
        if self.state != PlaybackState::Playing {
            self.set_state(PlaybackState::Playing);
        }
        Ok(())
    }

    fn push_volume(&mut self) {
        let volume = self.engine.settings().volume;
        if let Some(audio) = self.audio.as_mut() {
            audio.set_volume(volume);
        }
        self.emit_settings();
    }

    fn push_speed(&mut self) {
        let speed = self.engine.settings().speed;
        if let Some(audio) = self.audio.as_mut() {
            audio.set_rate(speed);
        }
        self.emit_settings();
    }

    fn set_state(&mut self, state: PlaybackState) {
        self.state = state;
        self.emit(PlaybackEvent::StateChanged { state });
    }

    fn emit_settings(&mut self) {
        let settings = self.engine.settings();
        self.emit(PlaybackEvent::SettingsChanged { settings });
    }

    fn emit(&mut self, event: PlaybackEvent) {
        self.pending_events.push(event);
    }
}

impl Default for PlaybackManager {
    fn default() -> Self {
        Self::new(PlaybackConfig::default())
    }
}
