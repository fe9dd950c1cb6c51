//! Playback queue engine
//!
//! Decides the next/previous active track for the current mode (sequential or
//! shuffled) and keeps the play history in step.
//!
//! ```text
//! Queue:         t1 t2 t3 t4          (context order)
//! ShuffleOrder:  t3 t1 t4 t2          (only while shuffling)
//! PlayHistory:   t3 t1                (last entry == active)
//! ```
//!
//! The engine has no I/O. Navigation errors (active id missing from the
//! queue or shuffle order) are logged and returned; state is left untouched.

use crate::error::{PlaybackError, Result};
use crate::history::PlayHistory;
use crate::queue::{Neighbor, Queue};
use crate::shuffle::shuffle_ids;
use crate::types::{PlaybackConfig, PlaybackSettings, Transition};
use crate::volume::{PlaybackSpeed, Volume};
use melody_core::TrackId;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};

/// Queue, shuffle order, history and settings for one playback session
#[derive(Debug)]
pub struct PlaybackQueueEngine {
    queue: Queue,
    shuffle_order: Vec<TrackId>,
    history: PlayHistory,
    active: Option<TrackId>,

    // Settings
    volume: Volume,
    speed: PlaybackSpeed,
    loop_enabled: bool,
    shuffle: bool,

    rng: StdRng,
}

impl PlaybackQueueEngine {
    /// Create an engine with an empty queue
    ///
    /// An invalid configured speed falls back to 1x.
    pub fn new(config: &PlaybackConfig) -> Self {
        let rng = match config.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            queue: Queue::new(),
            shuffle_order: Vec::new(),
            history: PlayHistory::new(config.history_size),
            active: None,
            volume: Volume::new(config.volume),
            speed: PlaybackSpeed::new(config.speed).unwrap_or_default(),
            loop_enabled: config.loop_enabled && !config.shuffle,
            shuffle: config.shuffle,
            rng,
        }
    }

    // ===== Accessors =====

    pub fn active(&self) -> Option<&TrackId> {
        self.active.as_ref()
    }

    pub fn queue(&self) -> &[TrackId] {
        self.queue.ids()
    }

    /// Empty unless shuffling
    pub fn shuffle_order(&self) -> &[TrackId] {
        &self.shuffle_order
    }

    /// Play history, oldest first
    pub fn history(&self) -> Vec<&TrackId> {
        self.history.ids()
    }

    /// The order the "up next" list should show
    pub fn playback_order(&self) -> &[TrackId] {
        if self.shuffle {
            &self.shuffle_order
        } else {
            self.queue.ids()
        }
    }

    pub fn settings(&self) -> PlaybackSettings {
        PlaybackSettings {
            volume: self.volume.level(),
            loop_enabled: self.loop_enabled,
            shuffle: self.shuffle,
            speed: self.speed.get(),
        }
    }

    pub fn is_shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn is_loop(&self) -> bool {
        self.loop_enabled
    }

    // ===== Queue Management =====

    /// Replace the queue (context change), keeping the active track
    ///
    /// History is cleared. While shuffling a fresh order is generated for the
    /// new queue.
    pub fn set_queue(&mut self, ids: Vec<TrackId>) {
        let active = self.active.clone();
        self.set_queue_with_active(ids, active);
    }

    /// Replace the queue and activate `active` (user opened a list and
    /// picked a track)
    pub fn set_queue_with_active(&mut self, ids: Vec<TrackId>, active: Option<TrackId>) {
        self.queue.set(ids);
        self.history.clear();
        self.active = active;

        if self.shuffle {
            self.reshuffle();
            if let Some(id) = &self.active {
                self.history.push(id.clone());
            }
        }

        debug!(
            len = self.queue.len(),
            active = ?self.active,
            shuffle = self.shuffle,
            "Queue replaced"
        );
    }

    // ===== Navigation =====

    /// Move forward
    ///
    /// - loop: the active track restarts, nothing else changes
    /// - shuffle: next entry of the shuffle order; past the end the queue is
    ///   reshuffled and history restarts at the new first entry
    /// - sequential: next queue entry, wrapping to the first
    pub fn advance(&mut self) -> Result<Transition> {
        if self.loop_enabled {
            return Ok(match &self.active {
                Some(id) => Transition::Restart(id.clone()),
                None => Transition::Unchanged,
            });
        }

        if self.queue.is_empty() {
            return Ok(Transition::Unchanged);
        }

        if self.shuffle {
            self.advance_shuffled()
        } else {
            self.advance_sequential()
        }
    }

    fn advance_shuffled(&mut self) -> Result<Transition> {
        let from = self.active.clone();

        let next_index = match &from {
            None => 0,
            Some(current) => match self.shuffle_order.iter().position(|id| id == current) {
                Some(index) => index + 1,
                None => {
                    warn!(track_id = %current, "Current track not found in shuffle order");
                    return Err(PlaybackError::TrackNotInShuffleOrder(current.clone()));
                }
            },
        };

        if let Some(next) = self.shuffle_order.get(next_index).cloned() {
            self.history.push(next.clone());
            self.active = Some(next.clone());
            debug!(to = %next, "Advanced in shuffle order");
            return Ok(Transition::Moved { from, to: next });
        }

        // Shuffle order exhausted
        self.reshuffle();
        let Some(first) = self.shuffle_order.first().cloned() else {
            return Ok(Transition::Unchanged);
        };
        self.history.reset_to(first.clone());
        self.active = Some(first.clone());
        debug!(to = %first, "Shuffle order exhausted, reshuffled");
        Ok(Transition::Reshuffled { from, to: first })
    }

    fn advance_sequential(&mut self) -> Result<Transition> {
        let from = self.active.clone();

        match self.queue.successor(from.as_ref()) {
            Neighbor::Found(next) => {
                self.history.push(next.clone());
                self.active = Some(next.clone());
                debug!(to = %next, "Advanced in queue");
                Ok(Transition::Moved { from, to: next })
            }
            Neighbor::Empty => Ok(Transition::Unchanged),
            Neighbor::Missing => Err(self.missing_from_queue()),
        }
    }

    /// Move backward
    ///
    /// - shuffle: drop the latest history entry and activate the one before;
    ///   a single entry is re-activated; empty history does nothing
    /// - otherwise: previous queue entry, wrapping to the last
    pub fn retreat(&mut self) -> Result<Transition> {
        if self.shuffle {
            return Ok(self.retreat_shuffled());
        }

        let from = self.active.clone();
        match self.queue.predecessor(from.as_ref()) {
            Neighbor::Found(previous) => {
                if from.is_some() && self.history.last() == from.as_ref() {
                    self.history.pop();
                }
                if self.history.last() != Some(&previous) {
                    self.history.push(previous.clone());
                }
                self.active = Some(previous.clone());
                debug!(to = %previous, "Retreated in queue");
                Ok(Transition::Moved { from, to: previous })
            }
            Neighbor::Empty => Ok(Transition::Unchanged),
            Neighbor::Missing => Err(self.missing_from_queue()),
        }
    }

    fn retreat_shuffled(&mut self) -> Transition {
        let from = self.active.clone();

        if self.history.len() > 1 {
            self.history.pop();
        }

        match self.history.last().cloned() {
            Some(previous) if from.as_ref() != Some(&previous) => {
                self.active = Some(previous.clone());
                debug!(to = %previous, "Retreated through history");
                Transition::Moved { from, to: previous }
            }
            Some(_) | None => Transition::Unchanged,
        }
    }

    /// Activate a track the user picked from the list
    ///
    /// The shuffle order is left alone; in shuffle mode the pick is recorded
    /// in history. Picking the active track restarts it.
    pub fn jump_to(&mut self, id: &TrackId) -> Result<Transition> {
        if !self.queue.contains(id) {
            warn!(track_id = %id, "Selected track is not in the queue");
            return Err(PlaybackError::TrackNotInQueue(id.clone()));
        }

        if self.active.as_ref() == Some(id) {
            return Ok(Transition::Restart(id.clone()));
        }

        if self.shuffle {
            self.history.push(id.clone());
        }

        let from = self.active.replace(id.clone());
        debug!(to = %id, "Jumped to track");
        Ok(Transition::Moved {
            from,
            to: id.clone(),
        })
    }

    // ===== Modes =====

    /// Toggle shuffle, returning the new state
    ///
    /// Enabling builds a fresh shuffle order, restarts history at the active
    /// track and forces loop off. Disabling discards order and history.
    pub fn toggle_shuffle(&mut self) -> bool {
        if self.shuffle {
            self.shuffle = false;
            self.shuffle_order.clear();
            self.history.clear();
        } else {
            self.shuffle = true;
            self.loop_enabled = false;
            self.reshuffle();
            self.history.clear();
            if let Some(id) = &self.active {
                self.history.push(id.clone());
            }
        }

        debug!(shuffle = self.shuffle, "Shuffle toggled");
        self.shuffle
    }

    /// Toggle loop, returning the new state
    ///
    /// Enabling forces shuffle off and discards shuffle order and history.
    pub fn toggle_loop(&mut self) -> bool {
        if self.loop_enabled {
            self.loop_enabled = false;
        } else {
            self.loop_enabled = true;
            self.shuffle = false;
            self.shuffle_order.clear();
            self.history.clear();
        }

        debug!(loop_enabled = self.loop_enabled, "Loop toggled");
        self.loop_enabled
    }

    // ===== Volume & Speed =====

    /// Set volume (clamped to [0, 1])
    pub fn set_volume(&mut self, level: f64) {
        self.volume.set_level(level);
    }

    /// Mute or restore the previous volume
    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
    }

    /// Set playback speed; non-positive or non-finite speeds are rejected
    pub fn set_speed(&mut self, speed: f64) -> Result<()> {
        self.speed = PlaybackSpeed::new(speed)?;
        Ok(())
    }

    /// Step the speed button (0.25 increments, 4x wraps to 0.5x)
    pub fn cycle_speed(&mut self) -> f64 {
        self.speed = self.speed.cycled();
        self.speed.get()
    }

    // ===== Internals =====

    fn reshuffle(&mut self) {
        self.shuffle_order = shuffle_ids(self.queue.ids(), &mut self.rng);
    }

    fn missing_from_queue(&self) -> PlaybackError {
        let id = self.active.clone().unwrap_or_else(|| TrackId::new(""));
        warn!(track_id = %id, "Current track not found in queue");
        PlaybackError::TrackNotInQueue(id)
    }
}

impl Default for PlaybackQueueEngine {
    fn default() -> Self {
        Self::new(&PlaybackConfig::default())
    }
}
