//! Melody Player - Playback Queue Engine
//!
//! Platform-agnostic playback logic for Melody Player.
//!
//! This crate provides:
//! - Sequential and shuffled navigation over the loaded context
//! - Id-based play history for "previous" in shuffle mode
//! - Loop (repeat one) and shuffle, mutually exclusive
//! - Timer-driven progress tracking with seek
//! - Volume with mute/restore and stepped playback speed
//! - Play-count attribution after 80% of a track was heard
//!
//! # Architecture
//!
//! `melody-playback` performs no I/O of its own:
//! - Audio output is an [`AudioResource`] supplied by the host
//! - The timer is owned by the host; it calls [`PlaybackManager::tick`]
//! - Play-count updates go through a [`melody_core::TrackStore`] via
//!   [`PlayCountAttributor`], dispatched by the host
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use melody_core::{Track, TrackId};
//! use melody_playback::{PlaybackConfig, PlaybackManager, SimulatedAudio};
//!
//! let mut manager = PlaybackManager::new(PlaybackConfig::default());
//! manager.set_audio_resource(Box::new(SimulatedAudio::new(180.0)));
//!
//! let tracks = vec![
//!     Track::new("t1", "First", "Artist").with_audio("/music/first.mp3"),
//!     Track::new("t2", "Second", "Artist").with_audio("/music/second.mp3"),
//! ];
//! manager.load_context(tracks, Some(&TrackId::new("t1"))).unwrap();
//!
//! manager.next().unwrap();
//! assert_eq!(manager.active_track().unwrap().id, TrackId::new("t2"));
//!
//! // Sequential mode wraps around
//! manager.next().unwrap();
//! assert_eq!(manager.active_track().unwrap().id, TrackId::new("t1"));
//! ```
//!
//! # Example: Shuffle and Loop
//!
//! ```rust
//! use melody_playback::PlaybackManager;
//!
//! let mut manager = PlaybackManager::default();
//!
//! assert!(manager.toggle_loop());
//!
//! // Enabling shuffle turns loop off
//! assert!(manager.toggle_shuffle());
//! assert!(!manager.settings().loop_enabled);
//! ```

pub mod attribution;
mod catalog;
mod engine;
mod error;
pub mod events;
mod history;
mod manager;
pub mod progress;
mod queue;
mod shuffle;
mod source;
pub mod types;
mod volume;

// Public exports
pub use attribution::{AttributionPolicy, AttributionReport, PlayCountAttributor};
pub use catalog::TrackCatalog;
pub use engine::PlaybackQueueEngine;
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use history::PlayHistory;
pub use manager::PlaybackManager;
pub use progress::{tick_interval, EndAction, PlaybackProgressTracker, TickOutcome};
pub use queue::{Neighbor, Queue};
pub use shuffle::shuffle_ids;
pub use source::{AudioResource, SimulatedAudio};
pub use types::{PlaybackConfig, PlaybackSettings, PlaybackState, Transition};
pub use volume::{PlaybackSpeed, Volume, MAX_CYCLE_SPEED, MIN_CYCLE_SPEED, SPEED_STEP};
