//! Melody Player host
//!
//! Wires the playback core to a library file: an interactive, timer-driven
//! playback session reading commands from a line-oriented input, plus a
//! relevance ranking report.

pub mod audio;
pub mod command;
pub mod config;
pub mod error;
pub mod rank;
pub mod session;

pub use audio::HeadlessAudio;
pub use command::Command;
pub use config::PlayerConfig;
pub use error::{PlayerError, Result};
pub use rank::render_ranking;
pub use session::{Flow, Session};
