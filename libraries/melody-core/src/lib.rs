//! Melody Player Core
//!
//! Platform-agnostic core types, traits, and error handling for Melody Player.
//!
//! This crate provides the foundational building blocks shared by the playback
//! engine, the discovery ranker, the storage backends and the host application.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `TrackId`, `UserId`, `TrackContext`
//! - **Core Traits**: `TrackStore` (the persistent track collaborator)
//! - **Error Handling**: Unified `MelodyError` and `Result` types
//! - **Formatting**: elapsed-time and play-count display helpers
//!
//! # Example
//!
//! ```rust
//! use melody_core::{format_time, Track, TrackId};
//!
//! let track = Track::new("t1", "Hello", "Adele")
//!     .with_genre("Pop,Soul")
//!     .with_duration(295.0);
//!
//! assert_eq!(track.id, TrackId::new("t1"));
//! assert_eq!(format_time(track.duration), "04:55");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod format;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{MelodyError, Result};
pub use format::{format_play_count, format_time};
pub use storage::TrackStore;
pub use types::{split_tags, Track, TrackContext, TrackId, UserId};
