//! Melody Player Storage
//!
//! In-memory [`TrackStore`](melody_core::TrackStore) for Melody Player,
//! seeded from a JSON library file.
//!
//! # Example
//!
//! ```rust,no_run
//! use melody_core::{TrackContext, TrackStore};
//! use melody_storage::MemoryTrackStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryTrackStore::open("library.json").await?;
//!
//! // Whole library, newest first
//! let tracks = store.fetch_tracks_by_context(&TrackContext::Library).await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod library;
mod memory;

pub use error::{Result, StorageError};
pub use library::{load_library, save_library, LibraryFile, Playlist};
pub use memory::MemoryTrackStore;
