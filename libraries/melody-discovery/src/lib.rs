//! Melody Player - Discovery
//!
//! Relevance ranking for the home feed and other track lists.
//!
//! # Example
//!
//! ```rust
//! use melody_core::Track;
//! use melody_discovery::RelevanceRanker;
//!
//! let reference = Track::new("ref", "Hello", "Adele").with_genre("Pop,Soul");
//! let tracks = vec![
//!     Track::new("a", "Unrelated", "Someone"),
//!     Track::new("b", "Skyfall", "Adele").with_genre("Pop"),
//! ];
//!
//! let ranked = RelevanceRanker::default().rank(&tracks, &reference);
//! assert_eq!(ranked[0].track.id.as_str(), "b");
//! assert_eq!(ranked[0].score, 50);
//! ```

#![forbid(unsafe_code)]

mod ranker;
mod reference;

pub use ranker::{RelevanceRanker, RelevanceWeights, ScoredTrack};
pub use reference::{pick_reference, Recommendation, DEFAULT_TOP_N};
