/// Playback contexts: where a queue of tracks comes from
use crate::error::MelodyError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The list a queue was built from
///
/// Opening a different list replaces the queue wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TrackContext {
    /// Whole library, newest first
    Library,

    /// Tracks the user liked
    Liked,

    /// Title search results
    Search { title: String },

    /// Tracks by an artist
    Author { author: String },

    /// A saved playlist
    Playlist { id: String },
}

impl fmt::Display for TrackContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackContext::Library => write!(f, "library"),
            TrackContext::Liked => write!(f, "liked"),
            TrackContext::Search { title } => write!(f, "search:{}", title),
            TrackContext::Author { author } => write!(f, "author:{}", author),
            TrackContext::Playlist { id } => write!(f, "playlist:{}", id),
        }
    }
}

impl FromStr for TrackContext {
    type Err = MelodyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, arg) = match s.split_once(':') {
            Some((kind, arg)) => (kind.trim(), Some(arg.trim())),
            None => (s.trim(), None),
        };

        match (kind, arg) {
            ("library", None) => Ok(TrackContext::Library),
            ("liked", None) => Ok(TrackContext::Liked),
            ("search", Some(title)) => Ok(TrackContext::Search {
                title: title.to_string(),
            }),
            ("author", Some(author)) if !author.is_empty() => Ok(TrackContext::Author {
                author: author.to_string(),
            }),
            ("playlist", Some(id)) if !id.is_empty() => {
                Ok(TrackContext::Playlist { id: id.to_string() })
            }
            _ => Err(MelodyError::invalid_input(format!(
                "unknown track context: {}",
                s
            ))),
        }
    }
}
