/// Track domain type
use crate::types::{TrackId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A song in the library
///
/// Everything except `play_count` is immutable once loaded; play counts are
/// bumped through [`crate::TrackStore::update_play_count`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Owner of the upload, if known
    #[serde(default)]
    pub user_id: Option<UserId>,

    /// Track title
    pub title: String,

    /// Comma-separated list of artist names
    pub author: String,

    /// Album name
    #[serde(default)]
    pub album: String,

    /// Comma-separated genre tags
    #[serde(default)]
    pub genre: String,

    /// Track duration in seconds
    #[serde(default)]
    pub duration: f64,

    /// Cumulative play count
    #[serde(default)]
    pub play_count: u64,

    /// Lyrics text
    #[serde(default)]
    pub lyrics: Option<String>,

    /// Artwork reference (path or URL)
    #[serde(default)]
    pub artwork: Option<String>,

    /// Audio resource reference handed to the audio collaborator
    #[serde(default)]
    pub audio: String,

    /// When the track was added to the library
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Track {
    /// Create a new track with minimal metadata
    pub fn new(id: impl Into<TrackId>, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_id: None,
            title: title.into(),
            author: author.into(),
            album: String::new(),
            genre: String::new(),
            duration: 0.0,
            play_count: 0,
            lyrics: None,
            artwork: None,
            audio: String::new(),
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = album.into();
        self
    }

    #[must_use]
    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = genre.into();
        self
    }

    /// Negative durations are stored as zero
    #[must_use]
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = seconds.max(0.0);
        self
    }

    #[must_use]
    pub fn with_play_count(mut self, play_count: u64) -> Self {
        self.play_count = play_count;
        self
    }

    #[must_use]
    pub fn with_audio(mut self, audio: impl Into<String>) -> Self {
        self.audio = audio.into();
        self
    }

    #[must_use]
    pub fn with_owner(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Normalized artist names
    pub fn authors(&self) -> HashSet<String> {
        split_tags(&self.author)
    }

    /// Normalized genre tags
    pub fn genres(&self) -> HashSet<String> {
        split_tags(&self.genre)
    }
}

/// Split a comma-separated field into a case-insensitive token set
///
/// Tokens are trimmed and lowercased; empty tokens are dropped so two tracks
/// with a blank field never "share" anything.
pub fn split_tags(field: &str) -> HashSet<String> {
    field
        .split(',')
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}
