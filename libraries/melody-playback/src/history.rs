//! Play history tracking
//!
//! Maintains a bounded history of activated track ids for "previous" in
//! shuffle mode, where the shuffle order alone gives no way back.

use melody_core::TrackId;
use std::collections::VecDeque;

/// Play history with bounded size
///
/// Most recent entry at the back. When full, the oldest entry is discarded,
/// so the most recent one always survives.
#[derive(Debug, Clone)]
pub struct PlayHistory {
    /// History buffer (most recent = back)
    ids: VecDeque<TrackId>,

    /// Maximum history size (at least 1)
    max_size: usize,
}

impl PlayHistory {
    /// Create new history with specified maximum size
    pub fn new(max_size: usize) -> Self {
        let max_size = max_size.max(1);
        Self {
            ids: VecDeque::with_capacity(max_size.min(64)),
            max_size,
        }
    }

    /// Record a newly activated track
    pub fn push(&mut self, id: TrackId) {
        if self.ids.len() >= self.max_size {
            self.ids.pop_front();
        }
        self.ids.push_back(id);
    }

    /// Most recent entry
    pub fn last(&self) -> Option<&TrackId> {
        self.ids.back()
    }

    /// Drop the most recent entry
    pub fn pop(&mut self) -> Option<TrackId> {
        self.ids.pop_back()
    }

    /// Replace the whole history with a single entry
    pub fn reset_to(&mut self, id: TrackId) {
        self.ids.clear();
        self.ids.push_back(id);
    }

    /// All entries, oldest first
    pub fn ids(&self) -> Vec<&TrackId> {
        self.ids.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

impl Default for PlayHistory {
    fn default() -> Self {
        Self::new(500)
    }
}
