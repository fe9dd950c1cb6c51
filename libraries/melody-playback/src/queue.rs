//! Playback queue
//!
//! The ordered list of track ids for the current playback context (library,
//! search result, playlist). Rebuilt wholesale when the context changes.

use melody_core::TrackId;
use std::collections::HashSet;

/// Where navigation should land, relative to a current id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Neighbor {
    /// Neighbor found (wrapping at the ends)
    Found(TrackId),

    /// Queue is empty
    Empty,

    /// The current id is not part of the queue
    Missing,
}

/// Ordered track ids of the current context
#[derive(Debug, Clone, Default)]
pub struct Queue {
    ids: Vec<TrackId>,
}

impl Queue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace queue contents
    ///
    /// Repeated ids keep their first position only; neighbor lookup is by id.
    pub fn set(&mut self, ids: Vec<TrackId>) {
        let mut seen = HashSet::with_capacity(ids.len());
        self.ids = ids.into_iter().filter(|id| seen.insert(id.clone())).collect();
    }

    pub fn ids(&self) -> &[TrackId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &TrackId) -> bool {
        self.ids.contains(id)
    }

    /// Index of the first occurrence of `id`
    pub fn position(&self, id: &TrackId) -> Option<usize> {
        self.ids.iter().position(|candidate| candidate == id)
    }

    /// Track after `current`, wrapping to the first
    ///
    /// With no current track the first entry is the successor.
    pub fn successor(&self, current: Option<&TrackId>) -> Neighbor {
        if self.ids.is_empty() {
            return Neighbor::Empty;
        }

        let next = match current {
            None => 0,
            Some(id) => match self.position(id) {
                Some(index) => (index + 1) % self.ids.len(),
                None => return Neighbor::Missing,
            },
        };

        Neighbor::Found(self.ids[next].clone())
    }

    /// Track before `current`, wrapping to the last
    ///
    /// With no current track the last entry is the predecessor.
    pub fn predecessor(&self, current: Option<&TrackId>) -> Neighbor {
        if self.ids.is_empty() {
            return Neighbor::Empty;
        }

        let last = self.ids.len() - 1;
        let previous = match current {
            None => last,
            Some(id) => match self.position(id) {
                Some(0) => last,
                Some(index) => index - 1,
                None => return Neighbor::Missing,
            },
        };

        Neighbor::Found(self.ids[previous].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue(names: &[&str]) -> Queue {
        let mut queue = Queue::new();
        queue.set(names.iter().map(|n| TrackId::new(*n)).collect());
        queue
    }

    fn found(name: &str) -> Neighbor {
        Neighbor::Found(TrackId::new(name))
    }

    #[test]
    fn repeated_ids_keep_first_position() {
        let q = queue(&["a", "b", "a", "c"]);
        assert_eq!(q.len(), 3);
        assert_eq!(q.successor(Some(&TrackId::new("b"))), found("c"));
        assert_eq!(q.successor(Some(&TrackId::new("c"))), found("a"));
    }

    #[test]
    fn successor_wraps_at_end() {
        let q = queue(&["a", "b", "c"]);
        assert_eq!(q.successor(Some(&TrackId::new("a"))), found("b"));
        assert_eq!(q.successor(Some(&TrackId::new("c"))), found("a"));
    }

    #[test]
    fn predecessor_wraps_at_start() {
        let q = queue(&["a", "b", "c"]);
        assert_eq!(q.predecessor(Some(&TrackId::new("b"))), found("a"));
        assert_eq!(q.predecessor(Some(&TrackId::new("a"))), found("c"));
    }

    #[test]
    fn no_current_track_starts_at_the_edges() {
        let q = queue(&["a", "b", "c"]);
        assert_eq!(q.successor(None), found("a"));
        assert_eq!(q.predecessor(None), found("c"));
    }

    #[test]
    fn empty_queue() {
        let q = Queue::new();
        assert_eq!(q.successor(None), Neighbor::Empty);
        assert_eq!(q.predecessor(Some(&TrackId::new("a"))), Neighbor::Empty);
    }

    #[test]
    fn missing_current_track() {
        let q = queue(&["a", "b"]);
        assert_eq!(q.successor(Some(&TrackId::new("z"))), Neighbor::Missing);
        assert_eq!(q.predecessor(Some(&TrackId::new("z"))), Neighbor::Missing);
    }

    #[test]
    fn single_track_is_its_own_neighbor() {
        let q = queue(&["solo"]);
        assert_eq!(q.successor(Some(&TrackId::new("solo"))), found("solo"));
        assert_eq!(q.predecessor(Some(&TrackId::new("solo"))), found("solo"));
    }
}
