//! Reference-track selection
//!
//! The home feed is ranked against one of the most played tracks, picked at
//! random so the feed varies between visits.

use crate::ranker::{RelevanceRanker, ScoredTrack};
use melody_core::Track;
use rand::Rng;
use tracing::debug;

/// How many of the most played tracks are eligible as reference
pub const DEFAULT_TOP_N: usize = 5;

/// Pick a reference uniformly among the `top_n` most played tracks
///
/// Ties in play count keep input order. `top_n` of zero is treated as one.
/// Returns `None` for an empty list.
pub fn pick_reference<'a, R: Rng + ?Sized>(
    tracks: &'a [Track],
    top_n: usize,
    rng: &mut R,
) -> Option<&'a Track> {
    if tracks.is_empty() {
        return None;
    }

    let mut by_plays: Vec<&Track> = tracks.iter().collect();
    by_plays.sort_by(|a, b| b.play_count.cmp(&a.play_count));
    by_plays.truncate(top_n.max(1));

    let reference = by_plays[rng.gen_range(0..by_plays.len())];
    debug!(
        reference = %reference.id,
        play_count = reference.play_count,
        eligible = by_plays.len(),
        "Picked reference track"
    );
    Some(reference)
}

/// A ranked feed and the track it was ranked against
#[derive(Debug, Clone)]
pub struct Recommendation<'a> {
    pub reference: &'a Track,
    pub ranked: Vec<ScoredTrack<'a>>,
}

impl RelevanceRanker {
    /// Pick a reference among the most played tracks and rank everything
    /// against it
    pub fn recommend<'a, R: Rng + ?Sized>(
        &self,
        tracks: &'a [Track],
        top_n: usize,
        rng: &mut R,
    ) -> Option<Recommendation<'a>> {
        let reference = pick_reference(tracks, top_n, rng)?;
        let ranked = self.rank(tracks, reference);
        Some(Recommendation { reference, ranked })
    }
}
