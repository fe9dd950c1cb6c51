//! Shuffle order generation
//!
//! Orders are produced by attaching a uniform random key to every id and
//! sorting by that key. Nothing stops the first element of a fresh order from
//! being the track that just finished; repeats across reshuffle boundaries are
//! accepted behavior.

use melody_core::TrackId;
use rand::Rng;

/// Produce a random permutation of `ids` by random key-sort
pub fn shuffle_ids<R: Rng + ?Sized>(ids: &[TrackId], rng: &mut R) -> Vec<TrackId> {
    let mut keyed: Vec<(f64, &TrackId)> = ids.iter().map(|id| (rng.gen::<f64>(), id)).collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    keyed.into_iter().map(|(_, id)| id.clone()).collect()
}
