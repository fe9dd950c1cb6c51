//! Relevance ranking
//!
//! Orders a track list by how much metadata each track shares with a
//! reference track. Author, genre and album fields are comma-separated tag
//! lists; every tag shared with the reference adds that field's weight.

use melody_core::{split_tags, Track};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Points per shared tag, per field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelevanceWeights {
    /// Per shared artist (default: 30)
    pub author: u32,

    /// Per shared genre tag (default: 20)
    pub genre: u32,

    /// Per shared album name (default: 10)
    pub album: u32,
}

impl Default for RelevanceWeights {
    fn default() -> Self {
        Self {
            author: 30,
            genre: 20,
            album: 10,
        }
    }
}

/// A candidate with its relevance score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredTrack<'a> {
    pub track: &'a Track,
    pub score: u32,
}

/// Ranks tracks against a reference
#[derive(Debug, Clone, Default)]
pub struct RelevanceRanker {
    weights: RelevanceWeights,
}

impl RelevanceRanker {
    pub fn new(weights: RelevanceWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> RelevanceWeights {
        self.weights
    }

    /// Relevance of `candidate` to `reference`
    pub fn score(&self, candidate: &Track, reference: &Track) -> u32 {
        ReferenceTags::new(reference).score(candidate, &self.weights)
    }

    /// Score every track and sort descending by score
    ///
    /// The sort is stable: equal scores keep their input order.
    pub fn rank<'a>(&self, tracks: &'a [Track], reference: &Track) -> Vec<ScoredTrack<'a>> {
        let tags = ReferenceTags::new(reference);
        let mut scored: Vec<ScoredTrack<'a>> = tracks
            .iter()
            .map(|track| ScoredTrack {
                track,
                score: tags.score(track, &self.weights),
            })
            .collect();

        scored.sort_by(|a, b| b.score.cmp(&a.score));

        debug!(
            reference = %reference.id,
            candidates = scored.len(),
            top_score = ?scored.first().map(|s| s.score),
            "Ranked tracks by relevance"
        );
        scored
    }
}

/// Tag sets of the reference, split once per ranking
struct ReferenceTags {
    authors: HashSet<String>,
    genres: HashSet<String>,
    albums: HashSet<String>,
}

impl ReferenceTags {
    fn new(reference: &Track) -> Self {
        Self {
            authors: reference.authors(),
            genres: reference.genres(),
            albums: split_tags(&reference.album),
        }
    }

    fn score(&self, candidate: &Track, weights: &RelevanceWeights) -> u32 {
        shared(&candidate.author, &self.authors) * weights.author
            + shared(&candidate.genre, &self.genres) * weights.genre
            + shared(&candidate.album, &self.albums) * weights.album
    }
}

fn shared(field: &str, reference: &HashSet<String>) -> u32 {
    split_tags(field)
        .iter()
        .filter(|tag| reference.contains(*tag))
        .count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> Track {
        Track::new("ref", "Hello", "Adele")
            .with_genre("Pop,Soul")
            .with_album("25")
    }

    #[test]
    fn adele_scores_fifty() {
        let candidate = Track::new("c", "Someone Like You", "Adele")
            .with_genre("Pop")
            .with_album("21");

        let ranker = RelevanceRanker::default();
        assert_eq!(ranker.score(&candidate, &reference()), 50);
    }

    #[test]
    fn matching_is_case_and_space_insensitive() {
        let candidate = Track::new("c", "X", " adele , Someone")
            .with_genre("SOUL , pop")
            .with_album(" 25");

        let ranker = RelevanceRanker::default();
        assert_eq!(ranker.score(&candidate, &reference()), 30 + 40 + 10);
    }

    #[test]
    fn blank_fields_share_nothing() {
        let reference = Track::new("r", "R", "Someone");
        let candidate = Track::new("c", "C", "Other");

        let ranker = RelevanceRanker::default();
        assert_eq!(ranker.score(&candidate, &reference), 0);
    }

    #[test]
    fn duplicate_tags_count_once() {
        let candidate = Track::new("c", "C", "Adele, adele,ADELE");
        let ranker = RelevanceRanker::default();
        assert_eq!(ranker.score(&candidate, &reference()), 30);
    }

    #[test]
    fn custom_weights_apply() {
        let ranker = RelevanceRanker::new(RelevanceWeights {
            author: 1,
            genre: 2,
            album: 3,
        });
        let candidate = Track::new("c", "C", "Adele")
            .with_genre("Soul")
            .with_album("25");
        assert_eq!(ranker.score(&candidate, &reference()), 6);
    }

    #[test]
    fn rank_is_descending_and_stable() {
        let tracks = vec![
            Track::new("none-1", "A", "Nobody"),
            Track::new("genre", "B", "Nobody").with_genre("pop"),
            Track::new("none-2", "C", "Nobody"),
            Track::new("author", "D", "Adele"),
        ];

        let ranked = RelevanceRanker::default().rank(&tracks, &reference());
        let order: Vec<&str> = ranked.iter().map(|s| s.track.id.as_str()).collect();
        assert_eq!(order, vec!["author", "genre", "none-1", "none-2"]);
        assert_eq!(ranked[0].score, 30);
    }

    #[test]
    fn weights_deserialize_with_defaults() {
        let weights: RelevanceWeights = serde_json::from_str(r#"{"genre": 5}"#).unwrap();
        assert_eq!(
            weights,
            RelevanceWeights {
                author: 30,
                genre: 5,
                album: 10
            }
        );
    }
}
