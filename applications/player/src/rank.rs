/// Relevance ranking report for the `rank` subcommand
use crate::config::DiscoverySettings;
use crate::error::{PlayerError, Result};
use melody_core::{format_play_count, Track, TrackId};
use melody_discovery::{RelevanceRanker, ScoredTrack};
use rand::Rng;

/// Rank `tracks` against `reference`, or against a pick among the most
/// played tracks when no reference is given
pub fn render_ranking<R: Rng + ?Sized>(
    tracks: &[Track],
    reference: Option<&TrackId>,
    settings: &DiscoverySettings,
    limit: usize,
    rng: &mut R,
) -> Result<String> {
    let ranker = RelevanceRanker::new(settings.weights);

    let (reference, ranked): (&Track, Vec<ScoredTrack<'_>>) = match reference {
        Some(id) => {
            let reference = tracks
                .iter()
                .find(|track| &track.id == id)
                .ok_or_else(|| PlayerError::TrackNotFound(id.to_string()))?;
            (reference, ranker.rank(tracks, reference))
        }
        None => match ranker.recommend(tracks, settings.top_n, rng) {
            Some(recommendation) => (recommendation.reference, recommendation.ranked),
            None => return Ok("Library is empty\n".to_string()),
        },
    };

    let mut report = format!(
        "Reference: {} - {} ({} plays)\n",
        reference.title,
        reference.author,
        format_play_count(reference.play_count)
    );
    for (i, scored) in ranked.iter().take(limit).enumerate() {
        report.push_str(&format!(
            "{:>3}. {:>3}  {} - {}\n",
            i + 1,
            scored.score,
            scored.track.title,
            scored.track.author
        ));
    }

    Ok(report)
}
