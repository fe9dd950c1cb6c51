//! Queue engine integration tests
//!
//! Real-world navigation scenarios: opening a list, next/previous buttons,
//! switching modes in the middle of a session.

use melody_core::TrackId;
use melody_playback::{PlaybackConfig, PlaybackError, PlaybackQueueEngine, Transition};
use std::collections::HashSet;

// ===== Test Helpers =====

fn ids(names: &[&str]) -> Vec<TrackId> {
    names.iter().map(|name| TrackId::new(*name)).collect()
}

fn id(name: &str) -> TrackId {
    TrackId::new(name)
}

fn seeded_engine(seed: u64) -> PlaybackQueueEngine {
    PlaybackQueueEngine::new(&PlaybackConfig {
        shuffle_seed: Some(seed),
        ..PlaybackConfig::default()
    })
}

fn active(engine: &PlaybackQueueEngine) -> &str {
    engine.active().map(TrackId::as_str).unwrap_or("")
}

// ===== Sequential Navigation =====

#[test]
fn test_next_from_last_wraps_to_first() {
    let mut engine = seeded_engine(1);
    engine.set_queue_with_active(ids(&["a", "b", "c"]), Some(id("c")));

    let transition = engine.advance().unwrap();

    assert_eq!(
        transition,
        Transition::Moved {
            from: Some(id("c")),
            to: id("a"),
        }
    );
    assert_eq!(active(&engine), "a");
}

#[test]
fn test_previous_from_first_wraps_to_last() {
    let mut engine = seeded_engine(1);
    engine.set_queue_with_active(ids(&["a", "b", "c"]), Some(id("a")));

    engine.retreat().unwrap();
    assert_eq!(active(&engine), "c");
}

#[test]
fn test_repeated_ids_still_reach_every_track() {
    let mut engine = seeded_engine(1);
    engine.set_queue_with_active(ids(&["a", "b", "a", "c"]), Some(id("a")));
    assert_eq!(engine.queue(), ids(&["a", "b", "c"]).as_slice());

    let mut visited = vec![active(&engine).to_string()];
    for _ in 0..3 {
        engine.advance().unwrap();
        visited.push(active(&engine).to_string());
    }
    assert_eq!(visited, vec!["a", "b", "c", "a"]);
}

#[test]
fn test_repeated_ids_shuffle_each_track_once() {
    let mut engine = seeded_engine(9);
    engine.toggle_shuffle();
    engine.set_queue_with_active(ids(&["a", "b", "a", "c", "b"]), Some(id("a")));

    let order: HashSet<&TrackId> = engine.shuffle_order().iter().collect();
    assert_eq!(engine.shuffle_order().len(), 3);
    assert_eq!(order.len(), 3);
}

#[test]
fn test_full_cycle_returns_to_start() {
    let mut engine = seeded_engine(1);
    engine.set_queue_with_active(ids(&["a", "b", "c", "d"]), Some(id("b")));

    for _ in 0..4 {
        engine.advance().unwrap();
    }
    assert_eq!(active(&engine), "b");

    for _ in 0..4 {
        engine.retreat().unwrap();
    }
    assert_eq!(active(&engine), "b");
}

#[test]
fn test_single_track_queue_stays_on_track() {
    let mut engine = seeded_engine(1);
    engine.set_queue_with_active(ids(&["only"]), Some(id("only")));

    engine.advance().unwrap();
    assert_eq!(active(&engine), "only");
    engine.retreat().unwrap();
    assert_eq!(active(&engine), "only");
}

#[test]
fn test_empty_queue_is_a_no_op() {
    let mut engine = seeded_engine(1);

    assert_eq!(engine.advance().unwrap(), Transition::Unchanged);
    assert_eq!(engine.retreat().unwrap(), Transition::Unchanged);
    assert!(engine.active().is_none());
}

#[test]
fn test_active_track_missing_from_new_queue_is_reported() {
    let mut engine = seeded_engine(1);
    engine.set_queue_with_active(ids(&["a", "b"]), Some(id("a")));

    // Context switched to a list that does not contain the playing track
    engine.set_queue(ids(&["x", "y"]));

    let err = engine.advance().unwrap_err();
    assert!(matches!(err, PlaybackError::TrackNotInQueue(ref track) if track.as_str() == "a"));
    assert!(err.is_navigation());
    assert_eq!(active(&engine), "a");
}

// ===== Shuffle =====

#[test]
fn test_shuffle_plays_every_track_once_per_order() {
    let queue = ids(&["a", "b", "c", "d", "e"]);
    let mut engine = seeded_engine(42);
    engine.set_queue(queue.clone());
    engine.toggle_shuffle();

    let order: Vec<TrackId> = engine.shuffle_order().to_vec();
    let mut visited = Vec::new();
    for _ in 0..queue.len() {
        engine.advance().unwrap();
        visited.push(engine.active().unwrap().clone());
    }

    assert_eq!(visited, order);
    let distinct: HashSet<_> = visited.iter().collect();
    assert_eq!(distinct.len(), queue.len());
}

#[test]
fn test_shuffle_exhaustion_reshuffles_and_resets_history() {
    let mut engine = seeded_engine(7);
    engine.set_queue_with_active(ids(&["a", "b", "c"]), Some(id("a")));
    engine.toggle_shuffle();

    let last = engine.shuffle_order().last().unwrap().clone();
    engine.jump_to(&last).unwrap();

    let transition = engine.advance().unwrap();
    let Transition::Reshuffled { from, to } = transition else {
        panic!("expected a reshuffle, got {:?}", transition);
    };

    assert_eq!(from, Some(last));
    assert_eq!(&to, &engine.shuffle_order()[0]);
    assert_eq!(engine.history(), vec![&to]);
}

#[test]
fn test_shuffle_previous_walks_history_back() {
    let mut engine = seeded_engine(3);
    engine.set_queue_with_active(ids(&["a", "b", "c", "d"]), Some(id("a")));
    engine.toggle_shuffle();

    engine.jump_to(&id("c")).unwrap();
    engine.jump_to(&id("d")).unwrap();
    assert_eq!(engine.history(), vec![&id("a"), &id("c"), &id("d")]);

    engine.retreat().unwrap();
    assert_eq!(active(&engine), "c");
    assert_eq!(engine.history(), vec![&id("a"), &id("c")]);

    engine.retreat().unwrap();
    assert_eq!(active(&engine), "a");

    // Single remaining entry: previous keeps it
    assert_eq!(engine.retreat().unwrap(), Transition::Unchanged);
    assert_eq!(active(&engine), "a");
    assert_eq!(engine.history(), vec![&id("a")]);
}

#[test]
fn test_enabling_shuffle_keeps_active_track() {
    let mut engine = seeded_engine(9);
    engine.set_queue_with_active(ids(&["a", "b", "c", "d"]), Some(id("b")));

    assert!(engine.toggle_shuffle());
    assert_eq!(active(&engine), "b");
    assert_eq!(engine.history(), vec![&id("b")]);
    assert_eq!(engine.shuffle_order().len(), 4);
}

#[test]
fn test_disabling_shuffle_discards_order_and_history() {
    let mut engine = seeded_engine(9);
    engine.set_queue_with_active(ids(&["a", "b"]), Some(id("a")));
    engine.toggle_shuffle();

    assert!(!engine.toggle_shuffle());
    assert!(engine.shuffle_order().is_empty());
    assert!(engine.history().is_empty());
    assert_eq!(engine.playback_order(), engine.queue());
}

#[test]
fn test_new_context_while_shuffling_gets_new_order() {
    let mut engine = seeded_engine(11);
    engine.set_queue_with_active(ids(&["a", "b"]), Some(id("a")));
    engine.toggle_shuffle();

    engine.set_queue_with_active(ids(&["x", "y", "z"]), Some(id("y")));

    let order: HashSet<_> = engine.shuffle_order().iter().cloned().collect();
    let expected: HashSet<_> = ids(&["x", "y", "z"]).into_iter().collect();
    assert_eq!(order, expected);
    assert_eq!(engine.history(), vec![&id("y")]);
}

// ===== Loop =====

#[test]
fn test_loop_restarts_active_track() {
    let mut engine = seeded_engine(1);
    engine.set_queue_with_active(ids(&["a", "b"]), Some(id("a")));
    engine.toggle_loop();

    assert_eq!(engine.advance().unwrap(), Transition::Restart(id("a")));
    assert_eq!(engine.advance().unwrap(), Transition::Restart(id("a")));
    assert_eq!(active(&engine), "a");
}

#[test]
fn test_loop_and_shuffle_are_exclusive() {
    let mut engine = seeded_engine(1);
    engine.set_queue_with_active(ids(&["a", "b", "c"]), Some(id("a")));

    engine.toggle_shuffle();
    engine.toggle_loop();
    assert!(engine.is_loop());
    assert!(!engine.is_shuffle());
    assert!(engine.shuffle_order().is_empty());

    engine.toggle_shuffle();
    assert!(engine.is_shuffle());
    assert!(!engine.is_loop());
}

#[test]
fn test_config_with_both_modes_prefers_shuffle() {
    let engine = PlaybackQueueEngine::new(&PlaybackConfig {
        loop_enabled: true,
        shuffle: true,
        ..PlaybackConfig::default()
    });

    let settings = engine.settings();
    assert!(settings.shuffle);
    assert!(!settings.loop_enabled);
}

// ===== Selecting =====

#[test]
fn test_select_unknown_track_fails_without_change() {
    let mut engine = seeded_engine(1);
    engine.set_queue_with_active(ids(&["a", "b"]), Some(id("a")));

    let err = engine.jump_to(&id("zzz")).unwrap_err();
    assert!(matches!(err, PlaybackError::TrackNotInQueue(_)));
    assert_eq!(active(&engine), "a");
}

#[test]
fn test_select_then_next_continues_from_selection() {
    let mut engine = seeded_engine(1);
    engine.set_queue_with_active(ids(&["a", "b", "c", "d"]), Some(id("a")));

    engine.jump_to(&id("c")).unwrap();
    engine.advance().unwrap();
    assert_eq!(active(&engine), "d");
}

#[test]
fn test_same_seed_gives_same_order() {
    let queue = ids(&["a", "b", "c", "d", "e", "f"]);

    let mut first = seeded_engine(123);
    first.set_queue(queue.clone());
    first.toggle_shuffle();

    let mut second = seeded_engine(123);
    second.set_queue(queue);
    second.toggle_shuffle();

    assert_eq!(first.shuffle_order(), second.shuffle_order());
}
