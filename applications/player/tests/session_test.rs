//! Playback sessions over an in-memory library

use async_trait::async_trait;
use melody_core::{MelodyError, Track, TrackContext, TrackId, TrackStore};
use melody_player::{Command, Flow, PlayerError, Session};
use melody_playback::PlaybackConfig;
use melody_storage::{LibraryFile, MemoryTrackStore};
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

// Three-second tracks finish on the sixth 0.55s tick
const LIBRARY: &str = r#"{
  "tracks": [
    { "id": "a", "title": "Alpha", "author": "Alice", "duration": 3.0,
      "audio": "/a.mp3", "created_at": "2024-01-01T00:00:00Z" },
    { "id": "b", "title": "Beta", "author": "Bob", "duration": 3.0,
      "audio": "/b.mp3", "created_at": "2024-02-01T00:00:00Z" },
    { "id": "c", "title": "Gamma", "author": "Carol", "duration": 3.0,
      "audio": "/c.mp3", "created_at": "2024-03-01T00:00:00Z" }
  ],
  "liked": ["a"],
  "playlists": [{ "id": "mix", "name": "Mix", "tracks": ["b", "a"] }]
}"#;

const TICKS_PER_TRACK: usize = 6;

fn store() -> Arc<MemoryTrackStore> {
    let library: LibraryFile = serde_json::from_str(LIBRARY).unwrap();
    Arc::new(MemoryTrackStore::new(library))
}

fn config() -> PlaybackConfig {
    PlaybackConfig {
        shuffle_seed: Some(7),
        ..PlaybackConfig::default()
    }
}

fn text(out: &[u8]) -> String {
    String::from_utf8_lossy(out).into_owned()
}

fn active<S: TrackStore + ?Sized + 'static>(session: &Session<S>) -> Option<String> {
    session
        .manager()
        .active_track()
        .map(|track| track.id.as_str().to_string())
}

/// Store whose play-count updates always fail
struct OfflineStore {
    inner: Arc<MemoryTrackStore>,
}

#[async_trait]
impl TrackStore for OfflineStore {
    async fn fetch_tracks_by_context(
        &self,
        context: &TrackContext,
    ) -> melody_core::Result<Vec<Track>> {
        self.inner.fetch_tracks_by_context(context).await
    }

    async fn get_track(&self, id: &TrackId) -> melody_core::Result<Option<Track>> {
        self.inner.get_track(id).await
    }

    async fn update_play_count(&self, _id: &TrackId) -> melody_core::Result<u64> {
        Err(MelodyError::network("backend offline"))
    }
}

#[tokio::test]
async fn test_open_starts_newest_track() {
    let session = Session::open(store(), TrackContext::Library, None, config())
        .await
        .unwrap();

    assert_eq!(active(&session), Some("c".to_string()));
    assert_eq!(session.context(), &TrackContext::Library);
    assert!(session.status_line().starts_with("[playing] Gamma - Carol"));
}

#[tokio::test]
async fn test_open_with_unknown_start_fails() {
    let result = Session::open(
        store(),
        TrackContext::Library,
        Some(&TrackId::new("zzz")),
        config(),
    )
    .await;

    assert!(matches!(result, Err(PlayerError::TrackNotFound(_))));
}

#[tokio::test]
async fn test_playlist_context_with_start() {
    let session = Session::open(
        store(),
        TrackContext::Playlist {
            id: "mix".to_string(),
        },
        Some(&TrackId::new("a")),
        config(),
    )
    .await
    .unwrap();

    assert_eq!(active(&session), Some("a".to_string()));
    let upcoming: Vec<&str> = session
        .manager()
        .up_next(10)
        .iter()
        .map(|track| track.id.as_str())
        .collect();
    assert!(upcoming.is_empty());
}

#[tokio::test]
async fn test_run_handles_commands_until_quit() {
    let mut session = Session::open(store(), TrackContext::Library, None, config())
        .await
        .unwrap();

    let input = Cursor::new(b"next\nstatus\ndance\n\nquit\nnext\n".to_vec());
    let mut out = Vec::new();
    session.run(input, &mut out).await.unwrap();

    let out = text(&out);
    assert!(out.contains("Playing from library"));
    assert!(out.contains("Now playing: Gamma - Carol"));
    assert!(out.contains("Now playing: Beta - Bob"));
    assert!(out.contains("[playing] Beta - Bob"));
    assert!(out.contains("Invalid command: dance"));
    // Nothing after quit is read
    assert_eq!(active(&session), Some("b".to_string()));
}

#[tokio::test]
async fn test_run_stops_at_end_of_input() {
    let mut session = Session::open(store(), TrackContext::Library, None, config())
        .await
        .unwrap();

    let mut out = Vec::new();
    session
        .run(Cursor::new(b"prev\n".to_vec()), &mut out)
        .await
        .unwrap();

    // Sequential previous wraps to the tail of the queue
    assert_eq!(active(&session), Some("a".to_string()));
}

#[tokio::test]
async fn test_finished_track_advances_and_counts() {
    let store = store();
    let mut session = Session::open(Arc::clone(&store), TrackContext::Library, None, config())
        .await
        .unwrap();
    let mut out = Vec::new();

    for _ in 0..TICKS_PER_TRACK {
        session.tick(&mut out).unwrap();
    }
    assert_eq!(active(&session), Some("b".to_string()));
    assert_eq!(session.in_flight(), 1);

    session.finish(&mut out).await.unwrap();
    assert_eq!(session.in_flight(), 0);

    let gamma = store.get_track(&TrackId::new("c")).await.unwrap().unwrap();
    assert_eq!(gamma.play_count, 1);
    assert!(text(&out).contains("Now playing: Beta - Bob"));
}

#[tokio::test]
async fn test_early_skip_is_not_counted() {
    let store = store();
    let mut session = Session::open(Arc::clone(&store), TrackContext::Library, None, config())
        .await
        .unwrap();
    let mut out = Vec::new();

    session.tick(&mut out).unwrap();
    session.handle(Command::Next, &mut out).unwrap();

    assert_eq!(session.in_flight(), 0);
    let gamma = store.get_track(&TrackId::new("c")).await.unwrap().unwrap();
    assert_eq!(gamma.play_count, 0);
}

#[tokio::test]
async fn test_loop_replays_same_track() {
    let mut session = Session::open(store(), TrackContext::Library, None, config())
        .await
        .unwrap();
    let mut out = Vec::new();

    session.handle(Command::Loop, &mut out).unwrap();
    for _ in 0..TICKS_PER_TRACK {
        session.tick(&mut out).unwrap();
    }

    assert_eq!(active(&session), Some("c".to_string()));
    assert_eq!(session.manager().progress().elapsed(), 0.0);
    let out = text(&out);
    assert!(out.contains("loop"));
    assert!(out.contains("Replaying: Gamma - Carol"));
}

#[tokio::test]
async fn test_failed_update_rolls_back_and_notifies() {
    let offline = Arc::new(OfflineStore { inner: store() });
    let mut session = Session::open(offline, TrackContext::Library, None, config())
        .await
        .unwrap();
    let mut out = Vec::new();

    session.handle(Command::Seek(0.9), &mut out).unwrap();
    session.handle(Command::Next, &mut out).unwrap();
    assert_eq!(session.in_flight(), 1);

    session.finish(&mut out).await.unwrap();

    let gamma = session
        .manager()
        .catalog()
        .get(&TrackId::new("c"))
        .unwrap();
    assert_eq!(gamma.play_count, 0);
    let out = text(&out);
    assert!(out.contains("! Could not update play count"));
    assert!(out.contains("backend offline"));
}

#[tokio::test]
async fn test_seek_reports_position() {
    let mut session = Session::open(store(), TrackContext::Library, None, config())
        .await
        .unwrap();
    let mut out = Vec::new();

    session.handle(Command::Seek(0.5), &mut out).unwrap();
    assert!(text(&out).contains("00:01 / 00:03"));
    assert_eq!(session.manager().progress().elapsed(), 1.5);
}

#[tokio::test]
async fn test_speed_shortens_tick_interval() {
    let mut session = Session::open(store(), TrackContext::Library, None, config())
        .await
        .unwrap();
    let mut out = Vec::new();

    session.handle(Command::Speed(Some(2.0)), &mut out).unwrap();
    assert_eq!(session.manager().tick_interval(), Duration::from_millis(250));

    session.handle(Command::Speed(Some(-1.0)), &mut out).unwrap();
    assert!(text(&out).contains("! Invalid playback speed"));
    assert_eq!(session.manager().tick_interval(), Duration::from_millis(250));
}

#[tokio::test]
async fn test_empty_context_has_nothing_to_play() {
    let mut session = Session::open(
        store(),
        TrackContext::Search {
            title: "nothing like this".to_string(),
        },
        None,
        config(),
    )
    .await
    .unwrap();
    let mut out = Vec::new();

    assert_eq!(session.status_line(), "Nothing playing");
    assert_eq!(session.handle(Command::Play, &mut out).unwrap(), Flow::Continue);
    assert!(text(&out).contains("! No track loaded"));
}

#[tokio::test]
async fn test_goto_and_queue_listing() {
    let mut session = Session::open(store(), TrackContext::Library, None, config())
        .await
        .unwrap();
    let mut out = Vec::new();

    session
        .handle(Command::Goto(TrackId::new("b")), &mut out)
        .unwrap();
    session.handle(Command::Queue, &mut out).unwrap();

    let out = text(&out);
    assert!(out.contains("Now playing: Beta - Bob"));
    assert!(out.contains("  1. Alpha - Alice (0 plays)  00:03"));
}

#[tokio::test]
async fn test_status_shows_time_heard_apart_from_seeks() {
    let mut session = Session::open(store(), TrackContext::Library, None, config())
        .await
        .unwrap();
    let mut out = Vec::new();

    session.tick(&mut out).unwrap();
    session.tick(&mut out).unwrap();
    session.handle(Command::Seek(0.1), &mut out).unwrap();

    // Two ticks heard 1.1s; the seek moved the position back to 0.3s
    assert!((session.manager().progress().listened() - 1.1).abs() < 1e-9);
    assert!(session.status_line().contains("00:00 / 00:03 (heard 00:01)"));
}
