mod common;

use std::{cell::RefCell, rc::Rc, time::Duration};

use tokio::sync::mpsc;

use common::{FakeSpotify, TOKEN};
use promptlist::{
    error::{PlayerError, SpotifyError},
    management::{
        AudioBackend, AudioHandle, PlayerEvent, PreviewPlayer, PreviewState, ProcessAudio,
        RemotePlayer,
    },
    types::ResolvedSong,
};

#[derive(Default)]
struct Log {
    started: Vec<String>,
    stopped: Vec<String>,
    finished: Vec<String>,
}

#[derive(Clone, Default)]
struct FakeAudio {
    log: Rc<RefCell<Log>>,
}

struct FakeHandle {
    url: String,
    log: Rc<RefCell<Log>>,
}

impl AudioBackend for FakeAudio {
    type Handle = FakeHandle;

    fn start(&mut self, url: &str) -> Result<FakeHandle, PlayerError> {
        self.log.borrow_mut().started.push(url.to_string());
        Ok(FakeHandle {
            url: url.to_string(),
            log: Rc::clone(&self.log),
        })
    }
}

impl AudioHandle for FakeHandle {
    fn stop(&mut self) {
        self.log.borrow_mut().stopped.push(self.url.clone());
    }

    fn is_finished(&mut self) -> bool {
        self.log.borrow().finished.contains(&self.url)
    }
}

// Helper function to create a song with or without a preview clip
fn create_test_song(id: &str, preview: bool) -> ResolvedSong {
    ResolvedSong {
        id: id.to_string(),
        name: format!("Song {}", id),
        artist: "Artist".to_string(),
        preview_url: preview.then(|| format!("https://p.scdn.co/{}", id)),
        image_url: None,
        uri: format!("spotify:track:{}", id),
        query: format!("Song {} - Artist", id),
    }
}

#[test]
fn test_toggle_starts_and_stops() {
    let audio = FakeAudio::default();
    let mut player = PreviewPlayer::new(audio.clone());
    let a = create_test_song("a", true);

    assert_eq!(player.toggle(&a).unwrap(), PreviewState::Playing("a".to_string()));
    assert_eq!(player.current(), Some("a"));

    assert_eq!(player.toggle(&a).unwrap(), PreviewState::Stopped);
    assert_eq!(player.current(), None);

    let log = audio.log.borrow();
    assert_eq!(log.started, vec!["https://p.scdn.co/a"]);
    assert_eq!(log.stopped, vec!["https://p.scdn.co/a"]);
}

#[test]
fn test_toggle_other_song_switches() {
    let audio = FakeAudio::default();
    let mut player = PreviewPlayer::new(audio.clone());

    player.toggle(&create_test_song("a", true)).unwrap();
    let state = player.toggle(&create_test_song("b", true)).unwrap();

    assert_eq!(state, PreviewState::Playing("b".to_string()));
    assert_eq!(player.current(), Some("b"));

    // At most one clip plays: a was stopped before b started
    let log = audio.log.borrow();
    assert_eq!(log.started, vec!["https://p.scdn.co/a", "https://p.scdn.co/b"]);
    assert_eq!(log.stopped, vec!["https://p.scdn.co/a"]);
}

#[test]
fn test_toggle_without_preview() {
    let audio = FakeAudio::default();
    let mut player = PreviewPlayer::new(audio.clone());
    player.toggle(&create_test_song("a", true)).unwrap();

    let result = player.toggle(&create_test_song("b", false));

    assert!(matches!(result, Err(PlayerError::NoPreview(_))));
    // The current clip keeps playing
    assert_eq!(player.current(), Some("a"));
    assert!(audio.log.borrow().stopped.is_empty());
}

#[test]
fn test_finished_clip_is_released() {
    let audio = FakeAudio::default();
    let mut player = PreviewPlayer::new(audio.clone());
    let a = create_test_song("a", true);
    player.toggle(&a).unwrap();

    audio
        .log
        .borrow_mut()
        .finished
        .push("https://p.scdn.co/a".to_string());

    assert_eq!(player.current(), None);

    // Toggling again starts the clip anew instead of stopping it
    assert_eq!(player.toggle(&a).unwrap(), PreviewState::Playing("a".to_string()));
    assert_eq!(audio.log.borrow().started.len(), 2);
}

#[test]
fn test_drop_stops_clip() {
    let audio = FakeAudio::default();
    {
        let mut player = PreviewPlayer::new(audio.clone());
        player.toggle(&create_test_song("a", true)).unwrap();
    }

    assert_eq!(audio.log.borrow().stopped, vec!["https://p.scdn.co/a"]);
}

#[test]
fn test_process_audio_empty_command() {
    assert!(matches!(ProcessAudio::new("   "), Err(PlayerError::Spawn(_))));
    assert!(ProcessAudio::new("mpv --no-video").is_ok());
}

#[test]
fn test_process_audio_missing_binary() {
    let mut audio = ProcessAudio::new("promptlist-no-such-player --quiet").unwrap();

    let result = audio.start("https://p.scdn.co/a");
    assert!(matches!(result, Err(PlayerError::Spawn(_))));
}

#[test]
fn test_remote_player_applies_events() {
    let mut player = RemotePlayer::new();
    assert_eq!(player.device_id(), None);
    assert!(player.is_paused());
    assert!(!player.is_active());

    player.apply(PlayerEvent::Ready {
        device_id: "device-1".to_string(),
    });
    assert_eq!(player.device_id(), Some("device-1"));

    player.apply(PlayerEvent::StateChanged { paused: false });
    assert!(!player.is_paused());
    assert!(player.is_active());

    player.apply(PlayerEvent::StateChanged { paused: true });
    assert!(player.is_paused());
}

#[tokio::test]
async fn test_remote_player_wait_ready() {
    let (tx, mut rx) = mpsc::channel(4);
    tx.send(PlayerEvent::StateChanged { paused: true }).await.unwrap();
    tx.send(PlayerEvent::Ready {
        device_id: "device-1".to_string(),
    })
    .await
    .unwrap();

    let mut player = RemotePlayer::default();
    let device_id = player
        .wait_ready(&mut rx, Duration::from_secs(1))
        .await
        .unwrap();

    assert_eq!(device_id, "device-1");
    assert!(player.is_active());
}

#[tokio::test]
async fn test_remote_player_times_out() {
    let (_tx, mut rx) = mpsc::channel::<PlayerEvent>(4);
    let mut player = RemotePlayer::new();

    let result = player.wait_ready(&mut rx, Duration::from_millis(50)).await;
    assert!(matches!(result, Err(PlayerError::NoDevice)));
}

#[tokio::test]
async fn test_remote_player_closed_channel() {
    let (tx, mut rx) = mpsc::channel::<PlayerEvent>(4);
    drop(tx);
    let mut player = RemotePlayer::new();

    let result = player.wait_ready(&mut rx, Duration::from_secs(1)).await;
    assert!(matches!(result, Err(PlayerError::NoDevice)));
}

#[tokio::test]
async fn test_remote_player_play() {
    let spotify = FakeSpotify::with_catalog(0);
    let mut player = RemotePlayer::new();

    // No device yet
    let result = player.play(&spotify, TOKEN, "spotify:track:a").await;
    assert!(matches!(result, Err(PlayerError::NoDevice)));

    player.apply(PlayerEvent::Ready {
        device_id: "device-1".to_string(),
    });
    player.play(&spotify, TOKEN, "spotify:track:a").await.unwrap();

    let playback = spotify.playback.lock().unwrap().clone();
    assert_eq!(
        playback,
        vec![("device-1".to_string(), vec!["spotify:track:a".to_string()])]
    );

    let result = player.play(&spotify, "expired", "spotify:track:a").await;
    assert!(matches!(
        result,
        Err(PlayerError::Spotify(SpotifyError::Unauthorized))
    ));
}

#[tokio::test]
async fn test_remote_player_wait_playing() {
    let (tx, mut rx) = mpsc::channel(8);
    let mut player = RemotePlayer::new();

    tx.send(PlayerEvent::Ready {
        device_id: "device-1".to_string(),
    })
    .await
    .unwrap();
    tx.send(PlayerEvent::StateChanged { paused: true }).await.unwrap();
    tx.send(PlayerEvent::StateChanged { paused: false }).await.unwrap();

    assert!(player.wait_playing(&mut rx, Duration::from_secs(1)).await);
    assert!(player.is_active());
    assert!(!player.is_paused());
}

#[tokio::test]
async fn test_remote_player_stays_paused() {
    let (tx, mut rx) = mpsc::channel(8);
    let mut player = RemotePlayer::new();

    tx.send(PlayerEvent::StateChanged { paused: true }).await.unwrap();

    assert!(!player.wait_playing(&mut rx, Duration::from_millis(50)).await);
    assert!(player.is_active());
    assert!(player.is_paused());

    // A closed channel also ends the wait
    drop(tx);
    assert!(!player.wait_playing(&mut rx, Duration::from_secs(1)).await);
}
