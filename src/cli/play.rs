use std::time::Duration;

use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};

use crate::{
    cli::auth::require_token,
    config, error,
    error::{PlayerError, SpotifyError},
    info,
    management::{FileSessionStore, PreviewPlayer, PreviewState, ProcessAudio, RemotePlayer},
    spotify::{self, client::SpotifyClient},
    success,
    types::ResolvedSong,
    warning,
};

const DEVICE_POLL_INTERVAL: Duration = Duration::from_secs(2);
const DEVICE_TIMEOUT: Duration = Duration::from_secs(10);

/// Plays the 30 second preview clip of the top hit for `query`.
pub async fn preview(query: String) {
    let (_, song) = lookup(&query).await;

    let audio = match ProcessAudio::new(&config::preview_player()) {
        Ok(audio) => audio,
        Err(e) => error!("{}", e),
    };
    let mut player = PreviewPlayer::new(audio);

    match player.toggle(&song) {
        Ok(PreviewState::Playing(_)) => {
            info!(
                "Playing preview of {} - {}. Press Enter to stop.",
                song.name, song.artist
            )
        }
        Ok(PreviewState::Stopped) => return,
        Err(e) => error!("{}", e),
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(Duration::from_millis(500));
    loop {
        tokio::select! {
            _ = lines.next_line() => break,
            _ = ticker.tick() => {
                if player.current().is_none() {
                    break;
                }
            }
        }
    }
    player.stop();
}

/// Starts full playback of the top hit for `query` on the user's active device.
pub async fn play(query: String) {
    let (token, song) = lookup(&query).await;
    let client = SpotifyClient::from_env();
    play_on_device(&client, &token, &song).await;
}

/// Plays `song` on the first device the watcher reports and tells the user
/// whether the device actually started.
pub(crate) async fn play_on_device(client: &SpotifyClient, token: &str, song: &ResolvedSong) {
    let (tx, mut rx) = mpsc::channel(16);
    let watcher = spotify::player::spawn_device_watcher(
        client.clone(),
        token.to_string(),
        tx,
        DEVICE_POLL_INTERVAL,
    );

    let mut player = RemotePlayer::new();
    let result = match player.wait_ready(&mut rx, DEVICE_TIMEOUT).await {
        Ok(_) => player.play(client, token, &song.uri).await,
        Err(e) => Err(e),
    };
    let playing = match result {
        Ok(()) => player.wait_playing(&mut rx, DEVICE_TIMEOUT).await,
        Err(_) => false,
    };
    watcher.abort();

    let device = player.device_id().unwrap_or_default();
    match result {
        Ok(()) if playing => success!(
            "Playing {} - {} on device {}",
            song.name,
            song.artist,
            device
        ),
        Ok(()) if player.is_active() && player.is_paused() => warning!(
            "Device {} accepted {} - {} but stayed paused",
            device,
            song.name,
            song.artist
        ),
        Ok(()) => info!(
            "Requested {} - {} on device {}",
            song.name,
            song.artist,
            device
        ),
        Err(PlayerError::NoDevice) => {
            warning!("No active Spotify device. Open Spotify on one of your devices and try again.")
        }
        Err(PlayerError::Spotify(SpotifyError::Unauthorized)) => {
            error!("Your Spotify session expired. Run `promptlist auth` to log in again.")
        }
        Err(e) => warning!("{}", e),
    }
}

async fn lookup(query: &str) -> (String, ResolvedSong) {
    let store = FileSessionStore::default();
    let token = require_token(&store).await;
    let client = SpotifyClient::from_env();

    match spotify::search::resolve_track(&client, &token, query).await {
        Ok(Some(song)) => (token, song),
        Ok(None) => error!("No track found for \"{}\"", query),
        Err(SpotifyError::Unauthorized) => {
            error!("Your Spotify session expired. Run `promptlist auth` to log in again.")
        }
        Err(e) => error!("Search failed: {}", e),
    }
}
