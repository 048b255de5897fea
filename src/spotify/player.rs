use std::time::Duration;

use tokio::{sync::mpsc::Sender, task::JoinHandle};

use crate::{
    error::SpotifyError, management::PlayerEvent, spotify::client::SpotifyClient, warning,
};

/// Polls `GET /me/player` and reports device and pause changes as events.
///
/// Sends `Ready` whenever the reported device changes and `StateChanged` on
/// every pause/play flip. The task ends when the receiver is dropped or the
/// token is rejected.
pub fn spawn_device_watcher(
    client: SpotifyClient,
    token: String,
    events: Sender<PlayerEvent>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut device: Option<String> = None;
        let mut paused: Option<bool> = None;

        loop {
            match client.get_playback_state(&token).await {
                Ok(Some(state)) => {
                    if let Some(device_id) = state.device.and_then(|d| d.id) {
                        if device.as_deref() != Some(device_id.as_str()) {
                            device = Some(device_id.clone());
                            if events.send(PlayerEvent::Ready { device_id }).await.is_err() {
                                return;
                            }
                        }
                    }

                    let now_paused = !state.is_playing;
                    if paused != Some(now_paused) {
                        paused = Some(now_paused);
                        let event = PlayerEvent::StateChanged { paused: now_paused };
                        if events.send(event).await.is_err() {
                            return;
                        }
                    }
                }
                Ok(None) => {}
                Err(SpotifyError::Unauthorized) => return,
                Err(e) => warning!("Cannot read playback state: {}", e),
            }

            if events.is_closed() {
                return;
            }
            tokio::time::sleep(interval).await;
        }
    })
}
