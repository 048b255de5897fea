use std::{
    process::{Child, Command, Stdio},
    time::Duration,
};

use tokio::sync::mpsc::Receiver;

use crate::{error::PlayerError, spotify::client::SpotifyApi, types::ResolvedSong};

/// Something that can start playing an audio URL.
pub trait AudioBackend {
    type Handle: AudioHandle;

    fn start(&mut self, url: &str) -> Result<Self::Handle, PlayerError>;
}

/// A running clip.
pub trait AudioHandle {
    fn stop(&mut self);

    /// True once the clip played to its end on its own.
    fn is_finished(&mut self) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewState {
    Playing(String),
    Stopped,
}

/// Plays preview clips, at most one at a time.
///
/// Toggling the song that is playing stops it. Toggling another song stops
/// the current clip first. There is no queue.
pub struct PreviewPlayer<B: AudioBackend> {
    backend: B,
    active: Option<(String, B::Handle)>,
}

impl<B: AudioBackend> PreviewPlayer<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            active: None,
        }
    }

    pub fn toggle(&mut self, song: &ResolvedSong) -> Result<PreviewState, PlayerError> {
        if self.current() == Some(song.id.as_str()) {
            self.stop();
            return Ok(PreviewState::Stopped);
        }

        let url = song
            .preview_url
            .as_deref()
            .ok_or_else(|| PlayerError::NoPreview(song.name.clone()))?;

        self.stop();
        let handle = self.backend.start(url)?;
        self.active = Some((song.id.clone(), handle));
        Ok(PreviewState::Playing(song.id.clone()))
    }

    pub fn stop(&mut self) {
        if let Some((_, mut handle)) = self.active.take() {
            handle.stop();
        }
    }

    /// Id of the song currently playing. A clip that ended on its own is released.
    pub fn current(&mut self) -> Option<&str> {
        if let Some((_, handle)) = self.active.as_mut() {
            if handle.is_finished() {
                self.active = None;
            }
        }
        self.active.as_ref().map(|(id, _)| id.as_str())
    }
}

impl<B: AudioBackend> Drop for PreviewPlayer<B> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Plays clips by spawning an external player, e.g. `mpv --no-video <url>`.
pub struct ProcessAudio {
    program: String,
    args: Vec<String>,
}

impl ProcessAudio {
    /// Parses a whitespace separated command line; the clip URL is appended.
    pub fn new(command: &str) -> Result<Self, PlayerError> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| PlayerError::Spawn("empty player command".to_string()))?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }
}

impl AudioBackend for ProcessAudio {
    type Handle = ProcessHandle;

    fn start(&mut self, url: &str) -> Result<ProcessHandle, PlayerError> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| PlayerError::Spawn(format!("{}: {}", self.program, e)))?;
        Ok(ProcessHandle { child })
    }
}

pub struct ProcessHandle {
    child: Child,
}

impl AudioHandle for ProcessHandle {
    fn stop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }

    fn is_finished(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(Some(_)))
    }
}

/// Notifications from the full-track playback device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    Ready { device_id: String },
    StateChanged { paused: bool },
}

/// Full-track playback on a Spotify Connect device.
///
/// State only changes through [`PlayerEvent`]s, which arrive on a channel fed
/// by [`crate::spotify::player::spawn_device_watcher`].
#[derive(Debug)]
pub struct RemotePlayer {
    device_id: Option<String>,
    paused: bool,
    active: bool,
}

impl RemotePlayer {
    pub fn new() -> Self {
        Self {
            device_id: None,
            paused: true,
            active: false,
        }
    }

    pub fn apply(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::Ready { device_id } => self.device_id = Some(device_id),
            PlayerEvent::StateChanged { paused } => {
                self.paused = paused;
                self.active = true;
            }
        }
    }

    /// Applies events until a device is ready, or gives up after `timeout`.
    pub async fn wait_ready(
        &mut self,
        events: &mut Receiver<PlayerEvent>,
        timeout: Duration,
    ) -> Result<String, PlayerError> {
        let deadline = tokio::time::Instant::now() + timeout;

        while self.device_id.is_none() {
            match tokio::time::timeout_at(deadline, events.recv()).await {
                Ok(Some(event)) => self.apply(event),
                Ok(None) | Err(_) => return Err(PlayerError::NoDevice),
            }
        }

        self.device_id.clone().ok_or(PlayerError::NoDevice)
    }

    /// Applies events until the device reports unpaused playback. Returns
    /// `false` if that does not happen within `timeout`.
    pub async fn wait_playing(
        &mut self,
        events: &mut Receiver<PlayerEvent>,
        timeout: Duration,
    ) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;

        while !(self.active && !self.paused) {
            match tokio::time::timeout_at(deadline, events.recv()).await {
                Ok(Some(event)) => self.apply(event),
                Ok(None) | Err(_) => return false,
            }
        }
        true
    }

    /// Starts `uri` on the ready device.
    pub async fn play<A: SpotifyApi>(
        &self,
        api: &A,
        token: &str,
        uri: &str,
    ) -> Result<(), PlayerError> {
        let device_id = self.device_id.as_deref().ok_or(PlayerError::NoDevice)?;
        api.start_playback(token, device_id, &[uri.to_string()]).await?;
        Ok(())
    }

    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Default for RemotePlayer {
    fn default() -> Self {
        Self::new()
    }
}
