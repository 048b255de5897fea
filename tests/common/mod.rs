#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::Router;
use promptlist::{
    error::{GenerationError, SpotifyError},
    generator::TextGenerator,
    spotify::client::SpotifyApi,
    types::{
        AddTrackToPlaylistResponse, CreatePlaylistRequest, CreatePlaylistResponse, Device,
        ExternalUrls, Image, PlaybackState, SearchTrack, TrackAlbum, TrackArtist, User,
    },
};

pub const TOKEN: &str = "good-token";

/// Serves `app` on an ephemeral loopback port and returns its base URL.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

pub fn song(n: usize) -> String {
    format!("Song {n} - Artist {n}")
}

pub fn songs(count: usize) -> Vec<String> {
    (1..=count).map(song).collect()
}

pub fn track(n: usize) -> SearchTrack {
    SearchTrack {
        id: format!("id-{n}"),
        name: format!("Song {n}"),
        uri: format!("spotify:track:id-{n}"),
        preview_url: Some(format!("https://p.scdn.co/mp3-preview/{n}")),
        artists: vec![
            TrackArtist {
                name: format!("Artist {n}"),
            },
            TrackArtist {
                name: "Featured".to_string(),
            },
        ],
        album: TrackAlbum {
            images: vec![
                Image {
                    url: format!("https://i.scdn.co/image/{n}-640"),
                },
                Image {
                    url: format!("https://i.scdn.co/image/{n}-300"),
                },
            ],
        },
    }
}

pub fn suggestion_json(name: &str, songs: &[String]) -> String {
    serde_json::json!({ "name": name, "songs": songs }).to_string()
}

/// In-memory Spotify that knows the tracks "Song N - Artist N" for N in 1..=catalog_size.
pub struct FakeSpotify {
    pub catalog: HashMap<String, SearchTrack>,
    pub fail_at: Option<&'static str>,
    pub search_delay: Option<Duration>,
    pub searches: Mutex<Vec<String>>,
    pub completed_searches: Mutex<Vec<String>>,
    pub created: Mutex<Vec<(String, CreatePlaylistRequest)>>,
    pub added: Mutex<Vec<(String, Vec<String>)>>,
    pub playback: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakeSpotify {
    pub fn with_catalog(catalog_size: usize) -> Self {
        Self {
            catalog: (1..=catalog_size).map(|n| (song(n), track(n))).collect(),
            fail_at: None,
            search_delay: None,
            searches: Mutex::new(Vec::new()),
            completed_searches: Mutex::new(Vec::new()),
            created: Mutex::new(Vec::new()),
            added: Mutex::new(Vec::new()),
            playback: Mutex::new(Vec::new()),
        }
    }

    /// Makes "Song N" searches take `(catalog_size + 1 - N) * step`, so later
    /// songs answer first.
    pub fn with_descending_latency(mut self, step: Duration) -> Self {
        self.search_delay = Some(step);
        self
    }

    fn latency(&self, query: &str) -> Option<Duration> {
        let step = self.search_delay?;
        let n: u32 = query
            .strip_prefix("Song ")?
            .split(' ')
            .next()?
            .parse()
            .ok()?;
        let rank = (self.catalog.len() as u32 + 1).saturating_sub(n);
        Some(step * rank)
    }

    pub fn failing_at(mut self, step: &'static str) -> Self {
        self.fail_at = Some(step);
        self
    }

    fn check(&self, token: &str, step: &str) -> Result<(), SpotifyError> {
        if token != TOKEN {
            return Err(SpotifyError::Unauthorized);
        }
        if self.fail_at == Some(step) {
            return Err(SpotifyError::Api {
                status: 500,
                message: format!("{step} failed"),
            });
        }
        Ok(())
    }
}

impl SpotifyApi for FakeSpotify {
    async fn current_user(&self, token: &str) -> Result<User, SpotifyError> {
        self.check(token, "me")?;
        Ok(User {
            id: "user-1".to_string(),
            display_name: Some("Test User".to_string()),
        })
    }

    async fn search_tracks(
        &self,
        token: &str,
        query: &str,
        _limit: u32,
    ) -> Result<Vec<SearchTrack>, SpotifyError> {
        self.check(token, "search")?;
        self.searches.lock().unwrap().push(query.to_string());
        if let Some(delay) = self.latency(query) {
            tokio::time::sleep(delay).await;
        }
        self.completed_searches
            .lock()
            .unwrap()
            .push(query.to_string());
        Ok(self.catalog.get(query).cloned().into_iter().collect())
    }

    async fn create_playlist(
        &self,
        token: &str,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<CreatePlaylistResponse, SpotifyError> {
        self.check(token, "create")?;
        self.created
            .lock()
            .unwrap()
            .push((user_id.to_string(), request.clone()));
        Ok(CreatePlaylistResponse {
            id: "pl-1".to_string(),
            name: request.name.clone(),
            external_urls: ExternalUrls {
                spotify: "https://open.spotify.com/playlist/pl-1".to_string(),
            },
        })
    }

    async fn add_tracks(
        &self,
        token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<AddTrackToPlaylistResponse, SpotifyError> {
        self.check(token, "add")?;
        self.added
            .lock()
            .unwrap()
            .push((playlist_id.to_string(), uris.to_vec()));
        Ok(AddTrackToPlaylistResponse {
            snapshot_id: "snap-1".to_string(),
        })
    }

    async fn playback_state(&self, token: &str) -> Result<Option<PlaybackState>, SpotifyError> {
        self.check(token, "player")?;
        Ok(Some(PlaybackState {
            device: Some(Device {
                id: Some("device-1".to_string()),
                name: "Laptop".to_string(),
                is_active: true,
            }),
            is_playing: false,
        }))
    }

    async fn start_playback(
        &self,
        token: &str,
        device_id: &str,
        uris: &[String],
    ) -> Result<(), SpotifyError> {
        self.check(token, "play")?;
        self.playback
            .lock()
            .unwrap()
            .push((device_id.to_string(), uris.to_vec()));
        Ok(())
    }
}

pub enum Reply {
    Text(String),
    Blocked,
    Network,
}

/// Text generator that answers every instruction with a canned reply.
pub struct FakeGenerator {
    pub reply: Reply,
    pub calls: AtomicUsize,
    pub last_instruction: Mutex<Option<String>>,
}

impl FakeGenerator {
    pub fn answering(text: impl Into<String>) -> Self {
        Self::new(Reply::Text(text.into()))
    }

    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_instruction: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TextGenerator for FakeGenerator {
    async fn generate(&self, instruction: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_instruction.lock().unwrap() = Some(instruction.to_string());
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Blocked => Err(GenerationError::Blocked("SAFETY".to_string())),
            Reply::Network => Err(GenerationError::Network("connection refused".to_string())),
        }
    }
}

impl TextGenerator for &FakeGenerator {
    async fn generate(&self, instruction: &str) -> Result<String, GenerationError> {
        (**self).generate(instruction).await
    }
}
