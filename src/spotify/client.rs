use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    config,
    error::SpotifyError,
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse, PlaybackState, SearchResponse, SearchTrack, StartPlaybackRequest,
        User,
    },
};

/// The slice of the Spotify Web API this application consumes.
///
/// Every call is authorized with the bearer token passed in; a rejected token
/// surfaces as [`SpotifyError::Unauthorized`].
#[allow(async_fn_in_trait)]
pub trait SpotifyApi {
    /// `GET /me`
    async fn current_user(&self, token: &str) -> Result<User, SpotifyError>;

    /// `GET /search?q=&type=track&limit=`
    async fn search_tracks(
        &self,
        token: &str,
        query: &str,
        limit: u32,
    ) -> Result<Vec<SearchTrack>, SpotifyError>;

    /// `POST /users/{user_id}/playlists`
    async fn create_playlist(
        &self,
        token: &str,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<CreatePlaylistResponse, SpotifyError>;

    /// `POST /playlists/{playlist_id}/tracks`
    async fn add_tracks(
        &self,
        token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<AddTrackToPlaylistResponse, SpotifyError>;

    /// `GET /me/player`, `None` when nothing is playing anywhere.
    async fn playback_state(&self, token: &str) -> Result<Option<PlaybackState>, SpotifyError>;

    /// `PUT /me/player/play?device_id=`
    async fn start_playback(
        &self,
        token: &str,
        device_id: &str,
        uris: &[String],
    ) -> Result<(), SpotifyError>;
}

/// reqwest based [`SpotifyApi`] implementation.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    client: Client,
    api_url: String,
}

impl SpotifyClient {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Client for the API base URL configured in `SPOTIFY_API_URL`.
    pub fn from_env() -> Self {
        Self::new(config::spotify_apiurl())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    async fn send(request: RequestBuilder, token: &str) -> Result<Response, SpotifyError> {
        let response = request.bearer_auth(token).send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(SpotifyError::Unauthorized);
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|json| {
                    json.get("error")
                        .and_then(|e| e.get("message"))
                        .and_then(|m| m.as_str())
                        .map(|m| m.to_string())
                })
                .unwrap_or(text);
            return Err(SpotifyError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        request: RequestBuilder,
        token: &str,
    ) -> Result<T, SpotifyError> {
        let response = Self::send(request, token).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| SpotifyError::Decode(e.to_string()))
    }

    pub async fn get_current_user(&self, token: &str) -> Result<User, SpotifyError> {
        Self::send_json(self.client.get(self.url("/me")), token).await
    }

    pub async fn get_search_tracks(
        &self,
        token: &str,
        query: &str,
        limit: u32,
    ) -> Result<Vec<SearchTrack>, SpotifyError> {
        let limit = limit.to_string();
        let request = self.client.get(self.url("/search")).query(&[
            ("q", query),
            ("type", "track"),
            ("limit", limit.as_str()),
        ]);

        let response: SearchResponse = Self::send_json(request, token).await?;
        Ok(response.tracks.items)
    }

    pub async fn post_playlist(
        &self,
        token: &str,
        user_id: &str,
        body: &CreatePlaylistRequest,
    ) -> Result<CreatePlaylistResponse, SpotifyError> {
        let request = self
            .client
            .post(self.url(&format!("/users/{}/playlists", user_id)))
            .json(body);
        Self::send_json(request, token).await
    }

    pub async fn post_tracks(
        &self,
        token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<AddTrackToPlaylistResponse, SpotifyError> {
        let request = self
            .client
            .post(self.url(&format!("/playlists/{}/tracks", playlist_id)))
            .json(&AddTrackToPlaylistRequest {
                uris: uris.to_vec(),
            });
        Self::send_json(request, token).await
    }

    pub async fn get_playback_state(
        &self,
        token: &str,
    ) -> Result<Option<PlaybackState>, SpotifyError> {
        let response = Self::send(self.client.get(self.url("/me/player")), token).await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        response
            .json::<PlaybackState>()
            .await
            .map(Some)
            .map_err(|e| SpotifyError::Decode(e.to_string()))
    }

    pub async fn put_play(
        &self,
        token: &str,
        device_id: &str,
        uris: &[String],
    ) -> Result<(), SpotifyError> {
        let request = self
            .client
            .put(self.url("/me/player/play"))
            .query(&[("device_id", device_id)])
            .json(&StartPlaybackRequest {
                uris: uris.to_vec(),
            });
        Self::send(request, token).await.map(|_| ())
    }
}

impl SpotifyApi for SpotifyClient {
    async fn current_user(&self, token: &str) -> Result<User, SpotifyError> {
        self.get_current_user(token).await
    }

    async fn search_tracks(
        &self,
        token: &str,
        query: &str,
        limit: u32,
    ) -> Result<Vec<SearchTrack>, SpotifyError> {
        self.get_search_tracks(token, query, limit).await
    }

    async fn create_playlist(
        &self,
        token: &str,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<CreatePlaylistResponse, SpotifyError> {
        self.post_playlist(token, user_id, request).await
    }

    async fn add_tracks(
        &self,
        token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<AddTrackToPlaylistResponse, SpotifyError> {
        self.post_tracks(token, playlist_id, uris).await
    }

    async fn playback_state(&self, token: &str) -> Result<Option<PlaybackState>, SpotifyError> {
        self.get_playback_state(token).await
    }

    async fn start_playback(
        &self,
        token: &str,
        device_id: &str,
        uris: &[String],
    ) -> Result<(), SpotifyError> {
        self.put_play(token, device_id, uris).await
    }
}
