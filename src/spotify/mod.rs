//! # Spotify Integration Module
//!
//! The integration layer between promptlist and the Spotify Web API: login,
//! track search, playlist creation and Connect playback.
//!
//! ## Architecture
//!
//! ```text
//! CLI / Session orchestrator
//!          ↓
//! Spotify Integration Layer
//!     ├── auth      (implicit grant login, token commit, logout)
//!     ├── search    (top-1 track resolution, enrichment)
//!     ├── playlist  (create + fill a playlist from a suggestion)
//!     └── player    (Connect device watcher)
//!          ↓
//! client::SpotifyApi  ←  SpotifyClient (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! Everything above `client` is generic over [`client::SpotifyApi`], so the
//! workflows run unchanged against test doubles.
//!
//! ## API Coverage
//!
//! - `GET /me` - current user id
//! - `GET /search?q=&type=track&limit=1` - track resolution
//! - `POST /users/{user_id}/playlists` - create a private playlist
//! - `POST /playlists/{playlist_id}/tracks` - append resolved URIs in one call
//! - `GET /me/player` - playback state for the device watcher
//! - `PUT /me/player/play?device_id=` - full-track playback
//!
//! ## Error Handling
//!
//! Calls are never retried. A 401 becomes [`crate::error::SpotifyError::Unauthorized`]
//! and callers turn it into an auth error that asks the user to log in again.
//! Token expiry is not tracked locally.

pub mod auth;
pub mod client;
pub mod player;
pub mod playlist;
pub mod search;
