//! Configuration management for promptlist.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory. Resolution order:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf};

use crate::error::ConfigError;

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";
pub const DEFAULT_SCOPE: &str = "playlist-modify-public playlist-modify-private user-read-playback-state user-modify-playback-state streaming";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_DEEPSEEK_API_URL: &str = "https://api.deepseek.com/v1/chat/completions";
pub const DEFAULT_PREVIEW_PLAYER: &str = "mpv --no-video";

/// Which text generation provider turns prompts into suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorBackend {
    Gemini,
    DeepSeek,
}

/// Returns the application's directory inside the local data directory.
///
/// - Linux: `~/.local/share/promptlist`
/// - macOS: `~/Library/Application Support/promptlist`
/// - Windows: `%LOCALAPPDATA%/promptlist`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("promptlist");
    path
}

/// Loads environment variables from `promptlist/.env` in the local data directory.
///
/// Creates the directory if needed. A missing `.env` file is fine, the process
/// environment alone may carry the configuration. Variables already present in
/// the environment are never overwritten.
///
/// # Errors
///
/// Returns an error string if the directory cannot be created or the `.env`
/// file exists but cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn var_or(name: &str, default: &str) -> String {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => default.to_string(),
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name.to_string())),
    }
}

/// Address the local OAuth callback server binds to (`SERVER_ADDRESS`).
pub fn server_addr() -> String {
    var_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)
}

/// Client id of the registered Spotify application (`SPOTIFY_API_AUTH_CLIENT_ID`).
pub fn spotify_client_id() -> Result<String, ConfigError> {
    required("SPOTIFY_API_AUTH_CLIENT_ID")
}

/// Redirect URI registered with Spotify (`SPOTIFY_API_REDIRECT_URI`).
///
/// Its path must be `/callback` on [`server_addr`] for the callback server to
/// receive the token fragment.
pub fn spotify_redirect_uri() -> String {
    var_or("SPOTIFY_API_REDIRECT_URI", DEFAULT_REDIRECT_URI)
}

/// Space separated capability scopes requested at login (`SPOTIFY_API_AUTH_SCOPE`).
pub fn spotify_scope() -> String {
    var_or("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE)
}

/// Spotify accounts authorize endpoint (`SPOTIFY_API_AUTH_URL`).
pub fn spotify_apiauth_url() -> String {
    var_or("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL)
}

/// Spotify Web API base URL (`SPOTIFY_API_URL`).
pub fn spotify_apiurl() -> String {
    var_or("SPOTIFY_API_URL", DEFAULT_API_URL)
}

pub fn generator_backend() -> Result<GeneratorBackend, ConfigError> {
    let value = var_or("PLAYLIST_GENERATOR", "gemini");
    match value.trim().to_ascii_lowercase().as_str() {
        "gemini" => Ok(GeneratorBackend::Gemini),
        "deepseek" => Ok(GeneratorBackend::DeepSeek),
        _ => Err(ConfigError::Invalid("PLAYLIST_GENERATOR".to_string(), value)),
    }
}

pub fn gemini_api_key() -> Result<String, ConfigError> {
    required("GEMINI_API_KEY")
}

pub fn gemini_model() -> String {
    var_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL)
}

pub fn gemini_api_url() -> String {
    var_or("GEMINI_API_URL", DEFAULT_GEMINI_API_URL)
}

pub fn deepseek_api_key() -> Result<String, ConfigError> {
    required("DEEPSEEK_API_KEY")
}

pub fn deepseek_api_url() -> String {
    var_or("DEEPSEEK_API_URL", DEFAULT_DEEPSEEK_API_URL)
}

/// Number of concurrent track searches during enrichment (`RESOLVE_CONCURRENCY`).
///
/// Defaults to 1, which keeps the searches strictly sequential.
pub fn resolve_concurrency() -> Result<usize, ConfigError> {
    let value = var_or("RESOLVE_CONCURRENCY", "1");
    value
        .trim()
        .parse::<usize>()
        .map(|n| n.max(1))
        .map_err(|_| ConfigError::Invalid("RESOLVE_CONCURRENCY".to_string(), value))
}

/// Command line used to play preview clips (`PREVIEW_PLAYER`).
pub fn preview_player() -> String {
    var_or("PREVIEW_PLAYER", DEFAULT_PREVIEW_PLAYER)
}
