//! Error taxonomy.
//!
//! Every provider-facing failure is converted into one of these enums at the
//! operation boundary. The CLI turns them into a single warning line through
//! [`SessionError::user_message`] and keeps the session alive.

use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    Missing(String),
    Invalid(String, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(var) => write!(f, "{} must be set", var),
            ConfigError::Invalid(var, value) => write!(f, "{} has an invalid value: {}", var, value),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Failure to read or write the persisted token.
#[derive(Debug)]
pub enum StoreError {
    IoError(std::io::Error),
    SerdeError(serde_json::Error),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::IoError(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::SerdeError(err)
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::IoError(e) => write!(f, "Token store I/O error: {}", e),
            StoreError::SerdeError(e) => write!(f, "Token store is corrupt: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

/// Failure of a single Spotify Web API call.
#[derive(Debug)]
pub enum SpotifyError {
    Network(String),
    Unauthorized,
    Api { status: u16, message: String },
    Decode(String),
}

impl fmt::Display for SpotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpotifyError::Network(msg) => write!(f, "Network error: {}", msg),
            SpotifyError::Unauthorized => write!(f, "Spotify rejected the access token"),
            SpotifyError::Api { status, message } => {
                write!(f, "Spotify API error: {} - {}", status, message)
            }
            SpotifyError::Decode(msg) => write!(f, "Unexpected Spotify response: {}", msg),
        }
    }
}

impl std::error::Error for SpotifyError {}

impl From<reqwest::Error> for SpotifyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SpotifyError::Decode(err.to_string())
        } else {
            SpotifyError::Network(err.to_string())
        }
    }
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    Unauthorized,
    Store(StoreError),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "Not logged in"),
            AuthError::Unauthorized => write!(f, "Access token is invalid or expired"),
            AuthError::Store(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        AuthError::Store(err)
    }
}

#[derive(Debug)]
pub enum GenerationError {
    EmptyPrompt,
    Network(String),
    /// The provider refused the prompt or the answer on content-safety grounds.
    Blocked(String),
    Malformed(String),
    InvalidSuggestion(String),
}

impl GenerationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            GenerationError::EmptyPrompt => "Please enter a prompt first.",
            GenerationError::Blocked(_) => {
                "Unable to generate playlist due to content restrictions. Please try a different prompt."
            }
            GenerationError::Malformed(_) | GenerationError::InvalidSuggestion(_) => {
                "The playlist generator returned an unreadable answer. Please try again."
            }
            GenerationError::Network(_) => "Failed to generate playlist. Please try again.",
        }
    }
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::EmptyPrompt => write!(f, "Prompt is empty"),
            GenerationError::Network(msg) => write!(f, "Generator request failed: {}", msg),
            GenerationError::Blocked(reason) => write!(f, "Generation blocked: {}", reason),
            GenerationError::Malformed(msg) => write!(f, "Generator returned invalid JSON: {}", msg),
            GenerationError::InvalidSuggestion(msg) => {
                write!(f, "Generator returned an unusable playlist: {}", msg)
            }
        }
    }
}

impl std::error::Error for GenerationError {}

/// Steps of playlist creation, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationStep {
    FetchUser,
    CreatePlaylist,
    SearchTracks,
    AddTracks,
}

impl fmt::Display for CreationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CreationStep::FetchUser => "fetch user profile",
            CreationStep::CreatePlaylist => "create playlist",
            CreationStep::SearchTracks => "search tracks",
            CreationStep::AddTracks => "add tracks",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug)]
pub enum PlaylistCreationError {
    Auth(AuthError),
    Step {
        step: CreationStep,
        source: SpotifyError,
    },
}

impl PlaylistCreationError {
    pub(crate) fn at(step: CreationStep) -> impl FnOnce(SpotifyError) -> Self {
        move |source| match source {
            SpotifyError::Unauthorized => PlaylistCreationError::Auth(AuthError::Unauthorized),
            source => PlaylistCreationError::Step { step, source },
        }
    }
}

impl fmt::Display for PlaylistCreationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaylistCreationError::Auth(e) => write!(f, "{}", e),
            PlaylistCreationError::Step { step, source } => {
                write!(f, "Failed to {}: {}", step, source)
            }
        }
    }
}

impl std::error::Error for PlaylistCreationError {}

#[derive(Debug)]
pub enum PlayerError {
    NoPreview(String),
    Spawn(String),
    NoDevice,
    Spotify(SpotifyError),
}

impl fmt::Display for PlayerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerError::NoPreview(name) => write!(f, "No preview clip available for {}", name),
            PlayerError::Spawn(msg) => write!(f, "Cannot start audio player: {}", msg),
            PlayerError::NoDevice => write!(f, "No active Spotify device found"),
            PlayerError::Spotify(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PlayerError {}

impl From<SpotifyError> for PlayerError {
    fn from(err: SpotifyError) -> Self {
        PlayerError::Spotify(err)
    }
}

/// Failure of an orchestrator transition.
#[derive(Debug)]
pub enum SessionError {
    Auth(AuthError),
    Generation(GenerationError),
    Creation(PlaylistCreationError),
    /// A generation or creation call is already in flight.
    Busy,
    InvalidState(&'static str),
}

impl SessionError {
    /// Text of the transient notification shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Auth(_) | SessionError::Creation(PlaylistCreationError::Auth(_)) => {
                "Your Spotify session is missing or expired. Run `promptlist auth` to log in again."
                    .to_string()
            }
            SessionError::Generation(e) => e.user_message().to_string(),
            SessionError::Creation(_) => "Failed to create playlist. Please try again.".to_string(),
            SessionError::Busy => "Please wait for the current request to finish.".to_string(),
            SessionError::InvalidState(msg) => msg.to_string(),
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            SessionError::Auth(_) | SessionError::Creation(PlaylistCreationError::Auth(_))
        )
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Auth(e) => write!(f, "{}", e),
            SessionError::Generation(e) => write!(f, "{}", e),
            SessionError::Creation(e) => write!(f, "{}", e),
            SessionError::Busy => write!(f, "Another request is in flight"),
            SessionError::InvalidState(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<AuthError> for SessionError {
    fn from(err: AuthError) -> Self {
        SessionError::Auth(err)
    }
}

impl From<GenerationError> for SessionError {
    fn from(err: GenerationError) -> Self {
        SessionError::Generation(err)
    }
}

impl From<PlaylistCreationError> for SessionError {
    fn from(err: PlaylistCreationError) -> Self {
        SessionError::Creation(err)
    }
}
