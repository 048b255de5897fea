mod auth;
mod player;
mod session;

pub use auth::FileSessionStore;
pub use auth::MemorySessionStore;
pub use auth::SessionStore;
pub use player::AudioBackend;
pub use player::AudioHandle;
pub use player::PlayerEvent;
pub use player::PreviewPlayer;
pub use player::PreviewState;
pub use player::ProcessAudio;
pub use player::ProcessHandle;
pub use player::RemotePlayer;
pub use session::Review;
pub use session::Session;
pub use session::SessionState;
