//! # CLI Module
//!
//! User-facing command implementations. Each command wires the library
//! pieces together, shows progress with spinners and tables and turns every
//! failure into a single colored line.
//!
//! ## Commands
//!
//! - [`auth`] - log in through Spotify's implicit grant flow
//! - [`logout`] - forget the stored access token
//! - [`status`] - show whether a token is stored
//! - [`generate`] - prompt → suggestion → review → playlist
//! - [`preview`] - play the preview clip of a song
//! - [`play`] - play a full song on the active Spotify device, also
//!   reachable from the `generate` review with `s <n>`
//!
//! ## Usage Patterns
//!
//! ```bash
//! promptlist auth
//! promptlist generate upbeat workout songs
//! promptlist generate --yes --no-open 90s trip hop classics
//! promptlist preview "Teardrop - Massive Attack"
//! promptlist logout
//! ```
//!
//! Provider failures during `generate` are reported as warnings and the
//! session continues: a failed generation offers a retry with the same
//! prompt, a failed creation returns to the review. Only a missing or
//! rejected token ends the command, with a hint to run `promptlist auth`.

mod auth;
mod generate;
mod play;

pub use auth::auth;
pub use auth::logout;
pub use auth::status;
pub use generate::generate;
pub use play::play;
pub use play::preview;
