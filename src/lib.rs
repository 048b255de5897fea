//! promptlist library
//!
//! Turns a free-text music prompt into a Spotify playlist: logs the user in
//! through Spotify's implicit grant flow, asks a text generation model for
//! matching songs, resolves them against the Spotify catalog, lets the user
//! prune the list and finally creates the playlist in the user's account.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints of the local login callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error taxonomy and user-facing messages
//! - `generator` - Prompt to playlist suggestion via a text generation API
//! - `management` - Token store, session orchestrator and players
//! - `server` - Local HTTP server for the OAuth redirect
//! - `spotify` - Spotify Web API client and workflows
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Boxed so the CLI layer can mix configuration, storage and network errors
/// behind one `?`. Send + Sync keeps it usable across tokio tasks.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Generating playlist for \"{}\"...", prompt);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Playlist {} created", name);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only for fatal errors in the CLI layer; library code returns errors instead.
///
/// # Example
///
/// ```
/// error!("Cannot load environment. Err: {}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// This is the transient notification for recoverable failures: the session
/// continues after it.
///
/// # Example
///
/// ```
/// warning!("{} suggested songs were not found on Spotify", count);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
