//! # API Module
//!
//! HTTP endpoints of the local server that stands in for the redirect route of
//! the Spotify implicit grant flow.
//!
//! ## Endpoints
//!
//! - [`callback`] - `GET /callback`, the page Spotify redirects to. Its script
//!   forwards the `#access_token=...` fragment to `/token`.
//! - [`token`] - `POST /token`, stores the forwarded fragment for the waiting
//!   auth flow to consume once.
//! - [`health`] - `GET /health`, version and whether a login fragment is pending.
//!
//! ## Security Considerations
//!
//! The implicit grant flow carries no `state` parameter, so the server cannot
//! tell a redirect it initiated from a forged one. The server only lives for
//! the duration of one `promptlist auth` run and binds to loopback by default.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::{get, post}};
//! use promptlist::api::{callback, health, token};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/token", post(token))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use callback::token;
pub use health::health;
