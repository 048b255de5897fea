use std::{sync::Arc, time::Duration};

use reqwest::Url;
use tokio::sync::Mutex;

use crate::{
    Res, config,
    error::StoreError,
    info,
    management::SessionStore,
    server::start_api_server,
    types::SharedFragment,
    utils, warning,
};

const LOGIN_TIMEOUT: Duration = Duration::from_secs(120);

/// Builds the implicit grant authorize URL.
///
/// No `state` parameter is sent, so the redirect cannot be checked for
/// tampering.
pub fn authorize_url(
    auth_url: &str,
    client_id: &str,
    redirect_uri: &str,
    scope: &str,
) -> Result<String, String> {
    Url::parse_with_params(
        auth_url,
        &[
            ("client_id", client_id),
            ("redirect_uri", redirect_uri),
            ("response_type", "token"),
            ("scope", scope),
        ],
    )
    .map(|url| url.to_string())
    .map_err(|e| format!("Invalid authorize URL {}: {}", auth_url, e))
}

/// Commits the `access_token` of a redirect fragment to the store.
///
/// Accepts `#access_token=abc&token_type=Bearer&...` with or without the `#`.
/// Returns the stored token, or `None` without touching the store when the
/// fragment carries no token (e.g. `#error=access_denied`).
pub async fn complete_login<S: SessionStore>(
    store: &S,
    fragment: &str,
) -> Result<Option<String>, StoreError> {
    let Some(token) = utils::fragment_param(fragment, "access_token") else {
        if let Some(error) = utils::fragment_param(fragment, "error") {
            warning!("Spotify denied the login: {}", error);
        }
        return Ok(None);
    };

    store.set(&token).await?;
    Ok(Some(token))
}

pub async fn logout<S: SessionStore>(store: &S) -> Result<(), StoreError> {
    store.clear().await
}

/// Runs the whole login: callback server, browser redirect, token commit.
///
/// Opens the authorize URL in the default browser (printing it when no
/// browser can be launched), waits for the callback page to hand over the
/// fragment and stores the token it carries.
pub async fn login<S: SessionStore>(store: &S) -> Res<String> {
    let auth_url = authorize_url(
        &config::spotify_apiauth_url(),
        &config::spotify_client_id()?,
        &config::spotify_redirect_uri(),
        &config::spotify_scope(),
    )?;

    let shared_state: SharedFragment = Arc::new(Mutex::new(None));
    let server_state = Arc::clone(&shared_state);
    let server = tokio::spawn(async move {
        if let Err(e) = start_api_server(server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    } else {
        info!("Waiting for Spotify login in your browser...");
    }

    let fragment = wait_for_fragment(&shared_state, LOGIN_TIMEOUT).await;
    server.abort();

    let Some(fragment) = fragment else {
        return Err("Authentication timed out.".into());
    };

    match complete_login(store, &fragment).await? {
        Some(token) => Ok(token),
        None => Err("Authentication failed: no access token in redirect.".into()),
    }
}

/// Polls the shared state until the callback server delivered a fragment.
pub async fn wait_for_fragment(shared_state: &SharedFragment, max_wait: Duration) -> Option<String> {
    let start = tokio::time::Instant::now();

    while start.elapsed() < max_wait {
        if let Some(fragment) = shared_state.lock().await.take() {
            return Some(fragment);
        }
        tokio::time::sleep(Duration::from_millis(250)).await;
    }

    None
}
