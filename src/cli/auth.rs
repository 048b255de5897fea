use crate::{
    error,
    management::{FileSessionStore, SessionStore},
    spotify, success, utils, warning,
};

pub async fn auth() {
    let store = FileSessionStore::default();
    match spotify::auth::login(&store).await {
        Ok(_) => success!("Authentication successful!"),
        Err(e) => error!("{}", e),
    }
}

pub async fn logout() {
    let store = FileSessionStore::default();
    match spotify::auth::logout(&store).await {
        Ok(()) => success!("Logged out successfully"),
        Err(e) => error!("Failed to clear token: {}", e),
    }
}

pub async fn status() {
    match FileSessionStore::default().load().await {
        Ok(Some(token)) => success!(
            "Logged in, token obtained at {}",
            utils::format_timestamp(token.obtained_at)
        ),
        Ok(None) => warning!("Not logged in. Run `promptlist auth`."),
        Err(e) => error!("Cannot read token: {}", e),
    }
}

/// Returns the stored token or exits with a hint to log in.
pub(crate) async fn require_token(store: &FileSessionStore) -> String {
    match store.get().await {
        Ok(Some(token)) => token,
        Ok(None) => error!("Not logged in. Run `promptlist auth` first."),
        Err(e) => error!("Cannot read token: {}", e),
    }
}
