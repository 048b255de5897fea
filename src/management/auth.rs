use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use crate::{config, error::StoreError, types::StoredToken, utils};

/// Durable storage for the single Spotify access token.
///
/// Written only by the auth flow, read by everything that talks to Spotify.
#[allow(async_fn_in_trait)]
pub trait SessionStore {
    async fn get(&self) -> Result<Option<String>, StoreError>;
    async fn set(&self, token: &str) -> Result<(), StoreError>;
    async fn clear(&self) -> Result<(), StoreError>;
}

/// Token store backed by `promptlist/cache/token.json` in the local data directory.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Reads the full stored record, including when the token was obtained.
    pub async fn load(&self) -> Result<Option<StoredToken>, StoreError> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let token: StoredToken = serde_json::from_str(&content)?;
        Ok(Some(token))
    }

    async fn persist(&self, token: &StoredToken) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(token)?;
        async_fs::write(&self.path, json).await?;
        restrict_to_owner(&self.path).await?;
        Ok(())
    }

    fn token_path() -> PathBuf {
        let mut path = config::data_dir();
        path.push("cache/token.json");
        path
    }
}

impl Default for FileSessionStore {
    fn default() -> Self {
        Self::new(Self::token_path())
    }
}

impl SessionStore for FileSessionStore {
    async fn get(&self) -> Result<Option<String>, StoreError> {
        Ok(self.load().await?.map(|t| t.access_token))
    }

    async fn set(&self, token: &str) -> Result<(), StoreError> {
        self.persist(&StoredToken {
            access_token: token.to_string(),
            obtained_at: utils::now_timestamp(),
        })
        .await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match async_fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Limits the token file to the owning user (`0600`).
#[cfg(unix)]
async fn restrict_to_owner(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    async_fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn restrict_to_owner(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

/// In-process token store, used by tests and short-lived sessions.
#[derive(Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    async fn get(&self) -> Result<Option<String>, StoreError> {
        Ok(self.token.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    async fn set(&self, token: &str) -> Result<(), StoreError> {
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

impl<S: SessionStore> SessionStore for &S {
    async fn get(&self) -> Result<Option<String>, StoreError> {
        (**self).get().await
    }

    async fn set(&self, token: &str) -> Result<(), StoreError> {
        (**self).set(token).await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        (**self).clear().await
    }
}
