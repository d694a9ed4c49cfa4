use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{Map, Value as JsonValue};

use crate::error::Error;
use crate::types::AccessToken;

/// Storage key of the persisted access token.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Holder of the single persisted access token.
///
/// Reads and writes happen sequentially from whichever flow holds control,
/// so implementations only need interior mutability, not coordination.
pub trait TokenStore: Send + Sync + 'static {
    /// Stored token, if any.
    fn load(&self) -> impl Future<Output = Result<Option<AccessToken>, Error>> + Send;

    /// Replace the stored token.
    fn save(&self, token: &AccessToken) -> impl Future<Output = Result<(), Error>> + Send;

    /// Forget the stored token (logout or rejected token).
    fn clear(&self) -> impl Future<Output = Result<(), Error>> + Send;
}

/// Process-local token store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<AccessToken>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token(token: AccessToken) -> Self {
        Self {
            token: Mutex::new(Some(token)),
        }
    }

    fn slot(&self) -> Result<std::sync::MutexGuard<'_, Option<AccessToken>>, Error> {
        self.token
            .lock()
            .map_err(|_| Error::Store("token store lock poisoned".into()))
    }
}

impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<AccessToken>, Error> {
        Ok(self.slot()?.clone())
    }

    async fn save(&self, token: &AccessToken) -> Result<(), Error> {
        *self.slot()? = Some(token.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), Error> {
        *self.slot()? = None;
        Ok(())
    }
}

/// Token store backed by a JSON key-value file.
///
/// The token lives under [`ACCESS_TOKEN_KEY`]; other keys in the file are
/// left untouched. A missing file reads as "no token".
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$HOME/.hearai/storage.json`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when `HOME` is not set.
    pub fn default_location() -> Result<Self, Error> {
        let home = std::env::var_os("HOME")
            .ok_or_else(|| Error::Config("HOME is not set, pass a storage path".into()))?;
        Ok(Self::new(
            PathBuf::from(home).join(".hearai").join("storage.json"),
        ))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> Result<Map<String, JsonValue>, Error> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(Error::Store(format!("{}: {e}", self.path.display()))),
        };
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        serde_json::from_str(&raw)
            .map_err(|e| Error::Store(format!("{}: {e}", self.path.display())))
    }

    async fn write_entries(&self, entries: &Map<String, JsonValue>) -> Result<(), Error> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::Store(format!("{}: {e}", parent.display())))?;
        }
        let raw = serde_json::to_string_pretty(entries)
            .map_err(|e| Error::Store(e.to_string()))?;
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|e| Error::Store(format!("{}: {e}", self.path.display())))
    }
}

impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<AccessToken>, Error> {
        let entries = self.read_entries().await?;
        Ok(entries
            .get(ACCESS_TOKEN_KEY)
            .and_then(JsonValue::as_str)
            .filter(|t| !t.is_empty())
            .map(AccessToken::new))
    }

    async fn save(&self, token: &AccessToken) -> Result<(), Error> {
        let mut entries = self.read_entries().await?;
        entries.insert(
            ACCESS_TOKEN_KEY.to_owned(),
            JsonValue::String(token.as_str().to_owned()),
        );
        self.write_entries(&entries).await?;
        tracing::debug!(path = %self.path.display(), "Access token saved");
        Ok(())
    }

    async fn clear(&self) -> Result<(), Error> {
        let mut entries = self.read_entries().await?;
        if entries.remove(ACCESS_TOKEN_KEY).is_none() {
            return Ok(());
        }
        if entries.is_empty() {
            match tokio::fs::remove_file(&self.path).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(Error::Store(format!("{}: {e}", self.path.display()))),
            }
        } else {
            self.write_entries(&entries).await?;
        }
        tracing::debug!(path = %self.path.display(), "Access token cleared");
        Ok(())
    }
}
