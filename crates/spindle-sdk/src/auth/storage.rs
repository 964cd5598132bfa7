//! Token persistence
//!
//! Storage backends implement a small key-value interface; the typed
//! [`TokenStore`] on top of it always reads and writes the access/refresh
//! pair as one unit, so a reader can never observe tokens from two
//! different refresh cycles.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::warn;

/// Storage key for the access token
pub const ACCESS_TOKEN_KEY: &str = "access-token";
/// Storage key for the refresh token
pub const REFRESH_TOKEN_KEY: &str = "refresh-token";

/// Failure in a storage backend
#[derive(Debug, Clone, Error)]
#[error("token storage error: {message}")]
pub struct StorageError {
    pub message: String,
}

impl StorageError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Key-value persistence for token material.
///
/// Implementations do not need to provide atomicity across keys; the
/// [`TokenStore`] wrapper serializes pair-wide operations itself.
#[async_trait]
pub trait TokenStorage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    async fn clear(&self, key: &str) -> Result<(), StorageError>;
}

/// Access/refresh token pair, always persisted and cleared together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Typed token store shared by the HTTP pipeline and any UI layer.
///
/// Clone is cheap; all clones see the same backend and the same pair lock.
#[derive(Clone)]
pub struct TokenStore {
    backend: Arc<dyn TokenStorage>,
    // Held for writes across both keys so no reader interleaves between
    // the access-token write and the refresh-token write.
    pair_lock: Arc<RwLock<()>>,
}

impl TokenStore {
    pub fn new(backend: Arc<dyn TokenStorage>) -> Self {
        Self {
            backend,
            pair_lock: Arc::new(RwLock::new(())),
        }
    }

    /// Store backed by process memory, for tests and short-lived clients
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::default()))
    }

    /// Current access token, if any.
    ///
    /// A backend read failure is the unauthenticated state, not an error:
    /// the request this feeds must still go out without a credential.
    pub async fn access_token(&self) -> Option<String> {
        let _guard = self.pair_lock.read().await;
        match self.backend.get(ACCESS_TOKEN_KEY).await {
            Ok(token) => token,
            Err(e) => {
                warn!("failed to read access token, proceeding unauthenticated: {e}");
                None
            }
        }
    }

    /// Current refresh token, if any
    pub async fn refresh_token(&self) -> Option<String> {
        let _guard = self.pair_lock.read().await;
        match self.backend.get(REFRESH_TOKEN_KEY).await {
            Ok(token) => token,
            Err(e) => {
                warn!("failed to read refresh token: {e}");
                None
            }
        }
    }

    /// Persist both tokens as one unit
    pub async fn store_pair(&self, pair: &TokenPair) -> Result<(), StorageError> {
        let _guard = self.pair_lock.write().await;
        self.backend.set(ACCESS_TOKEN_KEY, &pair.access_token).await?;
        self.backend
            .set(REFRESH_TOKEN_KEY, &pair.refresh_token)
            .await
    }

    /// Load the pair, or None unless both halves are present
    pub async fn load_pair(&self) -> Option<TokenPair> {
        let _guard = self.pair_lock.read().await;
        let access_token = self.backend.get(ACCESS_TOKEN_KEY).await.ok()??;
        let refresh_token = self.backend.get(REFRESH_TOKEN_KEY).await.ok()??;
        Some(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Remove both tokens; both keys are attempted even if the first fails
    pub async fn clear_pair(&self) -> Result<(), StorageError> {
        let _guard = self.pair_lock.write().await;
        let access = self.backend.clear(ACCESS_TOKEN_KEY).await;
        let refresh = self.backend.clear(REFRESH_TOKEN_KEY).await;
        access.and(refresh)
    }
}

/// In-memory token storage
#[derive(Default)]
pub struct MemoryTokenStore {
    entries: RwLock<HashMap<String, String>>,
}

#[async_trait]
impl TokenStorage for MemoryTokenStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn clear(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// Token storage backed by a JSON file, e.g. under the platform data dir
pub struct FileTokenStore {
    path: PathBuf,
    // Serializes read-modify-write cycles on the file
    io_lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            io_lock: Mutex::new(()),
        }
    }

    async fn read_entries(&self) -> Result<HashMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| StorageError::new(format!("failed to read {}: {e}", self.path.display())))?;
        serde_json::from_str(&content)
            .map_err(|e| StorageError::new(format!("failed to parse {}: {e}", self.path.display())))
    }

    async fn write_entries(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::new(format!("failed to create {}: {e}", parent.display())))?;
        }
        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| StorageError::new(format!("failed to serialize tokens: {e}")))?;
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| StorageError::new(format!("failed to write {}: {e}", self.path.display())))
    }
}

#[async_trait]
impl TokenStorage for FileTokenStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.io_lock.lock().await;
        Ok(self.read_entries().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.io_lock.lock().await;
        let mut entries = self.read_entries().await?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries).await
    }

    async fn clear(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.io_lock.lock().await;
        let mut entries = self.read_entries().await?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_clear_roundtrip() {
        let store = MemoryTokenStore::default();
        store.set(ACCESS_TOKEN_KEY, "tok1").await.unwrap();
        assert_eq!(
            store.get(ACCESS_TOKEN_KEY).await.unwrap(),
            Some("tok1".to_string())
        );

        store.clear(ACCESS_TOKEN_KEY).await.unwrap();
        assert_eq!(store.get(ACCESS_TOKEN_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_pair_store_and_clear() {
        let store = TokenStore::in_memory();
        let pair = TokenPair {
            access_token: "tok1".to_string(),
            refresh_token: "ref1".to_string(),
        };

        store.store_pair(&pair).await.unwrap();
        assert_eq!(store.load_pair().await, Some(pair));
        assert_eq!(store.access_token().await, Some("tok1".to_string()));
        assert_eq!(store.refresh_token().await, Some("ref1".to_string()));

        store.clear_pair().await.unwrap();
        assert_eq!(store.load_pair().await, None);
        assert_eq!(store.access_token().await, None);
    }

    #[tokio::test]
    async fn test_load_pair_requires_both_halves() {
        let backend = Arc::new(MemoryTokenStore::default());
        backend.set(ACCESS_TOKEN_KEY, "tok1").await.unwrap();

        let store = TokenStore::new(backend);
        assert_eq!(store.load_pair().await, None);
        assert_eq!(store.access_token().await, Some("tok1".to_string()));
    }

    #[tokio::test]
    async fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");

        let store = TokenStore::new(Arc::new(FileTokenStore::new(&path)));
        let pair = TokenPair {
            access_token: "tok1".to_string(),
            refresh_token: "ref1".to_string(),
        };
        store.store_pair(&pair).await.unwrap();

        // A fresh store over the same file sees the persisted pair
        let reopened = TokenStore::new(Arc::new(FileTokenStore::new(&path)));
        assert_eq!(reopened.load_pair().await, Some(pair));

        reopened.clear_pair().await.unwrap();
        assert_eq!(reopened.load_pair().await, None);
    }

    #[tokio::test]
    async fn test_missing_file_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("missing.json"));
        assert_eq!(store.get(ACCESS_TOKEN_KEY).await.unwrap(), None);
    }
}
