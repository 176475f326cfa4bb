//! Key/value store implementations.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use docsage_core::error::{DocsageError, Result};
use docsage_core::session::KeyValueStore;
use tokio::sync::Mutex;

use super::atomic_toml::AtomicTomlFile;

type Entries = BTreeMap<String, String>;

/// Durable store backed by a single TOML file.
///
/// Entries are cached in memory after the first load; every mutation is
/// written through to disk before it returns.
#[derive(Clone)]
pub struct FileKeyValueStore {
    file: Arc<AtomicTomlFile<Entries>>,
    cache: Arc<Mutex<Option<Entries>>>,
}

impl FileKeyValueStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path)),
            cache: Arc::new(Mutex::new(None)),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.file.path().to_path_buf()
    }

    async fn mutate<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Entries) + Send + 'static,
    {
        let mut cache = self.cache.lock().await;
        let file = self.file.clone();

        let updated = tokio::task::spawn_blocking(move || file.update(Entries::new(), f))
            .await
            .map_err(|e| DocsageError::internal(format!("Failed to join task: {}", e)))??;

        *cache = Some(updated);
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut cache = self.cache.lock().await;
        if cache.is_none() {
            let file = self.file.clone();
            let loaded = tokio::task::spawn_blocking(move || file.load())
                .await
                .map_err(|e| DocsageError::internal(format!("Failed to join task: {}", e)))??;
            *cache = Some(loaded.unwrap_or_default());
        }

        Ok(cache.as_ref().and_then(|entries| entries.get(key).cloned()))
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let key = key.to_string();
        self.mutate(move |entries| {
            entries.insert(key, value);
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        self.mutate(move |entries| {
            entries.remove(&key);
        })
        .await
    }
}

/// Ephemeral store. Contents are lost when the process exits.
#[derive(Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.entries.lock().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsage_core::session::{SESSION_CREATED_AT_KEY, SESSION_ID_KEY, SessionIdentityStore};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.toml");

        let store = FileKeyValueStore::new(path.clone());
        assert_eq!(store.get("missing").await.unwrap(), None);
        store.set("session_id", "abc-123".to_string()).await.unwrap();

        let reopened = FileKeyValueStore::new(path);
        assert_eq!(
            reopened.get("session_id").await.unwrap().as_deref(),
            Some("abc-123")
        );
    }

    #[tokio::test]
    async fn test_file_store_remove() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path().join("session.toml"));

        store.set("a", "1".to_string()).await.unwrap();
        store.set("b", "2".to_string()).await.unwrap();
        store.remove("a").await.unwrap();
        store.remove("never-set").await.unwrap();

        assert_eq!(store.get("a").await.unwrap(), None);
        assert_eq!(store.get("b").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_identity_round_trip_on_disk() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.toml");
        let identity = SessionIdentityStore::new(Arc::new(FileKeyValueStore::new(path.clone())));

        let first = identity.get_or_create_session_id().await;
        identity.clear_session().await.unwrap();

        let raw = FileKeyValueStore::new(path);
        assert_eq!(raw.get(SESSION_ID_KEY).await.unwrap(), None);
        assert_eq!(raw.get(SESSION_CREATED_AT_KEY).await.unwrap(), None);

        let second = identity.get_or_create_session_id().await;
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryKeyValueStore::new();
        assert!(store.is_empty().await);
        store.set("k", "v".to_string()).await.unwrap();
        assert_eq!(store.len().await, 1);
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
        store.remove("k").await.unwrap();
        assert!(store.is_empty().await);
    }
}
