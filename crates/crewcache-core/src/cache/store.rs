use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use super::CacheEntry;

/// Durable-store failure, distinct from a simple miss. A miss is
/// `Ok(None)`; these are real I/O or corruption problems the caller
/// must not paper over.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache entry is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Key/value blob store with per-entry expiration.
///
/// `get` returns the stored entry together with its `expires_at`;
/// interpreting an expired hit as absent is the repository's job, so a
/// store implementation never has to read the clock.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError>;
    async fn put(&self, key: &str, entry: CacheEntry) -> Result<(), CacheError>;
}

/// File-backed store: one JSON file per key in the cache directory.
pub struct FileStore {
    cache_dir: PathBuf,
}

impl FileStore {
    pub fn new(cache_dir: PathBuf) -> Result<Self, CacheError> {
        std::fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }
}

#[async_trait]
impl BlobStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        let path = self.entry_path(key);
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let entry: CacheEntry = serde_json::from_str(&contents)?;
        Ok(Some(entry))
    }

    async fn put(&self, key: &str, entry: CacheEntry) -> Result<(), CacheError> {
        let path = self.entry_path(key);
        let contents = serde_json::to_string_pretty(&entry)?;
        tokio::fs::write(&path, contents).await?;
        debug!(key, expires_at = %entry.expires_at, "Cache entry written");
        Ok(())
    }
}

/// In-memory store for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        let entries = self.entries.lock().expect("cache map lock poisoned");
        Ok(entries.get(key).cloned())
    }

    async fn put(&self, key: &str, entry: CacheEntry) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().expect("cache map lock poisoned");
        entries.insert(key.to_string(), entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_file_store_round_trips_entry() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path().to_path_buf()).expect("store");

        let entry = CacheEntry::new("[1,2,3]".to_string(), Duration::hours(1));
        store.put("crew", entry.clone()).await.expect("put");

        let loaded = store.get("crew").await.expect("get").expect("entry exists");
        assert_eq!(loaded, entry);
    }

    #[tokio::test]
    async fn test_file_store_miss_is_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path().to_path_buf()).expect("store");

        let loaded = store.get("never-written").await.expect("get");
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_file_store_corrupt_entry_is_error_not_miss() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path().to_path_buf()).expect("store");

        std::fs::write(dir.path().join("crew.json"), "{ not json").expect("write");
        let err = store.get("crew").await.unwrap_err();
        assert!(matches!(err, CacheError::Corrupt(_)));
    }

    #[tokio::test]
    async fn test_memory_store_overwrites_by_key() {
        let store = MemoryStore::new();
        store
            .put("crew", CacheEntry::new("old".to_string(), Duration::hours(1)))
            .await
            .expect("put");
        store
            .put("crew", CacheEntry::new("new".to_string(), Duration::hours(1)))
            .await
            .expect("put");

        let loaded = store.get("crew").await.expect("get").expect("entry");
        assert_eq!(loaded.payload, "new");
    }
}
