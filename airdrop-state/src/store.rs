//! StateStore — key-value persistence for the tracker records
//!
//! Each record is one JSON document stored under a key from [`schema`].
//! Two backends are provided: [`FileStore`] (one file per key, atomic
//! replace on write) and [`MemoryStore`] (process-local map).
//!
//! # Example
//!
//! ```rust,no_run
//! use airdrop_state::store::{load_json, save_json, FileStore};
//! use airdrop_state::TrackerConfig;
//!
//! #[tokio::main]
//! async fn main() -> airdrop_state::Result<()> {
//!     let store = FileStore::open(&TrackerConfig::new("/data/tracker")).await?;
//!
//!     save_json(&store, "crypto_tracker_events", &Vec::<String>::new()).await?;
//!     let events: Option<Vec<String>> = load_json(&store, "crypto_tracker_events").await?;
//!     assert_eq!(events, Some(vec![]));
//!
//!     Ok(())
//! }
//! ```

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::TrackerConfig;
use crate::error::{Result, TrackerError};
use crate::schema;

/// Key-value blob storage
///
/// Values are opaque strings; use [`load_json`] and [`save_json`] for typed access.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Read the value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    async fn put(&self, key: &str, value: String) -> Result<()>;

    /// Remove `key`; returns whether it existed
    async fn remove(&self, key: &str) -> Result<bool>;
}

/// Load and decode a JSON record
///
/// An absent key yields `Ok(None)`. A value that does not decode yields
/// [`TrackerError::PersistenceCorrupt`]; callers recover from it.
pub async fn load_json<T: DeserializeOwned>(store: &dyn StateStore, key: &str) -> Result<Option<T>> {
    match store.get(key).await? {
        None => Ok(None),
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| TrackerError::PersistenceCorrupt {
                key: key.to_string(),
                reason: e.to_string(),
            }),
    }
}

/// Load a JSON record, treating absence and corruption alike as the default value
///
/// Corruption is logged and recovered; only I/O failures are returned.
pub async fn load_json_or_default<T: DeserializeOwned + Default>(store: &dyn StateStore, key: &str) -> Result<T> {
    match load_json(store, key).await {
        Ok(value) => Ok(value.unwrap_or_default()),
        Err(e @ TrackerError::PersistenceCorrupt { .. }) => {
            warn!(error = %e, "Persisted record unreadable, falling back to default");
            Ok(T::default())
        }
        Err(e) => Err(e),
    }
}

/// Encode and store a JSON record
pub async fn save_json<T: Serialize + ?Sized>(store: &dyn StateStore, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.put(key, raw).await
}

// ─── File Backend ───

/// One JSON file per key under the configured base path
pub struct FileStore {
    config: TrackerConfig,
}

impl FileStore {
    /// Open the store, creating the base directory if needed
    pub async fn open(config: &TrackerConfig) -> Result<Self> {
        tokio::fs::create_dir_all(&config.base_path).await?;
        let store = Self {
            config: config.clone(),
        };

        for record in schema::all_records() {
            let present = tokio::fs::try_exists(store.path(record.key)).await?;
            debug!(key = record.key, present, "Persisted record");
        }

        info!(path = %config.base_path.display(), "State store opened");
        Ok(store)
    }

    fn path(&self, key: &str) -> PathBuf {
        self.config.state_path(key)
    }

    #[cfg(unix)]
    async fn restrict_permissions(path: &PathBuf) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await?;
        Ok(())
    }

    #[cfg(not(unix))]
    async fn restrict_permissions(_path: &PathBuf) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl StateStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match tokio::fs::read_to_string(self.path(key)).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, key: &str, value: String) -> Result<()> {
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");

        tokio::fs::write(&tmp, value.as_bytes()).await?;
        if schema::record_def(key).is_some_and(|r| r.sensitive) {
            Self::restrict_permissions(&tmp).await?;
        }
        tokio::fs::rename(&tmp, &path).await?;

        debug!(key, bytes = value.len(), "Record written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        match tokio::fs::remove_file(self.path(key)).await {
            Ok(()) => {
                debug!(key, "Record removed");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

// ─── Memory Backend ───

/// In-process map; contents are lost when dropped
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> TrackerError {
        TrackerError::Internal("memory store lock poisoned".into())
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().map_err(|_| Self::poisoned())?;
        Ok(entries.get(key).cloned())
    }

    async fn put(&self, key: &str, value: String) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        Ok(entries.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_put_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);

        store.put("k", "v1".into()).await.unwrap();
        store.put("k", "v2".into()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v2"));

        assert!(store.remove("k").await.unwrap());
        assert!(!store.remove("k").await.unwrap());
    }

    #[tokio::test]
    async fn test_load_json_reports_corruption() {
        let store = MemoryStore::new();
        store.put(schema::KEY_SESSION, "{not json".into()).await.unwrap();

        let loaded = load_json::<Vec<String>>(&store, schema::KEY_SESSION).await;
        match loaded {
            Err(TrackerError::PersistenceCorrupt { key, .. }) => assert_eq!(key, schema::KEY_SESSION),
            other => panic!("expected PersistenceCorrupt, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_corrupt_record_falls_back_to_default() {
        let store = MemoryStore::new();
        store.put(schema::KEY_RANKINGS, "[{broken".into()).await.unwrap();

        let loaded: Vec<u32> = load_json_or_default(&store, schema::KEY_RANKINGS).await.unwrap();
        assert!(loaded.is_empty());

        let absent: Option<String> = load_json_or_default(&store, schema::KEY_SESSION).await.unwrap();
        assert!(absent.is_none());
    }

    #[tokio::test]
    async fn test_save_then_load_json() {
        let store = MemoryStore::new();
        save_json(&store, "list", &vec![1u32, 2, 3]).await.unwrap();
        let loaded: Option<Vec<u32>> = load_json(&store, "list").await.unwrap();
        assert_eq!(loaded, Some(vec![1, 2, 3]));

        let missing: Option<Vec<u32>> = load_json(&store, "other").await.unwrap();
        assert!(missing.is_none());
    }
}
