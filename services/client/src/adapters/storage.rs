//! services/client/src/adapters/storage.rs
//!
//! Implementations of the `SessionStorage` port: a JSON file for the CLI and
//! an in-memory map for tests and embedding.

use ezchef_core::ports::{ClientError, PortResult, SessionStorage};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

type Entries = BTreeMap<String, String>;

fn lock(entries: &Mutex<Entries>) -> MutexGuard<'_, Entries> {
    entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

//=========================================================================================
// In-Memory Storage
//=========================================================================================

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<Entries>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        lock(&self.entries).keys().cloned().collect()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> PortResult<Option<String>> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> PortResult<()> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> PortResult<()> {
        lock(&self.entries).remove(key);
        Ok(())
    }
}

//=========================================================================================
// File Storage
//=========================================================================================

/// Keeps session entries in a JSON object on disk, rewritten on every change.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<Entries>,
}

impl FileStorage {
    /// Opens the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> PortResult<Self> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => Entries::new(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                ClientError::Storage(format!("{} is not a session file: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Entries::new(),
            Err(e) => return Err(ClientError::Storage(e.to_string())),
        };
        debug!("Opened session file {} ({} entries)", path.display(), entries.len());
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn persist(&self, entries: &Entries) -> PortResult<()> {
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| ClientError::Storage(e.to_string()))
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> PortResult<Option<String>> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> PortResult<()> {
        let mut entries = lock(&self.entries);
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> PortResult<()> {
        let mut entries = lock(&self.entries);
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = FileStorage::open(&path).unwrap();
        store.set("authToken", "abc").unwrap();
        store.set("user", r#"{"userId":1}"#).unwrap();
        store.remove("user").unwrap();

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get("authToken").unwrap(), Some("abc".to_string()));
        assert_eq!(reopened.get("user").unwrap(), None);
    }

    #[test]
    fn corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(FileStorage::open(&path), Err(ClientError::Storage(_))));
    }

    #[test]
    fn memory_storage_round_trip() {
        let store = MemoryStorage::new();
        assert!(store.is_empty());
        store.set("refreshToken", "r1").unwrap();
        assert_eq!(store.keys(), vec!["refreshToken".to_string()]);
        store.remove("refreshToken").unwrap();
        assert!(store.is_empty());
    }
}
