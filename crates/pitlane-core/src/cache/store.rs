use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::debug;

use crate::error::StorageError;

/// Durable string-keyed, string-valued storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// One `<key>.json` file per key inside a cache directory.
pub struct FileStore {
    cache_dir: PathBuf,
}

impl FileStore {
    pub fn new(cache_dir: PathBuf) -> Result<Self, StorageError> {
        std::fs::create_dir_all(&cache_dir).map_err(|source| StorageError::Io {
            key: cache_dir.display().to_string(),
            source,
        })?;
        Ok(Self { cache_dir })
    }

    pub fn dir(&self) -> &PathBuf {
        &self.cache_dir
    }

    fn cache_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.cache_dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.cache_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path).map_err(|source| StorageError::Io {
            key: key.to_string(),
            source,
        })?;
        Ok(Some(contents))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.cache_path(key)?;
        std::fs::write(&path, value).map_err(|source| StorageError::Io {
            key: key.to_string(),
            source,
        })?;
        debug!(key, bytes = value.len(), "Wrote cache file");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.cache_path(key)?;
        if path.exists() {
            std::fs::remove_file(&path).map_err(|source| StorageError::Io {
                key: key.to_string(),
                source,
            })?;
        }
        Ok(())
    }
}

/// Process-local storage; used in tests and when no cache directory exists.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A panic while holding the lock cannot leave a half-written String
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path().join("cache")).expect("file store");

        assert_eq!(store.get("races_2023").expect("get"), None);
        store.set("races_2023", "[1,2,3]").expect("set");
        assert_eq!(store.get("races_2023").expect("get").as_deref(), Some("[1,2,3]"));
        assert!(dir.path().join("cache").join("races_2023.json").exists());

        store.remove("races_2023").expect("remove");
        assert_eq!(store.get("races_2023").expect("get"), None);
    }

    #[test]
    fn test_file_store_rejects_path_like_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path().to_path_buf()).expect("file store");

        assert!(matches!(store.set("../escape", "x"), Err(StorageError::InvalidKey(_))));
        assert!(matches!(store.get(""), Err(StorageError::InvalidKey(_))));
        assert!(matches!(store.get("a/b"), Err(StorageError::InvalidKey(_))));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        store.set("favorites", "{}").expect("set");
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("favorites").expect("get").as_deref(), Some("{}"));
        store.remove("favorites").expect("remove");
        assert!(store.is_empty());
    }
}
