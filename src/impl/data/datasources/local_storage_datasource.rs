use std::{
    collections::{BTreeMap, HashMap},
    fs,
    io::{self, Write as _},
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use fractic_server_error::ServerError;
use tracing::warn;

use crate::errors::{StorageReadError, StorageWriteError};

/// Synchronous string-keyed storage that survives restarts (the equivalent of
/// a browser's `localStorage`).
pub trait LocalStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, ServerError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), ServerError>;
    fn remove_item(&self, key: &str) -> Result<(), ServerError>;
}

/// Keeps every item in a single JSON object file.
///
/// A missing or corrupt file reads as empty storage; the next write replaces
/// it. Writes go to a uniquely named temp file in the same directory and are
/// renamed into place. A file that cannot be read is never overwritten.
#[derive(Debug, Clone)]
pub struct FileLocalStorage {
    path: PathBuf,
}

impl FileLocalStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, ServerError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(StorageReadError::with_debug(&self.location(), &e)),
        };
        match serde_json::from_str(&contents) {
            Ok(items) => Ok(items),
            Err(e) => {
                warn!(path = %self.location(), error = %e, "local storage file is corrupt, treating as empty");
                Ok(BTreeMap::new())
            }
        }
    }

    fn write_all(&self, items: &BTreeMap<String, String>) -> Result<(), ServerError> {
        let location = self.location();
        let serialized =
            serde_json::to_string(items).map_err(|e| StorageWriteError::with_debug(&location, &e))?;
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        fs::create_dir_all(parent).map_err(|e| StorageWriteError::with_debug(&location, &e))?;
        let mut tmp = tempfile::NamedTempFile::new_in(parent)
            .map_err(|e| StorageWriteError::with_debug(&location, &e))?;
        tmp.write_all(serialized.as_bytes())
            .map_err(|e| StorageWriteError::with_debug(&location, &e))?;
        tmp.persist(&self.path)
            .map(|_| ())
            .map_err(|e| StorageWriteError::with_debug(&location, &e))
    }
}

impl LocalStorage for FileLocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, ServerError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), ServerError> {
        let mut items = self.read_all()?;
        items.insert(key.to_string(), value.to_string());
        self.write_all(&items)
    }

    fn remove_item(&self, key: &str) -> Result<(), ServerError> {
        let mut items = self.read_all()?;
        if items.remove(key).is_none() {
            return Ok(());
        }
        self.write_all(&items)
    }
}

/// Process-local storage, for tests and hosts without a writable disk.
#[derive(Debug, Default)]
pub struct InMemoryLocalStorage {
    items: Mutex<HashMap<String, String>>,
}

impl InMemoryLocalStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStorage for InMemoryLocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, ServerError> {
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), ServerError> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), ServerError> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_storage_survives_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");
        FileLocalStorage::new(&path).set_item("a", "1").unwrap();
        FileLocalStorage::new(&path).set_item("b", "2").unwrap();

        let reopened = FileLocalStorage::new(&path);
        assert_eq!(reopened.get_item("a").unwrap().as_deref(), Some("1"));
        assert_eq!(reopened.get_item("b").unwrap().as_deref(), Some("2"));
        assert_eq!(reopened.get_item("c").unwrap(), None);
    }

    #[test]
    fn file_storage_remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileLocalStorage::new(dir.path().join("storage.json"));
        storage.set_item("a", "1").unwrap();
        storage.remove_item("a").unwrap();
        storage.remove_item("a").unwrap();
        assert_eq!(storage.get_item("a").unwrap(), None);
    }

    #[test]
    fn corrupt_file_reads_as_empty_and_is_replaced_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "{ not json").unwrap();
        let storage = FileLocalStorage::new(&path);
        assert_eq!(storage.get_item("a").unwrap(), None);

        storage.set_item("a", "1").unwrap();
        assert_eq!(storage.get_item("a").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn unreadable_file_is_left_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::create_dir(&path).unwrap();
        let storage = FileLocalStorage::new(&path);
        assert!(storage.get_item("a").is_err());
        assert!(storage.set_item("a", "1").is_err());
        assert!(storage.remove_item("a").is_err());
        assert!(path.is_dir());
    }

    #[test]
    fn storages_differing_by_extension_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let json = FileLocalStorage::new(dir.path().join("store.json"));
        let tmp = FileLocalStorage::new(dir.path().join("store.tmp"));
        tmp.set_item("b", "2").unwrap();
        json.set_item("a", "1").unwrap();
        json.set_item("c", "3").unwrap();

        assert_eq!(tmp.get_item("b").unwrap().as_deref(), Some("2"));
        assert_eq!(tmp.get_item("a").unwrap(), None);
        assert_eq!(json.get_item("a").unwrap().as_deref(), Some("1"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileLocalStorage::new(dir.path().join("absent.json"));
        assert_eq!(storage.get_item("a").unwrap(), None);
    }

    #[test]
    fn in_memory_storage_round_trip() {
        let storage = InMemoryLocalStorage::new();
        storage.set_item("k", "v").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v"));
        storage.remove_item("k").unwrap();
        assert_eq!(storage.get_item("k").unwrap(), None);
    }
}
