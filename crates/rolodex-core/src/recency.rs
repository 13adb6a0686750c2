//! Recent searches log.
//!
//! A short, de-duplicated, most-recent-first list of confirmed selections,
//! persisted as a bare JSON array of strings. Storage problems never reach the
//! caller: unreadable data loads as an empty list and failed writes are logged
//! and dropped.

use crate::{Error, Result};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, warn};

pub const DEFAULT_CAPACITY: usize = 5;

/// Durable client-side storage for the serialized log.
pub trait RecencyStorage {
    /// Stored contents, or `None` if nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageUnavailable`] if the storage cannot be read.
    fn read(&self) -> Result<Option<String>>;

    /// # Errors
    ///
    /// Returns [`Error::StorageUnavailable`] if the storage cannot be written.
    fn write(&self, contents: &str) -> Result<()>;
}

/// Log stored in a single JSON file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecencyStorage for FileStorage {
    fn read(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::StorageUnavailable(format!(
                "{}: {e}",
                self.path.display()
            ))),
        }
    }

    fn write(&self, contents: &str) -> Result<()> {
        let unavailable =
            |e: std::io::Error| Error::StorageUnavailable(format!("{}: {e}", self.path.display()));

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(unavailable)?;
        }
        std::fs::write(&self.path, contents).map_err(unavailable)
    }
}

/// Process-local storage, for tests and sessions without a data dir.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    contents: Mutex<Option<String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Mutex::new(Some(contents.into())),
        }
    }

    /// Raw stored contents.
    #[must_use]
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|c| c.clone())
    }
}

impl RecencyStorage for MemoryStorage {
    fn read(&self) -> Result<Option<String>> {
        self.contents
            .lock()
            .map(|c| c.clone())
            .map_err(|_| Error::StorageUnavailable("memory storage poisoned".to_string()))
    }

    fn write(&self, contents: &str) -> Result<()> {
        let mut guard = self
            .contents
            .lock()
            .map_err(|_| Error::StorageUnavailable("memory storage poisoned".to_string()))?;
        *guard = Some(contents.to_string());
        Ok(())
    }
}

pub struct RecencyStore<S> {
    storage: S,
    entries: Vec<String>,
    capacity: usize,
}

impl<S: RecencyStorage> RecencyStore<S> {
    /// Open the log, reading whatever the storage currently holds.
    pub fn load(storage: S, capacity: usize) -> Self {
        let mut store = Self {
            storage,
            entries: Vec::new(),
            capacity,
        };
        store.reload();
        store
    }

    /// Re-read from storage, picking up writes made by other instances.
    pub fn reload(&mut self) {
        self.entries = match self.storage.read() {
            Ok(Some(content)) => parse_entries(&content, self.capacity),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Recent searches unavailable, starting empty: {e}");
                Vec::new()
            }
        };
    }

    /// Most recent first.
    #[must_use]
    pub fn list(&self) -> &[String] {
        &self.entries
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Move `entry` to the front, dropping any older copy and anything past
    /// capacity. Blank entries are ignored.
    pub fn record(&mut self, entry: &str) {
        if entry.trim().is_empty() {
            return;
        }

        self.entries.retain(|existing| existing != entry);
        self.entries.insert(0, entry.to_string());
        self.entries.truncate(self.capacity);
        self.persist();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    fn persist(&self) {
        let json = match serde_json::to_string(&self.entries) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize recent searches: {e}");
                return;
            }
        };
        if let Err(e) = self.storage.write(&json) {
            warn!("Recent searches not saved: {e}");
        }
    }
}

/// Parse a stored log. Anything other than an array of strings is treated as
/// empty; duplicates and blanks left by hand edits are dropped.
fn parse_entries(content: &str, capacity: usize) -> Vec<String> {
    let stored: Vec<String> = match serde_json::from_str(content) {
        Ok(stored) => stored,
        Err(e) => {
            debug!("Ignoring unreadable recent searches: {e}");
            return Vec::new();
        }
    };

    let mut entries: Vec<String> = Vec::with_capacity(capacity);
    for entry in stored {
        if entries.len() == capacity {
            break;
        }
        if !entry.trim().is_empty() && !entries.contains(&entry) {
            entries.push(entry);
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStorage;

    impl RecencyStorage for BrokenStorage {
        fn read(&self) -> Result<Option<String>> {
            Err(Error::StorageUnavailable("sandboxed".to_string()))
        }

        fn write(&self, _contents: &str) -> Result<()> {
            Err(Error::StorageUnavailable("sandboxed".to_string()))
        }
    }

    fn memory_store() -> RecencyStore<MemoryStorage> {
        RecencyStore::load(MemoryStorage::new(), DEFAULT_CAPACITY)
    }

    #[test]
    fn test_dedup_moves_entry_to_front() {
        let mut store = memory_store();
        store.record("Acme Corp");
        store.record("Globex");
        store.record("Acme Corp");
        assert_eq!(store.list(), ["Acme Corp", "Globex"]);
    }

    #[test]
    fn test_capacity_keeps_most_recent() {
        let mut store = memory_store();
        for name in ["one", "two", "three", "four", "five", "six"] {
            store.record(name);
        }
        assert_eq!(store.list(), ["six", "five", "four", "three", "two"]);
    }

    #[test]
    fn test_dedup_is_exact_match() {
        let mut store = memory_store();
        store.record("Acme");
        store.record("acme");
        assert_eq!(store.list(), ["acme", "Acme"]);
    }

    #[test]
    fn test_blank_entries_ignored() {
        let mut store = memory_store();
        store.record("   ");
        store.record("");
        assert!(store.list().is_empty());
        assert!(store.storage().contents().is_none());
    }

    #[test]
    fn test_record_persists_json_array() {
        let mut store = memory_store();
        store.record("Globex");
        store.record("Acme Corp");
        assert_eq!(
            store.storage().contents().as_deref(),
            Some(r#"["Acme Corp","Globex"]"#)
        );
    }

    #[test]
    fn test_corrupted_storage_loads_empty() {
        let store = RecencyStore::load(MemoryStorage::with_contents("{not json"), 5);
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_mismatched_shape_loads_empty() {
        let objects = r#"[{"title": "Acme Corp", "at": 1}]"#;
        let store = RecencyStore::load(MemoryStorage::with_contents(objects), 5);
        assert!(store.list().is_empty());

        let mixed = r#"["Acme Corp", 7]"#;
        let store = RecencyStore::load(MemoryStorage::with_contents(mixed), 5);
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_hand_edited_storage_normalized() {
        let stored = r#"["a", "b", "a", " ", "c", "d", "e", "f", "g"]"#;
        let store = RecencyStore::load(MemoryStorage::with_contents(stored), 5);
        assert_eq!(store.list(), ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_unavailable_storage_is_absorbed() {
        let mut store = RecencyStore::load(BrokenStorage, 5);
        assert!(store.list().is_empty());

        store.record("Acme Corp");
        assert_eq!(store.list(), ["Acme Corp"]);
    }

    #[test]
    fn test_clear_persists_empty_list() {
        let mut store = memory_store();
        store.record("Acme Corp");
        store.clear();
        assert!(store.list().is_empty());
        assert_eq!(store.storage().contents().as_deref(), Some("[]"));
    }

    #[test]
    fn test_file_storage_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("recent-searches.json");

        let mut store = RecencyStore::load(FileStorage::new(&path), 5);
        assert!(store.list().is_empty());
        store.record("Globex");
        store.record("Acme Corp");

        let reopened = RecencyStore::load(FileStorage::new(&path), 5);
        assert_eq!(reopened.list(), ["Acme Corp", "Globex"]);
    }

    #[test]
    fn test_reload_picks_up_external_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recent-searches.json");

        let mut first = RecencyStore::load(FileStorage::new(&path), 5);
        let mut second = RecencyStore::load(FileStorage::new(&path), 5);
        second.record("Initech");

        assert!(first.list().is_empty());
        first.reload();
        assert_eq!(first.list(), ["Initech"]);
    }

    #[test]
    fn test_file_storage_directory_path_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(matches!(
            storage.read(),
            Err(Error::StorageUnavailable(_))
        ));
    }
}
