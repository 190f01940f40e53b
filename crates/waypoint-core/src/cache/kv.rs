//! Key/value storage backends for the response cache.
//!
//! The cache itself only needs get/set/remove/keys over strings; anything
//! providing those works. `MemoryStore` is the default and the test
//! implementation, `FileStore` persists across runs.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Minimal string key/value store.
pub trait KvStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
    fn keys(&self) -> Vec<String>;
}

// Compile-time assertion: KvStore must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn KvStore) {}
};

/// In-memory store. Default and test implementation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

/// Store backed by a single JSON document on disk.
///
/// The whole map is rewritten on every mutation. Write failures are logged
/// and swallowed: caching is an optimization, never a correctness
/// dependency, so the process continues without the entry.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`, loading existing entries.
    ///
    /// A missing file starts empty; an unreadable or corrupt file is
    /// logged and also starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "cache file is corrupt, starting empty");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cache file unreadable, starting empty");
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) {
        let write = || -> std::io::Result<()> {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string(&self.entries)
                .map_err(|e| std::io::Error::other(e.to_string()))?;
            std::fs::write(&self.path, contents)
        };
        if let Err(e) = write() {
            tracing::warn!(path = %self.path.display(), error = %e, "cache write failed, entry not persisted");
        }
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
        self.persist();
    }

    fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.persist();
        }
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn memory_store_round_trips() {
        let mut store = MemoryStore::new();
        store.set("a", "1");
        store.set("b", "2");
        assert_eq!(store.get("a").as_deref(), Some("1"));
        assert_eq!(store.keys(), vec!["a", "b"]);
        store.remove("a");
        assert!(store.get("a").is_none());
    }

    #[test]
    fn file_store_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");

        let mut store = FileStore::open(&path);
        store.set("suggestions:asia", "{\"hit\":true}");
        drop(store);

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("suggestions:asia").as_deref(), Some("{\"hit\":true}"));
    }

    #[test]
    fn file_store_starts_empty_on_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "not json {{{").unwrap();

        let store = FileStore::open(&path);
        assert!(store.keys().is_empty());
    }

    #[test]
    fn file_store_missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path().join("absent.json"));
        assert!(store.keys().is_empty());
    }
}
