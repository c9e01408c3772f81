//! Generic key-value persistence.
//!
//! The engine never touches the filesystem directly; everything goes through
//! this trait so tests can swap in an in-memory store and the storage medium
//! stays replaceable.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::RwLock;

use tracing::warn;

use crate::utils;

/// A flat string-to-string store.
pub trait KvStore: Send + Sync {
    /// Read a value. Missing and unreadable both come back as `None`.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value. The caller decides whether a rejected write is fatal.
    fn set(&self, key: &str, value: &str) -> io::Result<()>;

    /// Delete a value. Removing a missing key is not an error.
    fn remove(&self, key: &str);
}

// ─────────────────────────────────────────────
// FileKvStore
// ─────────────────────────────────────────────

/// One file per key under a data directory.
pub struct FileKvStore {
    dir: PathBuf,
}

impl FileKvStore {
    pub fn new(dir: PathBuf) -> Self {
        FileKvStore { dir }
    }

    /// Store rooted at the default data directory (`~/.scriptforge/`).
    pub fn open_default() -> Self {
        FileKvStore::new(utils::get_data_path())
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(utils::safe_filename(key))
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> Option<String> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(key, error = %e, "failed to read store value");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value)
    }

    fn remove(&self, key: &str) {
        if let Err(e) = std::fs::remove_file(self.path_for(key)) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(key, error = %e, "failed to remove store value");
            }
        }
    }
}

// ─────────────────────────────────────────────
// MemoryKvStore
// ─────────────────────────────────────────────

/// In-memory store for tests.
#[derive(Default)]
pub struct MemoryKvStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        MemoryKvStore::default()
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        self.values
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.values.write().unwrap().remove(key);
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
