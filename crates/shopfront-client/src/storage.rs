//! # Persistent Storage
//!
//! Small string key/value store that survives restarts. The store keeps two
//! entries in it: the bearer token and the cart snapshot.
//!
//! ## Backends
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      KeyValueStore Backends                             │
//! │                                                                         │
//! │  MemoryStorage                      FileStorage                         │
//! │  ─────────────                      ───────────                         │
//! │  • HashMap behind a Mutex           • One JSON object on disk           │
//! │  • Lost on drop                     • {"token": "...", "cart": "[..]"}  │
//! │  • Tests, ephemeral sessions        • Write: temp file + rename         │
//! │                                     • Missing/corrupt file = empty      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::config::{project_dirs, StorageSettings};
use crate::error::{StorageError, StorageResult};

/// Key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Key holding the JSON-encoded cart lines.
pub const CART_KEY: &str = "cart";

/// State file name inside the platform data directory.
pub const STATE_FILE_NAME: &str = "state.json";

/// String key/value persistence.
///
/// Calls are synchronous. A failed `set` or `remove` must leave the previous
/// value in place.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removing an absent key succeeds.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

// =============================================================================
// Memory Storage
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

// =============================================================================
// File Storage
// =============================================================================

/// JSON file backed storage.
///
/// The whole document is cached in memory and rewritten on every change.
/// The cache is only updated after the file write succeeds.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Opens (or prepares to create) the state file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let entries = read_document(&path);
        debug!(?path, entries = entries.len(), "Opened file storage");

        Ok(FileStorage {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Opens the configured path, or the platform data directory.
    pub fn from_settings(settings: &StorageSettings) -> StorageResult<Self> {
        match &settings.path {
            Some(path) => Self::open(path.clone()),
            None => Self::open(Self::default_path().ok_or(StorageError::NoLocation)?),
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.data_dir().join(STATE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
        let contents = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn update<F>(&self, change: F) -> StorageResult<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        let mut next = entries.clone();
        change(&mut next);
        if next == *entries {
            return Ok(());
        }
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }
}

fn read_document(path: &Path) -> BTreeMap<String, String> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
        Err(e) => {
            warn!(?path, error = %e, "Unreadable storage file, starting empty");
            return BTreeMap::new();
        }
    };

    serde_json::from_str(&contents).unwrap_or_else(|e| {
        warn!(?path, error = %e, "Malformed storage file, starting empty");
        BTreeMap::new()
    })
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}
