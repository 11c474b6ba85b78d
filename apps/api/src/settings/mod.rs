//! Persisted settings — a narrow key-value store for per-installation state
//! such as onboarding progress.
//!
//! The store is loaded once at startup and written back on every change.
//! Writes go through a temp file in the same directory followed by a rename,
//! so a crash mid-write leaves the previous file intact. `set` and `remove`
//! block on that write; async callers run them on the blocking pool.

pub mod handlers;

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde_json::Value;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Settings file {path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Settings lock poisoned")]
    Poisoned,
}

/// Key-value settings store. Carried in `AppState` as `Arc<dyn SettingsStore>`.
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>, SettingsError>;
    fn set(&self, key: &str, value: Value) -> Result<(), SettingsError>;
    /// Returns the removed value, if any.
    fn remove(&self, key: &str) -> Result<Option<Value>, SettingsError>;
    fn snapshot(&self) -> Result<BTreeMap<String, Value>, SettingsError>;
}

/// JSON-file backed [`SettingsStore`].
pub struct JsonFileSettingsStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, Value>>,
}

impl JsonFileSettingsStore {
    /// Loads the store from `path`. A missing file is an empty store; the file
    /// is only created on the first change.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let entries = match std::fs::read(&path) {
            Ok(bytes) if bytes.is_empty() => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| {
                SettingsError::Corrupt {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(SettingsError::Io { path, source }),
        };

        info!(
            "Settings loaded from {} ({} keys)",
            path.display(),
            entries.len()
        );
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Must be called with the write lock held.
    fn persist(&self, entries: &BTreeMap<String, Value>) -> Result<(), SettingsError> {
        let io_err = |source| SettingsError::Io {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(io_err)?;

        let json = serde_json::to_vec_pretty(entries)?;
        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(&json).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;

        debug!("Settings saved to {}", self.path.display());
        Ok(())
    }
}

impl SettingsStore for JsonFileSettingsStore {
    fn get(&self, key: &str) -> Result<Option<Value>, SettingsError> {
        let entries = self.entries.read().map_err(|_| SettingsError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), SettingsError> {
        let mut entries = self.entries.write().map_err(|_| SettingsError::Poisoned)?;
        let previous = entries.insert(key.to_string(), value);
        if let Err(e) = self.persist(&entries) {
            // keep memory and disk in agreement
            match previous {
                Some(v) => entries.insert(key.to_string(), v),
                None => entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<Option<Value>, SettingsError> {
        let mut entries = self.entries.write().map_err(|_| SettingsError::Poisoned)?;
        let Some(previous) = entries.remove(key) else {
            return Ok(None);
        };
        if let Err(e) = self.persist(&entries) {
            entries.insert(key.to_string(), previous);
            return Err(e);
        }
        Ok(Some(previous))
    }

    fn snapshot(&self) -> Result<BTreeMap<String, Value>, SettingsError> {
        let entries = self.entries.read().map_err(|_| SettingsError::Poisoned)?;
        Ok(entries.clone())
    }
}
