//! Key-value persistence used by the recent list and preference stores.
//!
//! [`JsonFileStore`] keeps one JSON object per file and rewrites it on every
//! `set` (auto-flush). The file is read lazily on first access so that opening
//! a store never fails; read errors surface from the first `get` instead.
//!
//! # File Format
//!
//! ```json
//! {
//!   "recent_comparisons": [ ... ],
//!   "diffvibe-theme": "dark"
//! }
//! ```
//!
//! # Atomic Writes
//!
//! Uses temp file + rename so a crash mid-write never leaves a truncated file.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{DiffVibeError, Result};

/// Durable string-keyed storage of JSON values.
pub trait KeyValueStore: Send {
    /// Returns the value stored under `key`, or `None` if absent.
    fn get(&mut self, key: &str) -> Result<Option<Value>>;

    /// Stores `value` under `key` and flushes it to the backing medium.
    fn set(&mut self, key: &str, value: Value) -> Result<()>;

    fn delete(&mut self, key: &str) -> Result<()>;
}

/// A key-value store shared between several owners (e.g. both preference stores).
pub type SharedKeyValueStore = Arc<Mutex<dyn KeyValueStore>>;

/// Wraps a store for sharing.
pub fn shared<S: KeyValueStore + 'static>(store: S) -> SharedKeyValueStore {
    Arc::new(Mutex::new(store))
}

/// Reads and deserializes the value under `key`.
pub fn get_json<T: DeserializeOwned>(store: &SharedKeyValueStore, key: &str) -> Result<Option<T>> {
    // Recover from poisoning - a panicked writer leaves the map itself intact
    let mut guard = store.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    match guard.get(key)? {
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|source| DiffVibeError::Json {
                context: format!("decoding key {}", key),
                source,
            }),
        None => Ok(None),
    }
}

/// Serializes `value` and stores it under `key`.
pub fn set_json<T: Serialize + ?Sized>(
    store: &SharedKeyValueStore,
    key: &str,
    value: &T,
) -> Result<()> {
    let value = serde_json::to_value(value).map_err(|source| DiffVibeError::Json {
        context: format!("encoding key {}", key),
        source,
    })?;
    let mut guard = store.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.set(key, value)
}

// ═══════════════════════════════════════════════════════════════════════════════
// JSON File Store
// ═══════════════════════════════════════════════════════════════════════════════

pub struct JsonFileStore {
    path: PathBuf,
    entries: Map<String, Value>,
    loaded: bool,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Map::new(),
            loaded: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_loaded(&mut self) -> Result<()> {
        if self.loaded {
            return Ok(());
        }
        self.entries = read_entries(&self.path)?;
        self.loaded = true;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.entries).map_err(|source| {
            DiffVibeError::Json {
                context: format!("serializing {}", self.path.display()),
                source,
            }
        })?;
        atomic_write(&self.path, &content)?;
        debug!(path = %self.path.display(), keys = self.entries.len(), "Flushed store");
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&mut self, key: &str) -> Result<Option<Value>> {
        self.ensure_loaded()?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        match self.ensure_loaded() {
            Ok(()) => {}
            // Malformed contents are replaced by this write; I/O errors are not
            Err(err @ DiffVibeError::StorageMalformed { .. }) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "Discarding malformed store contents"
                );
                self.entries = Map::new();
                self.loaded = true;
            }
            Err(err) => return Err(err),
        }
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.ensure_loaded()?;
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

fn read_entries(path: &Path) -> Result<Map<String, Value>> {
    let content = match fs_err::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
        Err(source) => {
            return Err(DiffVibeError::Io {
                context: format!("reading {}", path.display()),
                source,
            })
        }
    };

    if content.trim().is_empty() {
        warn!(path = %path.display(), "Empty store file, starting empty");
        return Ok(Map::new());
    }

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(entries)) => Ok(entries),
        Ok(other) => Err(DiffVibeError::StorageMalformed {
            path: path.to_path_buf(),
            details: format!("expected a JSON object, found {}", json_kind(&other)),
        }),
        Err(err) => Err(DiffVibeError::StorageMalformed {
            path: path.to_path_buf(),
            details: err.to_string(),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Writes content to a file atomically using temp file + rename.
fn atomic_write(path: &Path, contents: &str) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs_err::create_dir_all(dir).map_err(|source| DiffVibeError::Io {
        context: format!("creating {}", dir.display()),
        source,
    })?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|source| DiffVibeError::Io {
        context: format!("creating temp file in {}", dir.display()),
        source,
    })?;

    tmp.write_all(contents.as_bytes())
        .map_err(|source| DiffVibeError::Io {
            context: format!("writing temp file for {}", path.display()),
            source,
        })?;

    tmp.flush().map_err(|source| DiffVibeError::Io {
        context: format!("flushing temp file for {}", path.display()),
        source,
    })?;

    tmp.persist(path).map_err(|e| DiffVibeError::Io {
        context: format!("persisting temp file to {}", path.display()),
        source: e.error,
    })?;

    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Memory Store
// ═══════════════════════════════════════════════════════════════════════════════

/// Non-durable store for tests and ephemeral sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: Value) -> Self {
        self.entries.insert(key.to_string(), value);
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&mut self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}
