//! Settings persistence.
//!
//! The record lives under [`OPTION_KEY`] in a small key-value backend. The
//! store keeps the last loaded record in an `ArcSwap` so the per-response hot
//! path never touches the backend; saves and external reloads swap it.

use std::collections::HashMap;
use std::fs;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::tribute::settings::{RawInput, TributeSettings, OPTION_KEY};

/// Failure talking to the option backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("option storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("option storage is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A persistent key-value facility for option records.
pub trait OptionBackend: Send + Sync {
    /// Fetch the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: Value) -> Result<(), StoreError>;
}

/// Options kept as one JSON object in a file on disk.
pub struct FileBackend {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Option<Value>, StoreError> {
        let file = match fs::File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let value = serde_json::from_reader(BufReader::new(file))?;
        Ok(Some(value))
    }

    fn write_all(&self, map: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // Write beside the target and rename so readers never see a torn file.
        let tmp = self.path.with_extension("json.tmp");
        {
            let mut writer = BufWriter::new(fs::File::create(&tmp)?);
            serde_json::to_writer_pretty(&mut writer, map)?;
            writer.flush()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl OptionBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        match self.read_all()? {
            Some(Value::Object(mut map)) => Ok(map.remove(key)),
            Some(_) => {
                tracing::warn!(path = ?self.path, "Option file is not a JSON object, ignoring");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn put(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().expect("option file lock poisoned");

        let mut map = match self.read_all() {
            Ok(Some(Value::Object(map))) => map,
            Ok(_) => Map::new(),
            Err(StoreError::Json(e)) => {
                tracing::warn!(path = ?self.path, error = %e, "Overwriting unreadable option file");
                Map::new()
            }
            Err(e) => return Err(e),
        };
        map.insert(key.to_string(), value);
        self.write_all(&map)
    }
}

/// Volatile backend, used when no storage path is configured and in tests.
#[derive(Default)]
pub struct MemoryBackend {
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw value, bypassing sanitization.
    pub fn with_value(key: &str, value: Value) -> Self {
        let backend = Self::new();
        backend
            .values
            .lock()
            .expect("memory backend lock poisoned")
            .insert(key.to_string(), value);
        backend
    }
}

impl OptionBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let values = self.values.lock().expect("memory backend lock poisoned");
        Ok(values.get(key).cloned())
    }

    fn put(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut values = self.values.lock().expect("memory backend lock poisoned");
        values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Shared handle to the tribute settings record.
#[derive(Clone)]
pub struct SettingsStore {
    backend: Arc<dyn OptionBackend>,
    current: Arc<ArcSwap<TributeSettings>>,
}

impl SettingsStore {
    /// Create a store and read the initial record from `backend`.
    pub fn new(backend: Arc<dyn OptionBackend>) -> Self {
        let initial = match backend.get(OPTION_KEY) {
            Ok(stored) => TributeSettings::from_stored(stored.as_ref()),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read tribute settings, using defaults");
                TributeSettings::default()
            }
        };

        Self {
            backend,
            current: Arc::new(ArcSwap::from_pointee(initial)),
        }
    }

    /// Store backed by the JSON option file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileBackend::new(path)))
    }

    /// Store that forgets everything on restart.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    /// Current record, merged over defaults. Never fails.
    pub fn load(&self) -> Arc<TributeSettings> {
        self.current.load_full()
    }

    /// Re-read the backend after an out-of-process change.
    ///
    /// Malformed content resolves to defaults; an I/O failure keeps the
    /// record already in memory.
    pub fn reload(&self) -> Arc<TributeSettings> {
        let next = match self.backend.get(OPTION_KEY) {
            Ok(stored) => TributeSettings::from_stored(stored.as_ref()),
            Err(StoreError::Json(e)) => {
                tracing::warn!(error = %e, "Stored tribute settings are malformed, using defaults");
                TributeSettings::default()
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to reload tribute settings. Keeping current record.");
                return self.load();
            }
        };

        let next = Arc::new(next);
        self.current.store(next.clone());
        tracing::info!(
            enabled = next.enabled,
            send_hex = next.send_hex,
            "Tribute settings reloaded"
        );
        next
    }

    /// Sanitize `raw`, persist it and make it current.
    pub fn save(&self, raw: &RawInput) -> Result<TributeSettings, StoreError> {
        let settings = raw.sanitize();
        self.backend.put(OPTION_KEY, settings.to_stored())?;
        self.current.store(Arc::new(settings.clone()));

        tracing::info!(
            enabled = settings.enabled,
            send_hex = settings.send_hex,
            message = %settings.message,
            "Tribute settings saved"
        );
        Ok(settings)
    }
}
