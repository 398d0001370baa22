//! Key/value persistence for client state
//!
//! Records are whole JSON documents, rewritten on every change. Decoding is
//! forgiving: a missing, unreadable or malformed record reads as the type's
//! default instead of failing the caller.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub const CONVERSATION_KEY: &str = "sr_conversation_v1";
pub const SELECTION_KEY: &str = "sr_selected_products_v1";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error for {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not encode {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Durable string records addressed by key
pub trait StateStorage: Send + Sync {
    /// `Ok(None)` when no record exists for `key`
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the record for `key`. Either the old or the new record is
    /// visible afterwards, never a mix.
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Decode the record under `key`, treating every failure as "no prior state"
pub fn load_or_default<T>(storage: &dyn StateStorage, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let raw = match storage.load(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(err) => {
            tracing::warn!(key, error = %err, "unreadable state record, starting empty");
            return T::default();
        }
    };

    match serde_json::from_str::<Option<T>>(&raw) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(err) => {
            tracing::warn!(key, error = %err, "corrupt state record, starting empty");
            T::default()
        }
    }
}

/// Encode `value` and write it under `key`
pub fn save_json<T: Serialize + ?Sized>(
    storage: &dyn StateStorage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let encoded = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;
    storage.save(key, &encoded)
}

/// One `<key>.json` file per record inside a state directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (creating if needed) a state directory
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl StateStorage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.record_path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };

        // Write the full record beside the target, flush it, then rename
        // over the target so readers only ever see a complete document.
        let target = self.record_path(key);
        let staging = self.dir.join(format!(".{}.json.tmp", key));

        let mut file = fs::File::create(&staging).map_err(io_err)?;
        file.write_all(value.as_bytes()).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        drop(file);

        fs::rename(&staging, &target).map_err(io_err)
    }
}

/// Process-local storage, lost on exit
#[derive(Debug, Default)]
pub struct MemoryStorage {
    records: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a record, e.g. to simulate state left by an earlier run
    pub fn with_record(self, key: &str, value: &str) -> Self {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.to_string());
        self
    }
}

impl StateStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let records = self
            .records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(records.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
