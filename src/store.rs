use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schedule::model::{Schedule, ScheduleItem};

pub const DEFAULT_STORE_KEY: &str = "schedule";
const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("store io error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid JSON at line {line}, column {column}: {source}")]
    Json {
        line: usize,
        column: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("corrupt schedule snapshot: {0}")]
    Corrupt(String),
    #[error("unsupported snapshot version {0}; expected version 1")]
    UnsupportedVersion(u32),
}

impl From<serde_json::Error> for StorageError {
    fn from(source: serde_json::Error) -> Self {
        Self::Json {
            line: source.line(),
            column: source.column(),
            source,
        }
    }
}

/// String key-value persistence for schedule snapshots.
pub trait ScheduleStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScheduleStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// A single JSON object file mapping keys to string values.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load_entries(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn store_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let text = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, format!("{text}\n")).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl ScheduleStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load_entries()?.remove(key))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.load_entries()?;
        entries.insert(key.to_string(), value.to_string());
        self.store_entries(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.load_entries()?;
        if entries.remove(key).is_some() {
            self.store_entries(&entries)?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile {
    version: u32,
    items: Vec<ScheduleItem>,
}

pub fn encode_snapshot(schedule: &Schedule) -> Result<String, StorageError> {
    let snapshot = SnapshotFile {
        version: SNAPSHOT_VERSION,
        items: schedule.items().to_vec(),
    };
    Ok(serde_json::to_string(&snapshot)?)
}

pub fn decode_snapshot(text: &str) -> Result<Schedule, StorageError> {
    let raw = serde_json::from_str::<SnapshotFile>(text)?;
    if raw.version != SNAPSHOT_VERSION {
        return Err(StorageError::UnsupportedVersion(raw.version));
    }

    let mut items = Vec::with_capacity(raw.items.len());
    for stored in raw.items {
        let rebuilt = ScheduleItem::new(
            stored.label(),
            stored.details().to_vec(),
            stored.start_text(),
            stored.end_text(),
        )
        .map_err(|err| StorageError::Corrupt(format!("item '{}': {err}", stored.label())))?;
        if rebuilt != stored {
            return Err(StorageError::Corrupt(format!(
                "item '{}' does not match its own time text",
                stored.label()
            )));
        }
        items.push(rebuilt);
    }
    Ok(Schedule::from_items(items))
}

pub fn save_snapshot(
    store: &mut dyn ScheduleStore,
    key: &str,
    schedule: &Schedule,
) -> Result<(), StorageError> {
    let encoded = encode_snapshot(schedule)?;
    store.write(key, &encoded)
}

/// `Ok(None)` when nothing is stored under `key`.
pub fn load_snapshot(
    store: &dyn ScheduleStore,
    key: &str,
) -> Result<Option<Schedule>, StorageError> {
    match store.read(key)? {
        Some(text) => decode_snapshot(&text).map(Some),
        None => Ok(None),
    }
}
