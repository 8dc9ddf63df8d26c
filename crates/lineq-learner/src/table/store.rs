//! Value Table Storage Implementations
//!
//! Storage backends for the learned table. The on-disk format is a JSON
//! snapshot holding one record per key, with every name written as its
//! stable symbolic form.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use lineq_common::StorageError;

use super::value_table::ValueTable;

/// Current snapshot format version
pub const FORMAT_VERSION: u32 = 1;

/// One persisted entry: `(mode, light_state, action) -> value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRecord {
    pub mode: String,
    pub light_state: String,
    pub action: String,
    pub value: f64,
}

/// Serialized form of a [`ValueTable`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub format_version: u32,
    /// Learning session that produced the table
    pub session_id: Option<Uuid>,
    pub saved_at: DateTime<Utc>,
    pub entries: Vec<TableRecord>,
}

impl TableSnapshot {
    pub fn capture(table: &ValueTable, session_id: Option<Uuid>) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            session_id,
            saved_at: Utc::now(),
            entries: table.to_records(),
        }
    }

    pub fn restore(&self) -> Result<ValueTable, StorageError> {
        if self.format_version != FORMAT_VERSION {
            return Err(StorageError::VersionMismatch {
                found: self.format_version,
                expected: FORMAT_VERSION,
            });
        }
        ValueTable::from_records(&self.entries)
    }

    pub fn encode(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn decode(raw: &str) -> Result<Self, StorageError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Trait for value table storage backends
pub trait TableStore {
    /// Replace the stored table wholesale
    fn save(&self, table: &ValueTable, session_id: Option<Uuid>) -> Result<(), StorageError>;

    /// Load the stored table; absence is an error
    fn load(&self) -> Result<ValueTable, StorageError>;
}

/// JSON file storage
///
/// Saves write a sibling temp file, sync it, then rename it over the target,
/// so the previous version stays intact until the new one is complete.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Temp file a save writes before renaming over [`Self::path`]
    pub fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "q_table".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl TableStore for JsonFileStore {
    fn save(&self, table: &ValueTable, session_id: Option<Uuid>) -> Result<(), StorageError> {
        let encoded = TableSnapshot::capture(table, session_id).encode()?;
        let staging = self.staging_path();

        {
            let mut file = File::create(&staging)?;
            file.write_all(encoded.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&staging, &self.path)?;

        debug!(path = %self.path.display(), "value table saved");
        Ok(())
    }

    fn load(&self) -> Result<ValueTable, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(self.path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        TableSnapshot::decode(&raw)?.restore()
    }
}

/// In-memory storage implementation
///
/// Keeps the encoded snapshot rather than the table itself, so loads go
/// through the same decoding path as the file store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    encoded: Mutex<Option<String>>,
    saves: Mutex<u64>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful saves
    pub fn save_count(&self) -> u64 {
        *self.saves.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Raw stored snapshot, if any
    pub fn raw(&self) -> Option<String> {
        self.encoded
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Replace the stored snapshot with arbitrary text
    pub fn put_raw(&self, raw: impl Into<String>) {
        *self.encoded.lock().unwrap_or_else(|e| e.into_inner()) = Some(raw.into());
    }
}

impl TableStore for InMemoryStore {
    fn save(&self, table: &ValueTable, session_id: Option<Uuid>) -> Result<(), StorageError> {
        let encoded = TableSnapshot::capture(table, session_id).encode()?;
        *self.encoded.lock().unwrap_or_else(|e| e.into_inner()) = Some(encoded);
        *self.saves.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(())
    }

    fn load(&self) -> Result<ValueTable, StorageError> {
        let raw = self
            .raw()
            .ok_or_else(|| StorageError::NotFound("in-memory store".to_string()))?;
        TableSnapshot::decode(&raw)?.restore()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineq_common::{Action, LightState, TrackingMode};

    fn trained_table() -> ValueTable {
        let mut table = ValueTable::new();
        table.set(TrackingMode::InnerLine, LightState::Middle, Action::Advance, 12.5);
        table.set(TrackingMode::OuterLine, LightState::Black, Action::PivotLeft, -4.0);
        table
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("q_table.json"));
        let table = trained_table();

        store.save(&table, Some(Uuid::now_v7())).unwrap();
        assert_eq!(store.load().unwrap(), table);
        assert!(!store.staging_path().exists());
    }

    #[test]
    fn test_save_replaces_previous_version() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("q_table.json"));

        store.save(&ValueTable::new(), None).unwrap();
        let table = trained_table();
        store.save(&table, None).unwrap();

        assert_eq!(store.load().unwrap(), table);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert!(matches!(store.load(), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_garbage_file_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q_table.json");
        fs::write(&path, "not json").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(store.load(), Err(StorageError::Malformed(_))));
    }

    #[test]
    fn test_records_use_symbolic_names() {
        let store = InMemoryStore::new();
        store.save(&trained_table(), None).unwrap();
        let raw = store.raw().unwrap();

        assert!(raw.contains("\"turn_left\""));
        assert!(raw.contains("\"OUTER_LINE\""));
        assert!(raw.contains("\"MIDDLE\""));
    }

    #[test]
    fn test_unknown_action_in_store_is_fatal() {
        let store = InMemoryStore::new();
        store.save(&ValueTable::new(), None).unwrap();
        let tampered = store.raw().unwrap().replacen("\"backward\"", "\"sideways\"", 1);
        store.put_raw(tampered);

        assert!(matches!(
            store.load(),
            Err(StorageError::UnknownAction(name)) if name == "sideways"
        ));
    }

    #[test]
    fn test_version_mismatch() {
        let mut snapshot = TableSnapshot::capture(&ValueTable::new(), None);
        snapshot.format_version = 7;
        assert!(matches!(
            snapshot.restore(),
            Err(StorageError::VersionMismatch { found: 7, .. })
        ));
    }

    #[test]
    fn test_in_memory_counts_saves() {
        let store = InMemoryStore::new();
        assert!(matches!(store.load(), Err(StorageError::NotFound(_))));
        store.save(&ValueTable::new(), None).unwrap();
        store.save(&ValueTable::new(), None).unwrap();
        assert_eq!(store.save_count(), 2);
    }
}
