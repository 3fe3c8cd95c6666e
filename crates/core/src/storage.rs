//! Storage backends for the patient store.
//!
//! The store is a single JSON document mapping patient id to the stored
//! value object. Backends implement whole-document load and save only:
//! every operation reads the full mapping, and mutating operations rewrite
//! it completely. There is no locking and no partial-write recovery; under
//! concurrent writers the last save wins.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use crate::patient::StoredPatient;
use crate::{PatientError, PatientResult};

/// The full collection of records, keyed by patient id.
pub type PatientStore = BTreeMap<String, StoredPatient>;

/// Whole-document load/save over the patient store.
pub trait StorageBackend: Send + Sync {
    /// Loads the full store.
    ///
    /// # Errors
    ///
    /// Fails with `FileRead` when the backing document is missing or
    /// unreadable, and `Deserialization` when it is not a valid store
    /// document.
    fn load(&self) -> PatientResult<PatientStore>;

    /// Fully overwrites the backing document with `store`.
    fn save(&self, store: &PatientStore) -> PatientResult<()>;
}

/// File-backed storage: one JSON document at a fixed path.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StorageBackend for FileStorage {
    fn load(&self) -> PatientResult<PatientStore> {
        let contents = fs::read_to_string(&self.path).map_err(PatientError::FileRead)?;
        serde_json::from_str(&contents).map_err(PatientError::Deserialization)
    }

    fn save(&self, store: &PatientStore) -> PatientResult<()> {
        let json = serde_json::to_string(store).map_err(PatientError::Serialization)?;
        fs::write(&self.path, json).map_err(PatientError::FileWrite)
    }
}

/// In-memory storage for tests and ephemeral use.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    inner: Mutex<PatientStore>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: PatientStore) -> Self {
        Self {
            inner: Mutex::new(store),
        }
    }
}

impl StorageBackend for MemoryStorage {
    fn load(&self) -> PatientResult<PatientStore> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(inner.clone())
    }

    fn save(&self, store: &PatientStore) -> PatientResult<()> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        *inner = store.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patient::Gender;

    fn sample_store() -> PatientStore {
        let mut store = PatientStore::new();
        store.insert(
            "P001".into(),
            StoredPatient {
                name: "John Doe".into(),
                city: "New York".into(),
                age: 30,
                gender: Gender::Male,
                height: 1.55,
                weight: 70.0,
                bmi: 29.14,
                verdict: "Overweight".into(),
            },
        );
        store
    }

    #[test]
    fn file_storage_round_trips_the_document() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("patients.json"));

        let store = sample_store();
        storage.save(&store).unwrap();
        assert_eq!(storage.load().unwrap(), store);
    }

    #[test]
    fn file_storage_save_overwrites_completely() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("patients.json"));

        storage.save(&sample_store()).unwrap();
        storage.save(&PatientStore::new()).unwrap();
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn missing_document_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nope.json"));

        let err = storage.load().expect_err("should fail");
        assert!(matches!(err, PatientError::FileRead(_)));
    }

    #[test]
    fn malformed_document_is_a_deserialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patients.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = FileStorage::new(path).load().expect_err("should fail");
        assert!(matches!(err, PatientError::Deserialization(_)));
    }

    #[test]
    fn memory_storage_round_trips_the_document() {
        let storage = MemoryStorage::new();
        assert!(storage.load().unwrap().is_empty());

        let store = sample_store();
        storage.save(&store).unwrap();
        assert_eq!(storage.load().unwrap(), store);
    }
}
