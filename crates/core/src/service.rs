//! Patient record operations over an injected storage backend.

use std::sync::Arc;

use crate::patient::{NewPatient, Patient, StoredPatient};
use crate::sort::{SortField, SortOrder};
use crate::storage::{PatientStore, StorageBackend};
use crate::{PatientError, PatientResult};

/// Pure patient data operations - no API concerns.
///
/// Every operation loads the full store from the backend, works on that
/// copy, and (for mutating operations) saves the whole store back. Nothing
/// is cached between calls, so concurrent mutating calls follow last-write-
/// wins semantics at the backend.
#[derive(Clone)]
pub struct PatientService {
    storage: Arc<dyn StorageBackend>,
}

impl PatientService {
    /// Creates a new service over the given storage backend.
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self { storage }
    }

    /// Returns the full store contents verbatim.
    pub fn view_patients(&self) -> PatientResult<PatientStore> {
        self.storage.load()
    }

    /// Returns the stored value object for `id`.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::NotFound` if no record has that id.
    pub fn get_patient(&self, id: &str) -> PatientResult<StoredPatient> {
        let store = self.storage.load()?;
        store
            .get(id)
            .cloned()
            .ok_or_else(|| PatientError::NotFound(id.to_string()))
    }

    /// Returns all records ordered by `field`.
    ///
    /// The sort is stable: records with equal keys keep the store's
    /// iteration order, for descending sorts as well.
    pub fn sort_patients(
        &self,
        field: SortField,
        order: SortOrder,
    ) -> PatientResult<Vec<StoredPatient>> {
        let store = self.storage.load()?;
        let mut patients: Vec<StoredPatient> = store.into_values().collect();

        match order {
            SortOrder::Asc => {
                patients.sort_by(|a, b| field.key(a).total_cmp(&field.key(b)));
            }
            SortOrder::Desc => {
                patients.sort_by(|a, b| field.key(b).total_cmp(&field.key(a)));
            }
        }

        Ok(patients)
    }

    /// Validates and inserts a new record, then persists the store.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::Validation` if the candidate fails
    /// validation, and `PatientError::DuplicateId` if a record with the
    /// same id already exists (the store is left untouched).
    pub fn create_patient(&self, new: NewPatient) -> PatientResult<Patient> {
        let patient = new.validate()?;

        let mut store = self.storage.load()?;
        if store.contains_key(&patient.id) {
            return Err(PatientError::DuplicateId(patient.id));
        }

        let (id, stored) = patient.clone().into_stored();
        store.insert(id, stored);
        self.storage.save(&store)?;

        tracing::info!("created patient {}", patient.id);
        Ok(patient)
    }

    /// Applies a partial update to an existing record and persists the
    /// store.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::NotFound` if `id` is absent, and
    /// `PatientError::Validation` if the merged record fails validation.
    pub fn update_patient(
        &self,
        id: &str,
        update: crate::update::PatientUpdate,
    ) -> PatientResult<Patient> {
        let mut store = self.storage.load()?;
        let existing = store
            .get(id)
            .ok_or_else(|| PatientError::NotFound(id.to_string()))?;

        let merged = update.apply(id, existing)?;
        let (key, stored) = merged.clone().into_stored();
        store.insert(key, stored);
        self.storage.save(&store)?;

        tracing::info!("updated patient {id}");
        Ok(merged)
    }

    /// Removes a record and persists the store.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::NotFound` if `id` is absent (the store is
    /// left untouched).
    pub fn delete_patient(&self, id: &str) -> PatientResult<()> {
        let mut store = self.storage.load()?;
        if store.remove(id).is_none() {
            return Err(PatientError::NotFound(id.to_string()));
        }
        self.storage.save(&store)?;

        tracing::info!("deleted patient {id}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patient::Gender;
    use crate::storage::MemoryStorage;
    use crate::update::PatientUpdate;

    fn service() -> PatientService {
        PatientService::new(Arc::new(MemoryStorage::new()))
    }

    fn new_patient(id: &str, age: u32, height: f64, weight: f64) -> NewPatient {
        NewPatient {
            id: id.into(),
            name: format!("Patient {id}"),
            city: "London".into(),
            age,
            gender: Gender::Other,
            height,
            weight,
        }
    }

    #[test]
    fn create_then_get_round_trips_base_attributes() {
        let service = service();
        let created = service
            .create_patient(new_patient("P001", 30, 1.55, 70.0))
            .unwrap();
        assert_eq!(created.bmi, 29.14);
        assert_eq!(created.verdict, "Overweight");

        let fetched = service.get_patient("P001").unwrap();
        assert_eq!(Patient::from_stored("P001", fetched), created);
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        let err = service().get_patient("P404").expect_err("should fail");
        assert!(matches!(err, PatientError::NotFound(id) if id == "P404"));
    }

    #[test]
    fn duplicate_create_fails_and_leaves_the_store_unchanged() {
        let service = service();
        service
            .create_patient(new_patient("P001", 30, 1.55, 70.0))
            .unwrap();
        let before = service.view_patients().unwrap();

        let err = service
            .create_patient(new_patient("P001", 99, 1.80, 90.0))
            .expect_err("should fail");
        assert!(matches!(err, PatientError::DuplicateId(id) if id == "P001"));
        assert_eq!(service.view_patients().unwrap(), before);
    }

    #[test]
    fn invalid_candidate_never_reaches_the_store() {
        let service = service();
        let err = service
            .create_patient(new_patient("P001", 30, 0.0, 70.0))
            .expect_err("should fail");
        assert!(matches!(err, PatientError::Validation { field: "height", .. }));
        assert!(service.view_patients().unwrap().is_empty());
    }

    #[test]
    fn view_is_idempotent_without_mutation() {
        let service = service();
        service
            .create_patient(new_patient("P001", 30, 1.55, 70.0))
            .unwrap();
        service
            .create_patient(new_patient("P002", 25, 1.80, 60.0))
            .unwrap();

        assert_eq!(
            service.view_patients().unwrap(),
            service.view_patients().unwrap()
        );
    }

    #[test]
    fn update_merges_and_persists() {
        let service = service();
        service
            .create_patient(new_patient("P001", 30, 1.55, 70.0))
            .unwrap();

        let updated = service
            .update_patient(
                "P001",
                PatientUpdate {
                    weight: Some(50.0),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.bmi, 20.81);
        assert_eq!(updated.verdict, "Normal weight");

        let stored = service.get_patient("P001").unwrap();
        assert_eq!(stored.weight, 50.0);
        assert_eq!(stored.bmi, 20.81);
    }

    #[test]
    fn update_of_unknown_id_is_not_found() {
        let err = service()
            .update_patient("P404", PatientUpdate::default())
            .expect_err("should fail");
        assert!(matches!(err, PatientError::NotFound(_)));
    }

    #[test]
    fn delete_removes_the_record() {
        let service = service();
        service
            .create_patient(new_patient("P001", 30, 1.55, 70.0))
            .unwrap();

        service.delete_patient("P001").unwrap();
        assert!(service.view_patients().unwrap().is_empty());
    }

    #[test]
    fn delete_of_unknown_id_fails_and_leaves_the_store_unchanged() {
        let service = service();
        service
            .create_patient(new_patient("P001", 30, 1.55, 70.0))
            .unwrap();
        let before = service.view_patients().unwrap();

        let err = service.delete_patient("P404").expect_err("should fail");
        assert!(matches!(err, PatientError::NotFound(_)));
        assert_eq!(service.view_patients().unwrap(), before);
    }

    #[test]
    fn sorts_by_age_descending() {
        let service = service();
        service
            .create_patient(new_patient("P001", 30, 1.70, 70.0))
            .unwrap();
        service
            .create_patient(new_patient("P002", 25, 1.70, 70.0))
            .unwrap();
        service
            .create_patient(new_patient("P003", 40, 1.70, 70.0))
            .unwrap();

        let sorted = service
            .sort_patients(SortField::Age, SortOrder::Desc)
            .unwrap();
        let ages: Vec<u32> = sorted.iter().map(|p| p.age).collect();
        assert_eq!(ages, vec![40, 30, 25]);
    }

    #[test]
    fn equal_sort_keys_keep_store_order() {
        let service = service();
        // Same height/weight, hence identical bmi.
        service
            .create_patient(new_patient("P001", 30, 1.70, 70.0))
            .unwrap();
        service
            .create_patient(new_patient("P002", 25, 1.70, 70.0))
            .unwrap();
        service
            .create_patient(new_patient("P003", 40, 1.70, 70.0))
            .unwrap();

        let sorted = service
            .sort_patients(SortField::Bmi, SortOrder::Asc)
            .unwrap();
        let names: Vec<&str> = sorted.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Patient P001", "Patient P002", "Patient P003"]);
    }
}
