//! Partial updates over an existing patient record.
//!
//! A partial update is a sparse set of field assignments: a field that is
//! absent from the payload is left untouched, which is distinct from a field
//! explicitly set to some default. Modelling every field as an `Option`
//! preserves that distinction through deserialization. The record id is not
//! part of the mutable field set; any `id` key a caller sneaks into the
//! payload is ignored.

use serde::Deserialize;
use utoipa::ToSchema;

use crate::patient::{Gender, NewPatient, Patient, StoredPatient};
use crate::PatientResult;

/// Sparse field assignments for `PUT /edit/{id}`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PatientUpdate {
    pub name: Option<String>,
    pub city: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
}

impl PatientUpdate {
    /// Merges this update into `existing` and revalidates the result.
    ///
    /// The merged candidate always carries the caller-supplied `id` (the
    /// store key of the existing record), and validation runs against the
    /// full merged record rather than just the changed fields, so an update
    /// can never leave the record in a state that `create` would have
    /// rejected. Derived fields are recomputed as part of validation.
    ///
    /// Pure: persisting the merged record is the caller's responsibility.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::Validation` when the merged record fails
    /// validation.
    pub fn apply(self, id: &str, existing: &StoredPatient) -> PatientResult<Patient> {
        let candidate = NewPatient {
            id: id.to_string(),
            name: self.name.unwrap_or_else(|| existing.name.clone()),
            city: self.city.unwrap_or_else(|| existing.city.clone()),
            age: self.age.unwrap_or(existing.age),
            gender: self.gender.unwrap_or(existing.gender),
            height: self.height.unwrap_or(existing.height),
            weight: self.weight.unwrap_or(existing.weight),
        };

        candidate.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PatientError;

    fn existing() -> StoredPatient {
        let (_, stored) = NewPatient {
            id: "P001".into(),
            name: "John Doe".into(),
            city: "New York".into(),
            age: 30,
            gender: Gender::Male,
            height: 1.55,
            weight: 70.0,
        }
        .validate()
        .unwrap()
        .into_stored();
        stored
    }

    #[test]
    fn absent_fields_are_left_untouched() {
        let update = PatientUpdate {
            city: Some("Boston".into()),
            ..Default::default()
        };
        let merged = update.apply("P001", &existing()).unwrap();
        assert_eq!(merged.city, "Boston");
        assert_eq!(merged.name, "John Doe");
        assert_eq!(merged.age, 30);
        assert_eq!(merged.height, 1.55);
    }

    #[test]
    fn empty_update_is_a_noop_with_fresh_derived_fields() {
        let merged = PatientUpdate::default().apply("P001", &existing()).unwrap();
        let (_, stored) = merged.into_stored();
        assert_eq!(stored, existing());
    }

    #[test]
    fn derived_fields_follow_the_merged_attributes() {
        let update = PatientUpdate {
            weight: Some(50.0),
            ..Default::default()
        };
        let merged = update.apply("P001", &existing()).unwrap();
        // 50 / 1.55^2 = 20.81
        assert_eq!(merged.bmi, 20.81);
        assert_eq!(merged.verdict, "Normal weight");
    }

    #[test]
    fn the_id_always_comes_from_the_store_key() {
        let merged = PatientUpdate::default().apply("P001", &existing()).unwrap();
        assert_eq!(merged.id, "P001");
    }

    #[test]
    fn id_in_the_payload_is_ignored() {
        let update: PatientUpdate =
            serde_json::from_str(r#"{"id": "P999", "age": 31}"#).unwrap();
        let merged = update.apply("P001", &existing()).unwrap();
        assert_eq!(merged.id, "P001");
        assert_eq!(merged.age, 31);
    }

    #[test]
    fn validation_covers_the_full_merged_record() {
        let update = PatientUpdate {
            height: Some(-1.6),
            ..Default::default()
        };
        let err = update.apply("P001", &existing()).expect_err("should reject");
        match err {
            PatientError::Validation { field, .. } => assert_eq!(field, "height"),
            other => panic!("expected Validation error, got {other:?}"),
        }
    }
}
