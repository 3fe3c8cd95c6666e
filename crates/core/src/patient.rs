//! Patient record model.
//!
//! A patient record carries six base attributes plus two derived attributes
//! (`bmi` and `verdict`). The derived attributes are never authoritative:
//! they are recomputed from the base attributes by [`NewPatient::validate`]
//! whenever a record is created or merged, so no stored or returned record
//! can carry a stale value.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{PatientError, PatientResult};

/// The gender of a patient, lowercase on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// A complete patient record as returned by create/update operations.
///
/// Derived attributes are always consistent with `height`/`weight` because
/// the only way to obtain a `Patient` is through validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Patient {
    /// Unique, externally assigned identifier. Immutable once created.
    #[schema(example = "P001")]
    pub id: String,
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = "New York")]
    pub city: String,
    #[schema(example = 30)]
    pub age: u32,
    pub gender: Gender,
    /// Height in metres.
    #[schema(example = 1.55)]
    pub height: f64,
    /// Weight in kilograms.
    #[schema(example = 70.0)]
    pub weight: f64,
    pub bmi: f64,
    pub verdict: String,
}

/// The value object persisted in the store document. The patient id is the
/// document key, not part of the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StoredPatient {
    pub name: String,
    pub city: String,
    pub age: u32,
    pub gender: Gender,
    pub height: f64,
    pub weight: f64,
    pub bmi: f64,
    pub verdict: String,
}

impl Patient {
    /// Splits the record into its store key and value object.
    pub fn into_stored(self) -> (String, StoredPatient) {
        (
            self.id,
            StoredPatient {
                name: self.name,
                city: self.city,
                age: self.age,
                gender: self.gender,
                height: self.height,
                weight: self.weight,
                bmi: self.bmi,
                verdict: self.verdict,
            },
        )
    }

    pub fn from_stored(id: impl Into<String>, stored: StoredPatient) -> Self {
        Self {
            id: id.into(),
            name: stored.name,
            city: stored.city,
            age: stored.age,
            gender: stored.gender,
            height: stored.height,
            weight: stored.weight,
            bmi: stored.bmi,
            verdict: stored.verdict,
        }
    }
}

/// Candidate attributes for a patient record, prior to validation.
///
/// This is the create-request body shape: base attributes only, derived
/// attributes are computed server-side.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewPatient {
    #[schema(example = "P001")]
    pub id: String,
    pub name: String,
    pub city: String,
    pub age: u32,
    pub gender: Gender,
    pub height: f64,
    pub weight: f64,
}

impl NewPatient {
    /// Validates the candidate attributes and computes the derived fields.
    ///
    /// Missing fields, type mismatches and unknown gender literals are
    /// rejected earlier by serde at the wire boundary; this enforces the
    /// value constraints that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::Validation` naming the offending field when
    /// the id is empty, or `height`/`weight` is not a positive finite
    /// number. Non-positive height is rejected here so BMI never divides
    /// by zero.
    pub fn validate(self) -> PatientResult<Patient> {
        if self.id.trim().is_empty() {
            return Err(PatientError::Validation {
                field: "id",
                detail: "id cannot be empty".into(),
            });
        }
        if !(self.height > 0.0) || !self.height.is_finite() {
            return Err(PatientError::Validation {
                field: "height",
                detail: format!("height must be a positive number of metres, got {}", self.height),
            });
        }
        if !(self.weight > 0.0) || !self.weight.is_finite() {
            return Err(PatientError::Validation {
                field: "weight",
                detail: format!("weight must be a positive number of kilograms, got {}", self.weight),
            });
        }

        let bmi = compute_bmi(self.height, self.weight);
        let verdict = compute_verdict(bmi).to_string();

        Ok(Patient {
            id: self.id,
            name: self.name,
            city: self.city,
            age: self.age,
            gender: self.gender,
            height: self.height,
            weight: self.weight,
            bmi,
            verdict,
        })
    }
}

/// Body mass index from height in metres and weight in kilograms, rounded
/// to two decimal places.
pub fn compute_bmi(height: f64, weight: f64) -> f64 {
    let bmi = weight / (height * height);
    (bmi * 100.0).round() / 100.0
}

/// Weight-category verdict for a BMI value.
///
/// Values in `24.9..25.0` fall through to `Obesity`; existing clients
/// depend on these exact bands, so the hole is kept.
pub fn compute_verdict(bmi: f64) -> &'static str {
    if bmi < 18.5 {
        "Underweight"
    } else if (18.5..24.9).contains(&bmi) {
        "Normal weight"
    } else if (25.0..29.9).contains(&bmi) {
        "Overweight"
    } else {
        "Obesity"
    }
}
