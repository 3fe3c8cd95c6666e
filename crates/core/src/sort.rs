//! Sort parameters for the patient listing.

use std::str::FromStr;

use crate::patient::StoredPatient;
use crate::PatientError;

/// The fields a patient listing may be sorted by.
///
/// Restricted to the numeric attributes; sorting by `bmi` uses the stored
/// (last-computed) value, which the write paths keep consistent with
/// `height`/`weight`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Height,
    Weight,
    Bmi,
    Age,
}

impl SortField {
    /// The record's current value of this field, as a sort key.
    pub fn key(self, patient: &StoredPatient) -> f64 {
        match self {
            SortField::Height => patient.height,
            SortField::Weight => patient.weight,
            SortField::Bmi => patient.bmi,
            SortField::Age => f64::from(patient.age),
        }
    }
}

impl FromStr for SortField {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "height" => Ok(SortField::Height),
            "weight" => Ok(SortField::Weight),
            "bmi" => Ok(SortField::Bmi),
            "age" => Ok(SortField::Age),
            other => Err(PatientError::InvalidSortField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(PatientError::InvalidSortOrder(other.to_string())),
        }
    }
}
