//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into
//! core services. The intent is to avoid reading process-wide environment
//! variables during request handling, which can lead to inconsistent
//! behaviour in multi-threaded runtimes and test harnesses.

use std::path::{Path, PathBuf};

use crate::{PatientError, PatientResult};

/// Default location of the patient store document, relative to the working
/// directory.
pub const DEFAULT_DATA_FILE: &str = "patients.json";

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    patient_data_file: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::Validation` if the data file path is empty.
    pub fn new(patient_data_file: PathBuf) -> PatientResult<Self> {
        if patient_data_file.as_os_str().is_empty() {
            return Err(PatientError::Validation {
                field: "patient_data_file",
                detail: "patient data file path cannot be empty".into(),
            });
        }

        Ok(Self { patient_data_file })
    }

    pub fn patient_data_file(&self) -> &Path {
        &self.patient_data_file
    }
}

/// Resolve the patient data file from an optional environment value.
///
/// If `value` is `None` or empty/whitespace, falls back to
/// [`DEFAULT_DATA_FILE`].
pub fn data_file_from_env_value(value: Option<String>) -> PatientResult<CoreConfig> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_DATA_FILE.to_string());

    CoreConfig::new(PathBuf::from(value))
}
