#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound(String),
    #[error("Patient with this ID already exists")]
    DuplicateId(String),
    #[error("invalid value for {field}: {detail}")]
    Validation {
        field: &'static str,
        detail: String,
    },
    #[error("Invalid sort field: {0}. Valid fields are: height, weight, bmi, age")]
    InvalidSortField(String),
    #[error("Order must be 'asc' or 'desc'")]
    InvalidSortOrder(String),
    #[error("failed to read patient store: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write patient store: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to serialize patient store: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize patient store: {0}")]
    Deserialization(serde_json::Error),
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;
