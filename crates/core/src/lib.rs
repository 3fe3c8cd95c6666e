//! # PMS Core
//!
//! Core business logic for the PMS patient record system.
//!
//! This crate contains pure data operations over a single-document patient
//! store:
//! - Record model with validated base attributes and derived `bmi`/`verdict`
//! - Partial-update merge with full-record revalidation
//! - Query and sort operations
//! - Storage backends (file-backed for production, in-memory for tests)
//!
//! **No API concerns**: HTTP routing, status mapping and OpenAPI
//! documentation belong in `api-rest`.

pub mod config;
pub mod error;
pub mod patient;
pub mod service;
pub mod sort;
pub mod storage;
pub mod update;

pub use config::CoreConfig;
pub use error::{PatientError, PatientResult};
pub use patient::{Gender, NewPatient, Patient, StoredPatient};
pub use service::PatientService;
pub use sort::{SortField, SortOrder};
pub use storage::{FileStorage, MemoryStorage, PatientStore, StorageBackend};
pub use update::PatientUpdate;
