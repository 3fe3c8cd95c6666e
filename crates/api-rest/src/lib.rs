//! # API REST
//!
//! REST API implementation for PMS.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, status mapping)
//!
//! All data operations are delegated to `pms-core`; this crate only
//! translates between the wire and the service layer.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, OpenApi, ToSchema};

use pms_core::{
    Gender, NewPatient, Patient, PatientError, PatientService, PatientStore, PatientUpdate,
    SortField, SortOrder, StoredPatient,
};

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub patient_service: PatientService,
}

/// Simple confirmation payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageRes {
    pub message: String,
}

/// Static service metadata for `GET /about`.
#[derive(Debug, Serialize, ToSchema)]
pub struct AboutRes {
    pub name: String,
    pub version: String,
    pub description: String,
}

/// Confirmation payload carrying the affected record.
#[derive(Debug, Serialize, ToSchema)]
pub struct PatientRes {
    pub message: String,
    pub patient: Patient,
}

/// Error payload: a machine-mapped status plus a human-readable detail.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorRes {
    pub detail: String,
}

/// Query parameters for `GET /sort`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct SortQuery {
    /// Field to sort by: one of height, weight, bmi, age.
    pub sort_by: String,
    /// Order of sorting: 'asc' or 'desc'.
    #[serde(default = "default_order")]
    pub order: String,
}

fn default_order() -> String {
    "asc".to_string()
}

/// Wrapper mapping core errors onto HTTP responses.
///
/// Storage failures are logged and surfaced as an opaque 500; everything
/// else carries its own detail message.
pub struct ApiError(PatientError);

impl From<PatientError> for ApiError {
    fn from(err: PatientError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self.0 {
            PatientError::NotFound(_) => (StatusCode::NOT_FOUND, self.0.to_string()),
            PatientError::DuplicateId(_) => (StatusCode::BAD_REQUEST, self.0.to_string()),
            PatientError::Validation { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, self.0.to_string())
            }
            PatientError::InvalidSortField(_) | PatientError::InvalidSortOrder(_) => {
                (StatusCode::BAD_REQUEST, self.0.to_string())
            }
            storage => {
                tracing::error!("storage error: {storage:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".into())
            }
        };

        (status, Json(ErrorRes { detail })).into_response()
    }
}

/// OpenAPI documentation for the REST surface.
#[derive(OpenApi)]
#[openapi(
    paths(
        read_root,
        read_about,
        view_patients,
        view_patient,
        sort_patients,
        create_patient,
        edit_patient,
        delete_patient
    ),
    components(schemas(
        Gender,
        Patient,
        StoredPatient,
        NewPatient,
        PatientUpdate,
        MessageRes,
        AboutRes,
        PatientRes,
        ErrorRes
    ))
)]
pub struct ApiDoc;

/// Builds the REST router over the given application state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(read_root))
        .route("/about", get(read_about))
        .route("/view", get(view_patients))
        .route("/patient/:id", get(view_patient))
        .route("/sort", get(sort_patients))
        .route("/create", post(create_patient))
        .route("/edit/:id", put(edit_patient))
        .route("/delete/:id", delete(delete_patient))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Liveness message", body = MessageRes)
    )
)]
async fn read_root() -> Json<MessageRes> {
    Json(MessageRes {
        message: "Patient Management System API".into(),
    })
}

#[utoipa::path(
    get,
    path = "/about",
    responses(
        (status = 200, description = "Static service metadata", body = AboutRes)
    )
)]
async fn read_about() -> Json<AboutRes> {
    Json(AboutRes {
        name: "Patient Management System API".into(),
        version: "1.0.0".into(),
        description: "API for managing patient records, appointments, and medical history.".into(),
    })
}

#[utoipa::path(
    get,
    path = "/view",
    responses(
        (status = 200, description = "Full mapping of patient id to record"),
        (status = 500, description = "Storage failure", body = ErrorRes)
    )
)]
/// Full dump of the patient store.
///
/// # Returns
/// * `Ok(Json<PatientStore>)` - The store contents verbatim
/// * `Err(ApiError)` - Internal server error if the store cannot be read
async fn view_patients(State(state): State<AppState>) -> Result<Json<PatientStore>, ApiError> {
    let store = state.patient_service.view_patients()?;
    Ok(Json(store))
}

#[utoipa::path(
    get,
    path = "/patient/{id}",
    params(("id" = String, Path, description = "The ID of the patient to view")),
    responses(
        (status = 200, description = "The patient record", body = StoredPatient),
        (status = 404, description = "Patient not found", body = ErrorRes)
    )
)]
/// Single record lookup.
///
/// Returns the stored value object; the id is the lookup key and is not
/// repeated in the body.
async fn view_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StoredPatient>, ApiError> {
    let patient = state.patient_service.get_patient(&id)?;
    Ok(Json(patient))
}

#[utoipa::path(
    get,
    path = "/sort",
    params(SortQuery),
    responses(
        (status = 200, description = "Records ordered by the requested field", body = [StoredPatient]),
        (status = 400, description = "Invalid sort field or order", body = ErrorRes)
    )
)]
/// Sorted listing of all records.
async fn sort_patients(
    State(state): State<AppState>,
    Query(query): Query<SortQuery>,
) -> Result<Json<Vec<StoredPatient>>, ApiError> {
    let field: SortField = query.sort_by.parse()?;
    let order: SortOrder = query.order.parse()?;
    let patients = state.patient_service.sort_patients(field, order)?;
    Ok(Json(patients))
}

#[utoipa::path(
    post,
    path = "/create",
    request_body = NewPatient,
    responses(
        (status = 201, description = "Patient created", body = PatientRes),
        (status = 400, description = "Patient with this ID already exists", body = ErrorRes),
        (status = 422, description = "Validation failure", body = ErrorRes)
    )
)]
/// Create a new patient record.
///
/// The body carries the base attributes; `bmi` and `verdict` are computed
/// server-side before the record is persisted.
///
/// # Returns
/// * `(StatusCode::CREATED, Json<PatientRes>)` - The created record
/// * `Err(ApiError)` - Duplicate id, validation failure, or storage error
async fn create_patient(
    State(state): State<AppState>,
    Json(req): Json<NewPatient>,
) -> Result<(StatusCode, Json<PatientRes>), ApiError> {
    let patient = state.patient_service.create_patient(req)?;
    Ok((
        StatusCode::CREATED,
        Json(PatientRes {
            message: "Patient created successfully".into(),
            patient,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/edit/{id}",
    params(("id" = String, Path, description = "The ID of the patient to update")),
    request_body = PatientUpdate,
    responses(
        (status = 200, description = "Patient updated", body = PatientRes),
        (status = 404, description = "Patient not found", body = ErrorRes),
        (status = 422, description = "Validation failure after merge", body = ErrorRes)
    )
)]
/// Partial update of an existing record.
///
/// Only the fields present in the body are changed; the merged record is
/// revalidated as a whole and its derived fields recomputed. The id in the
/// path is authoritative.
async fn edit_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<PatientUpdate>,
) -> Result<Json<PatientRes>, ApiError> {
    let patient = state.patient_service.update_patient(&id, update)?;
    Ok(Json(PatientRes {
        message: "Patient updated successfully".into(),
        patient,
    }))
}

#[utoipa::path(
    delete,
    path = "/delete/{id}",
    params(("id" = String, Path, description = "The ID of the patient to delete")),
    responses(
        (status = 200, description = "Patient deleted", body = MessageRes),
        (status = 404, description = "Patient not found", body = ErrorRes)
    )
)]
/// Remove a record from the store.
async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageRes>, ApiError> {
    state.patient_service.delete_patient(&id)?;
    Ok(Json(MessageRes {
        message: "Patient deleted successfully".into(),
    }))
}
