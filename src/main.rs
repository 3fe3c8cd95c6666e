use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_rest::{ApiDoc, AppState};
use pms_core::{FileStorage, PatientService};

/// Main entry point for the PMS application.
///
/// Starts the REST server on port 3000 (configurable via PMS_REST_ADDR)
/// and serves the patient store from a single JSON document.
///
/// # Environment Variables
/// - `PMS_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `PMS_DATA_FILE`: Path of the patient store document (default: "patients.json")
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If server startup or runtime fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("pms=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("PMS_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let config = pms_core::config::data_file_from_env_value(std::env::var("PMS_DATA_FILE").ok())?;

    tracing::info!("++ Starting PMS REST on {}", rest_addr);
    tracing::info!(
        "++ Patient store document: {}",
        config.patient_data_file().display()
    );

    let storage = Arc::new(FileStorage::new(config.patient_data_file()));
    let patient_service = PatientService::new(storage);

    let app = api_rest::router(AppState { patient_service })
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
