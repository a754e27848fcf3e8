//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{advisor, dashboard, health, instruments, maintenance};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LabTrack API",
        version = "0.1.0",
        description = "Laboratory Instrument Maintenance REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Instruments
        instruments::list_instruments,
        instruments::get_instrument,
        instruments::create_instrument,
        instruments::update_instrument,
        instruments::archive_instrument,
        instruments::get_due_status,
        // Maintenance
        maintenance::list_instrument_maintenance,
        maintenance::schedule_maintenance,
        maintenance::get_maintenance_event,
        maintenance::update_maintenance_event,
        maintenance::complete_maintenance_event,
        // Dashboard
        dashboard::get_summary,
        dashboard::get_upcoming,
        dashboard::get_maintenance_types,
        // Advisor
        advisor::predict,
    ),
    components(
        schemas(
            // Instruments
            crate::models::instrument::Instrument,
            crate::models::instrument::CreateInstrument,
            crate::models::instrument::UpdateInstrument,
            crate::models::instrument::InstrumentQuery,
            crate::models::instrument::InstrumentPage,
            crate::models::instrument::DueStatusReport,
            crate::models::instrument::UpcomingMaintenance,
            crate::models::enums::InstrumentStatus,
            crate::models::enums::MaintenanceType,
            crate::models::enums::MaintenanceEventType,
            // Maintenance
            crate::models::maintenance::MaintenanceEvent,
            crate::models::maintenance::MaintenanceEventEntry,
            crate::models::maintenance::CreateMaintenanceEvent,
            crate::models::maintenance::UpdateMaintenanceEvent,
            crate::models::maintenance::CompleteMaintenanceEvent,
            crate::models::maintenance::CompletedMaintenance,
            crate::scheduler::EventState,
            // Dashboard
            crate::scheduler::FleetSummary,
            crate::scheduler::TypeCount,
            dashboard::UpcomingQuery,
            // Advisor
            crate::models::advisor::AdvisorRequest,
            crate::models::advisor::Prediction,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "instruments", description = "Instrument inventory"),
        (name = "maintenance", description = "Maintenance scheduling and history"),
        (name = "dashboard", description = "Dashboard aggregates"),
        (name = "advisor", description = "Predictive maintenance advisor")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
