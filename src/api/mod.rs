//! API handlers for LabTrack REST endpoints

pub mod advisor;
pub mod dashboard;
pub mod health;
pub mod instruments;
pub mod maintenance;
pub mod openapi;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Instruments
        .route(
            "/instruments",
            get(instruments::list_instruments).post(instruments::create_instrument),
        )
        .route(
            "/instruments/:id",
            get(instruments::get_instrument).put(instruments::update_instrument),
        )
        .route("/instruments/:id/archive", post(instruments::archive_instrument))
        .route("/instruments/:id/due-status", get(instruments::get_due_status))
        // Maintenance
        .route(
            "/instruments/:id/maintenance",
            get(maintenance::list_instrument_maintenance).post(maintenance::schedule_maintenance),
        )
        .route(
            "/maintenance/:id",
            get(maintenance::get_maintenance_event).put(maintenance::update_maintenance_event),
        )
        .route("/maintenance/:id/complete", post(maintenance::complete_maintenance_event))
        // Dashboard
        .route("/dashboard/summary", get(dashboard::get_summary))
        .route("/dashboard/upcoming", get(dashboard::get_upcoming))
        .route("/dashboard/maintenance-types", get(dashboard::get_maintenance_types))
        // Advisor
        .route("/advisor/predict", post(advisor::predict))
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
