//! Maintenance event endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::maintenance::{
        CompleteMaintenanceEvent, CompletedMaintenance, CreateMaintenanceEvent, MaintenanceEvent,
        MaintenanceEventEntry, UpdateMaintenanceEvent,
    },
};

use super::instruments::AtQuery;

/// Maintenance history of an instrument
#[utoipa::path(
    get,
    path = "/instruments/{id}/maintenance",
    tag = "maintenance",
    params(("id" = Uuid, Path, description = "Instrument ID"), AtQuery),
    responses(
        (status = 200, description = "Events, newest first", body = Vec<MaintenanceEventEntry>),
        (status = 404, description = "Instrument not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_instrument_maintenance(
    State(state): State<crate::AppState>,
    Path(instrument_id): Path<Uuid>,
    Query(query): Query<AtQuery>,
) -> AppResult<Json<Vec<MaintenanceEventEntry>>> {
    let now = query.at.unwrap_or_else(Utc::now);
    let history = state.services.maintenance.history(instrument_id, now).await?;
    Ok(Json(history))
}

/// Schedule maintenance for an instrument
#[utoipa::path(
    post,
    path = "/instruments/{id}/maintenance",
    tag = "maintenance",
    params(("id" = Uuid, Path, description = "Instrument ID")),
    request_body = CreateMaintenanceEvent,
    responses(
        (status = 201, description = "Event scheduled", body = MaintenanceEvent),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 404, description = "Instrument not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn schedule_maintenance(
    State(state): State<crate::AppState>,
    Path(instrument_id): Path<Uuid>,
    Json(data): Json<CreateMaintenanceEvent>,
) -> AppResult<(StatusCode, Json<MaintenanceEvent>)> {
    let event = state.services.maintenance.schedule(instrument_id, &data).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// Get a maintenance event
#[utoipa::path(
    get,
    path = "/maintenance/{id}",
    tag = "maintenance",
    params(("id" = Uuid, Path, description = "Maintenance event ID")),
    responses(
        (status = 200, description = "Event details", body = MaintenanceEvent),
        (status = 404, description = "Event not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_maintenance_event(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MaintenanceEvent>> {
    let event = state.services.maintenance.get_by_id(id).await?;
    Ok(Json(event))
}

/// Update a pending maintenance event
#[utoipa::path(
    put,
    path = "/maintenance/{id}",
    tag = "maintenance",
    params(("id" = Uuid, Path, description = "Maintenance event ID")),
    request_body = UpdateMaintenanceEvent,
    responses(
        (status = 200, description = "Event updated", body = MaintenanceEvent),
        (status = 404, description = "Event not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Event already completed", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_maintenance_event(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateMaintenanceEvent>,
) -> AppResult<Json<MaintenanceEvent>> {
    let event = state.services.maintenance.update(id, &data).await?;
    Ok(Json(event))
}

/// Mark a maintenance event as completed and reschedule the instrument
#[utoipa::path(
    post,
    path = "/maintenance/{id}/complete",
    tag = "maintenance",
    params(("id" = Uuid, Path, description = "Maintenance event ID")),
    request_body = CompleteMaintenanceEvent,
    responses(
        (status = 200, description = "Updated event and instrument", body = CompletedMaintenance),
        (status = 400, description = "Invalid interval", body = crate::error::ErrorResponse),
        (status = 404, description = "Event not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Event already completed", body = crate::error::ErrorResponse)
    )
)]
pub async fn complete_maintenance_event(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<CompleteMaintenanceEvent>,
) -> AppResult<Json<CompletedMaintenance>> {
    let result = state
        .services
        .maintenance
        .complete(id, &data, Utc::now())
        .await?;
    Ok(Json(result))
}
