//! Instrument inventory endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::instrument::{
        CreateInstrument, DueStatusReport, Instrument, InstrumentPage, InstrumentQuery,
        UpdateInstrument,
    },
};

/// Reference time for computed statuses
#[derive(Debug, Deserialize, IntoParams)]
pub struct AtQuery {
    /// Evaluate as of this instant (defaults to now)
    pub at: Option<DateTime<Utc>>,
}

/// List instruments
#[utoipa::path(
    get,
    path = "/instruments",
    tag = "instruments",
    params(InstrumentQuery),
    responses(
        (status = 200, description = "Paginated instrument list", body = InstrumentPage),
        (status = 400, description = "Page out of range", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_instruments(
    State(state): State<crate::AppState>,
    Query(query): Query<InstrumentQuery>,
) -> AppResult<Json<InstrumentPage>> {
    let page = state.services.instruments.list(&query).await?;
    Ok(Json(page))
}

/// Get instrument by ID
#[utoipa::path(
    get,
    path = "/instruments/{id}",
    tag = "instruments",
    params(("id" = Uuid, Path, description = "Instrument ID")),
    responses(
        (status = 200, description = "Instrument details", body = Instrument),
        (status = 404, description = "Instrument not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_instrument(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Instrument>> {
    let instrument = state.services.instruments.get_by_id(id).await?;
    Ok(Json(instrument))
}

/// Add an instrument to the inventory
#[utoipa::path(
    post,
    path = "/instruments",
    tag = "instruments",
    request_body = CreateInstrument,
    responses(
        (status = 201, description = "Instrument created", body = Instrument),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 409, description = "Serial number already registered", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_instrument(
    State(state): State<crate::AppState>,
    Json(data): Json<CreateInstrument>,
) -> AppResult<(StatusCode, Json<Instrument>)> {
    let instrument = state.services.instruments.create(&data).await?;
    Ok((StatusCode::CREATED, Json(instrument)))
}

/// Update an instrument
#[utoipa::path(
    put,
    path = "/instruments/{id}",
    tag = "instruments",
    params(("id" = Uuid, Path, description = "Instrument ID")),
    request_body = UpdateInstrument,
    responses(
        (status = 200, description = "Instrument updated", body = Instrument),
        (status = 404, description = "Instrument not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Serial number already registered", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_instrument(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateInstrument>,
) -> AppResult<Json<Instrument>> {
    let instrument = state.services.instruments.update(id, &data).await?;
    Ok(Json(instrument))
}

/// Archive an instrument
#[utoipa::path(
    post,
    path = "/instruments/{id}/archive",
    tag = "instruments",
    params(("id" = Uuid, Path, description = "Instrument ID")),
    responses(
        (status = 200, description = "Instrument archived", body = Instrument),
        (status = 404, description = "Instrument not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn archive_instrument(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Instrument>> {
    let instrument = state.services.instruments.archive(id).await?;
    Ok(Json(instrument))
}

/// Due / overdue status of an instrument
#[utoipa::path(
    get,
    path = "/instruments/{id}/due-status",
    tag = "instruments",
    params(("id" = Uuid, Path, description = "Instrument ID"), AtQuery),
    responses(
        (status = 200, description = "Computed due status", body = DueStatusReport),
        (status = 404, description = "Instrument not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_due_status(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<AtQuery>,
) -> AppResult<Json<DueStatusReport>> {
    let now = query.at.unwrap_or_else(Utc::now);
    let report = state.services.instruments.due_status(id, now).await?;
    Ok(Json(report))
}
