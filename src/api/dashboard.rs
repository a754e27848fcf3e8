//! Dashboard endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::AppResult,
    models::instrument::UpcomingMaintenance,
    scheduler::{FleetSummary, TypeCount},
};

use super::instruments::AtQuery;

/// Upcoming maintenance query
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct UpcomingQuery {
    /// Evaluate as of this instant (defaults to now)
    pub at: Option<DateTime<Utc>>,
    /// Window size in days (defaults to the configured window)
    pub window_days: Option<i64>,
}

/// Fleet overview counters
#[utoipa::path(
    get,
    path = "/dashboard/summary",
    tag = "dashboard",
    params(AtQuery),
    responses(
        (status = 200, description = "Fleet summary", body = FleetSummary)
    )
)]
pub async fn get_summary(
    State(state): State<crate::AppState>,
    Query(query): Query<AtQuery>,
) -> AppResult<Json<FleetSummary>> {
    let now = query.at.unwrap_or_else(Utc::now);
    let summary = state.services.dashboard.summary(now).await?;
    Ok(Json(summary))
}

/// Instruments requiring maintenance within the window
#[utoipa::path(
    get,
    path = "/dashboard/upcoming",
    tag = "dashboard",
    params(UpcomingQuery),
    responses(
        (status = 200, description = "Upcoming maintenance, soonest first", body = Vec<UpcomingMaintenance>)
    )
)]
pub async fn get_upcoming(
    State(state): State<crate::AppState>,
    Query(query): Query<UpcomingQuery>,
) -> AppResult<Json<Vec<UpcomingMaintenance>>> {
    let now = query.at.unwrap_or_else(Utc::now);
    let upcoming = state.services.dashboard.upcoming(now, query.window_days).await?;
    Ok(Json(upcoming))
}

/// Distribution of instruments per maintenance type
#[utoipa::path(
    get,
    path = "/dashboard/maintenance-types",
    tag = "dashboard",
    responses(
        (status = 200, description = "Instrument count per maintenance type", body = Vec<TypeCount>)
    )
)]
pub async fn get_maintenance_types(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<TypeCount>>> {
    let distribution = state.services.dashboard.maintenance_types().await?;
    Ok(Json(distribution))
}
