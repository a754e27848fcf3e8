//! Instrument model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::enums::{InstrumentStatus, MaintenanceType};
use crate::{
    error::{AppError, AppResult},
    scheduler::{self, DueStatus},
};

const DEFAULT_PER_PAGE: i64 = 50;
const MAX_PER_PAGE: i64 = 500;

/// Laboratory instrument record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Instrument {
    pub id: Uuid,
    /// Display name (e.g. "Clinical Centrifuge")
    pub name: String,
    pub model: String,
    pub serial_number: String,
    /// Room / lab where the instrument is installed
    pub location: String,
    pub status: InstrumentStatus,
    pub installation_date: DateTime<Utc>,
    pub last_maintenance_date: DateTime<Utc>,
    /// Absent when no schedule is known
    pub next_maintenance_date: Option<DateTime<Utc>>,
    pub maintenance_type: Option<MaintenanceType>,
    /// Recurrence interval in calendar months; falls back to the configured default
    pub maintenance_interval_months: Option<i32>,
    pub image_id: Option<String>,
    pub crea_date: Option<DateTime<Utc>>,
    pub modif_date: Option<DateTime<Utc>>,
}

/// Create instrument request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateInstrument {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Model is required"))]
    pub model: String,
    #[validate(length(min = 1, message = "Serial number is required"))]
    pub serial_number: String,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    /// Defaults to operational
    pub status: Option<InstrumentStatus>,
    pub installation_date: DateTime<Utc>,
    pub maintenance_type: Option<MaintenanceType>,
    #[validate(range(min = 1, message = "Maintenance interval must be at least one month"))]
    pub maintenance_interval_months: Option<i32>,
    pub image_id: Option<String>,
}

/// Update instrument request (only provided fields are changed)
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateInstrument {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Model cannot be empty"))]
    pub model: Option<String>,
    #[validate(length(min = 1, message = "Serial number cannot be empty"))]
    pub serial_number: Option<String>,
    #[validate(length(min = 1, message = "Location cannot be empty"))]
    pub location: Option<String>,
    pub status: Option<InstrumentStatus>,
    pub last_maintenance_date: Option<DateTime<Utc>>,
    pub next_maintenance_date: Option<DateTime<Utc>>,
    pub maintenance_type: Option<MaintenanceType>,
    #[validate(range(min = 1, message = "Maintenance interval must be at least one month"))]
    pub maintenance_interval_months: Option<i32>,
    pub image_id: Option<String>,
}

/// Instrument list query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct InstrumentQuery {
    /// Case-insensitive match on name, model, serial number or location
    pub search: Option<String>,
    pub status: Option<InstrumentStatus>,
    /// Include archived instruments (default: false unless filtering on archived)
    pub include_archived: Option<bool>,
    /// Page number (1-based)
    pub page: Option<i64>,
    /// Items per page
    pub per_page: Option<i64>,
}

impl InstrumentQuery {
    /// Requested page, 1-based
    pub fn page_number(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn page_size(&self) -> i64 {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE)
    }

    /// Row offset of the requested page
    pub fn offset(&self) -> AppResult<i64> {
        (self.page_number() - 1)
            .checked_mul(self.page_size())
            .ok_or_else(|| AppError::BadRequest("Page number out of range".to_string()))
    }
}

/// Paginated instrument list
#[derive(Debug, Serialize, ToSchema)]
pub struct InstrumentPage {
    pub instruments: Vec<Instrument>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

/// Computed due status of one instrument
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DueStatusReport {
    pub instrument_id: Uuid,
    pub status: InstrumentStatus,
    pub next_maintenance_date: Option<DateTime<Utc>>,
    /// `{"status": "overdue" | "due_soon" | "scheduled" | "unknown", "days_left"?: n}`
    #[schema(value_type = Object)]
    pub due: DueStatus,
}

impl DueStatusReport {
    pub fn new(instrument: &Instrument, now: DateTime<Utc>) -> Self {
        Self {
            instrument_id: instrument.id,
            status: instrument.status,
            next_maintenance_date: instrument.next_maintenance_date,
            due: scheduler::classify_due_status(
                instrument.next_maintenance_date,
                instrument.status,
                now,
            ),
        }
    }
}

/// Row of the upcoming-maintenance table
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UpcomingMaintenance {
    pub id: Uuid,
    pub name: String,
    pub serial_number: String,
    pub location: String,
    pub status: InstrumentStatus,
    pub next_maintenance_date: DateTime<Utc>,
    pub days_left: i64,
}
