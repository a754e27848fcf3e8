//! Maintenance event model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::enums::MaintenanceEventType;
use super::instrument::Instrument;
use crate::scheduler::EventState;

/// Maintenance event (scheduled or performed intervention)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MaintenanceEvent {
    pub id: Uuid,
    /// Owning instrument
    pub instrument_id: Uuid,
    /// Date the event occurred or is scheduled for
    pub date: DateTime<Utc>,
    pub event_type: MaintenanceEventType,
    pub description: String,
    pub notes: Option<String>,
    pub completed: bool,
    /// Attachment references, in upload order
    pub files: Vec<String>,
    pub crea_date: Option<DateTime<Utc>>,
    pub modif_date: Option<DateTime<Utc>>,
}

/// Event with its derived state, as returned by history listings
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MaintenanceEventEntry {
    #[serde(flatten)]
    pub event: MaintenanceEvent,
    pub state: EventState,
}

/// Schedule maintenance request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMaintenanceEvent {
    pub date: DateTime<Utc>,
    /// Defaults to scheduled
    pub event_type: Option<MaintenanceEventType>,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub notes: Option<String>,
    #[serde(default)]
    pub files: Vec<String>,
}

/// Update a pending maintenance event
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateMaintenanceEvent {
    pub date: Option<DateTime<Utc>>,
    pub event_type: Option<MaintenanceEventType>,
    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: Option<String>,
    pub notes: Option<String>,
    pub files: Option<Vec<String>>,
}

/// Complete maintenance request
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CompleteMaintenanceEvent {
    /// Completion date (defaults to now)
    pub completion_date: Option<DateTime<Utc>>,
    /// Recurrence interval override, in calendar months
    pub interval_months: Option<i32>,
    /// Completion notes (replace existing notes when provided)
    pub notes: Option<String>,
    /// Extra attachments appended to the event
    #[serde(default)]
    pub files: Vec<String>,
}

/// Result of completing an event: both records as persisted
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CompletedMaintenance {
    pub instrument: Instrument,
    pub event: MaintenanceEvent,
}
