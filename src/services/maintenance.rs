//! Maintenance events service

use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        maintenance::{
            CompleteMaintenanceEvent, CreateMaintenanceEvent, MaintenanceEventEntry,
            UpdateMaintenanceEvent,
        },
        CompletedMaintenance, Instrument, MaintenanceEvent,
    },
    repository::Repository,
    scheduler,
};

#[derive(Clone)]
pub struct MaintenanceService {
    repository: Repository,
    default_interval_months: i32,
}

impl MaintenanceService {
    pub fn new(repository: Repository, default_interval_months: i32) -> Self {
        Self {
            repository,
            default_interval_months,
        }
    }

    /// Maintenance history of an instrument, newest first
    pub async fn history(
        &self,
        instrument_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<MaintenanceEventEntry>> {
        // Verify instrument exists
        self.repository.instruments.get_by_id(instrument_id).await?;

        let events = self
            .repository
            .maintenance
            .list_for_instrument(instrument_id)
            .await?;

        Ok(scheduler::maintenance_history(events)
            .into_iter()
            .map(|event| {
                let state = scheduler::classify_event(&event, now);
                MaintenanceEventEntry { event, state }
            })
            .collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<MaintenanceEvent> {
        self.repository.maintenance.get_by_id(id).await
    }

    /// Schedule a maintenance event for an instrument
    pub async fn schedule(
        &self,
        instrument_id: Uuid,
        data: &CreateMaintenanceEvent,
    ) -> AppResult<MaintenanceEvent> {
        data.validate()?;
        self.repository.instruments.get_by_id(instrument_id).await?;

        let event = self.repository.maintenance.create(instrument_id, data).await?;
        tracing::info!(event_id = %event.id, instrument_id = %instrument_id, "Maintenance scheduled");
        Ok(event)
    }

    /// Edit a pending event
    pub async fn update(&self, id: Uuid, data: &UpdateMaintenanceEvent) -> AppResult<MaintenanceEvent> {
        data.validate()?;

        let event = self.repository.maintenance.get_by_id(id).await?;
        if event.completed {
            return Err(AppError::BusinessRule(
                "Completed maintenance events cannot be edited".to_string(),
            ));
        }

        self.repository.maintenance.update(id, data).await
    }

    /// Mark an event as done and reschedule its instrument
    pub async fn complete(
        &self,
        id: Uuid,
        data: &CompleteMaintenanceEvent,
        now: DateTime<Utc>,
    ) -> AppResult<CompletedMaintenance> {
        let event = self.repository.maintenance.get_by_id(id).await?;
        if event.completed {
            return Err(AppError::BusinessRule(
                "Maintenance event already completed".to_string(),
            ));
        }

        let instrument = self.repository.instruments.get_by_id(event.instrument_id).await?;
        let result = plan_completion(&instrument, &event, data, now, self.default_interval_months)?;

        let saved = self
            .repository
            .maintenance
            .save_completion(&result.event, &result.instrument)
            .await?;

        tracing::info!(
            event_id = %id,
            instrument_id = %saved.instrument.id,
            next_maintenance_date = ?saved.instrument.next_maintenance_date,
            "Maintenance completed"
        );
        Ok(saved)
    }
}

/// Request override, then the instrument's own interval, then the configured default
pub fn resolve_interval(
    requested: Option<i32>,
    instrument: &Instrument,
    default_interval_months: i32,
) -> i32 {
    requested
        .or(instrument.maintenance_interval_months)
        .unwrap_or(default_interval_months)
}

/// Both records as they will be saved once `event` is completed.
///
/// The completion date defaults to `now`. Notes given in the request replace
/// the event's notes, files are appended.
pub fn plan_completion(
    instrument: &Instrument,
    event: &MaintenanceEvent,
    data: &CompleteMaintenanceEvent,
    now: DateTime<Utc>,
    default_interval_months: i32,
) -> AppResult<CompletedMaintenance> {
    let completion_date = data.completion_date.unwrap_or(now);
    let interval = resolve_interval(data.interval_months, instrument, default_interval_months);

    let mut result =
        scheduler::complete_maintenance_event(instrument, event, completion_date, interval)?;
    if let Some(ref notes) = data.notes {
        result.event.notes = Some(notes.clone());
    }
    result.event.files.extend(data.files.iter().cloned());
    Ok(result)
}
