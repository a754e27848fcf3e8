//! Maintenance events repository

use chrono::Utc;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        maintenance::{CreateMaintenanceEvent, UpdateMaintenanceEvent},
        CompletedMaintenance, Instrument, MaintenanceEvent,
    },
};

#[derive(Clone)]
pub struct MaintenanceRepository {
    pool: Pool<Postgres>,
}

impl MaintenanceRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// All events of an instrument
    pub async fn list_for_instrument(&self, instrument_id: Uuid) -> AppResult<Vec<MaintenanceEvent>> {
        let rows = sqlx::query_as::<_, MaintenanceEvent>(
            "SELECT * FROM maintenance_events WHERE instrument_id = $1 ORDER BY date DESC, id",
        )
        .bind(instrument_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Get event by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<MaintenanceEvent> {
        sqlx::query_as::<_, MaintenanceEvent>("SELECT * FROM maintenance_events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::EventNotFound(id))
    }

    /// Schedule a new event
    pub async fn create(
        &self,
        instrument_id: Uuid,
        data: &CreateMaintenanceEvent,
    ) -> AppResult<MaintenanceEvent> {
        let row = sqlx::query_as::<_, MaintenanceEvent>(
            r#"
            INSERT INTO maintenance_events (
                instrument_id, date, event_type, description, notes, completed, files
            ) VALUES ($1, $2, $3, $4, $5, FALSE, $6)
            RETURNING *
            "#,
        )
        .bind(instrument_id)
        .bind(data.date)
        .bind(data.event_type.unwrap_or_default())
        .bind(data.description.trim())
        .bind(&data.notes)
        .bind(&data.files)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update an event (only provided fields)
    pub async fn update(&self, id: Uuid, data: &UpdateMaintenanceEvent) -> AppResult<MaintenanceEvent> {
        let now = Utc::now();
        let mut sets = vec!["modif_date = $1".to_string()];
        let mut idx = 2;

        macro_rules! add_f {
            ($field:expr, $name:expr) => {
                if $field.is_some() { sets.push(format!("{} = ${}", $name, idx)); idx += 1; }
            };
        }

        add_f!(data.date, "date");
        add_f!(data.event_type, "event_type");
        add_f!(data.description, "description");
        add_f!(data.notes, "notes");
        add_f!(data.files, "files");

        let query = format!(
            "UPDATE maintenance_events SET {} WHERE id = ${} RETURNING *",
            sets.join(", "),
            idx
        );

        let mut builder = sqlx::query_as::<_, MaintenanceEvent>(&query).bind(now);

        macro_rules! bind_f {
            ($field:expr) => {
                if let Some(ref val) = $field { builder = builder.bind(val); }
            };
        }

        bind_f!(data.date);
        bind_f!(data.event_type);
        bind_f!(data.description);
        bind_f!(data.notes);
        bind_f!(data.files);

        builder
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::EventNotFound(id))
    }

    /// Persist a completed event and the rescheduled instrument atomically.
    /// Fails if the event was completed concurrently.
    pub async fn save_completion(
        &self,
        event: &MaintenanceEvent,
        instrument: &Instrument,
    ) -> AppResult<CompletedMaintenance> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let event = sqlx::query_as::<_, MaintenanceEvent>(
            r#"
            UPDATE maintenance_events
            SET completed = $1, date = $2, notes = $3, files = $4, modif_date = $5
            WHERE id = $6 AND completed = FALSE
            RETURNING *
            "#,
        )
        .bind(event.completed)
        .bind(event.date)
        .bind(&event.notes)
        .bind(&event.files)
        .bind(now)
        .bind(event.id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::BusinessRule("Maintenance event already completed".to_string()))?;

        let instrument = sqlx::query_as::<_, Instrument>(
            r#"
            UPDATE instruments
            SET last_maintenance_date = $1, next_maintenance_date = $2, modif_date = $3
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(instrument.last_maintenance_date)
        .bind(instrument.next_maintenance_date)
        .bind(now)
        .bind(instrument.id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::InstrumentNotFound(instrument.id))?;

        tx.commit().await?;
        Ok(CompletedMaintenance { instrument, event })
    }
}
