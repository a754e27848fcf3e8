//! Instrument inventory service

use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        instrument::{CreateInstrument, DueStatusReport, InstrumentPage, InstrumentQuery, UpdateInstrument},
        Instrument, InstrumentStatus,
    },
    repository::Repository,
    scheduler,
};

#[derive(Clone)]
pub struct InstrumentsService {
    repository: Repository,
    default_interval_months: i32,
}

impl InstrumentsService {
    pub fn new(repository: Repository, default_interval_months: i32) -> Self {
        Self {
            repository,
            default_interval_months,
        }
    }

    pub async fn list(&self, query: &InstrumentQuery) -> AppResult<InstrumentPage> {
        let (instruments, total) = self.repository.instruments.list(query).await?;
        Ok(InstrumentPage {
            instruments,
            total,
            page: query.page_number(),
            per_page: query.page_size(),
        })
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Instrument> {
        self.repository.instruments.get_by_id(id).await
    }

    /// Register an instrument; its schedule starts at the installation date
    pub async fn create(&self, data: &CreateInstrument) -> AppResult<Instrument> {
        data.validate()?;

        if self
            .repository
            .instruments
            .serial_number_exists(&data.serial_number, None)
            .await?
        {
            return Err(AppError::Conflict("Serial number already registered".to_string()));
        }

        let interval = data
            .maintenance_interval_months
            .unwrap_or(self.default_interval_months);
        let (last, next) = scheduler::initial_schedule(data.installation_date, interval)?;
        let status = data.status.unwrap_or_default();

        let instrument = self
            .repository
            .instruments
            .create(data, status, last, next)
            .await?;

        tracing::info!(instrument_id = %instrument.id, name = %instrument.name, "Instrument created");
        Ok(instrument)
    }

    pub async fn update(&self, id: Uuid, data: &UpdateInstrument) -> AppResult<Instrument> {
        data.validate()?;

        if let Some(ref serial_number) = data.serial_number {
            if self
                .repository
                .instruments
                .serial_number_exists(serial_number, Some(id))
                .await?
            {
                return Err(AppError::Conflict("Serial number already registered".to_string()));
            }
        }

        let instrument = self.repository.instruments.update(id, data).await?;
        tracing::info!(instrument_id = %id, "Instrument updated");
        Ok(instrument)
    }

    /// Instruments are never deleted, only archived
    pub async fn archive(&self, id: Uuid) -> AppResult<Instrument> {
        let instrument = self
            .repository
            .instruments
            .set_status(id, InstrumentStatus::Archived)
            .await?;
        tracing::info!(instrument_id = %id, "Instrument archived");
        Ok(instrument)
    }

    pub async fn due_status(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<DueStatusReport> {
        let instrument = self.repository.instruments.get_by_id(id).await?;
        Ok(DueStatusReport::new(&instrument, now))
    }
}
