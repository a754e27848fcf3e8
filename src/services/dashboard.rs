//! Dashboard aggregation service

use chrono::{DateTime, Utc};

use crate::{
    error::AppResult,
    models::instrument::UpcomingMaintenance,
    repository::Repository,
    scheduler::{self, FleetSummary, TypeCount},
};

#[derive(Clone)]
pub struct DashboardService {
    repository: Repository,
    default_window_days: i64,
}

impl DashboardService {
    pub fn new(repository: Repository, default_window_days: i64) -> Self {
        Self {
            repository,
            default_window_days,
        }
    }

    /// Overview counters for the whole fleet
    pub async fn summary(&self, now: DateTime<Utc>) -> AppResult<FleetSummary> {
        let instruments = self.repository.instruments.list_all().await?;
        Ok(scheduler::summarize_fleet(&instruments, now))
    }

    /// Instruments due within the window, soonest first
    pub async fn upcoming(
        &self,
        now: DateTime<Utc>,
        window_days: Option<i64>,
    ) -> AppResult<Vec<UpcomingMaintenance>> {
        let window = window_days.unwrap_or(self.default_window_days);
        let instruments = self.repository.instruments.list_all().await?;

        Ok(scheduler::upcoming_within_window(&instruments, now, window)
            .into_iter()
            .filter_map(|i| {
                let next = i.next_maintenance_date?;
                Some(UpcomingMaintenance {
                    id: i.id,
                    name: i.name.clone(),
                    serial_number: i.serial_number.clone(),
                    location: i.location.clone(),
                    status: i.status,
                    next_maintenance_date: next,
                    days_left: scheduler::days_between(now, next),
                })
            })
            .collect())
    }

    /// Instrument count per maintenance type
    pub async fn maintenance_types(&self) -> AppResult<Vec<TypeCount>> {
        let instruments = self.repository.instruments.list_all().await?;
        Ok(scheduler::maintenance_type_distribution(&instruments))
    }
}
