//! Business logic services

pub mod advisor;
pub mod dashboard;
pub mod instruments;
pub mod maintenance;

use std::sync::Arc;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub instruments: instruments::InstrumentsService,
    pub maintenance: maintenance::MaintenanceService,
    pub dashboard: dashboard::DashboardService,
    pub advisor: advisor::AdvisorService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        config: &AppConfig,
        predictor: Arc<dyn advisor::Predictor>,
    ) -> Self {
        let interval = config.scheduling.default_interval_months;
        Self {
            instruments: instruments::InstrumentsService::new(repository.clone(), interval),
            maintenance: maintenance::MaintenanceService::new(repository.clone(), interval),
            dashboard: dashboard::DashboardService::new(
                repository.clone(),
                config.scheduling.upcoming_window_days,
            ),
            advisor: advisor::AdvisorService::new(repository.clone(), predictor),
            repository,
        }
    }

    /// Check that the database answers
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        self.repository.ping().await
    }
}
