//! Predictive maintenance advisor

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use validator::Validate;

use crate::{
    config::AdvisorConfig,
    error::{AppError, AppResult},
    models::{
        advisor::AdvisorRequest, Instrument, MaintenanceEvent, Prediction, PredictionInput,
    },
    repository::Repository,
    scheduler,
};

/// Remote failure-prediction backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Predictor: Send + Sync {
    async fn predict(&self, input: &PredictionInput) -> AppResult<Prediction>;
}

/// Prediction endpoint reached over HTTP with a JSON body
pub struct HttpPredictor {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpPredictor {
    pub fn new(config: &AdvisorConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl Predictor for HttpPredictor {
    async fn predict(&self, input: &PredictionInput) -> AppResult<Prediction> {
        tracing::debug!("Prediction request to {}", self.endpoint);

        let mut request = self.client.post(&self.endpoint).json(input);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!("{}: {}", status, body)));
        }

        response
            .json::<Prediction>()
            .await
            .map_err(|e| AppError::Upstream(format!("Invalid prediction response: {}", e)))
    }
}

/// One line per event, newest first
pub fn render_history(events: &[MaintenanceEvent]) -> String {
    events
        .iter()
        .map(|e| {
            format!(
                "{} - {}: {} ({}). Notes: {}",
                e.date.format("%Y-%m-%d"),
                e.event_type,
                e.description,
                if e.completed { "Completed" } else { "Pending" },
                e.notes.as_deref().filter(|n| !n.is_empty()).unwrap_or("N/A"),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_prediction_input(
    instrument: &Instrument,
    events: Vec<MaintenanceEvent>,
    usage_patterns: &str,
) -> PredictionInput {
    let history = scheduler::maintenance_history(events);
    PredictionInput {
        instrument_name: instrument.name.clone(),
        maintenance_history: render_history(&history),
        usage_patterns: usage_patterns.trim().to_string(),
    }
}

/// Falls back to an empty history when the lookup failed
fn history_or_empty(history: AppResult<Vec<MaintenanceEvent>>) -> Vec<MaintenanceEvent> {
    history.unwrap_or_else(|e| {
        tracing::warn!("Maintenance history unavailable, predicting without it: {}", e);
        Vec::new()
    })
}

#[derive(Clone)]
pub struct AdvisorService {
    repository: Repository,
    predictor: Arc<dyn Predictor>,
}

impl AdvisorService {
    pub fn new(repository: Repository, predictor: Arc<dyn Predictor>) -> Self {
        Self { repository, predictor }
    }

    /// Ask the prediction backend about an instrument
    pub async fn predict(&self, request: &AdvisorRequest) -> AppResult<Prediction> {
        request.validate()?;

        let instrument = self.repository.instruments.get_by_id(request.instrument_id).await?;
        let events = history_or_empty(
            self.repository
                .maintenance
                .list_for_instrument(instrument.id)
                .await,
        );

        let input = build_prediction_input(&instrument, events, &request.usage_patterns);
        let prediction = self.predictor.predict(&input).await?;

        tracing::info!(instrument_id = %instrument.id, "Prediction received");
        Ok(prediction)
    }
}
