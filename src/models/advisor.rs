//! Predictive advisor request/response types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Advisor request from a client
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AdvisorRequest {
    pub instrument_id: Uuid,
    /// Free-text description of how the instrument is used
    #[validate(length(min = 10, message = "Please describe usage patterns in at least 10 characters"))]
    pub usage_patterns: String,
}

/// Payload sent to the prediction endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionInput {
    pub instrument_name: String,
    /// One line per maintenance event
    pub maintenance_history: String,
    pub usage_patterns: String,
}

/// Prediction returned by the remote endpoint, passed through verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub failure_likelihood: String,
    pub recommended_actions: String,
}
