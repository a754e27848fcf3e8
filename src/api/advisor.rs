//! Predictive advisor endpoint

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::advisor::{AdvisorRequest, Prediction},
};

/// Estimate failure likelihood of an instrument
#[utoipa::path(
    post,
    path = "/advisor/predict",
    tag = "advisor",
    request_body = AdvisorRequest,
    responses(
        (status = 200, description = "Prediction from the remote model", body = Prediction),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 404, description = "Instrument not found", body = crate::error::ErrorResponse),
        (status = 502, description = "Prediction service failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn predict(
    State(state): State<crate::AppState>,
    Json(request): Json<AdvisorRequest>,
) -> AppResult<Json<Prediction>> {
    let prediction = state.services.advisor.predict(&request).await?;
    Ok(Json(prediction))
}
