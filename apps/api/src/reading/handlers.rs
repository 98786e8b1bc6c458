use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;

use crate::errors::AppError;
use crate::reading::models::Reading;
use crate::reading::normalizer::acquire_reading;
use crate::reading::synthetic::{generate_series, SeriesPoint};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SeriesResponse {
    pub points: Vec<SeriesPoint>,
}

/// GET /api/v1/cgm/current
///
/// Fresh fetch + normalization on every call. Sensor failures come back as
/// `{ "error": ..., "code": ... }` with 502.
pub async fn handle_current_reading(
    State(state): State<AppState>,
) -> Result<Json<Reading>, AppError> {
    let reading = acquire_reading(state.feed.as_ref()).await?;
    Ok(Json(reading))
}

/// GET /api/v1/cgm/series
///
/// Simulated 24-hour trace for the dashboard chart.
pub async fn handle_series() -> Json<SeriesResponse> {
    let points = generate_series(Utc::now(), &mut rand::thread_rng());
    Json(SeriesResponse { points })
}
