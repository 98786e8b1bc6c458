//! Axum route handlers for the manual log API.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::analysis::summary::{
    summarize_trends, ReadingSource, SugarDataPoint, TrendSummary, TrendSummaryRequest,
};
use crate::errors::AppError;
use crate::logbook::models::{LogEntry, ManualReadingInput, SubmitResponse};
use crate::logbook::orchestrator::submit_manual_reading;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    pub period: String,
}

/// POST /api/v1/logs
///
/// Always answers with a `SubmitResponse`. On failure the status code reflects the
/// error kind and `success` is false; no entry is recorded.
pub async fn handle_submit(
    State(state): State<AppState>,
    body: Result<Json<ManualReadingInput>, JsonRejection>,
) -> (StatusCode, Json<SubmitResponse>) {
    let input = match body {
        Ok(Json(input)) => input,
        Err(rejection) => {
            tracing::debug!("Rejected log submission body: {}", rejection.body_text());
            let err = AppError::Validation("Please enter a valid number.".to_string());
            return (err.status_code(), Json(SubmitResponse::failed(&err)));
        }
    };

    match submit_manual_reading(state.feed.as_ref(), &state.analyzer, input).await {
        Ok(submission) => {
            state.history.record(submission.entry.clone()).await;
            (
                StatusCode::OK,
                Json(SubmitResponse::succeeded(submission.entry, submission.analysis)),
            )
        }
        Err(err) => (err.status_code(), Json(SubmitResponse::failed(&err))),
    }
}

/// GET /api/v1/logs
///
/// Recorded entries, newest first.
pub async fn handle_list_logs(State(state): State<AppState>) -> Json<Vec<LogEntry>> {
    Json(state.history.newest_first().await)
}

/// POST /api/v1/logs/summary
///
/// Summarizes the recorded history. Each entry contributes its CGM and its meter value.
pub async fn handle_summarize(
    State(state): State<AppState>,
    body: Result<Json<SummaryRequest>, JsonRejection>,
) -> Result<Json<TrendSummary>, AppError> {
    let Json(request) = body.map_err(|rejection| {
        tracing::debug!("Rejected summary body: {}", rejection.body_text());
        AppError::Validation("Please provide a period, e.g. \"last week\".".to_string())
    })?;

    let entries = state.history.newest_first().await;

    let blood_sugar_data = entries
        .iter()
        .rev()
        .flat_map(|entry| {
            let timestamp = entry.created_at.to_rfc3339();
            [
                SugarDataPoint {
                    timestamp: timestamp.clone(),
                    value: f64::from(entry.cgm_value),
                    source: ReadingSource::Dexcom,
                },
                SugarDataPoint {
                    timestamp,
                    value: entry.manual_value,
                    source: ReadingSource::Glucometer,
                },
            ]
        })
        .collect();

    let summary = summarize_trends(
        state.inference.as_ref(),
        &TrendSummaryRequest {
            blood_sugar_data,
            period: request.period,
        },
    )
    .await?;

    Ok(Json(summary))
}
