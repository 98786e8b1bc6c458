use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::ComparisonResult;
use crate::errors::{AppError, ErrorKind};

/// What the user typed into the manual log form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualReadingInput {
    pub manual_value: f64,
    /// Optional dose logged alongside the reading. Display/audit only.
    #[serde(default)]
    pub dose_annotation: Option<f64>,
}

impl ManualReadingInput {
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.manual_value.is_finite() || self.manual_value <= 0.0 {
            return Err(AppError::Validation(
                "Blood sugar value must be a positive number.".to_string(),
            ));
        }
        if let Some(dose) = self.dose_annotation {
            if !dose.is_finite() || dose <= 0.0 {
                return Err(AppError::Validation(
                    "Dose must be a positive number.".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// One manual-vs-CGM comparison, assembled once and never modified.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Time-ordered UUID v7, unique even for submissions in the same millisecond.
    pub id: String,
    /// Local-time rendering of `created_at` for display.
    pub timestamp: String,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "manual")]
    pub manual_value: f64,
    #[serde(rename = "cgm")]
    pub cgm_value: i32,
    pub discrepancy: bool,
    pub suggestion: String,
    pub analysis: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dose: Option<f64>,
}

impl LogEntry {
    pub fn assemble(
        created_at: DateTime<Utc>,
        manual_value: f64,
        cgm_value: i32,
        dose: Option<f64>,
        result: &ComparisonResult,
    ) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            timestamp: display_timestamp(created_at),
            created_at,
            manual_value,
            cgm_value,
            discrepancy: result.discrepancy_detected,
            suggestion: result.suggested_action.clone(),
            analysis: result.discrepancy_explanation.clone(),
            dose,
        }
    }
}

/// `3/1/2025, 8:30:00 AM` in the server's local time zone.
pub fn display_timestamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local)
        .format("%-m/%-d/%Y, %-I:%M:%S %p")
        .to_string()
}

/// Body returned by the submit endpoint, success or not.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_log: Option<LogEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<ComparisonResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl SubmitResponse {
    pub fn succeeded(entry: LogEntry, analysis: ComparisonResult) -> Self {
        Self {
            success: true,
            new_log: Some(entry),
            ai_analysis: Some(analysis),
            error: None,
            error_kind: None,
        }
    }

    pub fn failed(error: &AppError) -> Self {
        Self {
            success: false,
            new_log: None,
            ai_analysis: None,
            error: Some(error.public_message()),
            error_kind: Some(error.kind()),
        }
    }
}
