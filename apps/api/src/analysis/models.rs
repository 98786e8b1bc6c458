use chrono::{DateTime, SecondsFormat, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::analysis::AnalysisError;

/// Input to the discrepancy comparison. Field names match the inference contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRequest {
    pub cgm_value: f64,
    pub manual_log_value: f64,
    /// RFC 3339 instant the comparison refers to.
    pub timestamp: String,
}

impl ComparisonRequest {
    pub fn new(cgm_value: f64, manual_log_value: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            cgm_value,
            manual_log_value,
            timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !self.cgm_value.is_finite() {
            return Err(AnalysisError::Input(format!(
                "CGM value must be a finite number, got {}",
                self.cgm_value
            )));
        }
        if !self.manual_log_value.is_finite() {
            return Err(AnalysisError::Input(format!(
                "Manual log value must be a finite number, got {}",
                self.manual_log_value
            )));
        }
        if DateTime::parse_from_rfc3339(&self.timestamp).is_err() {
            return Err(AnalysisError::Input(format!(
                "Timestamp must be an ISO-8601 instant, got '{}'",
                self.timestamp
            )));
        }
        Ok(())
    }
}

/// Verdict returned by the inference capability.
///
/// No field has a default: a missing field or a wrongly typed value fails decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub discrepancy_detected: bool,
    pub discrepancy_explanation: String,
    pub suggested_action: String,
}

/// Decodes a model response against `T`. Any schema violation is an inference failure.
pub(crate) fn decode_strict<T: DeserializeOwned>(raw: Value, what: &str) -> Result<T, AnalysisError> {
    if !raw.is_object() {
        return Err(AnalysisError::Inference(format!(
            "The AI returned a non-object {what} response."
        )));
    }
    serde_json::from_value(raw).map_err(|e| {
        AnalysisError::Inference(format!("The AI returned a malformed {what} response: {e}"))
    })
}
