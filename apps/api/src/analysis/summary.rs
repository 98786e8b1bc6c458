//! Trend summary over logged readings, produced by the inference capability.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::analysis::models::decode_strict;
use crate::analysis::prompts::{TREND_SUMMARY_PROMPT_TEMPLATE, TREND_SUMMARY_SYSTEM};
use crate::analysis::AnalysisError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::InferenceCapability;

/// Where a data point came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingSource {
    Dexcom,
    Glucometer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SugarDataPoint {
    pub timestamp: String,
    pub value: f64,
    pub source: ReadingSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSummaryRequest {
    pub blood_sugar_data: Vec<SugarDataPoint>,
    /// Free-form period label, e.g. "last week".
    pub period: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    pub summary: String,
    pub recommendations: String,
}

impl TrendSummaryRequest {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.period.trim().is_empty() {
            return Err(AnalysisError::Input("period cannot be empty".to_string()));
        }
        if self.blood_sugar_data.is_empty() {
            return Err(AnalysisError::Input(
                "No readings to summarize. Log some entries first.".to_string(),
            ));
        }
        if let Some(bad) = self.blood_sugar_data.iter().find(|p| !p.value.is_finite()) {
            return Err(AnalysisError::Input(format!(
                "Reading at {} has a non-numeric value",
                bad.timestamp
            )));
        }
        Ok(())
    }
}

pub fn render_summary_prompt(request: &TrendSummaryRequest) -> String {
    let data = request
        .blood_sugar_data
        .iter()
        .map(|p| {
            let source = match p.source {
                ReadingSource::Dexcom => "dexcom",
                ReadingSource::Glucometer => "glucometer",
            };
            format!("- Timestamp: {}, Value: {}, Source: {}", p.timestamp, p.value, source)
        })
        .collect::<Vec<_>>()
        .join("\n");

    TREND_SUMMARY_PROMPT_TEMPLATE
        .replace("{period}", request.period.trim())
        .replace("{data}", &data)
}

/// Summarizes blood sugar trends. One inference call, strict decode of the result.
pub async fn summarize_trends(
    inference: &dyn InferenceCapability,
    request: &TrendSummaryRequest,
) -> Result<TrendSummary, AnalysisError> {
    request.validate()?;

    let prompt = render_summary_prompt(request);
    let system = format!("{TREND_SUMMARY_SYSTEM}\n\n{JSON_ONLY_SYSTEM}");

    let raw = inference.generate(&system, &prompt).await.map_err(|e| {
        error!("Trend summary inference failed: {e}");
        AnalysisError::Inference(format!("The AI summary could not be completed: {e}"))
    })?;

    let summary: TrendSummary = decode_strict(raw, "summary")?;
    info!(
        "Trend summary complete: {} points over '{}'",
        request.blood_sugar_data.len(),
        request.period
    );
    Ok(summary)
}
