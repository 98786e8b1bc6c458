//! Discrepancy Analyzer — CGM vs manual meter comparison through the inference capability.
//!
//! Flow: validate request → render prompt → one inference call → strict decode.
//! Everything on this side of the model is deterministic.

use std::sync::Arc;

use tracing::{error, info};

use crate::analysis::models::{decode_strict, ComparisonRequest, ComparisonResult};
use crate::analysis::prompts::{COMPARISON_PROMPT_TEMPLATE, COMPARISON_SYSTEM};
use crate::analysis::AnalysisError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::InferenceCapability;

#[derive(Clone)]
pub struct DiscrepancyAnalyzer {
    inference: Arc<dyn InferenceCapability>,
}

impl DiscrepancyAnalyzer {
    pub fn new(inference: Arc<dyn InferenceCapability>) -> Self {
        Self { inference }
    }

    pub async fn analyze(
        &self,
        request: &ComparisonRequest,
    ) -> Result<ComparisonResult, AnalysisError> {
        request.validate()?;

        let prompt = render_comparison_prompt(request);
        let system = format!("{COMPARISON_SYSTEM}\n\n{JSON_ONLY_SYSTEM}");

        let raw = self
            .inference
            .generate(&system, &prompt)
            .await
            .map_err(|e| {
                error!("Comparison inference failed: {e}");
                AnalysisError::Inference(format!("The AI comparison could not be completed: {e}"))
            })?;

        let result: ComparisonResult = decode_strict(raw, "comparison")?;

        info!(
            "Comparison complete: cgm={} manual={} discrepancy={}",
            request.cgm_value, request.manual_log_value, result.discrepancy_detected
        );

        Ok(result)
    }
}

/// Renders the instruction context. Only the two values and the timestamp go in.
pub fn render_comparison_prompt(request: &ComparisonRequest) -> String {
    COMPARISON_PROMPT_TEMPLATE
        .replace("{cgm_value}", &request.cgm_value.to_string())
        .replace("{manual_log_value}", &request.manual_log_value.to_string())
        .replace("{timestamp}", &request.timestamp)
}
