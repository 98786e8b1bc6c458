use std::sync::Arc;

use crate::analysis::DiscrepancyAnalyzer;
use crate::llm_client::InferenceCapability;
use crate::logbook::LogHistory;
use crate::reading::GlucoseFeed;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Live or synthetic CGM feed, chosen via CGM_FEED_MODE.
    pub feed: Arc<dyn GlucoseFeed>,
    pub analyzer: DiscrepancyAnalyzer,
    /// Same backend the analyzer uses; the trend summary calls it directly.
    pub inference: Arc<dyn InferenceCapability>,
    pub history: LogHistory,
}

impl AppState {
    pub fn new(
        feed: Arc<dyn GlucoseFeed>,
        inference: Arc<dyn InferenceCapability>,
        history_limit: usize,
    ) -> Self {
        Self {
            feed,
            analyzer: DiscrepancyAnalyzer::new(inference.clone()),
            inference,
            history: LogHistory::new(history_limit),
        }
    }
}
