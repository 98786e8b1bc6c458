// Discrepancy Analyzer: strict adapter around the inference capability.
// Validates what goes in, renders the prompt, validates what comes out.
// The comparison judgment itself belongs to the model.

pub mod analyzer;
pub mod models;
pub mod prompts;
pub mod summary;

use thiserror::Error;

pub use analyzer::DiscrepancyAnalyzer;
pub use models::{ComparisonRequest, ComparisonResult};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnalysisError {
    /// The request failed validation and was never dispatched.
    #[error("{0}")]
    Input(String),

    /// The inference capability failed or produced output that violates the schema.
    #[error("{0}")]
    Inference(String),
}
