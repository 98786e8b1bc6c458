//! Log Orchestrator — one manual submission, end to end.
//!
//! Flow: validate input → acquire_reading → build ComparisonRequest → analyze →
//!       assemble LogEntry.
//!
//! Straight pipeline: the first failing step aborts the submission and no entry is built.
//! Nothing here is shared between calls, so concurrent submissions never see each other.

use chrono::Utc;
use tracing::info;

use crate::analysis::{ComparisonRequest, ComparisonResult, DiscrepancyAnalyzer};
use crate::errors::AppError;
use crate::logbook::models::{LogEntry, ManualReadingInput};
use crate::reading::{acquire_reading, GlucoseFeed};

/// A completed submission: the entry to keep, plus the full verdict it was built from.
#[derive(Debug, Clone)]
pub struct Submission {
    pub entry: LogEntry,
    pub analysis: ComparisonResult,
}

pub async fn submit_manual_reading(
    feed: &dyn GlucoseFeed,
    analyzer: &DiscrepancyAnalyzer,
    input: ManualReadingInput,
) -> Result<Submission, AppError> {
    // Step 1: Reject bad input before any I/O
    input.validate()?;

    // Step 2: Fresh CGM reading
    let submitted_at = Utc::now();
    let reading = acquire_reading(feed).await?;

    // Step 3: Compare against the manual value
    let request = ComparisonRequest::new(
        f64::from(reading.glucose_value()),
        input.manual_value,
        submitted_at,
    );
    let analysis = analyzer.analyze(&request).await?;

    // Step 4: Assemble the immutable entry
    let entry = LogEntry::assemble(
        submitted_at,
        input.manual_value,
        reading.glucose_value(),
        input.dose_annotation,
        &analysis,
    );

    info!(
        "Logged entry {}: manual={} cgm={} discrepancy={}",
        entry.id, entry.manual_value, entry.cgm_value, entry.discrepancy
    );

    Ok(Submission { entry, analysis })
}
