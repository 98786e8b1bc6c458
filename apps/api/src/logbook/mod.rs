// Log Orchestrator: manual reading in, immutable LogEntry out.
// Owns input validation and the single user-facing error surface.

pub mod handlers;
pub mod history;
pub mod models;
pub mod orchestrator;

pub use history::LogHistory;
pub use models::{LogEntry, ManualReadingInput, SubmitResponse};
pub use orchestrator::{submit_manual_reading, Submission};
