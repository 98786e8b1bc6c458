//! SugarCheck API: live CGM readings cross-checked against manual meter readings.
//!
//! Pipeline: `reading` (normalize the sensor feed) → `analysis` (AI discrepancy
//! verdict) → `logbook` (validated, immutable log entry).

pub mod analysis;
pub mod config;
pub mod errors;
pub mod llm_client;
pub mod logbook;
pub mod reading;
pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
