pub mod health;
pub mod layers;

use axum::{
    routing::{get, post},
    Router,
};

use crate::logbook::handlers as logbook;
use crate::reading::handlers as reading;
use crate::state::AppState;

pub use layers::with_layers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // CGM feed
        .route("/api/v1/cgm/current", get(reading::handle_current_reading))
        .route("/api/v1/cgm/series", get(reading::handle_series))
        // Manual log
        .route(
            "/api/v1/logs",
            get(logbook::handle_list_logs).post(logbook::handle_submit),
        )
        .route("/api/v1/logs/summary", post(logbook::handle_summarize))
        .with_state(state)
}
