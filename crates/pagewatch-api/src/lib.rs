//! # PageWatch API
//!
//! Axum service exposing scan control, results, hygiene analytics, and
//! a per-scan WebSocket event stream. Scans run as background driver
//! tasks against an in-memory scan store; the event bus is created at
//! process start and injected into both the orchestrator and the
//! streaming layer.

pub mod driver;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod state;
pub mod store;
pub mod streaming;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health::health))
        .route("/api/scan", post(handlers::scan::start_scan))
        .route(
            "/api/scan/:scan_id",
            get(handlers::scan::get_scan).delete(handlers::scan::cancel_scan),
        )
        .route("/api/scan/:scan_id/events", get(handlers::scan::scan_events))
        .route("/api/hygiene", get(handlers::hygiene::hygiene))
        .route("/ws/scan/:scan_id", get(streaming::scan_events_ws))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
