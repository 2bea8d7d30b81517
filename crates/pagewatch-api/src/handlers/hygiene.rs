//! Hygiene analytics from the latest completed scan.

use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use pagewatch_qa::hygiene;
use pagewatch_types::HygienePage;

/// `GET /api/hygiene`: hygiene pages from the latest completed scan, or
/// an empty list. Discovery-only scans fall back to liveness-derived
/// pages.
pub async fn hygiene(State(state): State<AppState>) -> Json<Vec<HygienePage>> {
    let Some(record) = state.store.latest_completed().await else {
        return Json(Vec::new());
    };

    if let Some(qa_results) = &record.qa_results {
        return Json(hygiene::hygiene_pages(qa_results));
    }
    if let Some(enum_results) = &record.enum_results {
        return Json(hygiene::hygiene_from_enumeration(enum_results));
    }
    Json(Vec::new())
}
