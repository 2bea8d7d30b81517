//! Scan lifecycle endpoints.

use crate::driver;
use crate::errors::ApiError;
use crate::models::{CancelAck, ScanRequest, ScanStarted, ScanView};
use crate::state::AppState;
use crate::store::ScanRecord;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pagewatch_events::ScanEvent;
use pagewatch_qa::hygiene;
use pagewatch_types::ScanStatus;
use tracing::info;

/// `POST /api/scan`: validate, register, and start a scan in the
/// background. Responds `202` immediately.
pub async fn start_scan(
    State(state): State<AppState>,
    Json(request): Json<ScanRequest>,
) -> Result<(StatusCode, Json<ScanStarted>), ApiError> {
    let url = request
        .url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .ok_or_else(|| ApiError::validation("Missing required field: url"))?
        .to_string();

    let config = request.to_config();
    let scan_id = new_scan_id();
    info!(scan_id = %scan_id, url = %url, "starting scan");

    state
        .store
        .put(ScanRecord::new(&scan_id, &url, config.clone()))
        .await;
    driver::spawn_scan(state, scan_id.clone(), url.clone(), config.clone()).await;

    Ok((
        StatusCode::ACCEPTED,
        Json(ScanStarted {
            status: "started",
            scan_id,
            url,
            config,
            message: "Scan started successfully",
        }),
    ))
}

/// `GET /api/scan/:scan_id`: current status plus whatever results the
/// scan has produced.
pub async fn get_scan(
    State(state): State<AppState>,
    Path(scan_id): Path<String>,
) -> Result<Json<ScanView>, ApiError> {
    let record = state
        .store
        .get(&scan_id)
        .await
        .ok_or_else(|| ApiError::not_found("Scan"))?;

    let mut view = ScanView {
        scan_id: record.scan_id.clone(),
        status: record.status,
        url: record.url.clone(),
        config: record.config.clone(),
        progress: None,
        hygiene_pages: None,
        summary: None,
        worst_pages: None,
        enum_results: None,
        error: None,
    };

    match record.status {
        ScanStatus::Completed => {
            view.progress = Some(100);
            if let Some(qa_results) = &record.qa_results {
                view.hygiene_pages = Some(hygiene::hygiene_pages(qa_results));
                view.summary = Some(hygiene::summary(qa_results));
                view.worst_pages = Some(hygiene::worst_pages(qa_results));
            }
            view.enum_results = record.enum_results.clone();
        }
        ScanStatus::Failed => {
            view.error = Some(
                record
                    .error
                    .clone()
                    .unwrap_or_else(|| "Unknown error".to_string()),
            );
        }
        ScanStatus::Running => {
            view.progress = Some(10);
        }
    }

    Ok(Json(view))
}

/// `DELETE /api/scan/:scan_id`: best-effort cancellation. Aborting the
/// driver task tears down in-flight requests and the browser session;
/// a scan that already finished keeps its results.
pub async fn cancel_scan(
    State(state): State<AppState>,
    Path(scan_id): Path<String>,
) -> Result<Json<CancelAck>, ApiError> {
    let record = state
        .store
        .get(&scan_id)
        .await
        .ok_or_else(|| ApiError::not_found("Scan"))?;

    if let Some(handle) = state.store.take_handle(&scan_id).await {
        handle.abort();
    }
    if record.status == ScanStatus::Running {
        state
            .store
            .update(&scan_id, |record| {
                record.status = ScanStatus::Failed;
                record.error = Some("scan cancelled".to_string());
            })
            .await;
    }
    info!(scan_id = %scan_id, "scan cancelled");

    Ok(Json(CancelAck {
        scan_id,
        status: "cancelled",
        message: "Scan cancelled successfully",
    }))
}

/// `GET /api/scan/:scan_id/events`: full event history for polling
/// clients.
pub async fn scan_events(
    State(state): State<AppState>,
    Path(scan_id): Path<String>,
) -> Result<Json<Vec<ScanEvent>>, ApiError> {
    if state.store.get(&scan_id).await.is_none() {
        return Err(ApiError::not_found("Scan"));
    }
    Ok(Json(state.bus.get_history(&scan_id).await))
}

fn new_scan_id() -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    format!("scan_{}", &hex[..8])
}
