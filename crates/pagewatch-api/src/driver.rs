//! Background scan driver: runs the stages a scan's mode asks for and
//! records outcomes in the store.

use crate::state::AppState;
use pagewatch_discovery::{DiscoveryConfig, Enumerator};
use pagewatch_events::{event_data, EventType, ScanEvent};
use pagewatch_qa::orchestrator::{QaConfig, QaOrchestrator};
use pagewatch_types::{EnumerationResults, ScanConfig, ScanError, ScanStatus, SourceTag};
use std::collections::BTreeSet;
use tracing::{error, info};

/// Spawn the driver task for a scan and register its handle for
/// cancellation.
pub async fn spawn_scan(state: AppState, scan_id: String, url: String, config: ScanConfig) {
    let task_state = state.clone();
    let task_id = scan_id.clone();
    let handle = tokio::spawn(async move {
        run_scan(task_state, task_id, url, config).await;
    });
    state.store.set_handle(&scan_id, handle).await;
}

async fn run_scan(state: AppState, scan_id: String, url: String, config: ScanConfig) {
    info!(scan_id = %scan_id, url = %url, mode = ?config.mode, "scan driver started");
    match run_stages(&state, &scan_id, &url, &config).await {
        Ok(()) => {
            state
                .store
                .update(&scan_id, |record| record.status = ScanStatus::Completed)
                .await;
            info!(scan_id = %scan_id, "scan completed");
        }
        Err(err) => {
            error!(scan_id = %scan_id, error = %err, "scan failed");
            state
                .store
                .update(&scan_id, |record| {
                    record.status = ScanStatus::Failed;
                    record.error = Some(err.to_string());
                })
                .await;
        }
    }
}

async fn run_stages(
    state: &AppState,
    scan_id: &str,
    url: &str,
    config: &ScanConfig,
) -> Result<(), ScanError> {
    if config.mode.runs_discovery() {
        let results = run_discovery(url, config).await?;

        // Discovery-only scans own the lifecycle events; in full mode
        // the QA orchestrator emits them instead.
        if !config.mode.runs_inspection() {
            emit_discovery_events(state, scan_id, url, &results).await;
        }

        state
            .store
            .update(scan_id, |record| record.enum_results = Some(results))
            .await;
    }

    if config.mode.runs_inspection() {
        let orchestrator = QaOrchestrator::new(QaConfig::new(url), state.bus.clone());
        let results = orchestrator.run(scan_id).await?;
        state
            .store
            .update(scan_id, |record| record.qa_results = Some(results))
            .await;
    }

    Ok(())
}

async fn run_discovery(url: &str, config: &ScanConfig) -> Result<EnumerationResults, ScanError> {
    let discovery = DiscoveryConfig {
        domain: url.to_string(),
        depth: config.depth,
        timeout_secs: 5,
        threads: 50,
        only_alive: config.only_alive,
        techniques: techniques_for(config),
    };
    tokio::task::spawn_blocking(move || Enumerator::new(discovery).enumerate())
        .await
        .map_err(|err| ScanError::Task(err.to_string()))
}

/// Live crawl and JS analysis always run; wayback and brute force are
/// opt-in; robots and sitemap round out the defaults.
fn techniques_for(config: &ScanConfig) -> BTreeSet<SourceTag> {
    let mut techniques = BTreeSet::from([
        SourceTag::LiveCrawl,
        SourceTag::JsAnalysis,
        SourceTag::Robots,
        SourceTag::Sitemap,
    ]);
    if config.wayback {
        techniques.insert(SourceTag::Wayback);
    }
    if config.bruteforce {
        techniques.insert(SourceTag::Bruteforce);
    }
    techniques
}

async fn emit_discovery_events(
    state: &AppState,
    scan_id: &str,
    url: &str,
    results: &EnumerationResults,
) {
    state
        .bus
        .emit(ScanEvent::new(
            EventType::ScanStarted,
            scan_id,
            event_data! {"base_url" => url},
        ))
        .await;
    for url in &results.urls {
        state
            .bus
            .emit(ScanEvent::new(
                EventType::UrlDiscovered,
                scan_id,
                event_data! {"url" => url},
            ))
            .await;
    }
    for (url, detail) in &results.url_details {
        state
            .bus
            .emit(ScanEvent::new(
                EventType::UrlValidated,
                scan_id,
                event_data! {"url" => url, "status" => detail.status, "valid" => detail.alive},
            ))
            .await;
    }
    state
        .bus
        .emit(ScanEvent::new(
            EventType::ScanCompleted,
            scan_id,
            event_data! {
                "total_urls" => results.summary.total_urls,
                "alive_urls" => results.summary.alive_urls,
            },
        ))
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_techniques_exclude_optional_ones() {
        let techniques = techniques_for(&ScanConfig::default());
        assert!(techniques.contains(&SourceTag::LiveCrawl));
        assert!(techniques.contains(&SourceTag::JsAnalysis));
        assert!(techniques.contains(&SourceTag::Robots));
        assert!(techniques.contains(&SourceTag::Sitemap));
        assert!(!techniques.contains(&SourceTag::Wayback));
        assert!(!techniques.contains(&SourceTag::Bruteforce));
    }

    #[test]
    fn flags_enable_wayback_and_bruteforce() {
        let config = ScanConfig {
            wayback: true,
            bruteforce: true,
            ..ScanConfig::default()
        };
        let techniques = techniques_for(&config);
        assert!(techniques.contains(&SourceTag::Wayback));
        assert!(techniques.contains(&SourceTag::Bruteforce));
    }
}
