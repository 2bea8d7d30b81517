//! Scan orchestrator: crawl → validate → browser fan-out → QA passes,
//! with lifecycle events at every step.

use crate::{classifier, graph::GraphBuilder, issues, scorer, structure};
use futures::FutureExt;
use pagewatch_events::{event_data, EventBus, EventType, ScanEvent};
use pagewatch_headless::{AnalyzerConfig, BrowserSession};
use pagewatch_spider::{CrawlerConfig, InspectionCrawler, StatusValidator};
use pagewatch_types::{
    CrawledPage, Issue, IssueCategory, PageAnalysis, QaResults, QaSummary, ScanError, Severity,
};
use serde_json::json;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// Inspection-stage settings.
#[derive(Debug, Clone)]
pub struct QaConfig {
    pub base_url: String,
    pub max_pages: usize,
    pub http_timeout_secs: u64,
    pub browser_timeout_secs: u64,
    pub crawler_concurrency: usize,
    pub validator_concurrency: usize,
    pub browser_concurrency: usize,
    pub headless: bool,
}

impl QaConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            max_pages: 100,
            http_timeout_secs: 10,
            browser_timeout_secs: 15,
            crawler_concurrency: 10,
            validator_concurrency: 20,
            browser_concurrency: 5,
            headless: true,
        }
    }
}

/// Drives the full inspection pipeline for one scan.
///
/// Crash-resistant with respect to per-page failures: a page task that
/// dies is recorded as a synthetic critical `runtime` issue so the
/// failure surfaces in the report rather than aborting the scan.
pub struct QaOrchestrator {
    config: QaConfig,
    bus: Arc<EventBus>,
}

impl QaOrchestrator {
    pub fn new(config: QaConfig, bus: Arc<EventBus>) -> Self {
        Self { config, bus }
    }

    /// Execute the pipeline. Emits `scan_failed` and returns the error
    /// when the scan cannot proceed at all.
    pub async fn run(&self, scan_id: &str) -> Result<QaResults, ScanError> {
        match self.run_inner(scan_id).await {
            Ok(results) => Ok(results),
            Err(err) => {
                error!(scan_id = %scan_id, error = %err, "qa scan failed");
                self.emit(
                    EventType::ScanFailed,
                    scan_id,
                    event_data! {"error" => err.to_string()},
                )
                .await;
                Err(err)
            }
        }
    }

    async fn run_inner(&self, scan_id: &str) -> Result<QaResults, ScanError> {
        self.emit(
            EventType::ScanStarted,
            scan_id,
            event_data! {"base_url" => self.config.base_url.clone()},
        )
        .await;

        // Phase 1: crawl
        info!(scan_id = %scan_id, base_url = %self.config.base_url, "starting crawl");
        let crawler = InspectionCrawler::new(CrawlerConfig {
            base_url: self.config.base_url.clone(),
            max_pages: self.config.max_pages,
            concurrency: self.config.crawler_concurrency,
            timeout_secs: self.config.http_timeout_secs,
        })
        .map_err(|err| ScanError::Task(err.to_string()))?;
        let crawled = crawler.crawl().await;
        info!(scan_id = %scan_id, urls = crawled.len(), "crawl complete");

        let mut discovered: Vec<&String> = crawled.keys().collect();
        discovered.sort();
        for url in discovered {
            self.emit(EventType::UrlDiscovered, scan_id, event_data! {"url" => url})
                .await;
        }

        // Phase 2: status validation, keep the 200 set
        let validator =
            StatusValidator::new(self.config.http_timeout_secs, self.config.validator_concurrency)
                .map_err(|err| ScanError::Task(err.to_string()))?;
        let validation = validator
            .validate_batch(crawled.keys().cloned().collect())
            .await;
        let mut checked: Vec<(&String, &pagewatch_spider::UrlStatus)> = validation.iter().collect();
        checked.sort_by(|a, b| a.0.cmp(b.0));
        for (url, status) in checked {
            self.emit(
                EventType::UrlValidated,
                scan_id,
                event_data! {"url" => url, "status" => status.status, "valid" => status.valid},
            )
            .await;
        }
        let valid_urls = StatusValidator::filter_valid_urls(&validation);
        info!(scan_id = %scan_id, valid = valid_urls.len(), "validation complete");

        // Phase 3: browser fan-out and QA passes
        let session = BrowserSession::launch(&AnalyzerConfig {
            timeout_secs: self.config.browser_timeout_secs,
            headless: self.config.headless,
        })
        .await
        .map_err(|err| ScanError::Browser(err.to_string()))?;
        let session = Arc::new(session);

        let semaphore = Arc::new(Semaphore::new(self.config.browser_concurrency.max(1)));
        let mut tasks = JoinSet::new();
        for url in &valid_urls {
            let url = url.clone();
            let html = crawled
                .get(&url)
                .map(|page: &CrawledPage| page.html.clone())
                .unwrap_or_default();
            let session = Arc::clone(&session);
            let semaphore = Arc::clone(&semaphore);
            let bus = Arc::clone(&self.bus);
            let scan_id = scan_id.to_string();

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let work = analyze_page(&bus, &scan_id, &url, &html, &session);
                match AssertUnwindSafe(work).catch_unwind().await {
                    Ok(page) => page,
                    Err(_) => {
                        error!(url = %url, "page task panicked");
                        synthetic_failure(&url, "page task panicked")
                    }
                }
            });
        }

        let mut pages = Vec::new();
        let mut graph = GraphBuilder::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(page) => {
                    graph.add_page(&page.url, page.page_type, page.score);
                    graph.add_issues(&page.url, page.issues.clone());
                    pages.push(page);
                }
                Err(err) => warn!(error = %err, "page task lost"),
            }
        }

        if let Ok(session) = Arc::try_unwrap(session) {
            session.close().await;
        }

        let summary = QaSummary {
            total_discovered: crawled.len(),
            total_valid: valid_urls.len(),
            total_analyzed: pages.len(),
            avg_score: scorer::global_score(&pages),
        };
        self.emit(
            EventType::ScanCompleted,
            scan_id,
            event_data! {
                "total_discovered" => summary.total_discovered,
                "total_valid" => summary.total_valid,
                "total_analyzed" => summary.total_analyzed,
                "avg_score" => summary.avg_score,
            },
        )
        .await;
        info!(scan_id = %scan_id, analyzed = summary.total_analyzed, "qa scan complete");

        Ok(QaResults {
            pages,
            summary,
            graph: graph.to_report(),
        })
    }

    async fn emit(
        &self,
        event_type: EventType,
        scan_id: &str,
        data: serde_json::Map<String, serde_json::Value>,
    ) {
        self.bus.emit(ScanEvent::new(event_type, scan_id, data)).await;
    }
}

/// All QA passes for one page.
async fn analyze_page(
    bus: &EventBus,
    scan_id: &str,
    url: &str,
    html: &str,
    session: &BrowserSession,
) -> PageAnalysis {
    bus.emit(ScanEvent::new(
        EventType::PageTestingStarted,
        scan_id,
        event_data! {"url" => url},
    ))
    .await;

    let capture = session.analyze(url).await;
    let structure = structure::detect_structure(url, html);
    let page_type = classifier::classify(html, &capture.dom_metrics);
    let issues = issues::detect_issues(url, &capture, &structure);

    bus.emit(ScanEvent::new(
        EventType::IssuesDetected,
        scan_id,
        event_data! {"url" => url, "count" => issues.len()},
    ))
    .await;

    let score = scorer::score_page(&issues);
    bus.emit(ScanEvent::new(
        EventType::ScoreUpdated,
        scan_id,
        event_data! {"url" => url, "score" => score},
    ))
    .await;

    let critical_issue_count = issues.iter().filter(|i| i.severity.is_critical()).count();
    let total_issue_count = issues.len();
    let analysis = PageAnalysis {
        url: url.to_string(),
        page_type,
        score,
        issues,
        structure,
        dom_metrics: capture.dom_metrics,
        console_logs: capture.console_logs,
        network_failures: capture.network_failures,
        performance: capture.performance,
        critical_issue_count,
        total_issue_count,
    };

    bus.emit(ScanEvent::new(
        EventType::PageAnalyzed,
        scan_id,
        event_data! {
            "url" => url,
            "page_type" => analysis.page_type.as_str(),
            "score" => analysis.score,
        },
    ))
    .await;

    analysis
}

/// Record a dead page task as a critical runtime issue.
fn synthetic_failure(url: &str, message: &str) -> PageAnalysis {
    let issue = Issue::new(
        url,
        IssueCategory::Runtime,
        "Page processing failed",
        Severity::Critical,
    )
    .with_detail("error", json!(message));

    PageAnalysis {
        url: url.to_string(),
        page_type: pagewatch_types::PageType::Unknown,
        score: 0.0,
        issues: vec![issue],
        structure: Default::default(),
        dom_metrics: Default::default(),
        console_logs: vec![],
        network_failures: vec![],
        performance: Default::default(),
        critical_issue_count: 1,
        total_issue_count: 1,
    }
}
