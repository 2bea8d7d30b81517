//! Inspection CLI: crawl a site, drive each 200 page through the
//! headless browser, and write the hygiene report as JSON.

use clap::Parser;
use pagewatch_events::EventBus;
use pagewatch_qa::orchestrator::{QaConfig, QaOrchestrator};
use pagewatch_types::InspectionReport;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pagewatch-inspect")]
#[command(about = "Autonomous bug and hygiene discovery engine")]
struct Args {
    /// Base URL to crawl
    base_url: String,

    /// Path to the JSON report output
    #[arg(short = 'o', long, default_value = "qa_report.json")]
    output: PathBuf,

    /// Maximum pages to crawl
    #[arg(long, default_value_t = 50)]
    max_pages: usize,

    /// Crawler concurrency
    #[arg(long, default_value_t = 10)]
    concurrency: usize,

    /// Parallel browser pages
    #[arg(long, default_value_t = 3)]
    browser_concurrency: usize,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = 10)]
    http_timeout: u64,

    /// Browser navigation timeout in seconds
    #[arg(long, default_value_t = 15)]
    browser_timeout: u64,

    /// Run the browser in headed mode
    #[arg(long)]
    headful: bool,

    /// Logging level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.to_ascii_lowercase().into()),
        )
        .init();

    info!(base_url = %args.base_url, "starting inspection");

    let config = QaConfig {
        base_url: args.base_url.clone(),
        max_pages: args.max_pages,
        http_timeout_secs: args.http_timeout,
        browser_timeout_secs: args.browser_timeout,
        crawler_concurrency: args.concurrency,
        validator_concurrency: args.concurrency * 2,
        browser_concurrency: args.browser_concurrency,
        headless: !args.headful,
    };

    let bus = Arc::new(EventBus::new());
    let orchestrator = QaOrchestrator::new(config, bus);
    let scan_id = new_scan_id();
    let results = orchestrator.run(&scan_id).await?;

    let report = InspectionReport {
        base_url: args.base_url,
        total_pages: results.summary.total_valid,
        global_hygiene_score: results.summary.avg_score,
        pages: results.pages,
        graph: results.graph,
    };

    std::fs::write(&args.output, serde_json::to_string_pretty(&report)?)?;
    info!(path = %args.output.display(), pages = report.total_pages, "report written");
    Ok(())
}

fn new_scan_id() -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    format!("scan_{}", &hex[..8])
}
