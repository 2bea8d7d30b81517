//! Scoped browser session and per-URL analysis.

use crate::capture::{self, RequestIndex};
use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfig, HeadlessMode};
use chromiumoxide::cdp::browser_protocol::network::{EventLoadingFailed, EventRequestWillBeSent};
use chromiumoxide::cdp::js_protocol::runtime::EventConsoleApiCalled;
use chromiumoxide::Page;
use futures::StreamExt;
use pagewatch_types::{ConsoleLog, NetworkFailure, RuntimeCapture};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

/// Settings for the browser analyzer.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Navigation timeout in seconds.
    pub timeout_secs: u64,
    /// Run Chrome headless.
    pub headless: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            headless: true,
        }
    }
}

/// One Chrome process scoped to an inspection stage.
///
/// The session owns the browser, its CDP handler task, and the profile
/// directory; [`BrowserSession::close`] releases all three. The session
/// must not be shared across scans.
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    timeout: Duration,
    _profile_dir: TempDir,
}

impl BrowserSession {
    /// Launch Chrome with an isolated profile directory.
    pub async fn launch(config: &AnalyzerConfig) -> Result<Self> {
        let profile_dir = TempDir::new().context("could not create browser profile dir")?;

        let mut builder = BrowserConfig::builder()
            .user_data_dir(profile_dir.path())
            .window_size(1280, 800)
            .request_timeout(Duration::from_secs(config.timeout_secs.max(10)))
            .arg("--disable-notifications")
            .arg("--disable-popup-blocking")
            .arg("--disable-background-networking")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--no-sandbox")
            .arg("--mute-audio");
        if config.headless {
            builder = builder.headless_mode(HeadlessMode::default());
        } else {
            builder = builder.with_head();
        }
        let browser_config = builder
            .build()
            .map_err(|e| anyhow::anyhow!("browser config: {e}"))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .context("could not launch browser")?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    trace!(error = %err, "browser handler event error");
                }
            }
            debug!("browser handler loop finished");
        });

        info!(headless = config.headless, "browser session ready");
        Ok(Self {
            browser,
            handler_task,
            timeout: Duration::from_secs(config.timeout_secs),
            _profile_dir: profile_dir,
        })
    }

    /// Analyze one URL in a fresh page context.
    ///
    /// Always returns a fully populated record; failures land in
    /// `navigation_status` with the remaining fields empty or null.
    pub async fn analyze(&self, url: &str) -> RuntimeCapture {
        match self.analyze_inner(url).await {
            Ok(capture) => capture,
            Err(err) => {
                warn!(url = %url, error = %err, "page analysis failed");
                RuntimeCapture::empty(url, format!("analyzer_error: {err}"))
            }
        }
    }

    async fn analyze_inner(&self, url: &str) -> Result<RuntimeCapture> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .context("could not open page")?;

        // Listeners go in before navigation so nothing is missed.
        let console_logs: Arc<Mutex<Vec<ConsoleLog>>> = Arc::default();
        let network_failures: Arc<Mutex<Vec<NetworkFailure>>> = Arc::default();
        let requests: RequestIndex = Arc::new(Mutex::new(HashMap::new()));

        let mut console_events = page
            .event_listener::<EventConsoleApiCalled>()
            .await
            .context("console listener")?;
        let console_sink = Arc::clone(&console_logs);
        let console_task = tokio::spawn(async move {
            while let Some(event) = console_events.next().await {
                let log = capture::console_log_from_event(&event);
                if let Ok(mut sink) = console_sink.lock() {
                    sink.push(log);
                }
            }
        });

        let mut request_events = page
            .event_listener::<EventRequestWillBeSent>()
            .await
            .context("request listener")?;
        let request_index = Arc::clone(&requests);
        let request_task = tokio::spawn(async move {
            while let Some(event) = request_events.next().await {
                capture::index_request(&request_index, &event);
            }
        });

        let mut failure_events = page
            .event_listener::<EventLoadingFailed>()
            .await
            .context("failure listener")?;
        let failure_sink = Arc::clone(&network_failures);
        let failure_index = Arc::clone(&requests);
        let failure_task = tokio::spawn(async move {
            while let Some(event) = failure_events.next().await {
                let failure = capture::network_failure_from_event(&failure_index, &event);
                if let Ok(mut sink) = failure_sink.lock() {
                    sink.push(failure);
                }
            }
        });

        let start = Instant::now();
        let navigation_status = self.navigate(&page, url).await;

        // Let late subresources and console output drain before the
        // snapshot, approximating a network-idle wait.
        tokio::time::sleep(Duration::from_millis(500)).await;

        // Capture order: outer HTML, performance entries, DOM metrics,
        // accessibility tree, elapsed.
        let dom_snapshot = page.content().await.unwrap_or_default();
        let performance = capture::performance_entries(&page).await;
        let dom_metrics = capture::dom_metrics(&page).await;
        let accessibility_tree = capture::accessibility_tree(&page).await;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        console_task.abort();
        request_task.abort();
        failure_task.abort();

        let console_logs = console_logs
            .lock()
            .map(|mut logs| std::mem::take(&mut *logs))
            .unwrap_or_default();
        let network_failures = network_failures
            .lock()
            .map(|mut failures| std::mem::take(&mut *failures))
            .unwrap_or_default();

        if let Err(err) = page.close().await {
            debug!(url = %url, error = %err, "page close failed");
        }

        Ok(RuntimeCapture {
            url: url.to_string(),
            navigation_status,
            console_logs,
            network_failures,
            dom_snapshot,
            dom_metrics,
            performance,
            accessibility_tree,
            elapsed_ms,
        })
    }

    /// Navigate and wait for the page to settle, within the session
    /// timeout. Failure is captured as a status string, never an error.
    async fn navigate(&self, page: &Page, url: &str) -> String {
        let navigation = async {
            page.goto(url).await?;
            page.wait_for_navigation().await?;
            Ok::<(), chromiumoxide::error::CdpError>(())
        };
        match tokio::time::timeout(self.timeout, navigation).await {
            Ok(Ok(())) => "ok".to_string(),
            Ok(Err(err)) => {
                warn!(url = %url, error = %err, "navigation failed");
                format!("navigation_error: {err}")
            }
            Err(_) => {
                warn!(url = %url, timeout_secs = self.timeout.as_secs(), "navigation timed out");
                format!("navigation_error: timed out after {}s", self.timeout.as_secs())
            }
        }
    }

    /// Close the browser and stop its handler loop.
    pub async fn close(mut self) {
        if let Err(err) = self.browser.close().await {
            warn!(error = %err, "browser close failed");
        }
        if let Err(err) = self.browser.wait().await {
            debug!(error = %err, "browser wait failed");
        }
        self.handler_task.abort();
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // Close is the graceful path; this covers cancellation.
        self.handler_task.abort();
    }
}
