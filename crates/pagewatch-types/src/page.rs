//! Crawled pages, browser runtime captures, and structural records.

use serde::{Deserialize, Serialize};

/// One fetched page from the inspection crawler.
///
/// `html` is only populated for 200 responses; other statuses keep the
/// URL and status for accounting but carry an empty body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawledPage {
    pub url: String,
    pub status: u16,
    pub html: String,
    pub content_type: String,
}

/// Heuristic role assigned to a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    Login,
    Dashboard,
    List,
    Form,
    Wizard,
    Report,
    #[default]
    Unknown,
}

impl PageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageType::Login => "login",
            PageType::Dashboard => "dashboard",
            PageType::List => "list",
            PageType::Form => "form",
            PageType::Wizard => "wizard",
            PageType::Report => "report",
            PageType::Unknown => "unknown",
        }
    }
}

/// Element counts taken by in-page evaluation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomMetrics {
    pub node_count: u64,
    pub input_count: u64,
    pub button_count: u64,
    pub img_count: u64,
    pub link_count: u64,
}

/// One console message observed during page load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleLog {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// One failed subresource request observed during page load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkFailure {
    pub url: String,
    pub method: String,
    pub failure: String,
    pub resource_type: String,
}

/// Navigation and paint entries as the browser reports them.
///
/// Both fields are duck-typed JSON; the issue detector reads
/// `navigation.duration` and tolerates anything else.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformanceRecord {
    #[serde(default)]
    pub navigation: serde_json::Value,
    #[serde(default)]
    pub paint: serde_json::Value,
}

impl PerformanceRecord {
    /// Navigation-entry duration in milliseconds, if the browser
    /// reported one.
    pub fn navigation_duration_ms(&self) -> Option<f64> {
        self.navigation.get("duration").and_then(|v| v.as_f64())
    }
}

/// Accessibility tree node: `{role?, name?, children[]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AxNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<AxNode>,
}

impl AxNode {
    /// Count nodes with an interactive role but no accessible name.
    ///
    /// Iterative walk; browser trees can nest deeply enough that
    /// recursion is not worth the stack.
    pub fn count_missing_names(&self) -> usize {
        const INTERACTIVE: [&str; 4] = ["button", "link", "textbox", "combobox"];
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            let unnamed = node.name.as_deref().map_or(true, str::is_empty);
            if let Some(role) = node.role.as_deref() {
                if INTERACTIVE.contains(&role) && unnamed {
                    count += 1;
                }
            }
            stack.extend(node.children.iter());
        }
        count
    }
}

/// What kind of element a broken-link candidate is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrokenKind {
    Link,
    Image,
}

/// One broken-link or broken-image candidate from the structure pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokenElement {
    #[serde(rename = "type")]
    pub kind: BrokenKind,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
}

/// Layout booleans and hygiene candidates detected from raw HTML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageStructure {
    pub has_header: bool,
    pub has_footer: bool,
    pub has_nav: bool,
    pub repeated_classes: Vec<String>,
    pub broken_links: Vec<BrokenElement>,
}

/// Everything the browser analyzer captures for one URL.
///
/// Every field is populated on every call; when navigation fails the
/// failure is recorded in `navigation_status` and the remaining fields
/// hold whatever could still be captured (possibly empty), never
/// omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeCapture {
    pub url: String,
    pub navigation_status: String,
    pub console_logs: Vec<ConsoleLog>,
    pub network_failures: Vec<NetworkFailure>,
    pub dom_snapshot: String,
    pub dom_metrics: DomMetrics,
    pub performance: PerformanceRecord,
    pub accessibility_tree: Option<AxNode>,
    pub elapsed_ms: f64,
}

impl RuntimeCapture {
    /// An empty capture for a URL, used when the page task itself dies.
    pub fn empty(url: impl Into<String>, navigation_status: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            navigation_status: navigation_status.into(),
            console_logs: Vec::new(),
            network_failures: Vec::new(),
            dom_snapshot: String::new(),
            dom_metrics: DomMetrics::default(),
            performance: PerformanceRecord::default(),
            accessibility_tree: None,
            elapsed_ms: 0.0,
        }
    }
}
