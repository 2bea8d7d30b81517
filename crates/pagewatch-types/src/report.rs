//! Per-page analyses, graph report, and frontend-facing payloads.

use crate::issue::Issue;
use crate::page::{
    ConsoleLog, DomMetrics, NetworkFailure, PageStructure, PageType, PerformanceRecord,
};
use serde::{Deserialize, Serialize};

/// Everything the inspection stage concludes about one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageAnalysis {
    pub url: String,
    pub page_type: PageType,
    pub score: f64,
    pub issues: Vec<Issue>,
    pub structure: PageStructure,
    pub dom_metrics: DomMetrics,
    pub console_logs: Vec<ConsoleLog>,
    pub network_failures: Vec<NetworkFailure>,
    pub performance: PerformanceRecord,
    pub critical_issue_count: usize,
    pub total_issue_count: usize,
}

/// One node in the page → issues adjacency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphPage {
    pub url: String,
    #[serde(rename = "type")]
    pub page_type: PageType,
    pub score: f64,
    pub issues: Vec<Issue>,
}

/// Final page → issues report assembled by the graph builder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphReport {
    pub pages: Vec<GraphPage>,
}

/// Orchestrator-internal summary of a QA run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QaSummary {
    pub total_discovered: usize,
    pub total_valid: usize,
    pub total_analyzed: usize,
    pub avg_score: f64,
}

/// Full QA-run output: analyses, summary, graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QaResults {
    pub pages: Vec<PageAnalysis>,
    pub summary: QaSummary,
    pub graph: GraphReport,
}

/// Issue trimmed down to what the frontend renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HygieneIssue {
    pub category: String,
    pub title: String,
    pub severity: String,
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl From<&Issue> for HygieneIssue {
    fn from(issue: &Issue) -> Self {
        Self {
            category: issue.category.as_str().to_string(),
            title: issue.title.clone(),
            severity: issue.severity.as_str().to_string(),
            details: issue.details.clone(),
        }
    }
}

/// Frontend-facing page payload, sorted worst-score-first by producers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HygienePage {
    pub url: String,
    #[serde(rename = "type")]
    pub page_type: String,
    pub score: f64,
    pub issues: Vec<HygieneIssue>,
    pub critical_issue_count: usize,
    pub total_issue_count: usize,
}

/// Frontend-facing scan summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSummary {
    pub total_discovered: usize,
    pub total_valid: usize,
    pub total_analyzed: usize,
    pub average_score: f64,
    pub total_issues: usize,
    pub critical_issues: usize,
}

/// JSON report written by the inspection CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectionReport {
    pub base_url: String,
    pub total_pages: usize,
    pub global_hygiene_score: f64,
    pub pages: Vec<PageAnalysis>,
    pub graph: GraphReport,
}
