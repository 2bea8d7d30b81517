//! Page → issues adjacency and final report assembly.

use pagewatch_types::{GraphPage, GraphReport, Issue, PageType};
use std::collections::HashMap;

/// Builds the page→issues graph. Pages are added exactly once;
/// subsequent issue batches append to the existing node.
#[derive(Default)]
pub struct GraphBuilder {
    pages: Vec<GraphPage>,
    index: HashMap<String, usize>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page node; a second add for the same URL is a no-op.
    pub fn add_page(&mut self, url: &str, page_type: PageType, score: f64) {
        if self.index.contains_key(url) {
            return;
        }
        self.index.insert(url.to_string(), self.pages.len());
        self.pages.push(GraphPage {
            url: url.to_string(),
            page_type,
            score,
            issues: Vec::new(),
        });
    }

    /// Append issues to a page, creating a placeholder node if needed.
    pub fn add_issues(&mut self, url: &str, issues: Vec<Issue>) {
        if !self.index.contains_key(url) {
            self.add_page(url, PageType::Unknown, 0.0);
        }
        if let Some(&position) = self.index.get(url) {
            self.pages[position].issues.extend(issues);
        }
    }

    pub fn to_report(&self) -> GraphReport {
        GraphReport {
            pages: self.pages.clone(),
        }
    }
}
