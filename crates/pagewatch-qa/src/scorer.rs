//! Hygiene scoring: severity-weighted deduction from a base of 100.

use pagewatch_types::{Issue, PageAnalysis};

const BASE_SCORE: f64 = 100.0;

/// Page score: `max(0, 100 − Σ penalty(severity))`.
pub fn score_page(issues: &[Issue]) -> f64 {
    let deduction: f64 = issues
        .iter()
        .map(|issue| issue.severity.score_penalty() as f64)
        .sum();
    (BASE_SCORE - deduction).max(0.0)
}

/// Mean of page scores; 0 for an empty set.
pub fn global_score(pages: &[PageAnalysis]) -> f64 {
    if pages.is_empty() {
        return 0.0;
    }
    pages.iter().map(|page| page.score).sum::<f64>() / pages.len() as f64
}
