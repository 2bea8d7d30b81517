//! Transforms from QA results to the frontend-facing hygiene payloads.

use pagewatch_types::{
    EnumerationResults, HygieneIssue, HygienePage, QaResults, ScanSummary,
};

const WORST_PAGES_LIMIT: usize = 10;

/// QA pages as hygiene payloads, sorted worst-score-first.
pub fn hygiene_pages(results: &QaResults) -> Vec<HygienePage> {
    let mut pages: Vec<HygienePage> = results
        .pages
        .iter()
        .map(|page| HygienePage {
            url: page.url.clone(),
            page_type: page.page_type.as_str().to_string(),
            score: page.score,
            issues: page.issues.iter().map(HygieneIssue::from).collect(),
            critical_issue_count: page.critical_issue_count,
            total_issue_count: page.total_issue_count,
        })
        .collect();
    pages.sort_by(|a, b| a.score.total_cmp(&b.score).then(a.url.cmp(&b.url)));
    pages
}

/// The ten lowest-scoring pages.
pub fn worst_pages(results: &QaResults) -> Vec<HygienePage> {
    hygiene_pages(results)
        .into_iter()
        .take(WORST_PAGES_LIMIT)
        .collect()
}

/// Aggregate summary across a QA run.
pub fn summary(results: &QaResults) -> ScanSummary {
    let total_issues = results.pages.iter().map(|p| p.total_issue_count).sum();
    let critical_issues = results.pages.iter().map(|p| p.critical_issue_count).sum();
    ScanSummary {
        total_discovered: results.summary.total_discovered,
        total_valid: results.summary.total_valid,
        total_analyzed: results.summary.total_analyzed,
        average_score: results.summary.avg_score,
        total_issues,
        critical_issues,
    }
}

/// Coarse hygiene pages derived from enumeration liveness, for scans
/// that ran discovery only: 90 alive, 50 dead, 30 for 5xx.
pub fn hygiene_from_enumeration(results: &EnumerationResults) -> Vec<HygienePage> {
    results
        .url_details
        .iter()
        .map(|(url, detail)| {
            let status = detail.status.unwrap_or(0);
            let score = if status >= 500 {
                30.0
            } else if detail.alive {
                90.0
            } else {
                50.0
            };
            HygienePage {
                url: url.clone(),
                page_type: "page".to_string(),
                score,
                issues: Vec::new(),
                critical_issue_count: 0,
                total_issue_count: 0,
            }
        })
        .collect()
}
