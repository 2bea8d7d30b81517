//! Detected issues: categories, severities, and their weights.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Issue severity.
///
/// Two weight scales hang off a severity: `rank_weight` orders issues
/// inside a page, `score_penalty` is what the scorer deducts. They are
/// intentionally different.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }

    /// Ranking weight carried on every issue payload.
    pub fn rank_weight(&self) -> u32 {
        match self {
            Severity::Critical => 5,
            Severity::High => 3,
            Severity::Medium => 2,
            Severity::Low => 1,
        }
    }

    /// Points deducted from the base hygiene score of 100.
    pub fn score_penalty(&self) -> u32 {
        match self {
            Severity::Critical => 20,
            Severity::High => 10,
            Severity::Medium => 5,
            Severity::Low => 2,
        }
    }

    /// Severities that count toward a page's critical-issue tally.
    pub fn is_critical(&self) -> bool {
        matches!(self, Severity::Critical | Severity::High)
    }
}

/// Category an issue falls under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueCategory {
    Functional,
    Ui,
    Performance,
    Accessibility,
    Content,
    Runtime,
}

impl IssueCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCategory::Functional => "functional",
            IssueCategory::Ui => "ui",
            IssueCategory::Performance => "performance",
            IssueCategory::Accessibility => "accessibility",
            IssueCategory::Content => "content",
            IssueCategory::Runtime => "runtime",
        }
    }
}

/// One detected quality issue on a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub page: String,
    pub category: IssueCategory,
    pub title: String,
    pub severity: Severity,
    pub severity_weight: u32,
    pub details: Map<String, Value>,
}

impl Issue {
    pub fn new(
        page: impl Into<String>,
        category: IssueCategory,
        title: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            page: page.into(),
            category,
            title: title.into(),
            severity,
            severity_weight: severity.rank_weight(),
            details: Map::new(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: Value) -> Self {
        self.details.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_weights_match_severity_ladder() {
        assert_eq!(Severity::Critical.rank_weight(), 5);
        assert_eq!(Severity::High.rank_weight(), 3);
        assert_eq!(Severity::Medium.rank_weight(), 2);
        assert_eq!(Severity::Low.rank_weight(), 1);
    }

    #[test]
    fn score_penalties_differ_from_rank_weights() {
        assert_eq!(Severity::Critical.score_penalty(), 20);
        assert_eq!(Severity::High.score_penalty(), 10);
        assert_eq!(Severity::Medium.score_penalty(), 5);
        assert_eq!(Severity::Low.score_penalty(), 2);
    }

    #[test]
    fn only_high_and_critical_are_critical() {
        assert!(Severity::Critical.is_critical());
        assert!(Severity::High.is_critical());
        assert!(!Severity::Medium.is_critical());
        assert!(!Severity::Low.is_critical());
    }

    #[test]
    fn issue_payload_carries_weight_and_details() {
        let issue = Issue::new(
            "https://ex.com/",
            IssueCategory::Functional,
            "JavaScript error",
            Severity::High,
        )
        .with_detail("text", serde_json::json!("boom"));

        let value = serde_json::to_value(&issue).unwrap();
        assert_eq!(value["category"], "functional");
        assert_eq!(value["severity"], "high");
        assert_eq!(value["severity_weight"], 3);
        assert_eq!(value["details"]["text"], "boom");
    }
}
