//! Rule-based issue detection over collected page signals.

use pagewatch_types::{Issue, IssueCategory, PageStructure, RuntimeCapture, Severity};
use serde_json::json;

const SLOW_NAVIGATION_MS: f64 = 4000.0;
const HEAVY_DOM_NODES: u64 = 4000;

/// Run every detection rule against one page's signals.
pub fn detect_issues(url: &str, capture: &RuntimeCapture, structure: &PageStructure) -> Vec<Issue> {
    let mut issues = Vec::new();

    // Functional: console errors
    for log in &capture.console_logs {
        if log.kind == "error" || log.kind == "assert" {
            issues.push(
                Issue::new(url, IssueCategory::Functional, "JavaScript error", Severity::High)
                    .with_detail("type", json!(log.kind))
                    .with_detail("text", json!(log.text))
                    .with_detail("location", json!(log.location)),
            );
        }
    }

    // Functional: failed requests
    for failure in &capture.network_failures {
        issues.push(
            Issue::new(
                url,
                IssueCategory::Functional,
                "Network request failed",
                Severity::High,
            )
            .with_detail("url", json!(failure.url))
            .with_detail("method", json!(failure.method))
            .with_detail("failure", json!(failure.failure))
            .with_detail("resource_type", json!(failure.resource_type)),
        );
    }

    // UI: missing layout landmarks
    if !structure.has_header {
        issues.push(Issue::new(url, IssueCategory::Ui, "Missing header", Severity::Low));
    }
    if !structure.has_footer {
        issues.push(Issue::new(url, IssueCategory::Ui, "Missing footer", Severity::Low));
    }
    if !structure.has_nav {
        issues.push(Issue::new(
            url,
            IssueCategory::Ui,
            "Missing navigation",
            Severity::Medium,
        ));
    }

    // UI: broken links and images
    for broken in &structure.broken_links {
        let (title, severity) = match broken.kind {
            pagewatch_types::BrokenKind::Link => ("Broken link", Severity::Medium),
            pagewatch_types::BrokenKind::Image => ("Broken image", Severity::Low),
        };
        let mut issue = Issue::new(url, IssueCategory::Ui, title, severity)
            .with_detail("reason", json!(broken.reason));
        if let Some(element) = &broken.element {
            issue = issue.with_detail("element", json!(element));
        }
        if let Some(src) = &broken.src {
            issue = issue.with_detail("src", json!(src));
        }
        issues.push(issue);
    }

    // Performance: slow navigation
    if let Some(duration) = capture.performance.navigation_duration_ms() {
        if duration > SLOW_NAVIGATION_MS {
            issues.push(
                Issue::new(
                    url,
                    IssueCategory::Performance,
                    "Slow navigation (>4s)",
                    Severity::Medium,
                )
                .with_detail("duration", json!(duration)),
            );
        }
    }

    // Performance: heavy DOM
    if capture.dom_metrics.node_count > HEAVY_DOM_NODES {
        issues.push(Issue::new(
            url,
            IssueCategory::Performance,
            "Heavy DOM (>4000 nodes)",
            Severity::Medium,
        ));
    }

    // Accessibility: unnamed interactive elements, reported once
    if let Some(tree) = &capture.accessibility_tree {
        let missing = tree.count_missing_names();
        if missing > 0 {
            issues.push(
                Issue::new(
                    url,
                    IssueCategory::Accessibility,
                    format!("Elements missing accessible names ({missing})"),
                    Severity::Medium,
                )
                .with_detail("count", json!(missing)),
            );
        }
    }

    // Content hygiene: placeholder text
    let snapshot_lower = capture.dom_snapshot.to_ascii_lowercase();
    if snapshot_lower.contains("lorem ipsum") {
        issues.push(Issue::new(
            url,
            IssueCategory::Content,
            "Placeholder text present",
            Severity::Low,
        ));
    }

    // Accessibility: empty alt attributes
    if capture.dom_metrics.img_count > 0 && snapshot_lower.contains(r#"alt="""#) {
        issues.push(Issue::new(
            url,
            IssueCategory::Accessibility,
            "Images missing alt text",
            Severity::Low,
        ));
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagewatch_types::{AxNode, BrokenElement, BrokenKind, ConsoleLog, DomMetrics, NetworkFailure, PerformanceRecord};

    fn capture(url: &str) -> RuntimeCapture {
        RuntimeCapture::empty(url, "ok")
    }

    fn full_structure() -> PageStructure {
        PageStructure {
            has_header: true,
            has_footer: true,
            has_nav: true,
            repeated_classes: vec![],
            broken_links: vec![],
        }
    }

    #[test]
    fn console_error_yields_one_functional_high() {
        let mut capture = capture("https://ex.com/");
        capture.console_logs.push(ConsoleLog {
            kind: "error".into(),
            text: "boom".into(),
            location: None,
        });
        capture.console_logs.push(ConsoleLog {
            kind: "info".into(),
            text: "fine".into(),
            location: None,
        });

        let issues = detect_issues("https://ex.com/", &capture, &full_structure());
        let functional: Vec<&Issue> = issues
            .iter()
            .filter(|i| i.category == IssueCategory::Functional)
            .collect();
        assert_eq!(functional.len(), 1);
        assert_eq!(functional[0].severity, Severity::High);
        assert_eq!(functional[0].title, "JavaScript error");
    }

    #[test]
    fn network_failure_yields_functional_high() {
        let mut capture = capture("https://ex.com/");
        capture.network_failures.push(NetworkFailure {
            url: "https://ex.com/missing.js".into(),
            method: "GET".into(),
            failure: "net::ERR_ABORTED".into(),
            resource_type: "script".into(),
        });
        let issues = detect_issues("https://ex.com/", &capture, &full_structure());
        assert!(issues
            .iter()
            .any(|i| i.title == "Network request failed" && i.severity == Severity::High));
    }

    #[test]
    fn missing_landmarks_have_expected_severities() {
        let structure = PageStructure::default();
        let issues = detect_issues("https://ex.com/", &capture("https://ex.com/"), &structure);
        let find = |title: &str| issues.iter().find(|i| i.title == title).unwrap();
        assert_eq!(find("Missing header").severity, Severity::Low);
        assert_eq!(find("Missing footer").severity, Severity::Low);
        assert_eq!(find("Missing navigation").severity, Severity::Medium);
    }

    #[test]
    fn broken_link_medium_broken_image_low() {
        let mut structure = full_structure();
        structure.broken_links = vec![
            BrokenElement {
                kind: BrokenKind::Link,
                reason: "empty href".into(),
                element: Some("<a href=\"#\">x</a>".into()),
                src: None,
            },
            BrokenElement {
                kind: BrokenKind::Image,
                reason: "missing src".into(),
                element: Some("<img>".into()),
                src: None,
            },
        ];
        let issues = detect_issues("https://ex.com/", &capture("https://ex.com/"), &structure);
        let link = issues.iter().find(|i| i.title == "Broken link").unwrap();
        let image = issues.iter().find(|i| i.title == "Broken image").unwrap();
        assert_eq!(link.severity, Severity::Medium);
        assert_eq!(image.severity, Severity::Low);
    }

    #[test]
    fn slow_navigation_is_performance_medium() {
        let mut capture = capture("https://ex.com/");
        capture.performance = PerformanceRecord {
            navigation: serde_json::json!({"duration": 5000.0}),
            paint: serde_json::json!([]),
        };
        let issues = detect_issues("https://ex.com/", &capture, &full_structure());
        let slow = issues
            .iter()
            .find(|i| i.title == "Slow navigation (>4s)")
            .unwrap();
        assert_eq!(slow.category, IssueCategory::Performance);
        assert_eq!(slow.severity, Severity::Medium);

        // Right at the threshold: no issue.
        let mut at_limit = RuntimeCapture::empty("https://ex.com/", "ok");
        at_limit.performance.navigation = serde_json::json!({"duration": 4000.0});
        let issues = detect_issues("https://ex.com/", &at_limit, &full_structure());
        assert!(!issues.iter().any(|i| i.title.starts_with("Slow navigation")));
    }

    #[test]
    fn heavy_dom_is_flagged_above_4000_nodes() {
        let mut capture = capture("https://ex.com/");
        capture.dom_metrics = DomMetrics {
            node_count: 4001,
            ..DomMetrics::default()
        };
        let issues = detect_issues("https://ex.com/", &capture, &full_structure());
        assert!(issues.iter().any(|i| i.title == "Heavy DOM (>4000 nodes)"));
    }

    #[test]
    fn unnamed_interactive_elements_reported_once_with_count() {
        let mut capture = capture("https://ex.com/");
        capture.accessibility_tree = Some(AxNode {
            role: Some("RootWebArea".into()),
            name: Some("Page".into()),
            children: vec![
                AxNode {
                    role: Some("button".into()),
                    name: None,
                    children: vec![],
                },
                AxNode {
                    role: Some("link".into()),
                    name: None,
                    children: vec![],
                },
            ],
        });
        let issues = detect_issues("https://ex.com/", &capture, &full_structure());
        let a11y: Vec<&Issue> = issues
            .iter()
            .filter(|i| i.category == IssueCategory::Accessibility)
            .collect();
        assert_eq!(a11y.len(), 1);
        assert_eq!(a11y[0].title, "Elements missing accessible names (2)");
        assert_eq!(a11y[0].severity, Severity::Medium);
    }

    #[test]
    fn lorem_ipsum_and_empty_alt_are_content_rules() {
        let mut capture = capture("https://ex.com/");
        capture.dom_snapshot =
            r#"<html><body><p>Lorem Ipsum dolor</p><img alt="" src="/x.png"></body></html>"#.into();
        capture.dom_metrics.img_count = 1;
        let issues = detect_issues("https://ex.com/", &capture, &full_structure());
        assert!(issues.iter().any(|i| i.title == "Placeholder text present"));
        assert!(issues.iter().any(|i| i.title == "Images missing alt text"));
    }

    #[test]
    fn clean_page_with_full_structure_has_no_issues() {
        let issues = detect_issues(
            "https://ex.com/",
            &capture("https://ex.com/"),
            &full_structure(),
        );
        assert!(issues.is_empty());
    }
}
