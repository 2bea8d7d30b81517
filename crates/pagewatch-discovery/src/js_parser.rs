//! JavaScript endpoint extraction by regex mining.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Patterns that capture candidate endpoints from JS source. Matching
/// is case-insensitive across the board.
static ENDPOINT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Quoted paths ending in an interesting extension
        r#"["']([/a-zA-Z0-9_\-./]+(?:\.(?:php|jsp|aspx|html|json|xml|api)))["']"#,
        // fetch() first argument
        r#"fetch\(["']([^"']+)["']"#,
        // axios verb-call first argument
        r#"axios\.(?:get|post|put|delete|patch)\(["']([^"']+)["']"#,
        // XMLHttpRequest open-call URL
        r#"XMLHttpRequest\(\).*?open\(["'](?:GET|POST)["'],\s*["']([^"']+)["']"#,
        // Quoted paths containing an API-ish segment
        r#"["']([/a-zA-Z0-9_\-./]+/(?:api|v\d+|admin|users|data|config)[/a-zA-Z0-9_\-./]*)["']"#,
        // Quoted paths with an /api segment anywhere
        r#"["']([/a-zA-Z0-9_\-./]*/?api[/a-zA-Z0-9_\-./]*)["']"#,
        // Any quoted leading-slash path
        r#"(?:^|["'])\s*(/[a-zA-Z0-9_\-./]+)\s*(?:["']|$)"#,
    ]
    .iter()
    .map(|pattern| {
        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .expect("endpoint pattern must compile")
    })
    .collect()
});

/// Static-asset extensions that are never endpoints.
static ASSET_PATTERN: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r"\.jpg|\.png|\.gif|\.css|\.woff")
        .case_insensitive(true)
        .build()
        .expect("asset pattern must compile")
});

/// Extract candidate endpoints from one JavaScript body.
pub fn extract_endpoints(js: &str) -> BTreeSet<String> {
    let mut endpoints = BTreeSet::new();
    for pattern in ENDPOINT_PATTERNS.iter() {
        for captures in pattern.captures_iter(js) {
            if let Some(capture) = captures.get(1) {
                let endpoint = capture.as_str().trim();
                if is_valid_endpoint(endpoint) {
                    endpoints.insert(endpoint.to_string());
                }
            }
        }
    }
    endpoints
}

/// Extract endpoints from every harvested JS body, deduplicated.
pub fn extract_from_js_files(js_files: &HashMap<String, String>) -> BTreeSet<String> {
    let mut all = BTreeSet::new();
    for (url, body) in js_files {
        let found = extract_endpoints(body);
        debug!(url = %url, endpoints = found.len(), "extracted endpoints");
        all.extend(found);
    }
    all
}

/// An endpoint must start with `/`, be 2–499 chars, and not look like a
/// static asset.
fn is_valid_endpoint(endpoint: &str) -> bool {
    if !endpoint.starts_with('/') || endpoint == "//" {
        return false;
    }
    if endpoint.len() < 2 || endpoint.len() >= 500 {
        return false;
    }
    !ASSET_PATTERN.is_match(endpoint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_fetch_and_axios_calls() {
        let js = r#"
            fetch("/api/users");
            axios.post('/api/login', data);
            axios.get("/v2/items");
        "#;
        let endpoints = extract_endpoints(js);
        assert!(endpoints.contains("/api/users"));
        assert!(endpoints.contains("/api/login"));
        assert!(endpoints.contains("/v2/items"));
    }

    #[test]
    fn finds_extension_suffixed_paths() {
        let js = r#"var legacy = "/cgi/report.php"; load('/data/feed.json');"#;
        let endpoints = extract_endpoints(js);
        assert!(endpoints.contains("/cgi/report.php"));
        assert!(endpoints.contains("/data/feed.json"));
    }

    #[test]
    fn finds_xhr_open_urls() {
        let js = r#"new XMLHttpRequest().open("GET", "/internal/status");"#;
        let endpoints = extract_endpoints(js);
        assert!(endpoints.contains("/internal/status"));
    }

    #[test]
    fn rejects_assets_relative_paths_and_oversize() {
        let js = format!(
            r#"
            fetch("/logo.png");
            fetch("images/relative.html");
            fetch("/{}");
        "#,
            "a".repeat(600)
        );
        let endpoints = extract_endpoints(&js);
        assert!(!endpoints.iter().any(|e| e.contains("logo.png")));
        assert!(!endpoints.iter().any(|e| e.contains("relative")));
        assert!(!endpoints.iter().any(|e| e.len() >= 500));
    }

    #[test]
    fn merges_across_files_without_duplicates() {
        let mut files = HashMap::new();
        files.insert("a.js".to_string(), r#"fetch("/api/data")"#.to_string());
        files.insert("b.js".to_string(), r#"fetch("/api/data")"#.to_string());
        let endpoints = extract_from_js_files(&files);
        assert_eq!(endpoints.iter().filter(|e| *e == "/api/data").count(), 1);
    }
}
