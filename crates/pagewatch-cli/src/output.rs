//! Output formatting for the discovery CLI.

use pagewatch_types::EnumerationResults;
use serde_json::json;

/// One URL per line.
pub fn format_txt(results: &EnumerationResults) -> String {
    results.urls.join("\n")
}

/// JSON document: `{urls, summary, details}`.
pub fn format_json(results: &EnumerationResults) -> String {
    let value = json!({
        "urls": results.urls,
        "summary": results.summary,
        "details": results.url_details,
    });
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
}

/// Human-readable run summary printed unless `--silent`.
pub fn format_summary(domain: &str, results: &EnumerationResults) -> String {
    let mut out = String::new();
    let rule = "=".repeat(70);
    out.push_str(&format!("\n{rule}\nENUMERATION SUMMARY\n{rule}\n"));
    out.push_str(&format!("Domain: {domain}\n"));
    out.push_str(&format!("Total URLs Found: {}\n", results.summary.total_urls));
    out.push_str(&format!("Alive URLs: {}\n", results.summary.alive_urls));
    out.push_str(&format!(
        "Techniques Used: {}\n",
        results.summary.sources_used.join(", ")
    ));
    out.push_str("\nURLs by Source:\n");
    for (source, count) in &results.summary.sources_summary {
        out.push_str(&format!("  {source}: {count}\n"));
    }
    out.push_str(&rule);
    out
}
