//! Historical-archive lookup via the Wayback Machine CDX API.

use pagewatch_utils::http::{HttpClientFactory, HttpConfig};
use std::collections::BTreeSet;
use tracing::{info, warn};

const CDX_API_URL: &str = "https://web.archive.org/cdx/search/cdx";
const CDX_TIMEOUT_SECS: u64 = 10;
const CDX_LIMIT: usize = 10_000;
const CDX_FROM: &str = "20100101";
const CDX_TO: &str = "20261231";

/// Query the CDX index for historical URLs of a domain.
///
/// Timeouts and non-2xx responses yield an empty set; the technique is
/// best-effort and never fails the scan.
pub fn search(domain: &str) -> BTreeSet<String> {
    let domain = domain
        .trim_start_matches("http://")
        .trim_start_matches("https://")
        .trim_start_matches("www.")
        .trim_end_matches('/');

    let client = match HttpClientFactory::blocking_client(&HttpConfig::discovery(CDX_TIMEOUT_SECS))
    {
        Ok(client) => client,
        Err(err) => {
            warn!(error = %err, "could not build archive client");
            return BTreeSet::new();
        }
    };

    info!(domain = %domain, "querying archive index");
    let response = client
        .get(CDX_API_URL)
        .query(&[
            ("url", format!("{domain}/*").as_str()),
            ("matchType", "domain"),
            ("output", "json"),
            ("collapse", "statuscode"),
            ("limit", &CDX_LIMIT.to_string()),
            ("from", CDX_FROM),
            ("to", CDX_TO),
        ])
        .send();

    let response = match response {
        Ok(response) if response.status().is_success() => response,
        Ok(response) => {
            warn!(status = %response.status(), "archive query rejected");
            return BTreeSet::new();
        }
        Err(err) => {
            warn!(error = %err, "archive query failed");
            return BTreeSet::new();
        }
    };

    let rows: Vec<Vec<String>> = match response.json() {
        Ok(rows) => rows,
        Err(err) => {
            warn!(error = %err, "archive response was not tabular JSON");
            return BTreeSet::new();
        }
    };

    let urls = parse_cdx_rows(&rows);
    info!(urls = urls.len(), "archive query complete");
    urls
}

/// First row is the header; URLs sit at index 2 of each data row. Only
/// entries that already look like absolute URLs are kept.
pub fn parse_cdx_rows(rows: &[Vec<String>]) -> BTreeSet<String> {
    rows.iter()
        .skip(1)
        .filter_map(|row| row.get(2))
        .filter(|url| url.starts_with("http"))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn skips_header_and_non_http_rows() {
        let rows = vec![
            row(&["urlkey", "timestamp", "original"]),
            row(&["com,example)/", "20200101000000", "https://example.com/"]),
            row(&["com,example)/a", "20200101000001", "https://example.com/a"]),
            row(&["com,example)/bad", "20200101000002", "ftp://example.com/x"]),
            row(&["short"]),
        ];
        let urls = parse_cdx_rows(&rows);
        assert_eq!(urls.len(), 2);
        assert!(urls.contains("https://example.com/a"));
    }

    #[test]
    fn empty_input_yields_empty_set() {
        assert!(parse_cdx_rows(&[]).is_empty());
    }
}
