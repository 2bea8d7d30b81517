//! Live crawler: follow internal links from the root, harvesting URLs
//! and JavaScript bodies.

use pagewatch_utils::http::{HttpClientFactory, HttpConfig};
use pagewatch_utils::url_utils::{is_internal_url, normalize_url};
use scraper::{Html, Selector};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Output of a crawl: discovered internal URLs plus JavaScript bodies
/// retained for the endpoint extractor.
#[derive(Debug, Default)]
pub struct CrawlHarvest {
    pub urls: HashSet<String>,
    pub js_files: HashMap<String, String>,
}

/// Depth-bounded internal crawler over blocking HTTP.
///
/// Each URL is fetched exactly once (visited set keyed by normalized
/// form); children are only fetched while `current < depth`. Network
/// errors and timeouts are skipped silently.
pub struct LiveCrawler {
    domain: String,
    depth: usize,
    client: reqwest::blocking::Client,
    visited: HashSet<String>,
    harvest: CrawlHarvest,
}

impl LiveCrawler {
    pub fn new(domain: &str, depth: usize, timeout_secs: u64) -> Result<Self, reqwest::Error> {
        let domain = if domain.starts_with("http://") || domain.starts_with("https://") {
            domain.to_string()
        } else {
            format!("https://{domain}")
        };
        let client = HttpClientFactory::blocking_client(&HttpConfig::discovery(timeout_secs))?;
        Ok(Self {
            domain,
            depth,
            client,
            visited: HashSet::new(),
            harvest: CrawlHarvest::default(),
        })
    }

    /// Crawl from the root and return everything harvested.
    pub fn crawl(mut self) -> CrawlHarvest {
        info!(domain = %self.domain, depth = self.depth, "starting live crawl");
        let root = self.domain.clone();
        self.crawl_recursive(&root, 0);
        info!(
            urls = self.harvest.urls.len(),
            js_files = self.harvest.js_files.len(),
            "live crawl complete"
        );
        self.harvest
    }

    fn crawl_recursive(&mut self, url: &str, current_depth: usize) {
        if current_depth >= self.depth {
            return;
        }

        let url = normalize_url(url, None);
        if url.is_empty() || !self.visited.insert(url.clone()) {
            return;
        }
        if !is_internal_url(&url, &self.domain) {
            return;
        }

        debug!(depth = current_depth, url = %url, "crawling");
        let response = match self.client.get(&url).send() {
            Ok(response) => response,
            Err(err) => {
                debug!(url = %url, error = %err, "fetch failed");
                return;
            }
        };
        if !response.status().is_success() {
            return;
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();
        let body = match response.text() {
            Ok(body) => body,
            Err(err) => {
                debug!(url = %url, error = %err, "body read failed");
                return;
            }
        };

        self.harvest.urls.insert(url.clone());

        if content_type.contains("text/html") {
            let links = extract_links(&body, &url);
            for link in links {
                self.crawl_recursive(&link, current_depth + 1);
            }
        } else if content_type.contains("javascript") || url.ends_with(".js") {
            self.harvest.js_files.insert(url, body);
        }
    }
}

/// Candidate links from an HTML document: `<a href>`, `<form action>`,
/// `<script src>`, `<link href>`, and `<meta http-equiv=refresh>`.
pub fn extract_links(html: &str, base_url: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    let sources: [(&str, &str); 4] = [
        ("a[href]", "href"),
        ("form[action]", "action"),
        ("script[src]", "src"),
        ("link[href]", "href"),
    ];
    for (selector, attr) in sources {
        let selector = match Selector::parse(selector) {
            Ok(selector) => selector,
            Err(_) => continue,
        };
        for element in document.select(&selector) {
            if let Some(value) = element.value().attr(attr) {
                push_normalized(&mut links, value, base_url);
            }
        }
    }

    if let Ok(selector) = Selector::parse("meta[http-equiv]") {
        for element in document.select(&selector) {
            let http_equiv = element.value().attr("http-equiv").unwrap_or("");
            if !http_equiv.eq_ignore_ascii_case("refresh") {
                continue;
            }
            let content = element.value().attr("content").unwrap_or("");
            if let Some(index) = content.to_ascii_lowercase().rfind("url=") {
                let target = content[index + 4..].trim_matches(|c| c == '\'' || c == '"');
                push_normalized(&mut links, target, base_url);
            }
        }
    }

    links
}

fn push_normalized(links: &mut Vec<String>, raw: &str, base_url: &str) {
    let normalized = normalize_url(raw, Some(base_url));
    if !normalized.is_empty() {
        links.push(normalized);
    }
}
