//! Single-origin BFS crawler feeding the browser pool.

use futures::{stream, StreamExt};
use pagewatch_types::CrawledPage;
use pagewatch_utils::http::{HttpClientFactory, HttpConfig};
use scraper::{Html, Selector};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};
use url::Url;

/// Settings for one inspection crawl.
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Crawl origin; a bare domain gets https.
    pub base_url: String,
    /// Upper bound on recorded pages.
    pub max_pages: usize,
    /// In-flight fetch bound.
    pub concurrency: usize,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl CrawlerConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            max_pages: 100,
            concurrency: 10,
            timeout_secs: 10,
        }
    }
}

/// Breadth-first crawler over async HTTP.
///
/// Fetches each URL once, records `{status, html, content_type}` per
/// URL (body kept only for 200s), and walks internal links from
/// `a`/`link`/`script`/`form` elements. The `max_pages` cap is checked
/// before fetching and before enqueueing.
pub struct InspectionCrawler {
    config: CrawlerConfig,
    client: reqwest::Client,
    base: String,
}

impl InspectionCrawler {
    pub fn new(config: CrawlerConfig) -> Result<Self, reqwest::Error> {
        let base = normalize_base(&config.base_url);
        let client = HttpClientFactory::async_client(&HttpConfig {
            timeout_secs: config.timeout_secs,
            ..HttpConfig::default()
        })?;
        Ok(Self {
            config,
            client,
            base,
        })
    }

    /// Crawl origin (`scheme://host[:port]`).
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Crawl from the origin and return the page map.
    pub async fn crawl(&self) -> HashMap<String, CrawledPage> {
        let mut visited: HashSet<String> = HashSet::new();
        let mut results: HashMap<String, CrawledPage> = HashMap::new();
        let mut frontier = vec![self.base.clone()];
        visited.insert(self.base.clone());

        info!(base = %self.base, max_pages = self.config.max_pages, "starting inspection crawl");

        while !frontier.is_empty() && results.len() < self.config.max_pages {
            let remaining = self.config.max_pages - results.len();
            let batch: Vec<String> = frontier.drain(..).take(remaining).collect();

            let fetched: Vec<(String, Option<CrawledPage>)> = stream::iter(batch)
                .map(|url| {
                    let client = self.client.clone();
                    async move {
                        let page = fetch_page(&client, &url).await;
                        (url, page)
                    }
                })
                .buffer_unordered(self.config.concurrency.max(1))
                .collect()
                .await;

            let mut next = Vec::new();
            for (url, page) in fetched {
                let Some(page) = page else { continue };
                let parse_links = page.status == 200 && page.content_type.contains("text/html");
                let html = parse_links.then(|| page.html.clone());
                results.insert(url.clone(), page);

                if let Some(html) = html {
                    for link in extract_internal_links(&html, &url, &self.base) {
                        if results.len() + next.len() >= self.config.max_pages {
                            break;
                        }
                        if visited.insert(link.clone()) {
                            next.push(link);
                        }
                    }
                }
            }
            frontier = next;
        }

        info!(pages = results.len(), "inspection crawl complete");
        results
    }
}

async fn fetch_page(client: &reqwest::Client, url: &str) -> Option<CrawledPage> {
    debug!(url = %url, "fetching");
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status().as_u16();
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string();
            let html = if status == 200 {
                response.text().await.unwrap_or_default()
            } else {
                String::new()
            };
            Some(CrawledPage {
                url: url.to_string(),
                status,
                html,
                content_type,
            })
        }
        Err(err) => {
            warn!(url = %url, error = %err, "request failed");
            None
        }
    }
}

/// Default the scheme and reduce to origin.
fn normalize_base(raw: &str) -> String {
    let with_scheme = if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };
    match Url::parse(&with_scheme) {
        Ok(url) => {
            let host = url.host_str().unwrap_or_default();
            match url.port() {
                Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
                None => format!("{}://{}", url.scheme(), host),
            }
        }
        Err(_) => with_scheme,
    }
}

/// Internal links from `{a, link, script, form}`, fragments stripped.
fn extract_internal_links(html: &str, page_url: &str, base: &str) -> Vec<String> {
    let base_host = Url::parse(base).ok().and_then(|u| u.host_str().map(String::from));
    let Some(base_host) = base_host else {
        return Vec::new();
    };
    let Ok(page_url) = Url::parse(page_url) else {
        return Vec::new();
    };
    let Ok(selector) = Selector::parse("a, link, script, form") else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    let mut links = Vec::new();
    for element in document.select(&selector) {
        let value = element.value();
        let Some(raw) = value
            .attr("href")
            .or_else(|| value.attr("src"))
            .or_else(|| value.attr("action"))
        else {
            continue;
        };
        let Ok(mut absolute) = page_url.join(raw) else {
            continue;
        };
        absolute.set_fragment(None);
        let internal = absolute
            .host_str()
            .map(|host| host == base_host || host.ends_with(&format!(".{base_host}")))
            .unwrap_or(false);
        if internal {
            links.push(absolute.to_string());
        }
    }
    links
}
