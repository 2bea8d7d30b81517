//! Discovery fusion: run the enabled techniques, merge their URLs into
//! one provenance-tagged candidate table, then probe liveness.

use crate::bruteforce::BruteForcer;
use crate::config::DiscoveryConfig;
use crate::js_parser;
use crate::live_crawler::LiveCrawler;
use crate::robots;
use crate::validator::LivenessValidator;
use crate::wayback;
use pagewatch_types::{CandidateUrl, EnumerationResults, EnumerationSummary, SourceTag, UrlDetail};
use pagewatch_utils::url_utils::{is_internal_url, normalize_url, status_tag};
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use tracing::{error, info};

/// Composes the discovery techniques over one shared candidate table.
///
/// A technique failure is an empty contribution, never a scan failure;
/// `enumerate` always produces a (possibly empty) result set.
pub struct Enumerator {
    config: DiscoveryConfig,
    candidates: Mutex<HashMap<String, CandidateUrl>>,
    sources_summary: Mutex<BTreeMap<String, usize>>,
}

impl Enumerator {
    pub fn new(config: DiscoveryConfig) -> Self {
        Self {
            config,
            candidates: Mutex::new(HashMap::new()),
            sources_summary: Mutex::new(BTreeMap::new()),
        }
    }

    /// Run the enabled techniques and validate the fused candidate set.
    pub fn enumerate(&self) -> EnumerationResults {
        info!(
            domain = %self.config.domain,
            techniques = self.config.techniques.len(),
            "starting enumeration"
        );

        let mut js_files = HashMap::new();

        if self.config.enabled(SourceTag::LiveCrawl) {
            js_files = self.run_live_crawl();
        }
        if self.config.enabled(SourceTag::JsAnalysis) {
            self.run_js_analysis(&js_files);
        }
        if self.config.enabled(SourceTag::Wayback) {
            self.run_wayback();
        }
        if self.config.enabled(SourceTag::Robots) {
            self.run_robots();
        }
        if self.config.enabled(SourceTag::Sitemap) {
            self.run_sitemap();
        }
        if self.config.enabled(SourceTag::Bruteforce) {
            self.run_bruteforce();
        }

        self.validate_candidates();
        self.build_results()
    }

    fn run_live_crawl(&self) -> HashMap<String, String> {
        info!("running live crawl");
        let crawler = match LiveCrawler::new(
            &self.config.domain,
            self.config.depth,
            self.config.timeout_secs,
        ) {
            Ok(crawler) => crawler,
            Err(err) => {
                error!(error = %err, "live crawl unavailable");
                return HashMap::new();
            }
        };
        let harvest = crawler.crawl();
        for url in &harvest.urls {
            self.add_url(url, SourceTag::LiveCrawl);
        }
        self.record_summary(SourceTag::LiveCrawl, harvest.urls.len());
        harvest.js_files
    }

    fn run_js_analysis(&self, js_files: &HashMap<String, String>) {
        info!("running JavaScript analysis");
        let endpoints = js_parser::extract_from_js_files(js_files);
        let base = self.config.base();
        for endpoint in &endpoints {
            self.add_url(&format!("{base}{endpoint}"), SourceTag::JsAnalysis);
        }
        self.record_summary(SourceTag::JsAnalysis, endpoints.len());
    }

    fn run_wayback(&self) {
        info!("running archive search");
        let urls = wayback::search(&self.config.domain);
        for url in &urls {
            self.add_url(url, SourceTag::Wayback);
        }
        self.record_summary(SourceTag::Wayback, urls.len());
    }

    fn run_robots(&self) {
        info!("parsing robots directives");
        let base = self.config.base();
        let paths = robots::robots_paths(&base, self.config.timeout_secs);
        for path in &paths {
            self.add_url(&format!("{base}{path}"), SourceTag::Robots);
        }
        self.record_summary(SourceTag::Robots, paths.len());
    }

    fn run_sitemap(&self) {
        info!("parsing sitemap");
        let base = self.config.base();
        let urls = robots::sitemap_urls(&base, self.config.timeout_secs);
        for url in &urls {
            self.add_url(url, SourceTag::Sitemap);
        }
        self.record_summary(SourceTag::Sitemap, urls.len());
    }

    fn run_bruteforce(&self) {
        info!("running brute force");
        let urls = BruteForcer::new().generate_urls(&self.config.base());
        for url in &urls {
            self.add_url(url, SourceTag::Bruteforce);
        }
        self.record_summary(SourceTag::Bruteforce, urls.len());
    }

    fn validate_candidates(&self) {
        let urls: Vec<String> = {
            let candidates = self.candidates.lock().expect("candidate table poisoned");
            candidates.keys().cloned().collect()
        };
        if urls.is_empty() {
            return;
        }

        let validator = LivenessValidator::new(self.config.timeout_secs, self.config.threads);
        let probes = validator.validate_batch(urls);

        let mut candidates = self.candidates.lock().expect("candidate table poisoned");
        for (url, probe) in probes {
            if let Some(candidate) = candidates.get_mut(&url) {
                candidate.status = Some(probe.status);
                candidate.content_length = probe.content_length;
                candidate.alive = probe.alive;
            }
        }
    }

    /// Normalize, drop non-internal URLs, and upsert with provenance.
    pub(crate) fn add_url(&self, url: &str, source: SourceTag) {
        let normalized = normalize_url(url, None);
        if normalized.is_empty() || !is_internal_url(&normalized, &self.config.domain) {
            return;
        }
        let mut candidates = self.candidates.lock().expect("candidate table poisoned");
        match candidates.entry(normalized) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().sources.insert(source);
            }
            Entry::Vacant(entry) => {
                entry.insert(CandidateUrl::from_source(source));
            }
        }
    }

    fn record_summary(&self, source: SourceTag, count: usize) {
        let mut summary = self.sources_summary.lock().expect("summary poisoned");
        summary.insert(source.as_str().to_string(), count);
    }

    fn build_results(&self) -> EnumerationResults {
        let candidates = self.candidates.lock().expect("candidate table poisoned");
        let sources_summary = self.sources_summary.lock().expect("summary poisoned");

        let mut urls: Vec<String> = candidates
            .iter()
            .filter(|(_, candidate)| !self.config.only_alive || candidate.alive)
            .map(|(url, _)| url.clone())
            .collect();
        urls.sort();

        let mut url_details = BTreeMap::new();
        let mut alive_urls = 0;
        for url in &urls {
            let candidate = &candidates[url];
            if candidate.alive {
                alive_urls += 1;
            }
            url_details.insert(
                url.clone(),
                UrlDetail {
                    status: candidate.status,
                    status_tag: status_tag(candidate.status),
                    content_length: candidate.content_length,
                    alive: candidate.alive,
                    sources: candidate.sources.iter().map(|s| s.to_string()).collect(),
                },
            );
        }

        EnumerationResults {
            summary: EnumerationSummary {
                total_urls: urls.len(),
                alive_urls,
                sources_used: sources_summary.keys().cloned().collect(),
                sources_summary: sources_summary.clone(),
            },
            urls,
            url_details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagewatch_types::SourceTag;
    use std::collections::BTreeSet;

    fn config(domain: &str) -> DiscoveryConfig {
        DiscoveryConfig {
            domain: domain.to_string(),
            depth: 2,
            timeout_secs: 2,
            threads: 8,
            only_alive: false,
            techniques: BTreeSet::new(),
        }
    }

    #[test]
    fn urls_merge_across_sources_with_sorted_provenance() {
        let enumerator = Enumerator::new(config("ex.com"));
        enumerator.add_url("https://ex.com/admin", SourceTag::Bruteforce);
        enumerator.add_url("https://ex.com/admin", SourceTag::LiveCrawl);
        enumerator.add_url("https://ex.com/admin#frag", SourceTag::Sitemap);

        let results = enumerator.build_results();
        assert_eq!(results.urls, vec!["https://ex.com/admin"]);
        let detail = &results.url_details["https://ex.com/admin"];
        assert_eq!(detail.sources, vec!["bruteforce", "live_crawl", "sitemap"]);
    }

    #[test]
    fn external_urls_are_dropped() {
        let enumerator = Enumerator::new(config("ex.com"));
        enumerator.add_url("https://evil.com/x", SourceTag::Wayback);
        enumerator.add_url("https://sub.ex.com/x", SourceTag::Wayback);

        let results = enumerator.build_results();
        assert_eq!(results.urls, vec!["https://sub.ex.com/x"]);
    }

    #[test]
    fn output_urls_are_sorted() {
        let enumerator = Enumerator::new(config("ex.com"));
        for path in ["/zeta", "/alpha", "/midway"] {
            enumerator.add_url(&format!("https://ex.com{path}"), SourceTag::Bruteforce);
        }
        let results = enumerator.build_results();
        let mut sorted = results.urls.clone();
        sorted.sort();
        assert_eq!(results.urls, sorted);
    }

    #[test]
    fn unvalidated_candidates_read_unknown() {
        let enumerator = Enumerator::new(config("ex.com"));
        enumerator.add_url("https://ex.com/a", SourceTag::Robots);
        let results = enumerator.build_results();
        let detail = &results.url_details["https://ex.com/a"];
        assert_eq!(detail.status, None);
        assert_eq!(detail.status_tag, "[UNKNOWN]");
        assert!(!detail.alive);
    }

    #[tokio::test]
    async fn end_to_end_enumeration_against_mock_site() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        let base = server.uri();

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_string(r#"<a href="/about">About</a>"#),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/about"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_string("<header>About</header>"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Disallow: /private\n"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/sitemap.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!(
                "<urlset><url><loc>{base}/about</loc></url></urlset>"
            )))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/private"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let mut cfg = config(&base);
        cfg.techniques = BTreeSet::from([
            SourceTag::LiveCrawl,
            SourceTag::Robots,
            SourceTag::Sitemap,
        ]);

        let results = tokio::task::spawn_blocking(move || Enumerator::new(cfg).enumerate())
            .await
            .expect("task");

        // /about was found by both the crawler and the sitemap.
        let about = results
            .url_details
            .iter()
            .find(|(url, _)| url.ends_with("/about"))
            .map(|(_, detail)| detail)
            .expect("/about discovered");
        assert_eq!(about.sources, vec!["live_crawl", "sitemap"]);
        assert!(about.alive);
        assert_eq!(about.status_tag, "[200]");

        let private = results
            .url_details
            .iter()
            .find(|(url, _)| url.ends_with("/private"))
            .map(|(_, detail)| detail)
            .expect("/private discovered");
        assert_eq!(private.sources, vec!["robots"]);
        assert!(!private.alive);

        assert_eq!(results.summary.total_urls, results.urls.len());
        assert!(results.summary.alive_urls <= results.summary.total_urls);
        assert_eq!(
            results.summary.sources_used,
            vec!["live_crawl", "robots", "sitemap"]
        );
    }

    #[tokio::test]
    async fn only_alive_filters_dead_urls_but_keeps_summary_sources() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        let base = server.uri();
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let mut cfg = config(&base);
        cfg.only_alive = true;
        let enumerator = Enumerator::new(cfg);
        enumerator.add_url(&format!("{base}/gone"), SourceTag::Robots);
        enumerator.record_summary(SourceTag::Robots, 1);

        let results = tokio::task::spawn_blocking(move || {
            enumerator.validate_candidates();
            enumerator.build_results()
        })
        .await
        .expect("task");

        assert!(results.urls.is_empty());
        assert_eq!(results.summary.total_urls, 0);
        // Provenance accounting is retained even when output is filtered.
        assert_eq!(results.summary.sources_summary["robots"], 1);
    }
}
