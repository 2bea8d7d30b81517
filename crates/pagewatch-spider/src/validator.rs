//! Async HEAD validation of crawled URLs before browser work.

use futures::{stream, StreamExt};
use pagewatch_utils::http::{HttpClientFactory, HttpConfig};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info};

/// Status probe result for one URL. `valid` means exactly HTTP 200.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlStatus {
    pub status: u16,
    pub valid: bool,
    pub content_type: String,
}

/// Async-native status prober, bounded by `concurrency`.
pub struct StatusValidator {
    client: reqwest::Client,
    concurrency: usize,
}

impl StatusValidator {
    pub fn new(timeout_secs: u64, concurrency: usize) -> Result<Self, reqwest::Error> {
        let client = HttpClientFactory::async_client(&HttpConfig {
            timeout_secs,
            ..HttpConfig::default()
        })?;
        Ok(Self {
            client,
            concurrency: concurrency.max(1),
        })
    }

    /// Probe a batch; timeouts and connection failures read as status 0.
    pub async fn validate_batch(&self, urls: Vec<String>) -> HashMap<String, UrlStatus> {
        info!(urls = urls.len(), "validating statuses");
        stream::iter(urls)
            .map(|url| {
                let client = self.client.clone();
                async move {
                    let status = check_single(&client, &url).await;
                    (url, status)
                }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await
    }

    /// The URLs that answered 200, sorted for deterministic fan-out.
    pub fn filter_valid_urls(results: &HashMap<String, UrlStatus>) -> BTreeSet<String> {
        results
            .iter()
            .filter(|(_, status)| status.valid)
            .map(|(url, _)| url.clone())
            .collect()
    }
}

async fn check_single(client: &reqwest::Client, url: &str) -> UrlStatus {
    match client.head(url).send().await {
        Ok(response) => {
            let status = response.status().as_u16();
            UrlStatus {
                status,
                valid: status == 200,
                content_type: response
                    .headers()
                    .get(reqwest::header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("")
                    .to_string(),
            }
        }
        Err(err) => {
            debug!(url = %url, error = %err, "status check failed");
            UrlStatus::default()
        }
    }
}
