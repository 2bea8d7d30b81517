//! Threaded liveness validation: parallel HEAD probes over a bounded
//! worker pool.

use pagewatch_utils::http::{HttpClientFactory, HttpConfig};
use std::collections::HashMap;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use tracing::{debug, info, warn};

/// Statuses counted as alive.
pub const ALIVE_STATUSES: [u16; 10] = [200, 201, 202, 204, 206, 301, 302, 303, 307, 308];

pub fn is_alive_status(status: u16) -> bool {
    ALIVE_STATUSES.contains(&status)
}

/// Outcome of one probe. A timeout or connection failure is status 0,
/// length 0, not alive; the probe never errors outward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Probe {
    pub status: u16,
    pub content_length: u64,
    pub alive: bool,
}

impl Probe {
    fn dead() -> Self {
        Self::default()
    }
}

/// Parallel HEAD prober on a fixed pool of OS threads.
///
/// This is the discovery-stage validator; the inspection stage uses the
/// async-native validator in `pagewatch-spider` instead.
pub struct LivenessValidator {
    timeout_secs: u64,
    threads: usize,
}

impl LivenessValidator {
    pub fn new(timeout_secs: u64, threads: usize) -> Self {
        Self {
            timeout_secs,
            threads: threads.max(1),
        }
    }

    /// Probe every URL, keyed by URL in the result.
    pub fn validate_batch(&self, urls: Vec<String>) -> HashMap<String, Probe> {
        if urls.is_empty() {
            return HashMap::new();
        }

        let client =
            match HttpClientFactory::blocking_client(&HttpConfig::discovery(self.timeout_secs)) {
                Ok(client) => client,
                Err(err) => {
                    warn!(error = %err, "could not build probe client; marking batch dead");
                    return urls.into_iter().map(|url| (url, Probe::dead())).collect();
                }
            };

        let total = urls.len();
        let workers = self.threads.min(total);
        info!(urls = total, workers, "validating liveness");

        let (job_tx, job_rx) = mpsc::channel::<String>();
        let job_rx = Arc::new(Mutex::new(job_rx));
        let (result_tx, result_rx) = mpsc::channel::<(String, Probe)>();

        let mut handles = Vec::with_capacity(workers);
        for _ in 0..workers {
            let job_rx = Arc::clone(&job_rx);
            let result_tx = result_tx.clone();
            let client = client.clone();
            handles.push(thread::spawn(move || loop {
                let url = {
                    let rx = match job_rx.lock() {
                        Ok(rx) => rx,
                        Err(_) => break,
                    };
                    match rx.recv() {
                        Ok(url) => url,
                        Err(_) => break,
                    }
                };
                let probe = probe_url(&client, &url);
                if result_tx.send((url, probe)).is_err() {
                    break;
                }
            }));
        }
        drop(result_tx);

        for url in urls {
            // Receiver outlives all sends; a failure here means every
            // worker died, which the collection loop tolerates.
            let _ = job_tx.send(url);
        }
        drop(job_tx);

        let mut results = HashMap::with_capacity(total);
        while let Ok((url, probe)) = result_rx.recv() {
            results.insert(url, probe);
        }
        for handle in handles {
            let _ = handle.join();
        }
        results
    }
}

fn probe_url(client: &reqwest::blocking::Client, url: &str) -> Probe {
    match client.head(url).send() {
        Ok(response) => {
            let status = response.status().as_u16();
            let header_length = response.content_length().unwrap_or(0);
            let body_length = response.bytes().map(|b| b.len() as u64).unwrap_or(0);
            let content_length = if body_length > 0 {
                body_length
            } else {
                header_length
            };
            Probe {
                status,
                content_length,
                alive: is_alive_status(status),
            }
        }
        Err(err) => {
            debug!(url = %url, error = %err, "probe failed");
            Probe::dead()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alive_set_is_exact() {
        for status in ALIVE_STATUSES {
            assert!(is_alive_status(status));
        }
        for status in [0, 203, 304, 400, 403, 404, 500, 503] {
            assert!(!is_alive_status(status));
        }
    }

    #[tokio::test]
    async fn batch_probes_classify_mixed_statuses() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        let base = server.uri();

        Mock::given(method("HEAD"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200).insert_header("content-length", "42"))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let urls = vec![
            format!("{base}/ok"),
            format!("{base}/missing"),
            "http://127.0.0.1:1/unreachable".to_string(),
        ];
        let ok_url = urls[0].clone();
        let missing_url = urls[1].clone();
        let dead_url = urls[2].clone();

        let results = tokio::task::spawn_blocking(move || {
            LivenessValidator::new(2, 8).validate_batch(urls)
        })
        .await
        .expect("task");

        assert_eq!(results.len(), 3);
        let ok = &results[&ok_url];
        assert!(ok.alive);
        assert_eq!(ok.status, 200);

        let missing = &results[&missing_url];
        assert!(!missing.alive);
        assert_eq!(missing.status, 404);

        let dead = &results[&dead_url];
        assert_eq!(*dead, Probe::dead());
    }

    #[tokio::test]
    async fn empty_batch_is_empty() {
        let results =
            tokio::task::spawn_blocking(|| LivenessValidator::new(1, 4).validate_batch(vec![]))
                .await
                .expect("task");
        assert!(results.is_empty());
    }
}
