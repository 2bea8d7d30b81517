//! HTTP client factories with timeout and user-agent configuration.

use reqwest::redirect::Policy;
use std::time::Duration;
use tracing::debug;

/// Browser-like user agent used by discovery probes.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Configuration for HTTP clients built by [`HttpClientFactory`].
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Total request timeout in seconds
    pub timeout_secs: u64,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Whether redirects are followed
    pub follow_redirects: bool,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            connect_timeout_secs: 5,
            follow_redirects: true,
            user_agent: format!("pagewatch/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpConfig {
    /// Discovery-stage config: short timeout, browser-like UA.
    pub fn discovery(timeout_secs: u64) -> Self {
        Self {
            timeout_secs,
            connect_timeout_secs: timeout_secs.min(5),
            follow_redirects: true,
            user_agent: BROWSER_USER_AGENT.to_string(),
        }
    }

    fn redirect_policy(&self) -> Policy {
        if self.follow_redirects {
            Policy::limited(10)
        } else {
            Policy::none()
        }
    }
}

/// Factory for the two client flavors used by the two scheduling
/// regimes: async for the inspection stage, blocking for the threaded
/// discovery stage.
pub struct HttpClientFactory;

impl HttpClientFactory {
    pub fn async_client(config: &HttpConfig) -> Result<reqwest::Client, reqwest::Error> {
        debug!(timeout_secs = config.timeout_secs, "creating async HTTP client");
        reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .redirect(config.redirect_policy())
            .user_agent(config.user_agent.clone())
            .use_rustls_tls()
            .build()
    }

    pub fn blocking_client(
        config: &HttpConfig,
    ) -> Result<reqwest::blocking::Client, reqwest::Error> {
        debug!(
            timeout_secs = config.timeout_secs,
            "creating blocking HTTP client"
        );
        reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .redirect(config.redirect_policy())
            .user_agent(config.user_agent.clone())
            .use_rustls_tls()
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_crate_user_agent() {
        let config = HttpConfig::default();
        assert!(config.user_agent.starts_with("pagewatch/"));
        assert!(config.follow_redirects);
    }

    #[test]
    fn discovery_config_uses_browser_user_agent() {
        let config = HttpConfig::discovery(5);
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.user_agent, BROWSER_USER_AGENT);
    }

    #[test]
    fn clients_build() {
        let config = HttpConfig::default();
        assert!(HttpClientFactory::async_client(&config).is_ok());
    }
}
