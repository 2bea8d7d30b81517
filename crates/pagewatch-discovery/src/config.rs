//! Discovery-stage configuration.

use pagewatch_types::SourceTag;
use std::collections::BTreeSet;

/// Settings for one enumeration run.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Target domain, with or without scheme.
    pub domain: String,
    /// Live-crawl depth; the root is depth 0.
    pub depth: usize,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Liveness-probe worker count.
    pub threads: usize,
    /// Drop non-live URLs from the output.
    pub only_alive: bool,
    /// Enabled techniques.
    pub techniques: BTreeSet<SourceTag>,
}

impl DiscoveryConfig {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            depth: 3,
            timeout_secs: 5,
            threads: 50,
            only_alive: false,
            techniques: SourceTag::all(),
        }
    }

    /// Origin base the techniques join paths onto, scheme defaulted to
    /// https and trailing slash trimmed.
    pub fn base(&self) -> String {
        let with_scheme = if self.domain.starts_with("http://") || self.domain.starts_with("https://")
        {
            self.domain.clone()
        } else {
            format!("https://{}", self.domain)
        };
        with_scheme.trim_end_matches('/').to_string()
    }

    pub fn enabled(&self, technique: SourceTag) -> bool {
        self.techniques.contains(&technique)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_defaults_scheme_and_trims_slash() {
        let mut config = DiscoveryConfig::new("example.com");
        assert_eq!(config.base(), "https://example.com");

        config.domain = "http://example.com/".into();
        assert_eq!(config.base(), "http://example.com");
    }

    #[test]
    fn all_techniques_enabled_by_default() {
        let config = DiscoveryConfig::new("example.com");
        assert_eq!(config.techniques.len(), 6);
        assert!(config.enabled(SourceTag::Wayback));
    }
}
