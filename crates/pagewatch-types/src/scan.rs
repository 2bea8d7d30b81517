//! Scan identity, configuration, and lifecycle status.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    Running,
    Completed,
    Failed,
}

/// What a scan runs: discovery, inspection, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    Full,
    #[default]
    Crawl,
    Qa,
}

impl ScanMode {
    pub fn runs_discovery(&self) -> bool {
        matches!(self, ScanMode::Full | ScanMode::Crawl)
    }

    pub fn runs_inspection(&self) -> bool {
        matches!(self, ScanMode::Full | ScanMode::Qa)
    }
}

/// Configuration echoed back in scan payloads and applied by the driver.
///
/// `validate_ssl` is accepted and echoed for API compatibility; the
/// transport layer it would configure is an external collaborator.
/// `only_alive` controls the discovery stage's liveness filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    pub depth: usize,
    pub mode: ScanMode,
    pub wayback: bool,
    pub bruteforce: bool,
    pub only_alive: bool,
    pub validate_ssl: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            depth: 2,
            mode: ScanMode::Crawl,
            wayback: false,
            bruteforce: false,
            only_alive: false,
            validate_ssl: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ScanStatus::Running).unwrap(),
            "\"running\""
        );
        assert_eq!(
            serde_json::to_string(&ScanStatus::Failed).unwrap(),
            "\"failed\""
        );
    }

    #[test]
    fn mode_gates_stages() {
        assert!(ScanMode::Full.runs_discovery());
        assert!(ScanMode::Full.runs_inspection());
        assert!(ScanMode::Crawl.runs_discovery());
        assert!(!ScanMode::Crawl.runs_inspection());
        assert!(!ScanMode::Qa.runs_discovery());
        assert!(ScanMode::Qa.runs_inspection());
    }
}
