//! Request and response DTOs.

use pagewatch_types::{
    EnumerationResults, HygienePage, ScanConfig, ScanMode, ScanStatus, ScanSummary,
};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/scan`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScanRequest {
    pub url: Option<String>,
    pub depth: Option<usize>,
    pub mode: Option<ScanMode>,
    pub wayback: Option<bool>,
    pub bruteforce: Option<bool>,
    pub only_alive: Option<bool>,
    pub validate_ssl: Option<bool>,
}

impl ScanRequest {
    /// Fill defaults into a concrete scan config.
    pub fn to_config(&self) -> ScanConfig {
        ScanConfig {
            depth: self.depth.unwrap_or(2),
            mode: self.mode.unwrap_or_default(),
            wayback: self.wayback.unwrap_or(false),
            bruteforce: self.bruteforce.unwrap_or(false),
            only_alive: self.only_alive.unwrap_or(false),
            validate_ssl: self.validate_ssl.unwrap_or(true),
        }
    }
}

/// `202 Accepted` payload for a started scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanStarted {
    pub status: &'static str,
    pub scan_id: String,
    pub url: String,
    pub config: ScanConfig,
    pub message: &'static str,
}

/// `GET /api/scan/:id` payload.
#[derive(Debug, Clone, Serialize)]
pub struct ScanView {
    pub scan_id: String,
    pub status: ScanStatus,
    pub url: String,
    pub config: ScanConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hygiene_pages: Option<Vec<HygienePage>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ScanSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worst_pages: Option<Vec<HygienePage>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_results: Option<EnumerationResults>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Acknowledgement for `DELETE /api/scan/:id`.
#[derive(Debug, Clone, Serialize)]
pub struct CancelAck {
    pub scan_id: String,
    pub status: &'static str,
    pub message: &'static str,
}
