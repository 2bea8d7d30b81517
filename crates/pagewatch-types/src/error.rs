//! Error type shared by the scan pipeline.

use thiserror::Error;

/// Errors a scan can fail with.
///
/// Transient network, parse, and navigation problems never surface
/// here; stages absorb those per their partial-failure contracts. This
/// type covers the failures that genuinely end a scan.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("invalid target URL: {0}")]
    InvalidTarget(String),

    #[error("browser session unavailable: {0}")]
    Browser(String),

    #[error("scan task failed: {0}")]
    Task(String),
}
