//! Event type enumeration and the event record.

use pagewatch_utils::time::now_iso8601;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Lifecycle event types emitted during a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    ScanStarted,
    UrlDiscovered,
    UrlValidated,
    PageTestingStarted,
    PageAnalyzed,
    IssuesDetected,
    ScoreUpdated,
    ScanCompleted,
    ScanFailed,
}

impl EventType {
    /// All event types, in lifecycle order. Used by `subscribe_all`.
    pub const ALL: [EventType; 9] = [
        EventType::ScanStarted,
        EventType::UrlDiscovered,
        EventType::UrlValidated,
        EventType::PageTestingStarted,
        EventType::PageAnalyzed,
        EventType::IssuesDetected,
        EventType::ScoreUpdated,
        EventType::ScanCompleted,
        EventType::ScanFailed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::ScanStarted => "scan_started",
            EventType::UrlDiscovered => "url_discovered",
            EventType::UrlValidated => "url_validated",
            EventType::PageTestingStarted => "page_testing_started",
            EventType::PageAnalyzed => "page_analyzed",
            EventType::IssuesDetected => "issues_detected",
            EventType::ScoreUpdated => "score_updated",
            EventType::ScanCompleted => "scan_completed",
            EventType::ScanFailed => "scan_failed",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One emitted event: type, ISO-8601 UTC timestamp, owning scan, and an
/// opaque data map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanEvent {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub timestamp: String,
    pub scan_id: String,
    pub data: Map<String, Value>,
}

impl ScanEvent {
    /// Create an event stamped with the current time.
    pub fn new(event_type: EventType, scan_id: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            event_type,
            timestamp: now_iso8601(),
            scan_id: scan_id.into(),
            data,
        }
    }

    /// Serialize to the JSON frame pushed over streaming channels.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Build an event data map from key/value pairs.
#[macro_export]
macro_rules! event_data {
    ($($key:expr => $value:expr),* $(,)?) => {{
        let mut map = serde_json::Map::new();
        $(map.insert($key.to_string(), serde_json::json!($value));)*
        map
    }};
}
