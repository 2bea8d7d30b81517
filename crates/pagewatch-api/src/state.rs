//! Application state shared across request handlers.

use crate::store::ScanStore;
use pagewatch_events::EventBus;
use std::sync::Arc;

/// Shared handles for the API: the injected event bus and the scan
/// store. Cheap to clone into every handler.
#[derive(Clone)]
pub struct AppState {
    pub bus: Arc<EventBus>,
    pub store: Arc<ScanStore>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            bus: Arc::new(EventBus::new()),
            store: Arc::new(ScanStore::new()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
