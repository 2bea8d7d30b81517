//! In-memory scan store.
//!
//! A keyed `{scan_id → record}` mapping behind a narrow surface (`put`,
//! `get`, `update`, `latest_completed`, `delete`). Suits single-process
//! deployments; swap behind the same surface for anything durable.

use pagewatch_types::{EnumerationResults, QaResults, ScanConfig, ScanStatus};
use std::collections::HashMap;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

/// Everything known about one scan.
#[derive(Debug, Clone)]
pub struct ScanRecord {
    pub scan_id: String,
    pub url: String,
    pub status: ScanStatus,
    pub config: ScanConfig,
    pub error: Option<String>,
    pub enum_results: Option<EnumerationResults>,
    pub qa_results: Option<QaResults>,
}

impl ScanRecord {
    pub fn new(scan_id: impl Into<String>, url: impl Into<String>, config: ScanConfig) -> Self {
        Self {
            scan_id: scan_id.into(),
            url: url.into(),
            status: ScanStatus::Running,
            config,
            error: None,
            enum_results: None,
            qa_results: None,
        }
    }
}

/// Scan records plus the driver task handles used for cancellation.
#[derive(Default)]
pub struct ScanStore {
    records: RwLock<HashMap<String, ScanRecord>>,
    order: Mutex<Vec<String>>,
    handles: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl ScanStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put(&self, record: ScanRecord) {
        let scan_id = record.scan_id.clone();
        // Lock order everywhere: order before records.
        let mut order = self.order.lock().await;
        let mut records = self.records.write().await;
        if records.insert(scan_id.clone(), record).is_none() {
            order.push(scan_id);
        }
    }

    pub async fn get(&self, scan_id: &str) -> Option<ScanRecord> {
        self.records.read().await.get(scan_id).cloned()
    }

    /// Mutate a record in place; no-op for unknown ids.
    pub async fn update<F>(&self, scan_id: &str, mutate: F)
    where
        F: FnOnce(&mut ScanRecord),
    {
        let mut records = self.records.write().await;
        if let Some(record) = records.get_mut(scan_id) {
            mutate(record);
        }
    }

    /// Most recently started scan that completed.
    pub async fn latest_completed(&self) -> Option<ScanRecord> {
        let order = self.order.lock().await;
        let records = self.records.read().await;
        order
            .iter()
            .rev()
            .filter_map(|scan_id| records.get(scan_id))
            .find(|record| record.status == ScanStatus::Completed)
            .cloned()
    }

    pub async fn delete(&self, scan_id: &str) -> Option<ScanRecord> {
        if let Some(handle) = self.take_handle(scan_id).await {
            handle.abort();
        }
        let mut order = self.order.lock().await;
        let mut records = self.records.write().await;
        order.retain(|id| id != scan_id);
        records.remove(scan_id)
    }

    pub async fn set_handle(&self, scan_id: &str, handle: JoinHandle<()>) {
        self.handles.lock().await.insert(scan_id.to_string(), handle);
    }

    pub async fn take_handle(&self, scan_id: &str) -> Option<JoinHandle<()>> {
        self.handles.lock().await.remove(scan_id)
    }
}
