//! Event bus: typed subscriptions, per-scan history, fault-isolated
//! dispatch.

use crate::event::{EventType, ScanEvent};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error};

/// A subscriber callback. Callbacks may suspend; `emit` awaits each one
/// before proceeding.
pub type EventCallback = Arc<dyn Fn(ScanEvent) -> BoxFuture<'static, ()> + Send + Sync>;

/// Wrap a synchronous closure as an [`EventCallback`].
pub fn sync_callback<F>(f: F) -> EventCallback
where
    F: Fn(ScanEvent) + Send + Sync + 'static,
{
    Arc::new(move |event| {
        f(event);
        futures::future::ready(()).boxed()
    })
}

/// Central pub-sub bus for scan lifecycle events.
///
/// Emission appends to the owning scan's history, then invokes every
/// callback registered for the event's type. A misbehaving callback
/// (panic included) is logged and never affects other callbacks or
/// later emissions. History lives until `clear_history`.
#[derive(Default)]
pub struct EventBus {
    subscribers: RwLock<HashMap<EventType, Vec<EventCallback>>>,
    history: RwLock<HashMap<String, Vec<ScanEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for one event type.
    pub async fn subscribe(&self, event_type: EventType, callback: EventCallback) {
        let mut subscribers = self.subscribers.write().await;
        subscribers.entry(event_type).or_default().push(callback);
        debug!(event_type = %event_type, "subscribed");
    }

    /// Register a callback for every event type.
    pub async fn subscribe_all(&self, callback: EventCallback) {
        let mut subscribers = self.subscribers.write().await;
        for event_type in EventType::ALL {
            subscribers
                .entry(event_type)
                .or_default()
                .push(callback.clone());
        }
    }

    /// Emit an event: record it, then notify subscribers in
    /// registration order.
    pub async fn emit(&self, event: ScanEvent) {
        {
            let mut history = self.history.write().await;
            history
                .entry(event.scan_id.clone())
                .or_default()
                .push(event.clone());
        }

        let callbacks = {
            let subscribers = self.subscribers.read().await;
            subscribers
                .get(&event.event_type)
                .cloned()
                .unwrap_or_default()
        };

        for callback in callbacks {
            // Invoke lazily inside the future so a panic in the
            // callback body is caught either way.
            let delivered = event.clone();
            let invocation =
                std::panic::AssertUnwindSafe(async move { callback(delivered).await });
            if invocation.catch_unwind().await.is_err() {
                error!(
                    event_type = %event.event_type,
                    scan_id = %event.scan_id,
                    "event callback panicked"
                );
            }
        }
    }

    /// Events for a scan, in emission order.
    pub async fn get_history(&self, scan_id: &str) -> Vec<ScanEvent> {
        let history = self.history.read().await;
        history.get(scan_id).cloned().unwrap_or_default()
    }

    /// Release a scan's event history.
    pub async fn clear_history(&self, scan_id: &str) {
        let mut history = self.history.write().await;
        history.remove(scan_id);
    }

    /// Number of registered callbacks across all types.
    pub async fn subscriber_count(&self) -> usize {
        let subscribers = self.subscribers.read().await;
        subscribers.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_data;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn event(event_type: EventType, scan_id: &str) -> ScanEvent {
        ScanEvent::new(event_type, scan_id, event_data! {})
    }

    #[tokio::test]
    async fn emit_stores_history_in_order() {
        let bus = EventBus::new();
        bus.emit(event(EventType::ScanStarted, "scan_a")).await;
        bus.emit(event(EventType::UrlDiscovered, "scan_a")).await;
        bus.emit(event(EventType::ScanStarted, "scan_b")).await;
        bus.emit(event(EventType::ScanCompleted, "scan_a")).await;

        let history = bus.get_history("scan_a").await;
        let types: Vec<EventType> = history.iter().map(|e| e.event_type).collect();
        assert_eq!(
            types,
            vec![
                EventType::ScanStarted,
                EventType::UrlDiscovered,
                EventType::ScanCompleted
            ]
        );
        assert_eq!(bus.get_history("scan_b").await.len(), 1);
        assert!(bus.get_history("scan_missing").await.is_empty());
    }

    #[tokio::test]
    async fn timestamps_are_non_decreasing() {
        let bus = EventBus::new();
        for _ in 0..5 {
            bus.emit(event(EventType::PageAnalyzed, "scan_t")).await;
        }
        let history = bus.get_history("scan_t").await;
        for pair in history.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }
    }

    #[tokio::test]
    async fn typed_subscription_only_sees_its_type() {
        let bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        bus.subscribe(
            EventType::PageAnalyzed,
            sync_callback(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .await;

        bus.emit(event(EventType::ScanStarted, "scan_s")).await;
        bus.emit(event(EventType::PageAnalyzed, "scan_s")).await;
        bus.emit(event(EventType::PageAnalyzed, "scan_s")).await;

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn subscribe_all_sees_everything() {
        let bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        bus.subscribe_all(sync_callback(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        }))
        .await;

        bus.emit(event(EventType::ScanStarted, "scan_s")).await;
        bus.emit(event(EventType::ScanFailed, "scan_s")).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
        // One callback registered under each of the nine types.
        assert_eq!(bus.subscriber_count().await, 9);
    }

    #[tokio::test]
    async fn panicking_callback_does_not_poison_the_bus() {
        let bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));

        bus.subscribe(
            EventType::ScanStarted,
            sync_callback(|_| panic!("subscriber bug")),
        )
        .await;
        let seen = count.clone();
        bus.subscribe(
            EventType::ScanStarted,
            sync_callback(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .await;

        bus.emit(event(EventType::ScanStarted, "scan_p")).await;
        bus.emit(event(EventType::ScanStarted, "scan_p")).await;

        // Second subscriber keeps firing, history keeps recording.
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(bus.get_history("scan_p").await.len(), 2);
    }

    #[tokio::test]
    async fn async_callbacks_are_awaited_before_return() {
        let bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        bus.subscribe(
            EventType::ScoreUpdated,
            Arc::new(move |_event| {
                let seen = seen.clone();
                async move {
                    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
                    seen.fetch_add(1, Ordering::SeqCst);
                }
                .boxed()
            }),
        )
        .await;

        bus.emit(event(EventType::ScoreUpdated, "scan_w")).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn clear_history_releases_events() {
        let bus = EventBus::new();
        bus.emit(event(EventType::ScanStarted, "scan_c")).await;
        bus.clear_history("scan_c").await;
        assert!(bus.get_history("scan_c").await.is_empty());
    }
}
