//! Channel adapter: turn bus subscriptions into event streams for
//! push-based consumers.

use crate::bus::EventBus;
use crate::event::ScanEvent;
use futures::FutureExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::trace;

/// Subscribe to every event and receive them as a stream.
///
/// The sender half lives inside the bus callback; once the stream is
/// dropped, subsequent sends fail silently and the callback becomes a
/// no-op. Suits connection-lifetime subscribers like WebSocket
/// handlers.
pub async fn subscribe_channel(bus: &EventBus) -> UnboundedReceiverStream<ScanEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    bus.subscribe_all(Arc::new(move |event: ScanEvent| {
        if tx.send(event).is_err() {
            trace!("event stream receiver dropped");
        }
        futures::future::ready(()).boxed()
    }))
    .await;
    UnboundedReceiverStream::new(rx)
}

/// Like [`subscribe_channel`], but filtered to a single scan.
pub async fn subscribe_scan(bus: &EventBus, scan_id: &str) -> UnboundedReceiverStream<ScanEvent> {
    let scan_id = scan_id.to_string();
    let (tx, rx) = mpsc::unbounded_channel();
    bus.subscribe_all(Arc::new(move |event: ScanEvent| {
        if event.scan_id == scan_id && tx.send(event).is_err() {
            trace!("scan event stream receiver dropped");
        }
        futures::future::ready(()).boxed()
    }))
    .await;
    UnboundedReceiverStream::new(rx)
}
