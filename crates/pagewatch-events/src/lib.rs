//! Scan-lifecycle event system.
//!
//! Every stage of a scan publishes typed [`ScanEvent`]s tagged with the
//! scan id. The [`EventBus`] stores each event in per-scan history and
//! fans it out to subscribers; the [`stream`] adapter turns
//! subscriptions into event streams for push-based consumers such as
//! the WebSocket endpoint.

mod bus;
mod event;
pub mod stream;

pub use bus::{sync_callback, EventBus, EventCallback};
pub use event::{EventType, ScanEvent};
