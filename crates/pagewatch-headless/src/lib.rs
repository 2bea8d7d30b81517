//! # PageWatch Headless
//!
//! Drives a headless Chrome over CDP to capture runtime signals per
//! page: console diagnostics, failed subresource requests, DOM snapshot
//! and metrics, navigation/paint timings, and the accessibility tree.
//!
//! One [`BrowserSession`] is scoped to an inspection stage; each
//! `analyze` call runs in a fresh page context that is closed on every
//! exit path. Analysis never errors outward: a navigation or capture
//! failure produces a record with the failure noted and the remaining
//! fields empty.

mod capture;
mod session;

pub use session::{AnalyzerConfig, BrowserSession};
