//! # PageWatch Spider
//!
//! Async-native crawling for the inspection stage: a single-origin BFS
//! that gathers pages for browser testing, and the HEAD validator that
//! filters the crawl down to the HTTP 200 set.
//!
//! Kept separate from `pagewatch-discovery`: the discovery stage runs
//! blocking probes on OS threads, while everything here suspends on
//! the scan's event loop and is bounded by semaphore-style concurrency
//! limits.

pub mod crawler;
pub mod validator;

pub use crawler::{CrawlerConfig, InspectionCrawler};
pub use validator::{StatusValidator, UrlStatus};
