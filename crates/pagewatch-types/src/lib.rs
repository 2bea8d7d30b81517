//! # PageWatch Types
//!
//! Shared data model for the PageWatch web-QA inspector. The discovery
//! and inspection stages, the QA passes, the event bus, and the API all
//! exchange these types; keeping them in one leaf crate avoids circular
//! dependencies between the stage crates.

pub mod candidate;
pub mod error;
pub mod issue;
pub mod page;
pub mod report;
pub mod scan;

pub use candidate::{CandidateUrl, EnumerationResults, EnumerationSummary, SourceTag, UrlDetail};
pub use error::ScanError;
pub use issue::{Issue, IssueCategory, Severity};
pub use page::{
    AxNode, BrokenElement, BrokenKind, ConsoleLog, CrawledPage, DomMetrics, NetworkFailure,
    PageStructure, PageType, PerformanceRecord, RuntimeCapture,
};
pub use report::{
    GraphPage, GraphReport, HygieneIssue, HygienePage, InspectionReport, PageAnalysis, QaResults,
    QaSummary, ScanSummary,
};
pub use scan::{ScanConfig, ScanMode, ScanStatus};
