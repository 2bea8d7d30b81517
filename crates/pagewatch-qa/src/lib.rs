//! # PageWatch QA
//!
//! The inspection stage's analysis passes (structure detection, page
//! classification, issue detection, scoring, and the page/issue graph)
//! plus the orchestrator that drives crawl, validation, and the browser
//! pool, emitting lifecycle events throughout.

pub mod classifier;
pub mod graph;
pub mod hygiene;
pub mod issues;
pub mod orchestrator;
pub mod scorer;
pub mod structure;

pub use classifier::classify;
pub use graph::GraphBuilder;
pub use issues::detect_issues;
pub use orchestrator::{QaConfig, QaOrchestrator};
pub use scorer::{global_score, score_page};
pub use structure::detect_structure;
