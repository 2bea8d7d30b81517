//! Discovery-stage candidate URLs and enumeration output.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Provenance tag: which technique discovered a URL.
///
/// The short names (`live`, `js`, ...) select techniques on the CLI and
/// API; these long tags are what lands in result payloads. Variants are
/// declared in tag order so ordered collections iterate
/// lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTag {
    Bruteforce,
    JsAnalysis,
    LiveCrawl,
    Robots,
    Sitemap,
    Wayback,
}

impl SourceTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTag::Bruteforce => "bruteforce",
            SourceTag::JsAnalysis => "js_analysis",
            SourceTag::LiveCrawl => "live_crawl",
            SourceTag::Robots => "robots",
            SourceTag::Sitemap => "sitemap",
            SourceTag::Wayback => "wayback",
        }
    }

    /// Every technique, for default-all selection.
    pub fn all() -> BTreeSet<SourceTag> {
        BTreeSet::from([
            SourceTag::Bruteforce,
            SourceTag::JsAnalysis,
            SourceTag::LiveCrawl,
            SourceTag::Robots,
            SourceTag::Sitemap,
            SourceTag::Wayback,
        ])
    }

    /// Parse a technique selection name (`live`, `js`, `wayback`, ...).
    pub fn from_selection(name: &str) -> Option<Self> {
        match name {
            "live" => Some(SourceTag::LiveCrawl),
            "js" => Some(SourceTag::JsAnalysis),
            "wayback" => Some(SourceTag::Wayback),
            "bruteforce" => Some(SourceTag::Bruteforce),
            "robots" => Some(SourceTag::Robots),
            "sitemap" => Some(SourceTag::Sitemap),
            _ => None,
        }
    }
}

impl std::fmt::Display for SourceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized URL in the candidate table, with merged provenance.
///
/// Two candidates are the same candidate iff their normalized URL
/// strings are equal; the enumerator merges `sources` on collision.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateUrl {
    pub sources: BTreeSet<SourceTag>,
    pub status: Option<u16>,
    pub content_length: u64,
    pub alive: bool,
}

impl CandidateUrl {
    pub fn from_source(source: SourceTag) -> Self {
        let mut sources = BTreeSet::new();
        sources.insert(source);
        Self {
            sources,
            ..Default::default()
        }
    }
}

/// Per-URL detail row in enumeration output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlDetail {
    pub status: Option<u16>,
    pub status_tag: String,
    pub content_length: u64,
    pub alive: bool,
    pub sources: Vec<String>,
}

/// Aggregate counters for an enumeration run.
///
/// `sources_summary` holds raw per-technique contribution counts taken
/// before cross-source deduplication.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnumerationSummary {
    pub total_urls: usize,
    pub alive_urls: usize,
    pub sources_used: Vec<String>,
    pub sources_summary: BTreeMap<String, usize>,
}

/// Full discovery-stage output: sorted URLs, per-URL details, summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnumerationResults {
    pub urls: Vec<String>,
    pub url_details: BTreeMap<String, UrlDetail>,
    pub summary: EnumerationSummary,
}
