//! Wordlist brute-force candidate generation.

use pagewatch_utils::wordlist::{default_wordlist, WordlistStats, BRUTEFORCE_EXTENSIONS};
use std::collections::BTreeSet;
use tracing::info;

/// Expands a wordlist into candidate paths and URLs.
pub struct BruteForcer {
    wordlist: Vec<String>,
}

impl Default for BruteForcer {
    fn default() -> Self {
        Self {
            wordlist: default_wordlist().into_iter().map(String::from).collect(),
        }
    }
}

impl BruteForcer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wordlist(wordlist: Vec<String>) -> Self {
        Self { wordlist }
    }

    /// Candidate paths: word × {bare, each extension, trailing slash,
    /// `/api/`, `/v1/`, `/v2/` prefixes}, sorted and deduplicated.
    pub fn generate_paths(&self) -> Vec<String> {
        let mut paths = BTreeSet::new();
        for word in &self.wordlist {
            paths.insert(format!("/{word}"));
            for ext in BRUTEFORCE_EXTENSIONS {
                paths.insert(format!("/{word}{ext}"));
            }
            paths.insert(format!("/{word}/"));
            paths.insert(format!("/api/{word}"));
            paths.insert(format!("/v1/{word}"));
            paths.insert(format!("/v2/{word}"));
        }
        paths.into_iter().collect()
    }

    /// Candidate paths joined onto the target origin.
    pub fn generate_urls(&self, base: &str) -> Vec<String> {
        let base = base.trim_end_matches('/');
        let urls: Vec<String> = self
            .generate_paths()
            .into_iter()
            .map(|path| format!("{base}{path}"))
            .collect();
        info!(urls = urls.len(), "generated brute-force candidates");
        urls
    }

    pub fn stats(&self) -> WordlistStats {
        WordlistStats::for_words(self.wordlist.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_cover_all_expansions() {
        let forcer = BruteForcer::with_wordlist(vec!["admin".into()]);
        let paths = forcer.generate_paths();
        assert!(paths.contains(&"/admin".to_string()));
        assert!(paths.contains(&"/admin.php".to_string()));
        assert!(paths.contains(&"/admin/".to_string()));
        assert!(paths.contains(&"/api/admin".to_string()));
        assert!(paths.contains(&"/v1/admin".to_string()));
        assert!(paths.contains(&"/v2/admin".to_string()));
        // bare + 7 extensions + slash + 3 prefixes
        assert_eq!(paths.len(), 12);
    }

    #[test]
    fn paths_are_sorted_and_unique() {
        let forcer = BruteForcer::new();
        let paths = forcer.generate_paths();
        let mut sorted = paths.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(paths, sorted);
    }

    #[test]
    fn urls_join_onto_origin() {
        let forcer = BruteForcer::with_wordlist(vec!["login".into()]);
        let urls = forcer.generate_urls("https://example.com/");
        assert!(urls.contains(&"https://example.com/login".to_string()));
        assert!(urls.iter().all(|u| u.starts_with("https://example.com/")));
    }
}
