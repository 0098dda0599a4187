use crate::state::{lock, ResponseInfo};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Mutex;

/// Why admission rejected a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Scheme differs from the seed while scheme restriction is on
    Scheme,
    /// Disallowed by robots.txt
    Robots,
    /// Path lies outside the seed's path prefix
    OutsidePath,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheme => "scheme",
            Self::Robots => "robots",
            Self::OutsidePath => "outside-path",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracks which URLs have been claimed, fetched, or skipped
///
/// Each table has its own lock, held only for the map operation. Nothing in
/// here performs I/O, so no lock is ever held across a network call.
#[derive(Debug, Default)]
pub struct UrlRegistry {
    found: Mutex<HashSet<String>>,
    fetched: Mutex<HashMap<String, ResponseInfo>>,
    skipped: Mutex<HashMap<String, SkipReason>>,
}

impl UrlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically claims a URL for fetching
    ///
    /// # Returns
    ///
    /// * `true` - This call was the first to claim the URL; fetch it
    /// * `false` - Someone already claimed it
    pub fn try_admit_found(&self, url: &str) -> bool {
        lock(&self.found).insert(url.to_string())
    }

    pub fn is_found(&self, url: &str) -> bool {
        lock(&self.found).contains(url)
    }

    /// Records the outcome of a fetch; a later write for the same URL wins
    pub fn record_fetch(&self, url: &str, response: ResponseInfo) {
        lock(&self.fetched).insert(url.to_string(), response);
    }

    /// Records a rejected URL; the first recorded reason is kept
    pub fn record_skip(&self, url: &str, reason: SkipReason) {
        lock(&self.skipped).entry(url.to_string()).or_insert(reason);
    }

    pub fn fetch_response(&self, url: &str) -> Option<ResponseInfo> {
        lock(&self.fetched).get(url).cloned()
    }

    pub fn skip_reason(&self, url: &str) -> Option<SkipReason> {
        lock(&self.skipped).get(url).copied()
    }

    pub fn found_count(&self) -> usize {
        lock(&self.found).len()
    }

    pub fn fetched_count(&self) -> usize {
        lock(&self.fetched).len()
    }

    /// Number of fetch attempts that recorded an error
    pub fn failed_count(&self) -> usize {
        lock(&self.fetched).values().filter(|r| r.is_error()).count()
    }

    pub fn skipped_count(&self) -> usize {
        lock(&self.skipped).len()
    }

    /// All fetch outcomes, sorted by URL
    pub fn fetched(&self) -> Vec<(String, ResponseInfo)> {
        let mut fetched: Vec<(String, ResponseInfo)> = lock(&self.fetched)
            .iter()
            .map(|(url, response)| (url.clone(), response.clone()))
            .collect();
        fetched.sort_by(|a, b| a.0.cmp(&b.0));
        fetched
    }

    /// All skipped URLs with their reasons, sorted by URL
    pub fn skipped(&self) -> Vec<(String, SkipReason)> {
        let mut skipped: Vec<(String, SkipReason)> = lock(&self.skipped)
            .iter()
            .map(|(url, reason)| (url.clone(), *reason))
            .collect();
        skipped.sort_by(|a, b| a.0.cmp(&b.0));
        skipped
    }
}
