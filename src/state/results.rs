use crate::state::lock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use url::Url;

/// Status and error information from one fetch attempt
///
/// Paired with every internal fetch and every checked external link. A
/// link that has not been fetched yet has no `ResponseInfo` at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseInfo {
    /// Status line, e.g. "200 OK"
    pub status: String,

    /// Numeric HTTP status; 0 when no response arrived
    pub status_code: u16,

    /// Failure description, if the attempt failed
    pub error: Option<String>,
}

impl ResponseInfo {
    /// A response that arrived with the given status
    pub fn from_status(status_code: u16, status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            status_code,
            error: None,
        }
    }

    /// An attempt that failed before any response arrived
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Attaches a failure to a response that did arrive
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Returns true for a failed attempt or a 4xx/5xx status
    pub fn is_broken(&self) -> bool {
        self.is_error() || self.status_code >= 400
    }
}

impl fmt::Display for ResponseInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.error, self.status.is_empty()) {
            (Some(err), true) => write!(f, "error: {}", err),
            (Some(err), false) => write!(f, "{} ({})", self.status, err),
            (None, false) => write!(f, "{}", self.status),
            (None, true) => write!(f, "{}", self.status_code),
        }
    }
}

/// A successfully fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    /// The page URL (normalized)
    pub url: Url,

    /// BFS depth from the seed (seed = 0)
    pub distance: u32,

    /// Page body as returned by the fetcher
    pub body: String,

    /// Absolute URLs of the page's outbound links, in page order
    pub links: Vec<String>,
}

/// Holds page records for post-crawl reporting
///
/// One record per distinct URL; a record is never replaced once inserted.
#[derive(Debug, Default)]
pub struct ResultStore {
    pages: Mutex<HashMap<String, PageRecord>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a page record
    ///
    /// # Returns
    ///
    /// * `true` - The record was stored
    /// * `false` - A record for this URL already existed and was kept
    pub fn insert(&self, page: PageRecord) -> bool {
        let mut pages = lock(&self.pages);
        let key = page.url.as_str().to_string();
        if pages.contains_key(&key) {
            return false;
        }
        pages.insert(key, page);
        true
    }

    /// Gets the record for a URL
    pub fn get(&self, url: &str) -> Option<PageRecord> {
        lock(&self.pages).get(url).cloned()
    }

    /// All records, ordered by distance then URL
    pub fn pages(&self) -> Vec<PageRecord> {
        let mut pages: Vec<PageRecord> = lock(&self.pages).values().cloned().collect();
        pages.sort_by(|a, b| {
            a.distance
                .cmp(&b.distance)
                .then_with(|| a.url.as_str().cmp(b.url.as_str()))
        });
        pages
    }

    pub fn len(&self) -> usize {
        lock(&self.pages).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
