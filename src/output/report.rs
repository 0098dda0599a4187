//! Crawl report data
//!
//! A `CrawlReport` is a plain snapshot of a spider after `crawl` returns:
//! every fetched page, every failure, every skipped URL and every external
//! link, already sorted for stable output.

use crate::crawler::{CrawlSummary, Fetcher, RobotsLoader, Spider};
use crate::state::{ResponseInfo, SkipReason};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};

/// One fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSummary {
    pub url: String,
    pub distance: u32,
    pub status: String,
    pub link_count: usize,
}

/// One failed fetch attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedFetch {
    pub url: String,
    pub response: ResponseInfo,
}

/// One in-site URL the admission policy rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedUrl {
    pub url: String,
    pub reason: SkipReason,
}

/// One external link and its check result, if it was checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalLinkReport {
    pub url: String,
    pub check: Option<ResponseInfo>,
}

impl ExternalLinkReport {
    pub fn is_broken(&self) -> bool {
        self.check.as_ref().is_some_and(ResponseInfo::is_broken)
    }
}

/// Everything a finished crawl produced
#[derive(Debug, Clone)]
pub struct CrawlReport {
    // Run metadata
    pub site: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub max_depth: Option<u32>,
    pub depth_limit_hit: bool,
    pub summary_line: String,

    // Counts
    pub pages_processed: usize,
    pub pages_failed: usize,
    pub pages_skipped: usize,

    /// Fetched pages per distance from the seed
    pub depth_breakdown: BTreeMap<u32, usize>,

    // Details
    pub pages: Vec<PageSummary>,
    pub failures: Vec<FailedFetch>,
    pub skipped: Vec<SkippedUrl>,
    pub external_hosts: Vec<String>,
    pub external_links: Vec<ExternalLinkReport>,
}

impl CrawlReport {
    /// Snapshots a spider after its crawl returned `summary`
    pub fn from_spider<F: Fetcher + RobotsLoader>(
        spider: &Spider<F>,
        summary: &CrawlSummary,
        max_depth: Option<u32>,
    ) -> Self {
        let fetched = spider.fetched();
        let statuses: HashMap<&str, &ResponseInfo> =
            fetched.iter().map(|(url, info)| (url.as_str(), info)).collect();

        let mut depth_breakdown = BTreeMap::new();
        let pages = spider
            .pages()
            .into_iter()
            .map(|page| {
                *depth_breakdown.entry(page.distance).or_insert(0) += 1;
                PageSummary {
                    status: statuses
                        .get(page.url.as_str())
                        .map(|info| info.to_string())
                        .unwrap_or_default(),
                    url: page.url.to_string(),
                    distance: page.distance,
                    link_count: page.links.len(),
                }
            })
            .collect();

        let failures = fetched
            .iter()
            .filter(|(_, info)| info.is_error())
            .map(|(url, info)| FailedFetch {
                url: url.clone(),
                response: info.clone(),
            })
            .collect();

        let skipped = spider
            .skipped()
            .into_iter()
            .map(|(url, reason)| SkippedUrl { url, reason })
            .collect();

        let external_links = spider
            .external_link_statuses()
            .into_iter()
            .map(|(url, check)| ExternalLinkReport { url, check })
            .collect();

        Self {
            site: spider.site().to_string(),
            started_at: summary.started_at,
            finished_at: summary.finished_at,
            max_depth,
            depth_limit_hit: summary.depth_limit_hit,
            summary_line: summary.to_string(),
            pages_processed: summary.pages_processed,
            pages_failed: summary.pages_failed,
            pages_skipped: summary.pages_skipped,
            depth_breakdown,
            pages,
            failures,
            skipped,
            external_hosts: spider.external_hosts(),
            external_links,
        }
    }

    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// Percentage of fetch attempts that succeeded
    pub fn success_rate(&self) -> f64 {
        if self.pages_processed == 0 {
            return 0.0;
        }
        let succeeded = self.pages_processed - self.pages_failed;
        (succeeded as f64 / self.pages_processed as f64) * 100.0
    }

    pub fn broken_external_links(&self) -> usize {
        self.external_links.iter().filter(|l| l.is_broken()).count()
    }
}
