//! Crawler module: the breadth-first traversal engine
//!
//! This module contains the core crawling logic, including:
//! - The `Fetcher` and `RobotsLoader` capabilities and their HTTP implementation
//! - HTML link extraction
//! - The admission policy deciding which in-site URLs are fetched
//! - The FIFO work queue and jittered rate limiting
//! - The `Spider`, which drives a crawl and exposes its results

mod admission;
mod fetcher;
#[cfg(test)]
pub(crate) mod fixtures;
mod parser;
mod rate_limit;
mod scheduler;
mod spider;

pub use admission::{Admission, AdmissionPolicy};
pub use fetcher::{build_http_client, FetchedPage, Fetcher, HttpFetcher, RobotsLoader};
pub use parser::extract_links;
pub use rate_limit::RateLimiter;
pub use scheduler::{WorkItem, WorkQueue};
pub use spider::{CrawlSummary, Spider};
