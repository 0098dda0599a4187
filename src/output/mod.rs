//! Output module for crawl reports
//!
//! This module handles:
//! - Snapshotting a finished crawl into a `CrawlReport`
//! - Printing the report to the console
//! - Writing the report as a Markdown file

mod markdown;
mod report;
mod stats;

pub use markdown::{format_markdown_report, generate_markdown_report};
pub use report::{CrawlReport, ExternalLinkReport, FailedFetch, PageSummary, SkippedUrl};
pub use stats::{format_report, print_report};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output to {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
