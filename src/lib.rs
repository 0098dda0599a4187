//! Site-Spider: a polite single-site crawler
//!
//! This crate walks one site breadth-first from a seed URL, recording every
//! page's body, outbound links and fetch outcome, while noting (but never
//! following) links that leave the site. It respects robots.txt, paces its
//! requests with a jittered interval and keeps all bookkeeping thread-safe.

pub mod config;
pub mod crawler;
pub mod output;
pub mod robots;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Spider operations
#[derive(Debug, Error)]
pub enum SpiderError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("The start url cannot be empty")]
    EmptySeed,

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Robots.txt error: {0}")]
    Robots(String),

    #[error("Crawl aborted after failed fetch of {url}: {reason}")]
    FetchAborted { url: String, reason: String },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Result type alias for Site-Spider operations
pub type Result<T> = std::result::Result<T, SpiderError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlSummary, Fetcher, HttpFetcher, RobotsLoader, Spider};
pub use state::{PageRecord, ResponseInfo, SkipReason};
pub use url::{normalize_url, Site};
