//! Configuration module for Site-Spider
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use site_spider::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("spider.toml")).unwrap();
//! println!("Crawling {} with {} worker(s)", config.site.seed, config.crawler.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig, DEFAULT_FETCH_INTERVAL_MS,
    DEFAULT_JITTER_RATIO, DEFAULT_ROBOT_USER_AGENT, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
