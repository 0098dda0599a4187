use serde::Deserialize;
use std::time::Duration;

/// Default minimum time between fetches (milliseconds)
pub const DEFAULT_FETCH_INTERVAL_MS: u64 = 1000;

/// Jitter applied by `set_fetch_interval`, as a fraction of the interval
pub const DEFAULT_JITTER_RATIO: f64 = 1.0;

/// Default robot product token matched against robots.txt groups
pub const DEFAULT_ROBOT_USER_AGENT: &str = "SiteSpider";

/// Default User-Agent header sent with every request
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; SiteSpider/0.1; +https://crates.io/crates/site-spider)";

/// Main configuration structure for Site-Spider
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// The site to crawl
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Seed URL; its scheme, host and path form the crawl boundary
    pub seed: String,

    /// Maximum BFS depth from the seed; absent means unlimited
    #[serde(rename = "max-depth", default)]
    pub max_depth: Option<u32>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Minimum time between fetches (milliseconds); 0 disables pausing
    #[serde(rename = "fetch-interval")]
    pub fetch_interval: u64,

    /// Upper bound of the random extra delay (milliseconds); 0 disables it
    pub jitter: u64,

    /// Whether robots.txt is honored
    #[serde(rename = "respect-robots")]
    pub respect_robots: bool,

    /// Whether URLs must use the seed's scheme
    #[serde(rename = "restrict-to-scheme")]
    pub restrict_to_scheme: bool,

    /// Whether external links get a HEAD check
    #[serde(rename = "check-external-links")]
    pub check_external_links: bool,

    /// Number of pages fetched concurrently within one BFS layer
    pub workers: usize,

    /// Whether the first failed fetch aborts the whole crawl
    #[serde(rename = "stop-on-fetch-error")]
    pub stop_on_fetch_error: bool,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,
}

impl CrawlerConfig {
    /// Sets the fetch interval and derives the jitter from it
    ///
    /// The jitter becomes `DEFAULT_JITTER_RATIO` of the interval, so pauses
    /// fall between `interval_ms` and `2 * interval_ms`.
    pub fn set_fetch_interval(&mut self, interval_ms: u64) {
        self.fetch_interval = interval_ms;
        self.jitter = (interval_ms as f64 * DEFAULT_JITTER_RATIO) as u64;
    }

    pub fn fetch_interval(&self) -> Duration {
        Duration::from_millis(self.fetch_interval)
    }

    pub fn jitter(&self) -> Duration {
        Duration::from_millis(self.jitter)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        let mut config = Self {
            fetch_interval: 0,
            jitter: 0,
            respect_robots: true,
            restrict_to_scheme: false,
            check_external_links: true,
            workers: 1,
            stop_on_fetch_error: false,
            request_timeout: 30,
        };
        config.set_fetch_interval(DEFAULT_FETCH_INTERVAL_MS);
        config
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Product token used to select the robots.txt group
    pub robot: String,

    /// User-Agent header for HTTP requests
    pub browser: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            robot: DEFAULT_ROBOT_USER_AGENT.to_string(),
            browser: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the markdown crawl report; no report is written when absent
    #[serde(rename = "report-path")]
    pub report_path: Option<String>,
}
