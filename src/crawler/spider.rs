//! The spider: breadth-first traversal of one site
//!
//! A crawl starts from the seed at distance 0 and proceeds layer by layer.
//! For each dequeued item the spider:
//! 1. stops the whole crawl if the item lies beyond the depth bound
//! 2. notes external URLs (optionally HEAD-checking them) and moves on
//! 3. runs the admission policy
//! 4. marks the URL found and fetches it
//! 5. records the response, and on success the page and its children
//! 6. pauses for the rate limiter
//!
//! Items of one layer are processed by up to `workers` concurrent futures.
//! Results are gathered in queue order, so children are enqueued exactly as a
//! sequential crawl would enqueue them.

use crate::config::{Config, CrawlerConfig, DEFAULT_ROBOT_USER_AGENT};
use crate::crawler::admission::{Admission, AdmissionPolicy};
use crate::crawler::fetcher::{Fetcher, RobotsLoader};
use crate::crawler::rate_limit::RateLimiter;
use crate::crawler::scheduler::{WorkItem, WorkQueue};
use crate::robots::RobotsGate;
use crate::state::{
    ExternalClassifier, PageRecord, ResponseInfo, ResultStore, SkipReason, UrlRegistry,
};
use crate::url::{normalize_url, Site};
use crate::{Result, SpiderError};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;
use url::Url;

/// Counts describing a finished crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Internal fetch attempts, successful or not
    pub pages_processed: usize,

    /// Fetch attempts that ended in an error
    pub pages_failed: usize,

    /// In-site URLs rejected by the admission policy
    pub pages_skipped: usize,

    /// Distinct external URLs seen
    pub external_links: usize,

    /// Distinct external hosts seen
    pub external_hosts: usize,

    /// True if the crawl stopped at the depth bound with work left
    pub depth_limit_hit: bool,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlSummary {
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

impl fmt::Display for CrawlSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pages were processed; {} external links linking to {} external hosts were not processed",
            self.pages_processed, self.external_links, self.external_hosts
        )
    }
}

/// Breadth-first crawler for a single site
pub struct Spider<F> {
    site: Site,
    config: CrawlerConfig,
    robot_user_agent: String,
    fetcher: F,
    registry: UrlRegistry,
    external: ExternalClassifier,
    results: ResultStore,
    admission: AdmissionPolicy,
    rate_limiter: RateLimiter,
    robots: OnceLock<RobotsGate>,
}

impl<F: Fetcher + RobotsLoader> Spider<F> {
    /// Creates a spider for the site rooted at `seed`
    ///
    /// # Errors
    ///
    /// * `SpiderError::EmptySeed` - The seed is empty
    /// * `SpiderError::UrlError` - The seed is not an absolute http(s) URL
    pub fn new(seed: &str, config: CrawlerConfig, fetcher: F) -> Result<Self> {
        if seed.trim().is_empty() {
            return Err(SpiderError::EmptySeed);
        }
        let site = Site::parse(seed)?;

        Ok(Self {
            registry: UrlRegistry::new(),
            external: ExternalClassifier::new(&site),
            results: ResultStore::new(),
            admission: AdmissionPolicy::new(site.clone(), &config),
            rate_limiter: RateLimiter::from_config(&config),
            robots: OnceLock::new(),
            robot_user_agent: DEFAULT_ROBOT_USER_AGENT.to_string(),
            site,
            config,
            fetcher,
        })
    }

    /// Creates a spider from a loaded configuration
    pub fn from_config(config: &Config, fetcher: F) -> Result<Self> {
        Ok(Self::new(&config.site.seed, config.crawler.clone(), fetcher)?
            .with_robot_user_agent(&config.user_agent.robot))
    }

    /// Sets the agent name matched against robots.txt groups
    pub fn with_robot_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.robot_user_agent = agent.into();
        self
    }

    /// Crawls the site, following links at most `max_depth` hops from the seed
    ///
    /// `None` means no depth bound. Per-page failures are recorded and do not
    /// stop the crawl unless `stop-on-fetch-error` is set. On such an abort,
    /// items of the current layer that have not started are dropped unclaimed,
    /// while fetches already in flight run to completion and are recorded.
    pub async fn crawl(&self, max_depth: Option<u32>) -> Result<CrawlSummary> {
        let started_at = Utc::now();
        tracing::info!(
            "Crawling {} (max depth: {}, workers: {})",
            self.site,
            max_depth.map_or_else(|| "unlimited".to_string(), |d| d.to_string()),
            self.config.workers
        );

        let robots = self.robots_gate().await;
        let workers = self.config.workers.max(1);

        let mut queue = WorkQueue::new();
        queue.enqueue(WorkItem::seed(self.site.url().clone()));
        let mut depth_limit_hit = false;

        while let Some(front) = queue.front() {
            let distance = front.distance;
            if front.exceeds(max_depth) {
                // Breadth-first: everything left is at least this deep
                tracing::info!(
                    "Depth limit reached; {} queued URLs left unprocessed",
                    queue.len()
                );
                depth_limit_hit = true;
                break;
            }

            let layer = queue.take_layer();
            tracing::debug!("Processing {} URLs at distance {}", layer.len(), distance);

            let aborted = AtomicBool::new(false);
            let outcomes: Vec<Result<Vec<WorkItem>>> = stream::iter(layer)
                .map(|item| {
                    let aborted = &aborted;
                    async move {
                        if aborted.load(Ordering::Relaxed) {
                            return Ok(Vec::new());
                        }
                        let outcome = self.process(item, robots).await;
                        if outcome.is_err() {
                            aborted.store(true, Ordering::Relaxed);
                        }
                        outcome
                    }
                })
                .buffered(workers)
                .collect()
                .await;
            let children = outcomes.into_iter().collect::<Result<Vec<_>>>()?;

            for batch in children {
                queue.extend(batch);
            }
            tracing::trace!("{} URLs queued", queue.len());
        }

        let summary = CrawlSummary {
            pages_processed: self.registry.fetched_count(),
            pages_failed: self.registry.failed_count(),
            pages_skipped: self.registry.skipped_count(),
            external_links: self.external.link_count(),
            external_hosts: self.external.host_count(),
            depth_limit_hit,
            started_at,
            finished_at: Utc::now(),
        };
        tracing::info!("{}", summary);
        Ok(summary)
    }

    /// Loads the robots gate once; later calls reuse it
    async fn robots_gate(&self) -> &RobotsGate {
        if let Some(gate) = self.robots.get() {
            return gate;
        }

        let gate = if !self.config.respect_robots {
            RobotsGate::allow_all()
        } else {
            match self.fetcher.load_policy(&self.site).await {
                Ok(policy) => RobotsGate::new(policy, self.robot_user_agent.as_str()),
                Err(e) => {
                    tracing::warn!("Could not load robots.txt for {}: {}; allowing all", self.site, e);
                    RobotsGate::allow_all()
                }
            }
        };

        self.robots.get_or_init(|| gate)
    }

    /// Processes one work item, returning the children to enqueue
    async fn process(&self, item: WorkItem, robots: &RobotsGate) -> Result<Vec<WorkItem>> {
        let url = item.url.as_str();

        if self.external.is_external(&item.url) {
            self.check_external(url).await;
            return Ok(Vec::new());
        }

        match self.admission.evaluate(&item.url, &self.registry, robots) {
            Admission::Admit => {}
            Admission::Duplicate => {
                tracing::trace!("Already found: {}", url);
                return Ok(Vec::new());
            }
            Admission::Skip(reason) => {
                tracing::debug!("Skipping {} ({})", url, reason);
                return Ok(Vec::new());
            }
        }

        // Another worker may have claimed it since admission
        if !self.registry.try_admit_found(url) {
            return Ok(Vec::new());
        }

        tracing::debug!("Fetching {} (distance {})", url, item.distance);
        let page = self.fetcher.fetch(url).await;
        self.registry.record_fetch(url, page.response.clone());

        let children = match &page.response.error {
            Some(error) => {
                tracing::warn!("Failed to fetch {}: {}", url, error);
                if self.config.stop_on_fetch_error {
                    return Err(SpiderError::FetchAborted {
                        url: url.to_string(),
                        reason: error.clone(),
                    });
                }
                Vec::new()
            }
            None => {
                let children = page
                    .links
                    .iter()
                    .filter_map(|link| match normalize_url(link) {
                        Ok(child) => Some(item.child(child)),
                        Err(e) => {
                            tracing::debug!("Dropping link {} on {}: {}", link, url, e);
                            None
                        }
                    })
                    .collect();

                self.results.insert(PageRecord {
                    url: item.url.clone(),
                    distance: item.distance,
                    body: page.body,
                    links: page.links,
                });
                children
            }
        };

        self.rate_limiter.pause().await;
        Ok(children)
    }

    /// HEAD-checks an external link once, if enabled
    async fn check_external(&self, url: &str) {
        if !self.config.check_external_links || !self.external.claim_check(url) {
            return;
        }

        let response = self.fetcher.head(url).await;
        if response.is_broken() {
            tracing::warn!("External link {} is broken: {}", url, response);
        } else {
            tracing::debug!("External link {} is alive: {}", url, response);
        }
        self.external.record_check(url, response);
    }

    /// Returns true if the URL would not be fetched
    ///
    /// Uses the loaded robots policy, or allows all before a crawl has
    /// loaded one. Any skip is recorded.
    pub fn should_skip(&self, url: &Url) -> bool {
        let allow_all = RobotsGate::allow_all();
        let robots = self.robots.get().unwrap_or(&allow_all);
        self.admission.should_skip(url, &self.registry, robots)
    }

    /// Returns true if the URL lies outside the site, registering it if so
    pub fn is_external(&self, url: &Url) -> bool {
        self.external.is_external(url)
    }

    /// External hosts seen, ascending
    pub fn external_hosts(&self) -> Vec<String> {
        self.external.hosts()
    }

    /// External links seen, ascending
    pub fn external_links(&self) -> Vec<String> {
        self.external.links()
    }

    /// Result of an external link's HEAD check, if it ran
    pub fn external_link_status(&self, url: &str) -> Option<ResponseInfo> {
        self.external.link_status(url)
    }

    /// Every external link with its check result, ascending
    pub fn external_link_statuses(&self) -> Vec<(String, Option<ResponseInfo>)> {
        self.external.link_statuses()
    }

    /// Fetched pages ordered by distance, then URL
    pub fn pages(&self) -> Vec<PageRecord> {
        self.results.pages()
    }

    pub fn page(&self, url: &str) -> Option<PageRecord> {
        self.results.get(url)
    }

    /// Fetch attempts with their responses, ascending by URL
    pub fn fetched(&self) -> Vec<(String, ResponseInfo)> {
        self.registry.fetched()
    }

    /// Skipped URLs with their reasons, ascending by URL
    pub fn skipped(&self) -> Vec<(String, SkipReason)> {
        self.registry.skipped()
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    pub fn robot_user_agent(&self) -> &str {
        &self.robot_user_agent
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }
}
