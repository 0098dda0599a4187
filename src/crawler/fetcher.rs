//! Fetcher capabilities and the HTTP implementation
//!
//! The spider only talks to the network through two traits:
//! - `Fetcher`: GET a page (body, status, outbound links) and HEAD-check a link
//! - `RobotsLoader`: retrieve the site's robots.txt
//!
//! `HttpFetcher` implements both with reqwest; tests substitute canned
//! in-memory implementations.

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::crawler::parser::extract_links;
use crate::robots::RobotsPolicy;
use crate::state::ResponseInfo;
use crate::url::Site;
use crate::SpiderError;
use async_trait::async_trait;
use reqwest::{header, redirect::Policy, Client, StatusCode};
use std::time::Duration;

/// Maximum redirect hops followed for one request
const MAX_REDIRECTS: usize = 10;

/// The outcome of fetching one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedPage {
    /// Page body; empty on failure
    pub body: String,

    /// Status and error information
    pub response: ResponseInfo,

    /// Absolute outbound link URLs; empty on failure
    pub links: Vec<String>,
}

impl FetchedPage {
    /// A failed fetch: no body and no links
    pub fn failed(response: ResponseInfo) -> Self {
        Self {
            body: String::new(),
            response,
            links: Vec::new(),
        }
    }
}

/// Retrieves pages for the spider
///
/// Implementations never panic: every failure is reported through
/// `FetchedPage::response.error` with an empty body and no links.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches a page and the absolute URLs it links to
    async fn fetch(&self, url: &str) -> FetchedPage;

    /// Checks that a URL exists without downloading it
    async fn head(&self, url: &str) -> ResponseInfo {
        ResponseInfo::failed(format!("existence check not supported for {}", url))
    }
}

/// Retrieves a site's robots.txt
#[async_trait]
pub trait RobotsLoader: Send + Sync {
    /// Loads the robots policy for the site
    ///
    /// An error means the policy is unknown; the spider then allows
    /// everything rather than stopping.
    async fn load_policy(&self, site: &Site) -> Result<RobotsPolicy, SpiderError>;
}

/// Builds an HTTP client with the crawler's user agent and timeout
///
/// # Example
///
/// ```
/// use site_spider::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client("SiteSpider/0.1", Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetcher and robots loader over HTTP
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher from configuration
    pub fn new(user_agent: &UserAgentConfig, crawler: &CrawlerConfig) -> Result<Self, SpiderError> {
        let client = build_http_client(&user_agent.browser, crawler.request_timeout())?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchedPage {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return FetchedPage::failed(ResponseInfo::failed(describe_error(&e))),
        };

        let status = response.status();
        let info = status_info(status);
        if !status.is_success() {
            return FetchedPage::failed(info.with_error(format!("HTTP {}", status.as_u16())));
        }

        // Links resolve against where redirects actually landed
        let final_url = response.url().clone();
        let is_html = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map_or(true, |ct| ct.contains("html"));

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return FetchedPage::failed(info.with_error(describe_error(&e))),
        };

        if body.trim().is_empty() {
            return FetchedPage::failed(info.with_error(format!("{}: nothing in body", url)));
        }

        let links = if is_html {
            extract_links(&body, &final_url)
        } else {
            Vec::new()
        };

        FetchedPage {
            body,
            response: info,
            links,
        }
    }

    async fn head(&self, url: &str) -> ResponseInfo {
        match self.client.head(url).send().await {
            Ok(response) => status_info(response.status()),
            Err(e) => ResponseInfo::failed(describe_error(&e)),
        }
    }
}

#[async_trait]
impl RobotsLoader for HttpFetcher {
    async fn load_policy(&self, site: &Site) -> Result<RobotsPolicy, SpiderError> {
        let robots_url = site.robots_url()?;
        let response = self
            .client
            .get(robots_url.clone())
            .send()
            .await
            .map_err(|source| SpiderError::Http {
                url: robots_url.to_string(),
                source,
            })?;

        let status = response.status();
        if status.is_client_error() {
            // No robots.txt means no restrictions
            tracing::debug!("No robots.txt at {} ({})", robots_url, status);
            return Ok(RobotsPolicy::allow_all());
        }
        if !status.is_success() {
            return Err(SpiderError::Robots(format!(
                "{} answered {}",
                robots_url, status
            )));
        }

        let content = response.text().await.map_err(|source| SpiderError::Http {
            url: robots_url.to_string(),
            source,
        })?;
        Ok(RobotsPolicy::from_content(&content))
    }
}

/// Builds the response info for a received status
fn status_info(status: StatusCode) -> ResponseInfo {
    ResponseInfo::from_status(status.as_u16(), status.to_string())
}

/// Classifies a transport error into a short description
fn describe_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else if e.is_redirect() {
        "Too many redirects".to_string()
    } else {
        e.to_string()
    }
}
