//! In-memory fetcher for crawler tests

use crate::crawler::fetcher::{FetchedPage, Fetcher, RobotsLoader};
use crate::robots::RobotsPolicy;
use crate::state::ResponseInfo;
use crate::url::Site;
use crate::SpiderError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Serves a fixed link graph and records every request it receives
#[derive(Debug, Default)]
pub(crate) struct CannedFetcher {
    pages: HashMap<String, (String, Vec<String>)>,
    heads: HashMap<String, u16>,
    delays: HashMap<String, Duration>,
    robots: Option<Result<String, String>>,
    fetch_log: Mutex<Vec<String>>,
    head_log: Mutex<Vec<String>>,
}

impl CannedFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The golang.org documentation graph
    pub(crate) fn golang() -> Self {
        Self::new()
            .page(
                "http://golang.org/",
                "The Go Programming Language",
                &["http://golang.org/pkg/", "http://golang.org/cmd/"],
            )
            .page(
                "http://golang.org/pkg/",
                "Packages",
                &[
                    "http://golang.org/",
                    "http://golang.org/cmd/",
                    "http://golang.org/pkg/fmt/",
                    "http://golang.org/pkg/os/",
                ],
            )
            .page(
                "http://golang.org/pkg/fmt/",
                "Package fmt",
                &["http://golang.org/", "http://golang.org/pkg/"],
            )
            .page(
                "http://golang.org/pkg/os/",
                "Package os",
                &["http://golang.org/", "http://golang.org/pkg/"],
            )
            .page(
                "http://golang.org/cmd/",
                "Commands",
                &[
                    "http://golang.org/",
                    "http://golang.org/pkg/",
                    "http://golang.org/cmd/gofmt/",
                    "http://golang.org/cmd/pprof/",
                ],
            )
            .page(
                "http://golang.org/cmd/gofmt/",
                "Command gofmt",
                &["http://golang.org/", "http://golang.org/cmd/"],
            )
            .page(
                "http://golang.org/cmd/pprof/",
                "Command pprof",
                &["http://golang.org/", "http://golang.org/cmd/"],
            )
    }

    pub(crate) fn page(mut self, url: &str, body: &str, links: &[&str]) -> Self {
        let links = links.iter().map(|l| l.to_string()).collect();
        self.pages.insert(url.to_string(), (body.to_string(), links));
        self
    }

    /// Makes fetches of `url` take `delay` before answering
    pub(crate) fn slow(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    pub(crate) fn head_status(mut self, url: &str, status: u16) -> Self {
        self.heads.insert(url.to_string(), status);
        self
    }

    pub(crate) fn robots(mut self, content: &str) -> Self {
        self.robots = Some(Ok(content.to_string()));
        self
    }

    pub(crate) fn robots_unavailable(mut self) -> Self {
        self.robots = Some(Err("connection reset".to_string()));
        self
    }

    pub(crate) fn fetch_log(&self) -> Vec<String> {
        self.fetch_log.lock().unwrap().clone()
    }

    pub(crate) fn head_log(&self) -> Vec<String> {
        self.head_log.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for CannedFetcher {
    async fn fetch(&self, url: &str) -> FetchedPage {
        self.fetch_log.lock().unwrap().push(url.to_string());
        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }
        match self.pages.get(url) {
            Some((body, links)) => FetchedPage {
                body: body.clone(),
                response: ResponseInfo::from_status(200, "200 OK"),
                links: links.clone(),
            },
            None => FetchedPage::failed(ResponseInfo::failed(format!("not found: {}", url))),
        }
    }

    async fn head(&self, url: &str) -> ResponseInfo {
        self.head_log.lock().unwrap().push(url.to_string());
        match self.heads.get(url) {
            Some(&code) => ResponseInfo::from_status(code, code.to_string()),
            None => ResponseInfo::failed(format!("no such host: {}", url)),
        }
    }
}

#[async_trait]
impl RobotsLoader for CannedFetcher {
    async fn load_policy(&self, _site: &Site) -> Result<RobotsPolicy, SpiderError> {
        match &self.robots {
            None => Ok(RobotsPolicy::allow_all()),
            Some(Ok(content)) => Ok(RobotsPolicy::from_content(content)),
            Some(Err(reason)) => Err(SpiderError::Robots(reason.clone())),
        }
    }
}
