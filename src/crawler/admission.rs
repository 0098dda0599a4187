//! Admission policy: decides whether a discovered in-site URL gets fetched
//!
//! Checks run in a fixed order and stop at the first rejection:
//! 1. already found (duplicate)
//! 2. scheme differs from the seed, when scheme restriction is on
//! 3. disallowed by robots.txt, when robots are respected
//! 4. path outside the seed's path prefix
//!
//! Rejections 2-4 are recorded in the registry's skipped table. Duplicates
//! are not: the URL is already accounted for as found.

use crate::config::CrawlerConfig;
use crate::robots::RobotsGate;
use crate::state::{SkipReason, UrlRegistry};
use crate::url::Site;
use url::{Position, Url};

/// Verdict for one candidate URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Fetch it
    Admit,
    /// Already found by an earlier item
    Duplicate,
    /// Rejected for the given reason
    Skip(SkipReason),
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admit)
    }
}

/// Admission rules derived from the site boundary and crawler settings
#[derive(Debug, Clone)]
pub struct AdmissionPolicy {
    site: Site,
    restrict_to_scheme: bool,
    respect_robots: bool,
}

impl AdmissionPolicy {
    pub fn new(site: Site, config: &CrawlerConfig) -> Self {
        Self {
            site,
            restrict_to_scheme: config.restrict_to_scheme,
            respect_robots: config.respect_robots,
        }
    }

    /// Evaluates a candidate, recording any skip in the registry
    ///
    /// Host membership is not checked here; external URLs never reach
    /// admission.
    pub fn evaluate(&self, url: &Url, registry: &UrlRegistry, robots: &RobotsGate) -> Admission {
        let key = url.as_str();

        if registry.is_found(key) {
            return Admission::Duplicate;
        }

        let rejection = if self.restrict_to_scheme && !self.site.same_scheme(url) {
            Some(SkipReason::Scheme)
        } else if self.respect_robots && !robots.allowed(&url[Position::BeforePath..Position::AfterQuery]) {
            Some(SkipReason::Robots)
        } else if !self.site.contains_path(url) {
            Some(SkipReason::OutsidePath)
        } else {
            None
        };

        match rejection {
            Some(reason) => {
                registry.record_skip(key, reason);
                Admission::Skip(reason)
            }
            None => Admission::Admit,
        }
    }

    /// Returns true if the URL must not be fetched
    pub fn should_skip(&self, url: &Url, registry: &UrlRegistry, robots: &RobotsGate) -> bool {
        !self.evaluate(url, registry, robots).is_admitted()
    }
}
