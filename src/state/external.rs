use crate::state::{lock, ResponseInfo};
use crate::url::{host_key, Site};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use url::Url;

/// Check state of one external link
#[derive(Debug, Clone, Default)]
struct ExternalLink {
    /// Set once a worker has taken responsibility for the HEAD check
    check_claimed: bool,
    response: Option<ResponseInfo>,
}

/// Decides site membership and tracks everything outside the site
///
/// External hosts and links are noted, optionally existence-checked, and
/// never traversed.
#[derive(Debug)]
pub struct ExternalClassifier {
    site: Site,
    hosts: Mutex<HashSet<String>>,
    links: Mutex<HashMap<String, ExternalLink>>,
}

impl ExternalClassifier {
    /// Creates a classifier for the given site boundary
    pub fn new(site: &Site) -> Self {
        Self {
            site: site.clone(),
            hosts: Mutex::new(HashSet::new()),
            links: Mutex::new(HashMap::new()),
        }
    }

    /// Returns true if the URL's host is not the site's host
    ///
    /// On the first sighting of an external host or URL, it is registered
    /// (the URL as unchecked). Repeated calls give the same verdict and add
    /// nothing new.
    pub fn is_external(&self, url: &Url) -> bool {
        if self.site.same_host(url) {
            return false;
        }

        lock(&self.hosts).insert(host_key(url).unwrap_or_default());
        lock(&self.links)
            .entry(url.as_str().to_string())
            .or_default();
        true
    }

    /// Claims the existence check for an external link
    ///
    /// # Returns
    ///
    /// * `true` - The caller should perform the check and record it
    /// * `false` - The link is unknown, or the check is already claimed
    pub fn claim_check(&self, url: &str) -> bool {
        match lock(&self.links).get_mut(url) {
            Some(link) if !link.check_claimed => {
                link.check_claimed = true;
                true
            }
            _ => false,
        }
    }

    /// Records the outcome of an external link check
    pub fn record_check(&self, url: &str, response: ResponseInfo) {
        let mut links = lock(&self.links);
        let link = links.entry(url.to_string()).or_default();
        link.check_claimed = true;
        link.response = Some(response);
    }

    /// The check outcome for a link; None if unknown or not checked yet
    pub fn link_status(&self, url: &str) -> Option<ResponseInfo> {
        lock(&self.links).get(url).and_then(|l| l.response.clone())
    }

    /// External hosts in ascending lexicographic order
    pub fn hosts(&self) -> Vec<String> {
        let mut hosts: Vec<String> = lock(&self.hosts).iter().cloned().collect();
        hosts.sort();
        hosts
    }

    /// External links in ascending lexicographic order
    pub fn links(&self) -> Vec<String> {
        let mut links: Vec<String> = lock(&self.links).keys().cloned().collect();
        links.sort();
        links
    }

    /// External links with their check outcome, sorted by URL
    pub fn link_statuses(&self) -> Vec<(String, Option<ResponseInfo>)> {
        let mut links: Vec<(String, Option<ResponseInfo>)> = lock(&self.links)
            .iter()
            .map(|(url, link)| (url.clone(), link.response.clone()))
            .collect();
        links.sort_by(|a, b| a.0.cmp(&b.0));
        links
    }

    pub fn host_count(&self) -> usize {
        lock(&self.hosts).len()
    }

    pub fn link_count(&self) -> usize {
        lock(&self.links).len()
    }
}
