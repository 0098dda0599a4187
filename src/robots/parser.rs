//! Robots.txt policy backed by the robotstxt crate

use robotstxt::DefaultMatcher;

/// A loaded robots.txt file
///
/// Holds the raw rules; matching against a user agent happens per query
/// through the robotstxt crate, which selects the group for that agent and
/// falls back to the `*` group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RobotsPolicy {
    content: String,
}

impl RobotsPolicy {
    /// Creates a policy from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }

    /// A policy with no rules, which allows everything
    ///
    /// Used when the site answers robots.txt with "not found".
    pub fn allow_all() -> Self {
        Self {
            content: String::new(),
        }
    }

    /// Raw robots.txt content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Checks if a path is allowed for the given user agent
    ///
    /// # Arguments
    ///
    /// * `path` - The URL path to check (e.g., "/page.html")
    /// * `user_agent` - The robot's product token
    pub fn is_allowed(&self, path: &str, user_agent: &str) -> bool {
        if self.content.trim().is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, path)
    }
}
