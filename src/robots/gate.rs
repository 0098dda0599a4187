//! The robots exclusion gate consulted by admission

use crate::robots::RobotsPolicy;

/// Answers allow/deny for a path during one crawl
///
/// A gate without a policy (robots disabled, or the file could not be
/// loaded) allows everything. The gate is built once before the first fetch
/// and never changes afterwards.
#[derive(Debug, Clone)]
pub struct RobotsGate {
    policy: Option<RobotsPolicy>,
    user_agent: String,
}

impl RobotsGate {
    /// Creates a gate that enforces `policy` for `user_agent`
    pub fn new(policy: RobotsPolicy, user_agent: impl Into<String>) -> Self {
        Self {
            policy: Some(policy),
            user_agent: user_agent.into(),
        }
    }

    /// Creates a gate with no policy loaded
    pub fn allow_all() -> Self {
        Self {
            policy: None,
            user_agent: String::new(),
        }
    }

    /// Returns true if a policy was loaded
    pub fn is_loaded(&self) -> bool {
        self.policy.is_some()
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Checks whether the robot may fetch `path`
    pub fn allowed(&self, path: &str) -> bool {
        match &self.policy {
            Some(policy) => policy.is_allowed(path, &self.user_agent),
            None => true,
        }
    }
}

impl Default for RobotsGate {
    fn default() -> Self {
        Self::allow_all()
    }
}
