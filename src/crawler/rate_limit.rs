//! Politeness pacing between fetches
//!
//! Every pause is the configured interval plus a uniformly random jitter in
//! `[0, jitter)`, so consecutive requests never settle into a fixed rhythm.

use crate::config::CrawlerConfig;
use rand::Rng;
use std::time::Duration;

/// Computes and applies the pause between consecutive fetches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimiter {
    interval: Duration,
    jitter: Duration,
}

impl RateLimiter {
    /// Creates a rate limiter
    ///
    /// # Arguments
    ///
    /// * `interval` - Base pause; zero disables pausing entirely
    /// * `jitter` - Upper bound of the random extra delay; zero disables it
    pub fn new(interval: Duration, jitter: Duration) -> Self {
        Self { interval, jitter }
    }

    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(config.fetch_interval(), config.jitter())
    }

    /// Duration of the next pause
    pub fn next_wait(&self) -> Duration {
        if self.interval.is_zero() {
            return Duration::ZERO;
        }
        if self.jitter.is_zero() {
            return self.interval;
        }

        let bound = u64::try_from(self.jitter.as_nanos()).unwrap_or(u64::MAX);
        let extra = rand::rng().random_range(0..bound);
        self.interval + Duration::from_nanos(extra)
    }

    /// Longest pause this limiter can produce
    pub fn max_wait(&self) -> Duration {
        if self.interval.is_zero() {
            Duration::ZERO
        } else {
            self.interval + self.jitter
        }
    }

    /// Sleeps for the next pause
    pub async fn pause(&self) {
        let wait = self.next_wait();
        if wait.is_zero() {
            return;
        }
        tracing::trace!("Pausing {:?} before next fetch", wait);
        tokio::time::sleep(wait).await;
    }
}
