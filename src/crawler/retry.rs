//! Retry and backoff decisions
//!
//! | Failure | Listing page | Item |
//! |---------|--------------|------|
//! | HTTP 429 | wait `Retry-After` (or floor) + padding, retry | retry immediately |
//! | other HTTP status | retry immediately | retry immediately |
//! | transport / unclassified | retry immediately | retry immediately |
//!
//! Listing retries are bounded by the page cap, item retries by
//! `max_item_retries`.

use crate::config::CrawlerConfig;
use crate::FetchError;
use std::time::Duration;

/// Backoff and retry-ceiling policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    rate_limit_floor: Duration,
    rate_limit_padding: Duration,
    max_item_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            rate_limit_floor: Duration::from_secs(10),
            rate_limit_padding: Duration::from_secs(1),
            max_item_retries: 5,
        }
    }
}

impl RetryPolicy {
    pub fn new(
        rate_limit_floor: Duration,
        rate_limit_padding: Duration,
        max_item_retries: u32,
    ) -> Self {
        Self {
            rate_limit_floor,
            rate_limit_padding,
            max_item_retries,
        }
    }

    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(
            Duration::from_secs(config.rate_limit_floor_secs),
            Duration::from_secs(config.rate_limit_padding_secs),
            config.max_item_retries,
        )
    }

    /// How long to wait before re-issuing a failed listing request
    pub fn listing_delay(&self, error: &FetchError) -> Duration {
        match error {
            FetchError::RateLimited { retry_after, .. } => {
                retry_after
                    .unwrap_or(self.rate_limit_floor)
                    .saturating_add(self.rate_limit_padding)
            }
            _ => Duration::ZERO,
        }
    }

    /// Whether an item issued `attempt` times may be issued again
    pub fn allows_item_retry(&self, attempt: u32) -> bool {
        attempt <= self.max_item_retries
    }

    pub fn max_item_retries(&self) -> u32 {
        self.max_item_retries
    }
}
