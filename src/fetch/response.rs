//! Settled HTTP responses and status classification

use crate::FetchError;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

/// A fully received HTTP response
///
/// Header names are stored lowercase. The body is kept as raw bytes; use
/// [`Response::text`] for a lossy UTF-8 view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Final URL after redirects
    pub url: Url,

    /// HTTP status code
    pub status_code: u16,

    /// Response headers (lowercase names)
    pub headers: BTreeMap<String, String>,

    /// Response body
    pub content: Vec<u8>,
}

impl Response {
    /// Creates a response with no headers
    pub fn new(url: Url, status_code: u16, content: impl Into<Vec<u8>>) -> Self {
        Self {
            url,
            status_code,
            headers: BTreeMap::new(),
            content: content.into(),
        }
    }

    /// Adds a header, lowercasing its name
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    /// Looks up a header by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns true for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Lossy UTF-8 view of the body
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }

    /// Converts an unsuccessful status into a [`FetchError`]
    ///
    /// | Status | Result |
    /// |--------|--------|
    /// | 2xx | `Ok(self)` |
    /// | 429 | `RateLimited` carrying the Retry-After hint |
    /// | other | `Http` |
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.is_success() {
            return Ok(self);
        }

        if self.status_code == 429 {
            let retry_after = self.header("retry-after").and_then(parse_retry_after);
            return Err(FetchError::RateLimited {
                url: self.url.to_string(),
                retry_after,
            });
        }

        Err(FetchError::Http {
            url: self.url.to_string(),
            status: self.status_code,
        })
    }
}

/// Longest wait a server can request through Retry-After
pub const MAX_RETRY_AFTER: Duration = Duration::from_secs(3600);

/// Parses a Retry-After header value
///
/// Accepts delta-seconds (`"120"`) or an HTTP-date. Dates in the past
/// yield a zero duration and hints are capped at [`MAX_RETRY_AFTER`].
/// Anything else yields `None`, which makes the caller fall back to its
/// configured floor.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    let value = value.trim();

    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds).min(MAX_RETRY_AFTER));
    }

    let date = DateTime::parse_from_rfc2822(value).ok()?;
    let delta = date.with_timezone(&Utc) - Utc::now();
    Some(delta.to_std().unwrap_or(Duration::ZERO).min(MAX_RETRY_AFTER))
}
