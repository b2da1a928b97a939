//! Pagewalk: a single-host listing crawler
//!
//! This crate walks a paginated listing resource, fans out per-item detail
//! fetches, and pairs every detail response with the metadata captured from
//! the listing page that linked to it. Transient failures (including HTTP 429
//! rate limiting) are recovered through bounded retry.

pub mod config;
pub mod crawler;
pub mod fetch;
pub mod output;
pub mod state;

use std::time::Duration;
use thiserror::Error;

/// Main error type for Pagewalk operations
#[derive(Debug, Error)]
pub enum PagewalkError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector in config: {0}")]
    InvalidSelector(String),
}

/// Failure of a single listing or item request
///
/// Every variant except `ShapeMismatch` is treated as transient by the
/// crawler and answered with a retry.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("Rate limited by {url} (retry after {retry_after:?})")]
    RateLimited {
        url: String,
        retry_after: Option<Duration>,
    },

    #[error("HTTP {status} for {url}")]
    Http { url: String, status: u16 },

    #[error("Transport failure for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Expected exactly one usable pagination link on {url}, found {found} candidates")]
    ShapeMismatch { url: String, found: usize },

    #[error("Unclassified failure: {0}")]
    Unclassified(String),
}

impl FetchError {
    /// Returns true for HTTP 429 responses
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

/// Result type alias for Pagewalk operations
pub type Result<T> = std::result::Result<T, PagewalkError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_crawl, Coordinator, CrawlReport};
pub use state::{ArticleMetadata, DeadLetter};
