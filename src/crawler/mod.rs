//! Crawler module for the listing walk and item fetching
//!
//! This module contains the core crawling logic, including:
//! - Listing page parsing (items and pagination)
//! - The paginated listing walk
//! - Item detail fetching with metadata correlation
//! - Retry and rate-limit backoff decisions
//! - Overall run coordination

mod coordinator;
mod items;
mod listing;
mod parser;
mod retry;

pub use coordinator::{run_crawl, Coordinator, CrawlReport};
pub use items::{ItemFetcher, ItemOutcome};
pub use listing::{ListingCrawler, ListingOutcome};
pub use parser::{is_absolute_http, parse_listing, resolve_link, ListingPage, ListingSelectors};
pub use retry::RetryPolicy;
