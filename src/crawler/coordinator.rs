//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator owns one run:
//! - Building the HTTP client and compiling the listing selectors
//! - Walking the listing pages while item fetches accumulate
//! - Draining the item fetches once the walk has stopped
//! - Timing the run and assembling the final report

use crate::config::Config;
use crate::crawler::items::ItemFetcher;
use crate::crawler::listing::ListingCrawler;
use crate::crawler::parser::ListingSelectors;
use crate::crawler::retry::RetryPolicy;
use crate::fetch::{build_http_client, Client, HttpTransport, Transport};
use crate::state::{ArticleMetadata, DeadLetter};
use crate::{FetchError, PagewalkError};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Everything a finished run produced
#[derive(Debug)]
pub struct CrawlReport {
    /// Wall-clock time the run started
    pub started_at: DateTime<Utc>,

    /// Time spent from the first listing request to the last item result
    pub elapsed: Duration,

    /// Listing requests issued, retries included
    pub listing_requests: usize,

    /// Listing pages parsed successfully
    pub listing_pages_walked: usize,

    /// Item fetches dispatched from the listing pages
    pub items_dispatched: usize,

    /// Item retries issued while draining
    pub item_retries: usize,

    /// Pages whose pagination query did not match exactly one link
    pub shape_mismatches: Vec<FetchError>,

    /// Articles with their detail responses attached, in resolution order
    pub articles: Vec<ArticleMetadata>,

    /// Listing pages and items that were given up on
    pub dead_letters: Vec<DeadLetter>,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    start_url: Url,
    max_listing_pages: u32,
    client: Client,
    selectors: ListingSelectors,
    policy: RetryPolicy,
}

impl Coordinator {
    /// Creates a coordinator backed by a `reqwest` client
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(PagewalkError)` - Invalid start URL, selector, or client settings
    pub fn new(config: &Config) -> Result<Self, PagewalkError> {
        let http = build_http_client(&config.user_agent, &config.crawler)?;
        Self::with_transport(config, Arc::new(HttpTransport::new(http)))
    }

    /// Creates a coordinator that sends requests through `transport`
    pub fn with_transport(
        config: &Config,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, PagewalkError> {
        Ok(Self {
            start_url: Url::parse(&config.crawler.start_url)?,
            max_listing_pages: config.crawler.max_listing_pages,
            client: Client::new(transport),
            selectors: ListingSelectors::compile(&config.selectors)?,
            policy: RetryPolicy::from_config(&config.crawler),
        })
    }

    /// Runs the listing walk, then resolves every item
    pub async fn run(&self) -> CrawlReport {
        let started_at = Utc::now();
        let timer = Instant::now();

        tracing::info!("Starting crawl at {}", started_at.to_rfc3339());

        let mut items = ItemFetcher::new(self.policy);
        let listing = ListingCrawler::new(
            self.client.clone(),
            self.selectors.clone(),
            self.policy,
            self.max_listing_pages,
        );

        let walk = listing.walk(self.start_url.clone(), &mut items).await;
        let drained = items.drain().await;

        let mut dead_letters = walk.dead_letters;
        dead_letters.extend(drained.dead_letters);

        let elapsed = timer.elapsed();
        tracing::info!(
            "Crawl completed: {} articles in {:.1}s ({} dead letters)",
            drained.articles.len(),
            elapsed.as_secs_f64(),
            dead_letters.len()
        );

        CrawlReport {
            started_at,
            elapsed,
            listing_requests: walk.requests_issued,
            listing_pages_walked: walk.pages_walked,
            items_dispatched: walk.items_dispatched,
            item_retries: drained.retries,
            shape_mismatches: walk.shape_mismatches,
            articles: drained.articles,
            dead_letters,
        }
    }
}

/// Runs a complete crawl with the production HTTP client
///
/// # Example
///
/// ```no_run
/// use pagewalk::config::load_config;
/// use pagewalk::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("pagewalk.toml"))?;
/// let report = run_crawl(&config).await?;
/// println!("{} articles", report.articles.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config) -> Result<CrawlReport, PagewalkError> {
    let coordinator = Coordinator::new(config)?;
    Ok(coordinator.run().await)
}
