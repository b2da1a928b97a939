//! Paginated listing walk
//!
//! Listing pages are resolved one at a time in the order they were
//! requested. Each successful page feeds its items to the [`ItemFetcher`]
//! and, while the page cap allows, queues exactly one follow-up page.
//! Failed pages are re-issued (after a backoff for HTTP 429) and count
//! against the same cap.

use crate::crawler::items::ItemFetcher;
use crate::crawler::parser::{
    is_absolute_http, parse_listing, resolve_link, ListingPage, ListingSelectors,
};
use crate::crawler::retry::RetryPolicy;
use crate::fetch::{Client, FetchSet, PendingFetch, Response};
use crate::state::{DeadLetter, RequestKind};
use crate::FetchError;
use std::time::Duration;
use url::Url;

/// Counters and failures collected during the listing walk
#[derive(Debug, Default)]
pub struct ListingOutcome {
    /// Listing requests issued, retries included
    pub requests_issued: usize,

    /// Listing pages that resolved successfully and were parsed
    pub pages_walked: usize,

    /// Item fetches dispatched to the item fetcher
    pub items_dispatched: usize,

    /// Item links skipped because they were not absolute
    pub items_skipped: usize,

    /// Pages whose pagination query did not match exactly one link
    pub shape_mismatches: Vec<FetchError>,

    /// Listing pages that failed once the cap left no room for a retry
    pub dead_letters: Vec<DeadLetter>,
}

/// Drives the listing walk up to a fixed number of requests
pub struct ListingCrawler {
    client: Client,
    selectors: ListingSelectors,
    policy: RetryPolicy,
    max_pages: usize,
}

impl ListingCrawler {
    pub fn new(
        client: Client,
        selectors: ListingSelectors,
        policy: RetryPolicy,
        max_pages: u32,
    ) -> Self {
        Self {
            client,
            selectors,
            policy,
            max_pages: max_pages as usize,
        }
    }

    /// Walks the listing from `start`, handing item fetches to `items`
    pub async fn walk(&self, start: Url, items: &mut ItemFetcher) -> ListingOutcome {
        let mut outcome = ListingOutcome::default();
        let mut listing = FetchSet::new();

        tracing::info!(
            "Walking listing from {} (at most {} requests)",
            start,
            self.max_pages
        );
        listing.add(self.client.get(start));

        while let Some(mut page) = listing.next_pending() {
            let response = match page.response().await.and_then(Response::error_for_status) {
                Ok(response) => response,
                Err(error) => {
                    self.recover(&mut listing, &page, error, &mut outcome).await;
                    continue;
                }
            };

            outcome.pages_walked += 1;
            tracing::debug!(
                "Listing page {} resolved ({} bytes)",
                response.url,
                response.content.len()
            );

            let parsed = parse_listing(&response.text(), &self.selectors);
            self.dispatch_items(&parsed, &response.url, items, &mut outcome);

            if listing.len() >= self.max_pages {
                tracing::debug!("Page cap of {} reached, not paginating further", self.max_pages);
                continue;
            }

            match next_page(&parsed, &response.url) {
                Ok(next) => {
                    tracing::debug!("Queueing next listing page {}", next);
                    listing.add(self.client.get(next));
                }
                Err(mismatch) => {
                    tracing::warn!("{}; pagination stops here", mismatch);
                    outcome.shape_mismatches.push(mismatch);
                }
            }
        }

        outcome.requests_issued = listing.len();
        tracing::info!(
            "Listing walk finished: {} requests, {} pages, {} items dispatched",
            outcome.requests_issued,
            outcome.pages_walked,
            outcome.items_dispatched
        );

        outcome
    }

    /// Re-issues a failed listing request if the cap still allows it
    async fn recover(
        &self,
        listing: &mut FetchSet,
        page: &PendingFetch,
        error: FetchError,
        outcome: &mut ListingOutcome,
    ) {
        if listing.len() >= self.max_pages {
            tracing::warn!(
                "Listing page {} failed ({}) with no requests left under the cap",
                page.url(),
                error
            );
            outcome.dead_letters.push(DeadLetter {
                kind: RequestKind::Listing,
                url: page.url().to_string(),
                title: None,
                attempts: page.attempt(),
                error: error.to_string(),
            });
            return;
        }

        let delay = self.policy.listing_delay(&error);
        if delay > Duration::ZERO {
            tracing::warn!("{}; waiting {:?} before retrying", error, delay);
            tokio::time::sleep(delay).await;
        } else {
            tracing::warn!("{}; retrying", error);
        }

        listing.add(page.retry());
    }

    fn dispatch_items(
        &self,
        parsed: &ListingPage,
        page_url: &Url,
        items: &mut ItemFetcher,
        outcome: &mut ListingOutcome,
    ) {
        if parsed.is_ragged() {
            tracing::warn!(
                "Listing {} has uneven sequences \
                 (titles {}, urls {}, timestamps {}, scores {}); using the first {}",
                page_url,
                parsed.titles.len(),
                parsed.urls.len(),
                parsed.submitted.len(),
                parsed.scores.len(),
                parsed
                    .titles
                    .len()
                    .min(parsed.urls.len())
                    .min(parsed.submitted.len())
                    .min(parsed.scores.len())
            );
        }

        for article in parsed.items() {
            if !is_absolute_http(&article.url) {
                tracing::trace!("Skipping relative item link {}", article.url);
                outcome.items_skipped += 1;
                continue;
            }

            let url = match Url::parse(article.url.trim()) {
                Ok(url) => url,
                Err(e) => {
                    tracing::debug!("Skipping malformed item link {}: {}", article.url, e);
                    outcome.items_skipped += 1;
                    continue;
                }
            };

            items.track(self.client.get(url), article);
            outcome.items_dispatched += 1;
        }
    }
}

/// Picks the single pagination link of a page
fn next_page(parsed: &ListingPage, page_url: &Url) -> Result<Url, FetchError> {
    match parsed.next_links.as_slice() {
        [only] => resolve_link(only, page_url).ok_or_else(|| {
            tracing::debug!("Pagination link {:?} on {} does not resolve", only, page_url);
            FetchError::ShapeMismatch {
                url: page_url.to_string(),
                found: 1,
            }
        }),
        links => Err(FetchError::ShapeMismatch {
            url: page_url.to_string(),
            found: links.len(),
        }),
    }
}
