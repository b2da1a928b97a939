//! Item detail fetching
//!
//! Item requests are dispatched during the listing walk but resolved only
//! afterwards, strictly in dispatch order. Each result is matched back to
//! the metadata recorded for its [`RequestId`], which survives retries.

use crate::crawler::retry::RetryPolicy;
use crate::fetch::{FetchSet, PendingFetch, RequestId, Response};
use crate::state::{ArticleMetadata, DeadLetter, RequestKind};
use std::collections::HashMap;

/// Result of draining the item requests
#[derive(Debug, Default)]
pub struct ItemOutcome {
    /// Resolved articles, in the order their fetches completed the walk
    pub articles: Vec<ArticleMetadata>,

    /// Items that failed past the retry ceiling
    pub dead_letters: Vec<DeadLetter>,

    /// Number of item retries issued
    pub retries: usize,
}

/// Collects item fetches and pairs their results with listing metadata
pub struct ItemFetcher {
    pending: FetchSet,
    metadata: HashMap<RequestId, ArticleMetadata>,
    policy: RetryPolicy,
}

impl ItemFetcher {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            pending: FetchSet::new(),
            metadata: HashMap::new(),
            policy,
        }
    }

    /// Records a dispatched item fetch together with its metadata
    pub fn track(&mut self, fetch: PendingFetch, article: ArticleMetadata) {
        tracing::debug!("Tracking item {} {}", fetch.id(), article.url);
        self.metadata.insert(fetch.id(), article);
        self.pending.add(fetch);
    }

    /// Number of item fetches queued so far, retries included
    pub fn queued(&self) -> usize {
        self.pending.len()
    }

    /// Resolves every tracked fetch, retrying failures up to the ceiling
    pub async fn drain(mut self) -> ItemOutcome {
        let mut outcome = ItemOutcome::default();

        tracing::info!("Resolving {} item requests", self.pending.remaining());

        while let Some(mut fetch) = self.pending.next_pending() {
            let result = fetch.response().await.and_then(Response::error_for_status);

            match result {
                Ok(response) => match self.metadata.remove(&fetch.id()) {
                    Some(article) => {
                        tracing::debug!(
                            "Item {} resolved with HTTP {}",
                            fetch.id(),
                            response.status_code
                        );
                        outcome.articles.push(article.resolve(response));
                    }
                    None => {
                        tracing::warn!("No metadata recorded for {} {}", fetch.id(), fetch.url());
                    }
                },
                Err(error) => {
                    if self.policy.allows_item_retry(fetch.attempt()) {
                        tracing::warn!(
                            "Item {} failed on attempt {}: {}; retrying",
                            fetch.url(),
                            fetch.attempt(),
                            error
                        );
                        self.pending.add(fetch.retry());
                        outcome.retries += 1;
                    } else {
                        let article = self.metadata.remove(&fetch.id());
                        tracing::warn!(
                            "Giving up on item {} after {} attempts: {}",
                            fetch.url(),
                            fetch.attempt(),
                            error
                        );
                        outcome.dead_letters.push(DeadLetter {
                            kind: RequestKind::Item,
                            url: fetch.url().to_string(),
                            title: article.map(|a| a.title),
                            attempts: fetch.attempt(),
                            error: error.to_string(),
                        });
                    }
                }
            }
        }

        outcome
    }
}
