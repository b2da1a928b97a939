//! HTTP client and in-flight request handles
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the `reqwest` client with a proper user agent string
//! - Spawning each request as a background task
//! - Re-issuing a request while keeping its logical identity
//! - Classifying transport failures

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::fetch::Response;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use url::Url;

/// Something that can execute a single GET request to completion
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs the request and returns the settled response
    ///
    /// Unsuccessful HTTP statuses are *not* errors at this level; only
    /// failures to obtain a response are.
    async fn execute(&self, url: &Url) -> Result<Response, FetchError>;
}

/// `reqwest`-backed transport used in production
pub struct HttpTransport {
    client: HttpClient,
}

impl HttpTransport {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, url: &Url) -> Result<Response, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_transport_error(url, e))?;

        let status_code = response.status().as_u16();
        let final_url = response.url().clone();

        let mut headers = BTreeMap::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers.insert(name.as_str().to_string(), value.to_string());
            }
        }

        let content = response
            .bytes()
            .await
            .map_err(|e| classify_transport_error(url, e))?;

        Ok(Response {
            url: final_url,
            status_code,
            headers,
            content: content.to_vec(),
        })
    }
}

/// Maps a `reqwest` failure onto the fetch error taxonomy
fn classify_transport_error(url: &Url, error: reqwest::Error) -> FetchError {
    let message = if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        "Connection refused".to_string()
    } else {
        error.to_string()
    };

    FetchError::Transport {
        url: url.to_string(),
        message,
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `crawler` - The crawler configuration (for the request timeout)
///
/// # Example
///
/// ```no_run
/// use pagewalk::config::load_config;
/// use pagewalk::fetch::build_http_client;
/// use std::path::Path;
///
/// let config = load_config(Path::new("pagewalk.toml")).unwrap();
/// let client = build_http_client(&config.user_agent, &config.crawler).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<HttpClient, reqwest::Error> {
    // Format: CrawlerName/Version (+ContactURL; ContactEmail)
    let user_agent = format!(
        "{}/{} (+{}; {})",
        user_agent.crawler_name,
        user_agent.crawler_version,
        user_agent.contact_url,
        user_agent.contact_email
    );

    HttpClient::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Stable identity of a logical request, preserved across retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues requests as background tasks
///
/// Cloning is cheap; clones share the transport and the id sequence.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    next_id: Arc<AtomicU64>,
}

impl Client {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Starts a GET request and returns immediately with its handle
    ///
    /// Must be called from within a tokio runtime.
    pub fn get(&self, url: Url) -> PendingFetch {
        let id = RequestId(self.next_id.fetch_add(1, Ordering::Relaxed));
        PendingFetch::spawn(self.transport.clone(), id, url, 1)
    }
}

/// Handle to a request running in the background
///
/// Awaiting [`PendingFetch::response`] suspends until this particular request
/// settles. [`PendingFetch::retry`] issues the same request again under the
/// same [`RequestId`].
pub struct PendingFetch {
    id: RequestId,
    url: Url,
    attempt: u32,
    transport: Arc<dyn Transport>,
    handle: Option<JoinHandle<Result<Response, FetchError>>>,
}

impl PendingFetch {
    fn spawn(transport: Arc<dyn Transport>, id: RequestId, url: Url, attempt: u32) -> Self {
        let task_transport = transport.clone();
        let task_url = url.clone();
        let handle = tokio::spawn(async move { task_transport.execute(&task_url).await });

        tracing::trace!("Dispatched {} {} (attempt {})", id, url, attempt);

        Self {
            id,
            url,
            attempt,
            transport,
            handle: Some(handle),
        }
    }

    /// Logical identity of the request
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// URL originally requested
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// 1 for the first issue, incremented by every retry
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Waits for the request to settle
    ///
    /// A panicked or cancelled fetch task surfaces as
    /// [`FetchError::Unclassified`]. A handle resolves once; later calls
    /// report it as already consumed.
    pub async fn response(&mut self) -> Result<Response, FetchError> {
        let handle = self.handle.take().ok_or_else(|| {
            FetchError::Unclassified(format!("{} {} was already resolved", self.id, self.url))
        })?;

        match handle.await {
            Ok(result) => result,
            Err(join_error) => Err(FetchError::Unclassified(format!(
                "fetch task for {} failed: {}",
                self.url, join_error
            ))),
        }
    }

    /// Re-issues the same request as a new handle
    pub fn retry(&self) -> PendingFetch {
        PendingFetch::spawn(
            self.transport.clone(),
            self.id,
            self.url.clone(),
            self.attempt + 1,
        )
    }
}

impl fmt::Debug for PendingFetch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingFetch")
            .field("id", &self.id)
            .field("url", &self.url.as_str())
            .field("attempt", &self.attempt)
            .field("settled", &self.handle.is_none())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::scripted::ScriptedTransport;

    fn create_test_config() -> (UserAgentConfig, CrawlerConfig) {
        (
            UserAgentConfig {
                crawler_name: "TestCrawler".to_string(),
                crawler_version: "1.0".to_string(),
                contact_url: "https://example.com/about".to_string(),
                contact_email: "admin@example.com".to_string(),
            },
            CrawlerConfig {
                start_url: "https://example.com/".to_string(),
                max_listing_pages: 5,
                max_item_retries: 5,
                rate_limit_floor_secs: 10,
                rate_limit_padding_secs: 1,
                request_timeout_secs: 30,
            },
        )
    }

    #[test]
    fn test_build_http_client() {
        let (user_agent, crawler) = create_test_config();
        assert!(build_http_client(&user_agent, &crawler).is_ok());
    }

    #[tokio::test]
    async fn test_get_assigns_distinct_ids() {
        let transport = Arc::new(ScriptedTransport::new());
        let client = Client::new(transport);

        let a = client.get(Url::parse("https://example.com/a").unwrap());
        let b = client.get(Url::parse("https://example.com/b").unwrap());

        assert_ne!(a.id(), b.id());
        assert_eq!(a.attempt(), 1);
    }

    #[tokio::test]
    async fn test_retry_keeps_identity_and_counts_attempts() {
        let url = Url::parse("https://example.com/item").unwrap();
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(&url, Ok(Response::new(url.clone(), 500, "")));
        transport.push(&url, Ok(Response::new(url.clone(), 200, "second")));
        let client = Client::new(transport.clone());

        let mut first = client.get(url.clone());
        let response = first.response().await.unwrap();
        assert_eq!(response.status_code, 500);

        let mut second = first.retry();
        assert_eq!(second.id(), first.id());
        assert_eq!(second.attempt(), 2);

        let response = second.response().await.unwrap();
        assert_eq!(response.text(), "second");
        assert_eq!(transport.request_count(&url), 2);
    }

    #[tokio::test]
    async fn test_response_twice_is_unclassified() {
        let url = Url::parse("https://example.com/once").unwrap();
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(&url, Ok(Response::new(url.clone(), 200, "")));
        let client = Client::new(transport);

        let mut fetch = client.get(url);
        assert!(fetch.response().await.is_ok());
        assert!(matches!(
            fetch.response().await,
            Err(FetchError::Unclassified(_))
        ));
    }
}
