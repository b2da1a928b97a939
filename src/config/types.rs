use serde::Deserialize;

/// Main configuration structure for Pagewalk
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// First listing page of the walk
    #[serde(rename = "start-url")]
    pub start_url: String,

    /// Maximum number of listing requests issued, retries included
    #[serde(rename = "max-listing-pages", default = "default_max_listing_pages")]
    pub max_listing_pages: u32,

    /// Retries allowed per item before it is dead-lettered
    #[serde(rename = "max-item-retries", default = "default_max_item_retries")]
    pub max_item_retries: u32,

    /// Wait applied to a 429 that carries no Retry-After hint (seconds)
    #[serde(
        rename = "rate-limit-floor-secs",
        default = "default_rate_limit_floor_secs"
    )]
    pub rate_limit_floor_secs: u64,

    /// Extra wait added on top of every rate-limit delay (seconds)
    #[serde(
        rename = "rate-limit-padding-secs",
        default = "default_rate_limit_padding_secs"
    )]
    pub rate_limit_padding_secs: u64,

    /// Per-request timeout handed to the HTTP client (seconds)
    #[serde(
        rename = "request-timeout-secs",
        default = "default_request_timeout_secs"
    )]
    pub request_timeout_secs: u64,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// CSS selectors describing the listing page layout
///
/// `title` and `score` select text, `url` and `next` select the `href`
/// attribute, `submitted` selects the `datetime` attribute.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorConfig {
    #[serde(default = "default_title_selector")]
    pub title: String,

    #[serde(default = "default_url_selector")]
    pub url: String,

    #[serde(default = "default_submitted_selector")]
    pub submitted: String,

    #[serde(default = "default_score_selector")]
    pub score: String,

    #[serde(default = "default_next_selector")]
    pub next: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            title: default_title_selector(),
            url: default_url_selector(),
            submitted: default_submitted_selector(),
            score: default_score_selector(),
            next: default_next_selector(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Where to write the JSON report, if anywhere
    #[serde(rename = "json-path", default)]
    pub json_path: Option<String>,
}

fn default_max_listing_pages() -> u32 {
    5
}

fn default_max_item_retries() -> u32 {
    5
}

fn default_rate_limit_floor_secs() -> u64 {
    10
}

fn default_rate_limit_padding_secs() -> u64 {
    1
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_title_selector() -> String {
    ".top-matter > p.title > a.title".to_string()
}

fn default_url_selector() -> String {
    ".top-matter > p.title > a.title".to_string()
}

fn default_submitted_selector() -> String {
    ".top-matter > p.tagline > time".to_string()
}

fn default_score_selector() -> String {
    ".score.unvoted".to_string()
}

fn default_next_selector() -> String {
    ".next-button > a".to_string()
}
