//! HTML parser for listing pages
//!
//! A listing page is queried with five independent selectors. Four of them
//! (title, url, submitted, score) produce parallel sequences that are paired
//! up by position; the fifth yields the pagination link(s).

use crate::config::SelectorConfig;
use crate::state::ArticleMetadata;
use crate::PagewalkError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Compiled listing selectors
#[derive(Debug, Clone)]
pub struct ListingSelectors {
    title: Selector,
    url: Selector,
    submitted: Selector,
    score: Selector,
    next: Selector,
}

impl ListingSelectors {
    /// Compiles the configured CSS selectors
    pub fn compile(config: &SelectorConfig) -> Result<Self, PagewalkError> {
        Ok(Self {
            title: compile_selector(&config.title)?,
            url: compile_selector(&config.url)?,
            submitted: compile_selector(&config.submitted)?,
            score: compile_selector(&config.score)?,
            next: compile_selector(&config.next)?,
        })
    }
}

fn compile_selector(selector: &str) -> Result<Selector, PagewalkError> {
    Selector::parse(selector).map_err(|e| PagewalkError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Raw sequences extracted from one listing page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    pub titles: Vec<String>,
    pub urls: Vec<String>,
    pub submitted: Vec<String>,
    pub scores: Vec<String>,

    /// Every `href` matched by the pagination selector
    pub next_links: Vec<String>,
}

impl ListingPage {
    /// Returns true when the four item sequences differ in length
    pub fn is_ragged(&self) -> bool {
        let len = self.titles.len();
        self.urls.len() != len || self.submitted.len() != len || self.scores.len() != len
    }

    /// Pairs the four sequences by position
    ///
    /// Consumption stops at the shortest sequence, so a ragged page yields
    /// `min(lengths)` items.
    pub fn items(&self) -> Vec<ArticleMetadata> {
        self.titles
            .iter()
            .zip(&self.urls)
            .zip(&self.submitted)
            .zip(&self.scores)
            .map(|(((title, url), submitted), score)| {
                ArticleMetadata::new(title.clone(), url.clone(), submitted.clone(), score.clone())
            })
            .collect()
    }
}

/// Parses a listing page
///
/// # Example
///
/// ```
/// use pagewalk::config::SelectorConfig;
/// use pagewalk::crawler::{parse_listing, ListingSelectors};
///
/// let selectors = ListingSelectors::compile(&SelectorConfig::default()).unwrap();
/// let page = parse_listing("<html><body></body></html>", &selectors);
/// assert!(page.items().is_empty());
/// assert!(page.next_links.is_empty());
/// ```
pub fn parse_listing(html: &str, selectors: &ListingSelectors) -> ListingPage {
    let document = Html::parse_document(html);

    ListingPage {
        titles: document.select(&selectors.title).map(element_text).collect(),
        urls: select_attr(&document, &selectors.url, "href"),
        submitted: select_attr(&document, &selectors.submitted, "datetime"),
        scores: document.select(&selectors.score).map(element_text).collect(),
        next_links: select_attr(&document, &selectors.next, "href"),
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Collects an attribute from every matching element that carries it
fn select_attr(document: &Html, selector: &Selector, attr: &str) -> Vec<String> {
    document
        .select(selector)
        .filter_map(|element| element.value().attr(attr))
        .map(|value| value.trim().to_string())
        .collect()
}

/// Returns true for scheme-qualified HTTP(S) URLs
///
/// Relative links such as `/r/python/comments/...` are rejected.
pub fn is_absolute_http(url: &str) -> bool {
    let url = url.trim();
    url.starts_with("http://") || url.starts_with("https://")
}

/// Resolves a pagination href against the page it was found on
///
/// Returns None for hrefs that do not resolve to an HTTP(S) URL.
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url)
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
