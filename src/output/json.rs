//! JSON report export
//!
//! The report mirrors [`CrawlReport`] with serializable field types. Response
//! bodies are summarized by length rather than embedded.

use crate::crawler::CrawlReport;
use crate::state::{ArticleMetadata, DeadLetter};
use crate::PagewalkError;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Serializable view of a crawl report
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub started_at: String,
    pub elapsed_secs: f64,
    pub listing_requests: usize,
    pub listing_pages_walked: usize,
    pub items_dispatched: usize,
    pub item_retries: usize,
    pub shape_mismatches: Vec<String>,
    pub articles: Vec<JsonArticle<'a>>,
    pub dead_letters: &'a [DeadLetter],
}

/// Serializable view of a resolved article
#[derive(Debug, Serialize)]
pub struct JsonArticle<'a> {
    pub title: &'a str,
    pub url: &'a str,
    pub when_submitted: &'a str,
    pub score: &'a str,
    pub status: Option<u16>,
    pub final_url: Option<String>,
    pub content_length: Option<usize>,
}

impl<'a> From<&'a ArticleMetadata> for JsonArticle<'a> {
    fn from(article: &'a ArticleMetadata) -> Self {
        let response = article.response.as_ref();
        Self {
            title: &article.title,
            url: &article.url,
            when_submitted: &article.when_submitted,
            score: &article.score,
            status: response.map(|r| r.status_code),
            final_url: response.map(|r| r.url.to_string()),
            content_length: response.map(|r| r.content.len()),
        }
    }
}

/// Builds the serializable view of `report`
pub fn build_json_report(report: &CrawlReport) -> JsonReport<'_> {
    JsonReport {
        started_at: report.started_at.to_rfc3339(),
        elapsed_secs: report.elapsed.as_secs_f64(),
        listing_requests: report.listing_requests,
        listing_pages_walked: report.listing_pages_walked,
        items_dispatched: report.items_dispatched,
        item_retries: report.item_retries,
        shape_mismatches: report
            .shape_mismatches
            .iter()
            .map(ToString::to_string)
            .collect(),
        articles: report.articles.iter().map(JsonArticle::from).collect(),
        dead_letters: &report.dead_letters,
    }
}

/// Writes the report as pretty-printed JSON
///
/// # Arguments
///
/// * `report` - The finished crawl report
/// * `output_path` - Path where the JSON file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(PagewalkError)` - Failed to create or write the file
pub fn write_json_report(report: &CrawlReport, output_path: &Path) -> Result<(), PagewalkError> {
    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, &build_json_report(report))?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    tracing::info!("Wrote JSON report to {}", output_path.display());
    Ok(())
}
