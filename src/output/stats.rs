//! Console output for a finished crawl
//!
//! This module prints the resolved articles and a short run summary to
//! stdout.

use crate::crawler::CrawlReport;
use crate::state::ArticleMetadata;

/// Prints one block per resolved article
///
/// # Arguments
///
/// * `articles` - The articles to display, in resolution order
pub fn print_articles(articles: &[ArticleMetadata]) {
    println!("=== Articles ({}) ===\n", articles.len());

    for (index, article) in articles.iter().enumerate() {
        println!("{:>3}. {}", index + 1, article.title);
        println!("     URL: {}", article.url);
        println!("     Submitted: {}", article.when_submitted);
        println!("     Score: {}", article.score);
        if let Some(response) = &article.response {
            println!(
                "     Fetched: HTTP {} ({} bytes)",
                response.status_code,
                response.content.len()
            );
        }
    }
    println!();
}

/// Renders the run summary as printable lines
///
/// # Arguments
///
/// * `report` - The finished crawl report
///
/// # Returns
///
/// The summary text, one line per counter
pub fn format_summary(report: &CrawlReport) -> String {
    let mut out = String::new();

    out.push_str("=== Crawl Summary ===\n\n");
    out.push_str(&format!("  Started: {}\n", report.started_at.to_rfc3339()));
    out.push_str(&format!(
        "  Elapsed: {:.1}s\n",
        report.elapsed.as_secs_f64()
    ));
    out.push_str(&format!("  Articles: {}\n", report.articles.len()));
    out.push_str(&format!(
        "  Listing requests: {} ({} pages walked)\n",
        report.listing_requests, report.listing_pages_walked
    ));
    out.push_str(&format!(
        "  Item requests: {} dispatched, {} retries\n",
        report.items_dispatched, report.item_retries
    ));
    out.push_str(&format!(
        "  Shape mismatches: {}\n",
        report.shape_mismatches.len()
    ));
    out.push_str(&format!("  Dead letters: {}\n", report.dead_letters.len()));

    for letter in &report.dead_letters {
        out.push_str(&format!(
            "    - [{}] {} after {} attempts: {}\n",
            letter.kind, letter.url, letter.attempts, letter.error
        ));
    }

    out
}

/// Prints the run summary to stdout
pub fn print_summary(report: &CrawlReport) {
    print!("{}", format_summary(report));
}
