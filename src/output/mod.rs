//! Output module for crawl results
//!
//! This module handles:
//! - Printing the resolved articles and a run summary to stdout
//! - Exporting the run as a JSON report

mod json;
pub mod stats;

pub use json::{build_json_report, write_json_report, JsonArticle, JsonReport};
pub use stats::{format_summary, print_articles, print_summary};
