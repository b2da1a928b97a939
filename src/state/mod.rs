//! State module for crawl results
//!
//! # Components
//!
//! - `ArticleMetadata`: fields scraped from a listing page plus the detail response
//! - `DeadLetter`: a request given up on after its retry allowance ran out

mod article;
mod dead_letter;

// Re-export main types
pub use article::ArticleMetadata;
pub use dead_letter::{DeadLetter, RequestKind};
