/// Article metadata captured from a listing page
use crate::fetch::Response;

/// One item discovered on a listing page
///
/// Created when the item link is found and completed exactly once, when the
/// detail fetch for it resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleMetadata {
    /// Link text of the item
    pub title: String,

    /// Absolute URL of the detail page
    pub url: String,

    /// Submission timestamp as published by the listing
    pub when_submitted: String,

    /// Score as published by the listing
    pub score: String,

    /// Detail page response, attached when the fetch succeeds
    pub response: Option<Response>,
}

impl ArticleMetadata {
    pub fn new(title: String, url: String, when_submitted: String, score: String) -> Self {
        Self {
            title,
            url,
            when_submitted,
            score,
            response: None,
        }
    }

    /// Attaches the detail response, consuming the pending record
    pub fn resolve(mut self, response: Response) -> Self {
        self.response = Some(response);
        self
    }

    /// Returns true once the detail response is attached
    pub fn is_resolved(&self) -> bool {
        self.response.is_some()
    }
}
