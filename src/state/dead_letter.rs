use serde::Serialize;
use std::fmt;

/// Which request stream a dead letter came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    /// A listing (index) page
    Listing,

    /// An item detail page
    Item,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Listing => write!(f, "listing"),
            Self::Item => write!(f, "item"),
        }
    }
}

/// A request the crawler stopped retrying
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeadLetter {
    pub kind: RequestKind,

    /// URL that kept failing
    pub url: String,

    /// Item title, when the request belonged to an article
    pub title: Option<String>,

    /// Number of times the request was issued
    pub attempts: u32,

    /// Last error seen
    pub error: String,
}
