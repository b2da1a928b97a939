//! Request handles and the HTTP collaborator
//!
//! - `Client` / `PendingFetch`: non-blocking dispatch, awaitable resolution, retry
//! - `FetchSet`: insertion-ordered collection consumed while it grows
//! - `Response`: settled response with status classification

mod client;
mod future_set;
mod response;

#[cfg(test)]
pub(crate) mod scripted;

pub use client::{build_http_client, Client, HttpTransport, PendingFetch, RequestId, Transport};
pub use future_set::FetchSet;
pub use response::{parse_retry_after, Response, MAX_RETRY_AFTER};
