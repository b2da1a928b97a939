//! Insertion-ordered collection of in-flight requests
//!
//! A `FetchSet` is consumed front to back while new handles are appended at
//! the back, so a retry pushed during the walk is visited after everything
//! that was already queued.

use crate::fetch::PendingFetch;
use std::collections::VecDeque;

/// Ordered set of pending fetches that can grow while it is being consumed
#[derive(Debug, Default)]
pub struct FetchSet {
    queue: VecDeque<PendingFetch>,
    added: usize,
}

impl FetchSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a handle; it is visible to the ongoing walk
    pub fn add(&mut self, fetch: PendingFetch) {
        self.added += 1;
        self.queue.push_back(fetch);
    }

    /// Total number of handles ever added (pending and consumed)
    pub fn len(&self) -> usize {
        self.added
    }

    pub fn is_empty(&self) -> bool {
        self.added == 0
    }

    /// Handles added but not yet handed out
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    /// Takes the oldest unconsumed handle, in addition order
    pub fn next_pending(&mut self) -> Option<PendingFetch> {
        self.queue.pop_front()
    }
}
