//! In-memory transport for unit tests

use crate::fetch::{Response, Transport};
use crate::FetchError;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use url::Url;

/// Replays queued outcomes per URL and records every request
///
/// The last outcome queued for a URL repeats forever. URLs with nothing
/// queued fail with a transport error.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<HashMap<String, VecDeque<Result<Response, FetchError>>>>,
    log: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, url: &Url, outcome: Result<Response, FetchError>) {
        self.script
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(outcome);
    }

    /// Queues a 200 response with the given body
    pub fn ok(&self, url: &Url, body: &str) {
        self.push(url, Ok(Response::new(url.clone(), 200, body)));
    }

    /// Every requested URL, in dispatch order
    pub fn requests(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn request_count(&self, url: &Url) -> usize {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|u| *u == url.as_str())
            .count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, url: &Url) -> Result<Response, FetchError> {
        self.log.lock().unwrap().push(url.to_string());

        let mut script = self.script.lock().unwrap();
        match script.get_mut(url.as_str()) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) if queue.len() == 1 => queue[0].clone(),
            _ => Err(FetchError::Transport {
                url: url.to_string(),
                message: "no scripted response".to_string(),
            }),
        }
    }
}
