//! Shared test transport.
//!
//! [`Recorder`] answers requests from a table of canned replies and keeps
//! every request it receives, so tests can assert exactly how much I/O the
//! engine performed.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use deezer::{Client, HttpError, HttpRequest, HttpResponse, Transport};
use serde_json::Value;

/// A canned reply.
#[derive(Clone, Debug)]
pub enum Reply {
    /// A 2xx answer with this body.
    Body(Value),
    /// A failed answer with this status.
    Status(u16),
}

/// An in-memory transport that records requests.
///
/// Replies are keyed by `path` or `path?key=value&...` (query in request
/// order); the full key wins. Several replies for one key are consumed in
/// order and the last one repeats.
#[derive(Debug, Default)]
pub struct Recorder {
    routes: Mutex<HashMap<String, VecDeque<Reply>>>,
    requests: Mutex<Vec<HttpRequest>>,
    delay: Option<Duration>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every answer, making each request a real suspension point.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn route(self, key: &str, body: Value) -> Self {
        self.reply(key, Reply::Body(body))
    }

    pub fn fail(self, key: &str, status: u16) -> Self {
        self.reply(key, Reply::Status(status))
    }

    fn reply(self, key: &str, reply: Reply) -> Self {
        self.routes
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The keys of every request received so far.
    pub fn keys(&self) -> Vec<String> {
        self.requests().iter().map(key_of).collect()
    }

    pub fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn answer(&self, request: &HttpRequest) -> Reply {
        let mut routes = self.routes.lock().unwrap();
        let full = key_of(request);
        let key = if routes.contains_key(&full) {
            full
        } else {
            request.path.clone()
        };
        match routes.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().cloned().unwrap_or(Reply::Status(404)),
            None => Reply::Status(404),
        }
    }
}

#[async_trait]
impl Transport for Recorder {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.answer(&request) {
            Reply::Body(body) => Ok(HttpResponse::ok(body)),
            Reply::Status(code) => Err(HttpError::from_status(code, request.path, "canned failure")),
        }
    }
}

/// Builds the lookup key of a request.
pub fn key_of(request: &HttpRequest) -> String {
    if request.query.is_empty() {
        return request.path.clone();
    }
    let query: Vec<String> = request
        .query
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect();
    format!("{}?{}", request.path, query.join("&"))
}

/// Creates a client over a recorder.
pub fn client(recorder: Recorder) -> (Arc<Recorder>, Client) {
    let recorder = Arc::new(recorder);
    let client = Client::from_transport(recorder.clone());
    (recorder, client)
}

/// Builds `count` tagged track records numbered from `first`.
pub fn tracks(first: i64, count: i64) -> Value {
    (first..first + count)
        .map(|id| serde_json::json!({"id": id, "type": "track", "title": format!("T{id}")}))
        .collect()
}
