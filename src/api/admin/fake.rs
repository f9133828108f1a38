//! In-process transport used by unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::sync::Notify;

use super::client::Transport;
use super::models::{ApiError, ApiRequest};

type Hook = Box<dyn Fn(&ApiRequest) + Send + Sync>;

/// Replays canned responses keyed by `"METHOD /path"` and records every request.
///
/// A queued response is consumed once; the last one for a key keeps answering.
#[derive(Default)]
pub struct FakeTransport {
    responses: Mutex<HashMap<String, VecDeque<Result<Value, ApiError>>>>,
    requests: Mutex<Vec<ApiRequest>>,
    hook: Mutex<Option<Hook>>,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, key: &str, response: Result<Value, ApiError>) {
        self.responses
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_default()
            .push_back(response);
    }

    /// Run `hook` after a request is recorded and before it is answered
    pub fn on_request(&self, hook: impl Fn(&ApiRequest) + Send + Sync + 'static) {
        *self.hook.lock().unwrap() = Some(Box::new(hook));
    }

    /// Hold every request until the returned notifier fires
    pub fn gate(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(Arc::clone(&notify));
        notify
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, key: &str) -> usize {
        self.requests().iter().filter(|r| r.label() == key).count()
    }
}

impl Transport for FakeTransport {
    async fn execute(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let key = request.label();
        self.requests.lock().unwrap().push(request.clone());

        if let Some(hook) = self.hook.lock().unwrap().as_ref() {
            hook(&request);
        }

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let mut responses = self.responses.lock().unwrap();
        match responses.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue
                .front()
                .cloned()
                .unwrap_or_else(|| Err(ApiError::NotFound(key.clone()))),
            None => Err(ApiError::NotFound(key)),
        }
    }
}
