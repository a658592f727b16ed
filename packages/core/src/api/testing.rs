//! Scripted transport for unit tests

use super::{AdminTransport, ApiError};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

type Reply = Result<String, ApiError>;

#[derive(Default)]
struct Inner {
    calls: Vec<Call>,
    replies: HashMap<(Method, String), VecDeque<Reply>>,
    gate: Option<Arc<Semaphore>>,
}

/// Records every call and answers from per-endpoint queues.
///
/// The last queued reply for an endpoint repeats; unscripted endpoints
/// answer with an opaque success body.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    inner: Arc<Mutex<Inner>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, method: Method, path: &str, reply: Reply) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .replies
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }

    /// Hold every later request until the returned gate gets a permit
    pub fn gate(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        self.inner.lock().unwrap().gate = Some(Arc::clone(&gate));
        gate
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|call| call.method == method && call.path == path)
            .count()
    }

    async fn answer(&self, method: Method, path: &str, body: Option<Value>) -> Reply {
        let gate = self.inner.lock().unwrap().gate.clone();
        if let Some(gate) = gate {
            let _permit = gate.acquire().await;
        }

        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call {
            method,
            path: path.to_string(),
            body,
        });
        let Some(queue) = inner.replies.get_mut(&(method, path.to_string())) else {
            return Ok(r#"{"success":true}"#.to_string());
        };
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().unwrap()
        }
    }
}

impl AdminTransport for ScriptedTransport {
    async fn get(&self, path: &str) -> Result<String, ApiError> {
        self.answer(Method::Get, path, None).await
    }

    async fn post(&self, path: &str, body: Option<Value>) -> Result<String, ApiError> {
        self.answer(Method::Post, path, body).await
    }
}
