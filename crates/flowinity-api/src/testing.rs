//! Scripted in-memory [`Transport`] for tests.
//!
//! Replies are registered per operation name. A deferred reply parks the
//! next matching call until the test releases it, which is how tests control
//! the completion order of overlapping requests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::error::{ApiError, Result};
use crate::graphql::{GraphQlRequest, GraphQlResponse};
use crate::transport::Transport;

/// A request the mock has seen.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub operation: &'static str,
    pub variables: Value,
    pub token: Option<String>,
}

#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<&'static str, Value>>,
    failures: Mutex<HashMap<&'static str, String>>,
    deferred: Mutex<HashMap<&'static str, VecDeque<oneshot::Receiver<Value>>>>,
    calls: Mutex<Vec<RecordedCall>>,
    token: Mutex<Option<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every call to `operation` with `data`.
    pub fn respond(&self, operation: &'static str, data: Value) {
        self.responses.lock().unwrap().insert(operation, data);
    }

    /// Fail every call to `operation` with a transport error.
    pub fn fail(&self, operation: &'static str, message: impl Into<String>) {
        self.failures
            .lock()
            .unwrap()
            .insert(operation, message.into());
    }

    /// Park the next call to `operation` until the returned sender delivers
    /// its `data`. Deferred replies are consumed in call order.
    pub fn defer(&self, operation: &'static str) -> oneshot::Sender<Value> {
        let (tx, rx) = oneshot::channel();
        self.deferred
            .lock()
            .unwrap()
            .entry(operation)
            .or_default()
            .push_back(rx);
        tx
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, operation: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.operation == operation)
            .collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: GraphQlRequest) -> Result<GraphQlResponse> {
        let operation = request.operation_name;
        let token = self.token.lock().unwrap().clone();
        self.calls.lock().unwrap().push(RecordedCall {
            operation,
            variables: request.variables,
            token,
        });

        let parked = self
            .deferred
            .lock()
            .unwrap()
            .get_mut(operation)
            .and_then(VecDeque::pop_front);

        if let Some(rx) = parked {
            let data = rx.await.map_err(|_| {
                ApiError::Transport(format!("deferred reply to {operation} dropped"))
            })?;
            return Ok(envelope(data));
        }

        let failure = self.failures.lock().unwrap().get(operation).cloned();
        if let Some(message) = failure {
            return Err(ApiError::Transport(message));
        }

        let data = self.responses.lock().unwrap().get(operation).cloned();
        data.map(envelope)
            .ok_or_else(|| ApiError::Transport(format!("no mock reply for {operation}")))
    }

    fn set_token(&self, token: Option<String>) {
        *self.token.lock().unwrap() = token;
    }
}

fn envelope(data: Value) -> GraphQlResponse {
    GraphQlResponse {
        data: Some(data),
        errors: Vec::new(),
    }
}
