//! Canned-response transport for tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{Transport, Variables};
use crate::error::{ClientError, Result};

/// Replays queued results in order and records every call it receives.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<Value>>>,
    calls: Arc<Mutex<Vec<(String, Variables)>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, data: Value) -> Self {
        self.responses.lock().unwrap().push_back(Ok(data));
        self
    }

    pub fn fail(self, err: ClientError) -> Self {
        self.responses.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn calls(&self) -> Vec<(String, Variables)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> (String, Variables) {
        self.calls()
            .pop()
            .expect("transport was never called")
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, query: &str, variables: Variables) -> Result<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), variables));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::MalformedResponse("no canned response".into())))
    }
}

/// A list-shaped issue node numbered `n` in team ENG.
pub fn issue_node(n: u32) -> Value {
    json!({
        "id": format!("00000000-0000-0000-0000-{n:012}"),
        "identifier": format!("ENG-{n}"),
        "title": format!("Issue number {n}"),
        "description": null,
        "priority": n % 5,
        "priorityLabel": null,
        "url": format!("https://linear.app/acme/issue/ENG-{n}"),
        "createdAt": "2024-03-01T10:00:00.000Z",
        "updatedAt": "2024-03-09T17:45:00.000Z",
        "completedAt": null,
        "state": { "name": "Todo", "type": "unstarted" },
        "assignee": null,
        "project": null,
        "team": { "name": "Engineering", "key": "ENG" },
        "labels": { "nodes": [] }
    })
}

/// `data` for an issues listing.
pub fn issues_data(nodes: Vec<Value>, has_next_page: bool) -> Value {
    let end_cursor = nodes.len();
    json!({
        "issues": {
            "nodes": nodes,
            "pageInfo": {
                "hasNextPage": has_next_page,
                "endCursor": format!("cursor-{end_cursor}")
            }
        }
    })
}
