//! Transport and resource accessors for Linear's GraphQL endpoint.

pub mod accessor;
pub mod client;
pub mod filters;

#[cfg(test)]
pub mod mock;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::Result;

pub use accessor::{create_issue, get, list, search_issues, viewer, NewIssue};
pub use client::LinearClient;
pub use filters::{CycleFilter, CycleTiming, IssueFilter, LabelFilter, ListOptions, OrderBy, ProjectFilter, UserFilter};

pub type Variables = Map<String, Value>;

/// Executes one GraphQL document against the remote service.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Returns the envelope's `data` object, or an error when the call fails or
    /// the envelope carries `errors`.
    async fn execute(&self, query: &str, variables: Variables) -> Result<Value>;
}
