//! Typed records for the remote resources, validated from GraphQL `data` payloads.
//!
//! Every record deserializes from Linear's camelCase field names and serializes
//! under its own snake_case names. Fields the API may omit or null out fall back
//! to their defaults; only identifying fields are required.

pub mod cycle;
pub mod issue;
pub mod label;
pub mod project;
pub mod team;
pub mod user;

pub use cycle::Cycle;
pub use issue::Issue;
pub use label::Label;
pub use project::Project;
pub use team::Team;
pub use user::User;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{ClientError, Result};

/// Per-resource descriptor driving the generic list/get pipeline.
pub trait Resource: DeserializeOwned + Serialize {
    /// Singular noun for messages ("issue").
    const NOUN: &'static str;
    /// Plural noun for headings and JSON keys ("issues").
    const PLURAL: &'static str;
    /// Connection field under `data` answered by [`Resource::LIST_QUERY`].
    const LIST_KEY: &'static str;
    /// Object field under `data` answered by [`Resource::GET_QUERY`].
    const GET_KEY: &'static str;
    const LIST_QUERY: &'static str;
    const GET_QUERY: &'static str;
}

/// Validate one JSON object into a record.
///
/// The serde message names the first offending field, e.g. ``missing field `title` ``.
pub fn validate<R: Resource>(value: Value) -> Result<R> {
    serde_json::from_value(value).map_err(|e| ClientError::Validation {
        resource: R::NOUN,
        message: e.to_string(),
    })
}

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub nodes: Vec<T>,
    pub page_info: PageInfo,
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct PageInfo {
    #[serde(default, deserialize_with = "nullable")]
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

#[derive(Deserialize)]
struct Connection<T> {
    #[serde(default = "Vec::new")]
    nodes: Vec<T>,
}

/// Treat an explicit `null` like an absent field.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Flatten a `{ nodes: [...] }` connection into its nodes.
pub(crate) fn nodes<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Connection<T>>::deserialize(deserializer)?
        .map(|c| c.nodes)
        .unwrap_or_default())
}

/// Flatten a connection of named nodes into just the names.
pub(crate) fn node_names<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let refs: Vec<NamedRef> = nodes(deserializer)?;
    Ok(refs.into_iter().map(|r| r.name).collect())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamRef {
    #[serde(default, deserialize_with = "nullable")]
    pub key: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
}

impl TeamRef {
    /// `Engineering (ENG)`
    pub fn display(&self) -> String {
        format!("{} ({})", self.name, self.key)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRef {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub email: String,
}

impl UserRef {
    /// `Ada Lovelace (ada@example.com)`, or just the name when there is no email.
    pub fn display(&self) -> String {
        if self.email.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.email)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateRef {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "nullable")]
    pub kind: String,
}
