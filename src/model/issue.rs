use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{node_names, nodes, nullable, NamedRef, Resource, StateRef, TeamRef, UserRef};

macro_rules! issue_fields {
    () => {
        "id identifier title description priority priorityLabel url
        createdAt updatedAt completedAt
        state { name type }
        assignee { name email }
        project { name }
        team { name key }
        cycle { name number }
        labels { nodes { name } }"
    };
}

const LIST_QUERY: &str = concat!(
    "query Issues($filter: IssueFilter, $first: Int, $after: String, $includeArchived: Boolean, $orderBy: PaginationOrderBy) {
  issues(filter: $filter, first: $first, after: $after, includeArchived: $includeArchived, orderBy: $orderBy) {
    nodes { ",
    issue_fields!(),
    " }
    pageInfo { hasNextPage endCursor }
  }
}"
);

const GET_QUERY: &str = concat!(
    "query Issue($id: String!) {
  issue(id: $id) { ",
    issue_fields!(),
    "
    startedAt canceledAt dueDate estimate
    creator { name email }
    parent { identifier title }
    comments { nodes { body createdAt user { name } } }
    attachments { nodes { title url } }
    subscribers { nodes { name } }
  }
}"
);

pub const CREATE_MUTATION: &str = concat!(
    "mutation IssueCreate($input: IssueCreateInput!) {
  issueCreate(input: $input) {
    success
    issue { ",
    issue_fields!(),
    " }
  }
}"
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct Issue {
    pub id: String,
    pub identifier: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub priority: u8,
    #[serde(default, deserialize_with = "nullable")]
    pub priority_label: String,
    #[serde(default, deserialize_with = "nullable")]
    pub url: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub canceled_at: Option<DateTime<Utc>>,
    pub due_date: Option<NaiveDate>,
    pub estimate: Option<f64>,
    #[serde(default, deserialize_with = "nullable")]
    pub state: StateRef,
    pub assignee: Option<UserRef>,
    pub creator: Option<UserRef>,
    pub project: Option<NamedRef>,
    pub team: Option<TeamRef>,
    pub cycle: Option<CycleRef>,
    pub parent: Option<IssueRef>,
    #[serde(default, deserialize_with = "node_names")]
    pub labels: Vec<String>,
    #[serde(default, deserialize_with = "nodes")]
    pub comments: Vec<Comment>,
    #[serde(default, deserialize_with = "nodes")]
    pub attachments: Vec<Attachment>,
    #[serde(default, deserialize_with = "node_names")]
    pub subscribers: Vec<String>,
}

impl Issue {
    /// The API's label, falling back to the numeric scale when it is missing.
    pub fn priority_name(&self) -> &str {
        if !self.priority_label.is_empty() {
            return &self.priority_label;
        }
        priority_name(self.priority)
    }

    pub fn assignee_name(&self) -> &str {
        self.assignee
            .as_ref()
            .map(|a| a.name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or("Unassigned")
    }
}

impl Resource for Issue {
    const NOUN: &'static str = "issue";
    const PLURAL: &'static str = "issues";
    const LIST_KEY: &'static str = "issues";
    const GET_KEY: &'static str = "issue";
    const LIST_QUERY: &'static str = LIST_QUERY;
    const GET_QUERY: &'static str = GET_QUERY;
}

pub fn priority_name(priority: u8) -> &'static str {
    match priority {
        1 => "Urgent",
        2 => "High",
        3 => "Medium",
        4 => "Low",
        _ => "No priority",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CycleRef {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub number: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueRef {
    #[serde(default, deserialize_with = "nullable")]
    pub identifier: String,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct Comment {
    #[serde(default, deserialize_with = "nullable")]
    pub body: String,
    pub created_at: Option<DateTime<Utc>>,
    pub user: Option<NamedRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub url: String,
}
