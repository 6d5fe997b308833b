use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{nullable, NamedRef, Resource, TeamRef};

macro_rules! label_fields {
    () => {
        "id name color description createdAt updatedAt
        team { name key }
        parent { name }"
    };
}

const LIST_QUERY: &str = concat!(
    "query Labels($filter: IssueLabelFilter, $first: Int, $after: String, $includeArchived: Boolean, $orderBy: PaginationOrderBy) {
  issueLabels(filter: $filter, first: $first, after: $after, includeArchived: $includeArchived, orderBy: $orderBy) {
    nodes { ",
    label_fields!(),
    " }
    pageInfo { hasNextPage endCursor }
  }
}"
);

const GET_QUERY: &str = concat!(
    "query Label($id: String!) {
  issueLabel(id: $id) { ",
    label_fields!(),
    " }
}"
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct Label {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub color: String,
    pub description: Option<String>,
    pub team: Option<TeamRef>,
    pub parent: Option<NamedRef>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Label {
    /// Owning team key; workspace labels have no team.
    pub fn scope(&self) -> &str {
        self.team
            .as_ref()
            .map(|t| t.key.as_str())
            .unwrap_or("Workspace")
    }
}

impl Resource for Label {
    const NOUN: &'static str = "label";
    const PLURAL: &'static str = "labels";
    const LIST_KEY: &'static str = "issueLabels";
    const GET_KEY: &'static str = "issueLabel";
    const LIST_QUERY: &'static str = LIST_QUERY;
    const GET_QUERY: &'static str = GET_QUERY;
}
