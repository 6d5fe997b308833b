use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{nodes, nullable, NamedRef, Resource, StateRef, UserRef};

const LIST_QUERY: &str = "query Teams($filter: TeamFilter, $first: Int, $after: String, $includeArchived: Boolean, $orderBy: PaginationOrderBy) {
  teams(filter: $filter, first: $first, after: $after, includeArchived: $includeArchived, orderBy: $orderBy) {
    nodes {
      id name key description color icon private timezone
      archivedAt createdAt updatedAt cyclesEnabled
    }
    pageInfo { hasNextPage endCursor }
  }
}";

const GET_QUERY: &str = "query Team($id: String!) {
  team(id: $id) {
    id name key description color icon private timezone
    archivedAt createdAt updatedAt cyclesEnabled
    organization { name }
    members { nodes { name email } }
    states { nodes { name type } }
  }
}";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct Team {
    pub id: String,
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub private: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub cycles_enabled: bool,
    pub timezone: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub archived_at: Option<DateTime<Utc>>,
    pub organization: Option<NamedRef>,
    #[serde(default, deserialize_with = "nodes")]
    pub members: Vec<UserRef>,
    #[serde(default, deserialize_with = "nodes")]
    pub states: Vec<StateRef>,
}

impl Resource for Team {
    const NOUN: &'static str = "team";
    const PLURAL: &'static str = "teams";
    const LIST_KEY: &'static str = "teams";
    const GET_KEY: &'static str = "team";
    const LIST_QUERY: &'static str = LIST_QUERY;
    const GET_QUERY: &'static str = GET_QUERY;
}
