use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{nullable, Resource, TeamRef};

const LIST_QUERY: &str = "query Cycles($filter: CycleFilter, $first: Int, $after: String, $includeArchived: Boolean, $orderBy: PaginationOrderBy) {
  cycles(filter: $filter, first: $first, after: $after, includeArchived: $includeArchived, orderBy: $orderBy) {
    nodes {
      id number name description startsAt endsAt completedAt progress
      isActive isFuture isPast isNext isPrevious
      createdAt updatedAt archivedAt
      team { name key }
    }
    pageInfo { hasNextPage endCursor }
  }
}";

const GET_QUERY: &str = "query Cycle($id: String!) {
  cycle(id: $id) {
    id number name description startsAt endsAt completedAt progress
    isActive isFuture isPast isNext isPrevious
    createdAt updatedAt archivedAt
    scopeHistory issueCountHistory
    team { name key }
  }
}";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct Cycle {
    pub id: String,
    pub number: u32,
    pub name: Option<String>,
    pub description: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "nullable")]
    pub progress: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub is_future: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub is_past: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub is_next: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub is_previous: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub archived_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "nullable")]
    pub team: TeamRef,
    #[serde(default, deserialize_with = "nullable")]
    pub scope_history: Vec<f64>,
    #[serde(default, deserialize_with = "nullable")]
    pub issue_count_history: Vec<f64>,
}

impl Cycle {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or("Untitled")
    }

    pub fn status(&self) -> &'static str {
        if self.is_active {
            "Active"
        } else if self.is_future {
            "Future"
        } else if self.is_past {
            "Past"
        } else {
            "Unknown"
        }
    }
}

impl Resource for Cycle {
    const NOUN: &'static str = "cycle";
    const PLURAL: &'static str = "cycles";
    const LIST_KEY: &'static str = "cycles";
    const GET_KEY: &'static str = "cycle";
    const LIST_QUERY: &'static str = LIST_QUERY;
    const GET_QUERY: &'static str = GET_QUERY;
}
