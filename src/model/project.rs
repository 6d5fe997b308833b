use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{nodes, nullable, Resource, TeamRef, UserRef};

const LIST_QUERY: &str = "query Projects($filter: ProjectFilter, $first: Int, $after: String, $includeArchived: Boolean, $orderBy: PaginationOrderBy) {
  projects(filter: $filter, first: $first, after: $after, includeArchived: $includeArchived, orderBy: $orderBy) {
    nodes {
      id name description state progress startDate targetDate url
      createdAt updatedAt archivedAt color icon
      lead { name email }
      teams { nodes { name key } }
    }
    pageInfo { hasNextPage endCursor }
  }
}";

const GET_QUERY: &str = "query Project($id: String!) {
  project(id: $id) {
    id name description state progress startDate targetDate completedAt canceledAt url
    createdAt updatedAt archivedAt color icon slugId
    lead { name email }
    creator { name email }
    teams { nodes { name key } }
    members { nodes { name email } }
  }
}";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub state: String,
    #[serde(default, deserialize_with = "nullable")]
    pub progress: f64,
    pub start_date: Option<NaiveDate>,
    pub target_date: Option<NaiveDate>,
    pub completed_at: Option<DateTime<Utc>>,
    pub canceled_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "nullable")]
    pub url: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub archived_at: Option<DateTime<Utc>>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub slug_id: Option<String>,
    pub lead: Option<UserRef>,
    pub creator: Option<UserRef>,
    #[serde(default, deserialize_with = "nodes")]
    pub teams: Vec<TeamRef>,
    #[serde(default, deserialize_with = "nodes")]
    pub members: Vec<UserRef>,
}

impl Project {
    pub fn lead_name(&self) -> &str {
        self.lead
            .as_ref()
            .map(|l| l.name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or("No lead")
    }

    /// Key of the first owning team; projects can span several.
    pub fn team_key(&self) -> &str {
        self.teams.first().map(|t| t.key.as_str()).unwrap_or_default()
    }
}

impl Resource for Project {
    const NOUN: &'static str = "project";
    const PLURAL: &'static str = "projects";
    const LIST_KEY: &'static str = "projects";
    const GET_KEY: &'static str = "project";
    const LIST_QUERY: &'static str = LIST_QUERY;
    const GET_QUERY: &'static str = GET_QUERY;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::validate;
    use serde_json::json;

    #[test]
    fn validates_with_teams_and_dates() {
        let project: Project = validate(json!({
            "id": "p1",
            "name": "Auth revamp",
            "state": "started",
            "progress": 0.42,
            "targetDate": "2024-06-30",
            "lead": { "name": "Grace", "email": "grace@example.com" },
            "teams": { "nodes": [{ "name": "Engineering", "key": "ENG" }, { "name": "Design", "key": "DES" }] }
        }))
        .unwrap();
        assert_eq!(project.team_key(), "ENG");
        assert_eq!(project.lead_name(), "Grace");
        assert_eq!(project.target_date.unwrap().to_string(), "2024-06-30");
        assert!(project.members.is_empty());
    }

    #[test]
    fn null_progress_and_state_default() {
        let project: Project =
            validate(json!({ "id": "p1", "name": "Idle", "state": null, "progress": null })).unwrap();
        assert_eq!(project.state, "");
        assert_eq!(project.progress, 0.0);
        assert_eq!(project.lead_name(), "No lead");
        assert_eq!(project.team_key(), "");
    }

    #[test]
    fn name_is_required() {
        assert!(validate::<Project>(json!({ "id": "p1" })).is_err());
    }
}
