//! Translation of caller filters into GraphQL variables.
//!
//! Unset filters never appear in the outgoing variables; an empty filter object
//! is omitted altogether.

use serde_json::{json, Map, Value};

use super::Variables;

/// Largest `first` Linear accepts on a connection.
pub const MAX_PAGE_SIZE: usize = 250;

pub trait Filter {
    /// The `filter` variable, or `None` when no criteria are set.
    fn to_filter(&self) -> Option<Value>;
}

/// Teams take no filter criteria.
impl Filter for () {
    fn to_filter(&self) -> Option<Value> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBy {
    CreatedAt,
    UpdatedAt,
}

impl OrderBy {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderBy::CreatedAt => "createdAt",
            OrderBy::UpdatedAt => "updatedAt",
        }
    }
}

/// Paging and ordering shared by every list operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ListOptions {
    pub limit: usize,
    pub after: Option<String>,
    pub include_archived: bool,
    pub order_by: Option<OrderBy>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            limit: 50,
            after: None,
            include_archived: false,
            order_by: None,
        }
    }
}

impl ListOptions {
    pub fn variables(&self, filter: Option<Value>) -> Variables {
        let mut vars = Map::new();
        vars.insert("first".into(), json!(self.limit.clamp(1, MAX_PAGE_SIZE)));
        if let Some(after) = &self.after {
            vars.insert("after".into(), json!(after));
        }
        if self.include_archived {
            vars.insert("includeArchived".into(), json!(true));
        }
        if let Some(order_by) = self.order_by {
            vars.insert("orderBy".into(), json!(order_by.as_str()));
        }
        if let Some(filter) = filter {
            vars.insert("filter".into(), filter);
        }
        vars
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueFilter {
    /// Assignee email, or `me` for the authenticated user.
    pub assignee: Option<String>,
    /// Project UUID or (part of) its name.
    pub project: Option<String>,
    pub status: Option<String>,
    /// Team key or (part of) its name.
    pub team: Option<String>,
    pub priority: Option<u8>,
    pub labels: Vec<String>,
    /// Case-insensitive title search term.
    pub title: Option<String>,
}

impl Filter for IssueFilter {
    fn to_filter(&self) -> Option<Value> {
        let mut f = Map::new();
        if let Some(assignee) = &self.assignee {
            let clause = if assignee.eq_ignore_ascii_case("me") {
                json!({ "isMe": { "eq": true } })
            } else {
                json!({ "email": { "eq": assignee } })
            };
            f.insert("assignee".into(), clause);
        }
        if let Some(project) = &self.project {
            let clause = if looks_like_uuid(project) {
                json!({ "id": { "eq": project } })
            } else {
                json!({ "name": { "containsIgnoreCase": project } })
            };
            f.insert("project".into(), clause);
        }
        if let Some(status) = &self.status {
            f.insert("state".into(), json!({ "name": { "eqIgnoreCase": status } }));
        }
        if let Some(team) = &self.team {
            f.insert("team".into(), team_clause(team));
        }
        if let Some(priority) = self.priority {
            f.insert("priority".into(), json!({ "eq": priority }));
        }
        if !self.labels.is_empty() {
            f.insert("labels".into(), json!({ "name": { "in": self.labels } }));
        }
        if let Some(title) = &self.title {
            f.insert("title".into(), json!({ "containsIgnoreCase": title }));
        }
        non_empty(f)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectFilter {
    pub state: Option<String>,
    pub team: Option<String>,
}

impl Filter for ProjectFilter {
    fn to_filter(&self) -> Option<Value> {
        let mut f = Map::new();
        if let Some(state) = &self.state {
            f.insert("state".into(), json!({ "eqIgnoreCase": state }));
        }
        if let Some(team) = &self.team {
            f.insert(
                "or".into(),
                json!([
                    { "teams": { "some": { "key": { "eqIgnoreCase": team } } } },
                    { "teams": { "some": { "name": { "containsIgnoreCase": team } } } }
                ]),
            );
        }
        non_empty(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleTiming {
    Active,
    Future,
    Past,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleFilter {
    pub team: Option<String>,
    pub timing: Option<CycleTiming>,
}

impl Filter for CycleFilter {
    fn to_filter(&self) -> Option<Value> {
        let mut f = Map::new();
        if let Some(team) = &self.team {
            f.insert("team".into(), team_clause(team));
        }
        if let Some(timing) = self.timing {
            let field = match timing {
                CycleTiming::Active => "isActive",
                CycleTiming::Future => "isFuture",
                CycleTiming::Past => "isPast",
            };
            f.insert(field.into(), json!({ "eq": true }));
        }
        non_empty(f)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilter {
    pub active_only: bool,
}

impl Filter for UserFilter {
    fn to_filter(&self) -> Option<Value> {
        self.active_only
            .then(|| json!({ "active": { "eq": true } }))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelFilter {
    pub team: Option<String>,
    pub name: Option<String>,
}

impl Filter for LabelFilter {
    fn to_filter(&self) -> Option<Value> {
        let mut f = Map::new();
        if let Some(team) = &self.team {
            f.insert("team".into(), team_clause(team));
        }
        if let Some(name) = &self.name {
            f.insert("name".into(), json!({ "containsIgnoreCase": name }));
        }
        non_empty(f)
    }
}

fn team_clause(team: &str) -> Value {
    json!({
        "or": [
            { "key": { "eqIgnoreCase": team } },
            { "name": { "containsIgnoreCase": team } }
        ]
    })
}

fn non_empty(filter: Map<String, Value>) -> Option<Value> {
    (!filter.is_empty()).then_some(Value::Object(filter))
}

/// 8-4-4-4-12 hex groups.
fn looks_like_uuid(s: &str) -> bool {
    let groups: Vec<&str> = s.split('-').collect();
    groups.len() == 5
        && groups
            .iter()
            .zip([8, 4, 4, 4, 12])
            .all(|(g, len)| g.len() == len && g.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(vars: &Variables) -> Vec<&str> {
        let mut keys: Vec<&str> = vars.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    #[test]
    fn defaults_send_only_first() {
        let vars = ListOptions::default().variables(None);
        assert_eq!(keys(&vars), vec!["first"]);
        assert_eq!(vars["first"], 50);
    }

    #[test]
    fn limit_is_capped_at_page_max() {
        let opts = ListOptions {
            limit: 1000,
            ..ListOptions::default()
        };
        assert_eq!(opts.variables(None)["first"], 250);
    }

    #[test]
    fn every_option_set_appears() {
        let opts = ListOptions {
            limit: 10,
            after: Some("cursor-1".into()),
            include_archived: true,
            order_by: Some(OrderBy::UpdatedAt),
        };
        let vars = opts.variables(Some(json!({ "x": 1 })));
        assert_eq!(
            keys(&vars),
            vec!["after", "filter", "first", "includeArchived", "orderBy"]
        );
        assert_eq!(vars["orderBy"], "updatedAt");
    }

    #[test]
    fn empty_issue_filter_is_omitted() {
        assert_eq!(IssueFilter::default().to_filter(), None);
    }

    #[test]
    fn issue_filter_translates_each_criterion() {
        let filter = IssueFilter {
            assignee: Some("ada@example.com".into()),
            project: Some("Auth".into()),
            status: Some("in progress".into()),
            team: Some("ENG".into()),
            priority: Some(1),
            labels: vec!["bug".into(), "urgent".into()],
            title: None,
        };
        let f = filter.to_filter().unwrap();
        assert_eq!(f["assignee"], json!({ "email": { "eq": "ada@example.com" } }));
        assert_eq!(f["project"], json!({ "name": { "containsIgnoreCase": "Auth" } }));
        assert_eq!(f["state"], json!({ "name": { "eqIgnoreCase": "in progress" } }));
        assert_eq!(f["team"]["or"][0], json!({ "key": { "eqIgnoreCase": "ENG" } }));
        assert_eq!(f["priority"], json!({ "eq": 1 }));
        assert_eq!(f["labels"], json!({ "name": { "in": ["bug", "urgent"] } }));
        assert!(f.get("title").is_none());
    }

    #[test]
    fn priority_zero_is_still_a_filter() {
        let filter = IssueFilter {
            priority: Some(0),
            ..IssueFilter::default()
        };
        assert_eq!(filter.to_filter().unwrap(), json!({ "priority": { "eq": 0 } }));
    }

    #[test]
    fn assignee_me_uses_is_me() {
        let filter = IssueFilter {
            assignee: Some("me".into()),
            ..IssueFilter::default()
        };
        assert_eq!(
            filter.to_filter().unwrap()["assignee"],
            json!({ "isMe": { "eq": true } })
        );
    }

    #[test]
    fn project_uuid_matches_by_id() {
        let id = "9cfb482a-81e3-4154-b5b9-2c805e70a02d";
        let filter = IssueFilter {
            project: Some(id.into()),
            ..IssueFilter::default()
        };
        assert_eq!(filter.to_filter().unwrap()["project"], json!({ "id": { "eq": id } }));
    }

    #[test]
    fn uuid_detection() {
        assert!(looks_like_uuid("9cfb482a-81e3-4154-b5b9-2c805e70a02d"));
        assert!(!looks_like_uuid("my-project-name-with-dashes-ok"));
        assert!(!looks_like_uuid("ENG-123"));
    }

    #[test]
    fn project_filter_team_uses_or() {
        let f = ProjectFilter {
            state: Some("started".into()),
            team: Some("ENG".into()),
        }
        .to_filter()
        .unwrap();
        assert_eq!(f["state"], json!({ "eqIgnoreCase": "started" }));
        assert_eq!(f["or"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn cycle_timing_flag() {
        let f = CycleFilter {
            team: None,
            timing: Some(CycleTiming::Future),
        }
        .to_filter()
        .unwrap();
        assert_eq!(f, json!({ "isFuture": { "eq": true } }));
    }

    #[test]
    fn user_and_label_filters() {
        assert_eq!(UserFilter::default().to_filter(), None);
        assert_eq!(
            UserFilter { active_only: true }.to_filter().unwrap(),
            json!({ "active": { "eq": true } })
        );
        let f = LabelFilter {
            team: Some("WEB".into()),
            name: Some("front".into()),
        }
        .to_filter()
        .unwrap();
        assert_eq!(f["name"], json!({ "containsIgnoreCase": "front" }));
        assert_eq!(f["team"], team_clause("WEB"));
        assert_eq!(().to_filter(), None);
    }

    #[test]
    fn cycle_and_label_teams_match_key_or_name() {
        let cycles = CycleFilter {
            team: Some("Engineering".into()),
            timing: None,
        }
        .to_filter()
        .unwrap();
        let labels = LabelFilter {
            team: Some("Engineering".into()),
            name: None,
        }
        .to_filter()
        .unwrap();
        for f in [cycles, labels] {
            assert_eq!(f["team"]["or"][0], json!({ "key": { "eqIgnoreCase": "Engineering" } }));
            assert_eq!(
                f["team"]["or"][1],
                json!({ "name": { "containsIgnoreCase": "Engineering" } })
            );
        }
    }
}
