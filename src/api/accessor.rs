//! Generic list/get pipeline driven by each record's [`Resource`] descriptor.

use serde_json::{json, Map, Value};
use tracing::debug;

use super::filters::{Filter, IssueFilter, ListOptions};
use super::{Transport, Variables};
use crate::error::{ClientError, Result};
use crate::model::issue::CREATE_MUTATION;
use crate::model::user::{VIEWER_KEY, VIEWER_QUERY};
use crate::model::{validate, Issue, Page, PageInfo, Resource, Team, User};

/// Fetch one page of `R` matching `filter`.
pub async fn list<R: Resource>(
    transport: &dyn Transport,
    filter: &dyn Filter,
    options: &ListOptions,
) -> Result<Page<R>> {
    let variables = options.variables(filter.to_filter());
    debug!(resource = R::PLURAL, "listing");
    let mut data = transport.execute(R::LIST_QUERY, variables).await?;
    let connection = match data.get_mut(R::LIST_KEY).map(Value::take) {
        Some(connection @ Value::Object(_)) => connection,
        _ => {
            return Err(ClientError::Validation {
                resource: R::NOUN,
                message: format!("missing field `{}`", R::LIST_KEY),
            })
        }
    };
    page_from(connection)
}

/// Fetch a single `R` by identifier.
pub async fn get<R: Resource>(transport: &dyn Transport, id: &str) -> Result<R> {
    debug!(resource = R::NOUN, id, "fetching");
    let data = transport
        .execute(R::GET_QUERY, single("id", json!(id)))
        .await?;
    take_record(data, R::GET_KEY, id)
}

/// The user owning the credential.
pub async fn viewer(transport: &dyn Transport) -> Result<User> {
    let data = transport.execute(VIEWER_QUERY, Variables::new()).await?;
    take_record(data, VIEWER_KEY, "me")
}

/// Issues whose title contains `term`, narrowed by the other list filters.
pub async fn search_issues(
    transport: &dyn Transport,
    term: &str,
    filter: &IssueFilter,
    options: &ListOptions,
) -> Result<Page<Issue>> {
    let filter = IssueFilter {
        title: Some(term.to_string()),
        ..filter.clone()
    };
    list(transport, &filter, options).await
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewIssue {
    /// Team key or UUID.
    pub team: String,
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<u8>,
}

/// Resolve the team, then create the issue in it.
pub async fn create_issue(transport: &dyn Transport, new: &NewIssue) -> Result<Issue> {
    let team: Team = get(transport, &new.team).await?;

    let mut input = Map::new();
    input.insert("teamId".into(), json!(team.id));
    input.insert("title".into(), json!(new.title));
    if let Some(description) = &new.description {
        input.insert("description".into(), json!(description));
    }
    if let Some(priority) = new.priority {
        input.insert("priority".into(), json!(priority));
    }

    debug!(team = %team.key, "creating issue");
    let mut data = transport
        .execute(CREATE_MUTATION, single("input", Value::Object(input)))
        .await?;
    let payload = data
        .get_mut("issueCreate")
        .map(Value::take)
        .unwrap_or_default();
    if payload.get("success").and_then(Value::as_bool) != Some(true) {
        return Err(ClientError::GraphQl("issue creation was not successful".into()));
    }
    take_record(payload, "issue", &new.title)
}

fn single(name: &str, value: Value) -> Variables {
    let mut vars = Variables::new();
    vars.insert(name.into(), value);
    vars
}

/// Validate `data[key]`; a null or absent record means the id did not resolve.
fn take_record<R: Resource>(mut data: Value, key: &str, id: &str) -> Result<R> {
    match data.get_mut(key).map(Value::take) {
        None | Some(Value::Null) => Err(ClientError::NotFound {
            resource: R::NOUN,
            id: id.to_string(),
        }),
        Some(record) => validate(record),
    }
}

fn page_from<R: Resource>(mut connection: Value) -> Result<Page<R>> {
    let invalid = |message: String| ClientError::Validation {
        resource: R::NOUN,
        message,
    };

    let nodes = match connection.get_mut("nodes").map(Value::take) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(invalid("`nodes` is not a list".into())),
    };
    let nodes = nodes
        .into_iter()
        .enumerate()
        .map(|(i, node)| {
            validate::<R>(node).map_err(|e| match e {
                ClientError::Validation { message, .. } => invalid(format!("item {i}: {message}")),
                other => other,
            })
        })
        .collect::<Result<Vec<R>>>()?;

    let page_info = match connection.get_mut("pageInfo").map(Value::take) {
        None | Some(Value::Null) => PageInfo::default(),
        Some(info) => serde_json::from_value(info).map_err(|e| invalid(format!("pageInfo: {e}")))?,
    };

    Ok(Page { nodes, page_info })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::filters::{CycleFilter, CycleTiming, ProjectFilter};
    use crate::api::mock::{issue_node, issues_data, MockTransport};
    use crate::model::{Cycle, Label, Project};

    #[tokio::test]
    async fn list_sends_only_set_filters() {
        let transport = MockTransport::new().respond(issues_data(vec![issue_node(1)], false));
        let filter = IssueFilter {
            team: Some("ENG".into()),
            ..IssueFilter::default()
        };
        let options = ListOptions {
            limit: 3,
            ..ListOptions::default()
        };
        let page: Page<Issue> = list(&transport, &filter, &options).await.unwrap();
        assert_eq!(page.len(), 1);

        let (query, vars) = transport.last_call();
        assert!(query.contains("issues("));
        let mut keys: Vec<&String> = vars.keys().collect();
        keys.sort();
        assert_eq!(keys, vec!["filter", "first"]);
        assert_eq!(vars["first"], 3);
        let filter = vars["filter"].as_object().unwrap();
        assert_eq!(filter.keys().collect::<Vec<_>>(), vec!["team"]);
    }

    #[tokio::test]
    async fn list_without_filters_omits_filter_variable() {
        let transport = MockTransport::new().respond(json!({
            "cycles": { "nodes": [], "pageInfo": { "hasNextPage": false, "endCursor": null } }
        }));
        let page: Page<Cycle> = list(&transport, &CycleFilter::default(), &ListOptions::default())
            .await
            .unwrap();
        assert!(page.is_empty());
        let (_, vars) = transport.last_call();
        assert!(!vars.contains_key("filter"));
        assert!(!vars.contains_key("after"));
        assert!(!vars.contains_key("includeArchived"));
        assert!(!vars.contains_key("orderBy"));
    }

    #[tokio::test]
    async fn list_reads_page_info() {
        let transport = MockTransport::new().respond(issues_data(vec![issue_node(1), issue_node(2)], true));
        let page: Page<Issue> = list(&transport, &IssueFilter::default(), &ListOptions::default())
            .await
            .unwrap();
        assert!(page.page_info.has_next_page);
        assert_eq!(page.page_info.end_cursor.as_deref(), Some("cursor-2"));
    }

    #[tokio::test]
    async fn labels_list_reads_issue_labels_key() {
        let transport = MockTransport::new().respond(json!({
            "issueLabels": { "nodes": [{ "id": "l1", "name": "bug" }] }
        }));
        let page: Page<Label> = list(&transport, &(), &ListOptions::default()).await.unwrap();
        assert_eq!(page.nodes[0].name, "bug");
        assert_eq!(page.page_info, PageInfo::default());
    }

    #[tokio::test]
    async fn invalid_node_becomes_validation_error_with_index() {
        let transport = MockTransport::new().respond(json!({
            "projects": { "nodes": [{ "id": "p1", "name": "ok" }, { "id": "p2" }] }
        }));
        let err = list::<Project>(&transport, &ProjectFilter::default(), &ListOptions::default())
            .await
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("item 1"), "{msg}");
        assert!(msg.contains("`name`"), "{msg}");
    }

    #[tokio::test]
    async fn missing_connection_key_is_validation_error() {
        let transport = MockTransport::new().respond(json!({ "somethingElse": {} }));
        let err = list::<Issue>(&transport, &IssueFilter::default(), &ListOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation { resource: "issue", .. }));
    }

    #[tokio::test]
    async fn get_null_record_is_not_found() {
        let transport = MockTransport::new().respond(json!({ "issue": null }));
        let err = get::<Issue>(&transport, "ENG-999").await.unwrap_err();
        assert_eq!(err.to_string(), "Issue 'ENG-999' not found");
        let (_, vars) = transport.last_call();
        assert_eq!(vars["id"], "ENG-999");
    }

    #[tokio::test]
    async fn transport_errors_pass_through() {
        let transport = MockTransport::new().fail(ClientError::GraphQl("Entity not found".into()));
        let err = get::<Team>(&transport, "NOPE").await.unwrap_err();
        assert!(matches!(err, ClientError::GraphQl(_)));
    }

    #[tokio::test]
    async fn viewer_reads_viewer_key() {
        let transport =
            MockTransport::new().respond(json!({ "viewer": { "id": "u1", "name": "Ada" } }));
        let user = viewer(&transport).await.unwrap();
        assert_eq!(user.name, "Ada");
        let (query, vars) = transport.last_call();
        assert!(query.contains("viewer"));
        assert!(vars.is_empty());
    }

    #[tokio::test]
    async fn search_adds_title_to_existing_filters() {
        let transport = MockTransport::new().respond(issues_data(vec![], false));
        let filter = IssueFilter {
            status: Some("Todo".into()),
            ..IssueFilter::default()
        };
        search_issues(&transport, "login", &filter, &ListOptions::default())
            .await
            .unwrap();
        let (_, vars) = transport.last_call();
        assert_eq!(vars["filter"]["title"], json!({ "containsIgnoreCase": "login" }));
        assert_eq!(vars["filter"]["state"]["name"]["eqIgnoreCase"], "Todo");
    }

    #[tokio::test]
    async fn create_resolves_team_then_mutates() {
        let transport = MockTransport::new()
            .respond(json!({ "team": { "id": "team-uuid", "key": "ENG", "name": "Engineering" } }))
            .respond(json!({ "issueCreate": { "success": true, "issue": issue_node(7) } }));
        let new = NewIssue {
            team: "ENG".into(),
            title: "Fix it".into(),
            description: None,
            priority: Some(2),
        };
        let issue = create_issue(&transport, &new).await.unwrap();
        assert_eq!(issue.identifier, "ENG-7");

        let calls = transport.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].1["id"], "ENG");
        let input = calls[1].1["input"].as_object().unwrap();
        assert_eq!(input["teamId"], "team-uuid");
        assert_eq!(input["priority"], 2);
        assert!(!input.contains_key("description"));
    }

    #[tokio::test]
    async fn create_reports_unsuccessful_payload() {
        let transport = MockTransport::new()
            .respond(json!({ "team": { "id": "t", "key": "ENG", "name": "Engineering" } }))
            .respond(json!({ "issueCreate": { "success": false, "issue": null } }));
        let new = NewIssue {
            team: "ENG".into(),
            title: "Fix it".into(),
            ..NewIssue::default()
        };
        assert!(create_issue(&transport, &new).await.is_err());
    }

    #[tokio::test]
    async fn cycle_filter_variables() {
        let transport = MockTransport::new().respond(json!({ "cycles": { "nodes": [] } }));
        let filter = CycleFilter {
            team: Some("ENG".into()),
            timing: Some(CycleTiming::Active),
        };
        list::<Cycle>(&transport, &filter, &ListOptions::default())
            .await
            .unwrap();
        let (_, vars) = transport.last_call();
        assert_eq!(vars["filter"]["isActive"], json!({ "eq": true }));
        assert_eq!(vars["filter"]["team"]["key"]["eqIgnoreCase"], "ENG");
    }
}
