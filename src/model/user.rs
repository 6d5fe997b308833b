use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{nullable, NamedRef, Resource};

macro_rules! user_fields {
    () => {
        "id name displayName email active admin timezone description
        statusEmoji statusLabel statusUntilAt createdAt updatedAt"
    };
}

const LIST_QUERY: &str = concat!(
    "query Users($filter: UserFilter, $first: Int, $after: String, $includeArchived: Boolean, $orderBy: PaginationOrderBy) {
  users(filter: $filter, first: $first, after: $after, includeArchived: $includeArchived, orderBy: $orderBy) {
    nodes { ",
    user_fields!(),
    " }
    pageInfo { hasNextPage endCursor }
  }
}"
);

const GET_QUERY: &str = concat!(
    "query User($id: String!) {
  user(id: $id) { ",
    user_fields!(),
    " organization { name } }
}"
);

/// The authenticated user; answered under `data.viewer`.
pub const VIEWER_QUERY: &str = concat!(
    "query Viewer {
  viewer { ",
    user_fields!(),
    " organization { name } }
}"
);

pub const VIEWER_KEY: &str = "viewer";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub display_name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub email: String,
    #[serde(default, deserialize_with = "nullable")]
    pub active: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub admin: bool,
    pub timezone: Option<String>,
    pub description: Option<String>,
    pub status_emoji: Option<String>,
    pub status_label: Option<String>,
    pub status_until_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub organization: Option<NamedRef>,
}

impl User {
    /// Display name when set, otherwise the full name.
    pub fn shown_name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }

    pub fn role(&self) -> &'static str {
        if self.admin {
            "Admin"
        } else {
            "Member"
        }
    }

    pub fn status(&self) -> &'static str {
        if self.active {
            "Active"
        } else {
            "Inactive"
        }
    }
}

impl Resource for User {
    const NOUN: &'static str = "user";
    const PLURAL: &'static str = "users";
    const LIST_KEY: &'static str = "users";
    const GET_KEY: &'static str = "user";
    const LIST_QUERY: &'static str = LIST_QUERY;
    const GET_QUERY: &'static str = GET_QUERY;
}
