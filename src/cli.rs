//! Command-line surface: `linear <resource> <verb> [flags]`.

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Deserialize;

use crate::api::{CycleTiming, OrderBy};
use crate::ui::GroupBy;

/// Query Linear from the terminal.
///
/// Reads the API key from LINEAR_API_KEY (a `.env` file in the working directory is honored).
#[derive(Debug, Parser)]
#[command(name = "linear", version)]
pub struct Cli {
    /// Log requests and response status to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Issue commands
    #[command(subcommand)]
    Issues(IssueCommand),

    /// Project commands
    #[command(subcommand)]
    Projects(ProjectCommand),

    /// Team commands
    #[command(subcommand)]
    Teams(TeamCommand),

    /// Cycle commands
    #[command(subcommand)]
    Cycles(CycleCommand),

    /// User commands
    #[command(subcommand)]
    Users(UserCommand),

    /// Label commands
    #[command(subcommand)]
    Labels(LabelCommand),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortKey {
    Created,
    #[default]
    Updated,
    /// Urgent first, unprioritized last (sorted locally)
    Priority,
}

impl SortKey {
    /// Server-side ordering; `Priority` has none.
    pub fn order_by(self) -> Option<OrderBy> {
        match self {
            SortKey::Created => Some(OrderBy::CreatedAt),
            SortKey::Updated => Some(OrderBy::UpdatedAt),
            SortKey::Priority => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TimeSort {
    Created,
    #[default]
    Updated,
}

impl From<TimeSort> for OrderBy {
    fn from(sort: TimeSort) -> Self {
        match sort {
            TimeSort::Created => OrderBy::CreatedAt,
            TimeSort::Updated => OrderBy::UpdatedAt,
        }
    }
}

/// Paging and output flags shared by every `list`.
#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    /// Maximum number of results (1-250, default 50)
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..=250))]
    pub limit: Option<u32>,

    /// Continue from a cursor printed by a previous page
    #[arg(long)]
    pub after: Option<String>,

    /// Include archived records
    #[arg(long)]
    pub include_archived: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Args)]
pub struct GetArgs {
    /// Identifier (e.g. ENG-123, a team key) or UUID
    pub id: String,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct IssueFilterArgs {
    /// Assignee email, or `me`
    #[arg(short, long)]
    pub assignee: Option<String>,

    /// Project name or UUID
    #[arg(short, long)]
    pub project: Option<String>,

    /// Workflow state name (e.g. "In Progress")
    #[arg(short, long)]
    pub status: Option<String>,

    /// Team key or name
    #[arg(short, long)]
    pub team: Option<String>,

    /// Priority: 0 none, 1 urgent, 2 high, 3 medium, 4 low
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=4))]
    pub priority: Option<u8>,

    /// Label name (repeatable)
    #[arg(short, long = "label")]
    pub labels: Vec<String>,
}

#[derive(Debug, Subcommand)]
pub enum IssueCommand {
    /// List issues
    List {
        #[command(flatten)]
        filters: IssueFilterArgs,

        #[command(flatten)]
        list: ListArgs,

        /// Sort order
        #[arg(long, value_enum, default_value_t)]
        sort: SortKey,

        /// Split the table into sections (table output only)
        #[arg(short, long, value_enum)]
        group_by: Option<GroupBy>,
    },

    /// Show a single issue
    #[command(visible_alias = "view")]
    Get(GetArgs),

    /// Search issue titles
    Search {
        /// Text to look for in titles
        query: String,

        #[command(flatten)]
        filters: IssueFilterArgs,

        #[command(flatten)]
        list: ListArgs,

        /// Sort order
        #[arg(long, value_enum, default_value_t)]
        sort: SortKey,

        /// Split the table into sections (table output only)
        #[arg(short, long, value_enum)]
        group_by: Option<GroupBy>,
    },

    /// Create an issue
    Create(CreateArgs),
}

#[derive(Debug, Clone, Args)]
pub struct CreateArgs {
    /// Issue title
    pub title: String,

    /// Team key or UUID
    #[arg(short, long)]
    pub team: String,

    /// Markdown description
    #[arg(short, long, visible_alias = "desc")]
    pub description: Option<String>,

    /// Priority: 0 none, 1 urgent, 2 high, 3 medium, 4 low
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=4))]
    pub priority: Option<u8>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Subcommand)]
pub enum ProjectCommand {
    /// List projects
    List {
        /// Project state (planned, started, paused, completed, canceled)
        #[arg(short, long)]
        state: Option<String>,

        /// Team key or name
        #[arg(short, long)]
        team: Option<String>,

        #[command(flatten)]
        list: ListArgs,

        /// Sort order
        #[arg(long, value_enum, default_value_t)]
        sort: TimeSort,
    },

    /// Show a single project
    #[command(visible_alias = "view")]
    Get(GetArgs),
}

#[derive(Debug, Subcommand)]
pub enum TeamCommand {
    /// List teams
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Sort order
        #[arg(long, value_enum, default_value_t)]
        sort: TimeSort,
    },

    /// Show a single team
    #[command(visible_alias = "view")]
    Get(GetArgs),
}

#[derive(Debug, Subcommand)]
pub enum CycleCommand {
    /// List cycles
    List {
        /// Team key or name
        #[arg(short, long)]
        team: Option<String>,

        /// Only the active cycle
        #[arg(long, conflicts_with_all = ["future", "past"])]
        active: bool,

        /// Only upcoming cycles
        #[arg(long, conflicts_with = "past")]
        future: bool,

        /// Only finished cycles
        #[arg(long)]
        past: bool,

        #[command(flatten)]
        list: ListArgs,

        /// Sort order
        #[arg(long, value_enum, default_value_t)]
        sort: TimeSort,
    },

    /// Show a single cycle
    #[command(visible_alias = "view")]
    Get(GetArgs),
}

impl CycleCommand {
    pub fn timing(active: bool, future: bool, past: bool) -> Option<CycleTiming> {
        match (active, future, past) {
            (true, _, _) => Some(CycleTiming::Active),
            (_, true, _) => Some(CycleTiming::Future),
            (_, _, true) => Some(CycleTiming::Past),
            _ => None,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List users
    List {
        /// Hide deactivated users
        #[arg(long)]
        active_only: bool,

        #[command(flatten)]
        list: ListArgs,

        /// Sort order
        #[arg(long, value_enum, default_value_t)]
        sort: TimeSort,
    },

    /// Show a single user; `me` shows the authenticated user
    #[command(visible_alias = "view")]
    Get(GetArgs),
}

#[derive(Debug, Subcommand)]
pub enum LabelCommand {
    /// List labels
    List {
        /// Team key or name
        #[arg(short, long)]
        team: Option<String>,

        /// Label name contains
        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        list: ListArgs,

        /// Sort order
        #[arg(long, value_enum, default_value_t)]
        sort: TimeSort,
    },

    /// Show a single label
    #[command(visible_alias = "view")]
    Get(GetArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("linear").chain(args.iter().copied())).unwrap()
    }

    fn parse_err(args: &[&str]) -> ErrorKind {
        Cli::try_parse_from(std::iter::once("linear").chain(args.iter().copied()))
            .unwrap_err()
            .kind()
    }

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn issue_list_with_filters() {
        let cli = parse(&[
            "issues", "list", "--team", "ENG", "-a", "me", "--priority", "1", "-l", "bug", "-l",
            "ui", "--limit", "3",
        ]);
        let Command::Issues(IssueCommand::List {
            filters,
            list,
            sort,
            group_by,
        }) = cli.command
        else {
            panic!("expected issues list");
        };
        assert_eq!(filters.team.as_deref(), Some("ENG"));
        assert_eq!(filters.assignee.as_deref(), Some("me"));
        assert_eq!(filters.priority, Some(1));
        assert_eq!(filters.labels, vec!["bug", "ui"]);
        assert_eq!(list.limit, Some(3));
        assert_eq!(list.format, None);
        assert_eq!(sort, SortKey::Updated);
        assert_eq!(group_by, None);
    }

    #[test]
    fn search_accepts_group_by() {
        let cli = parse(&["issues", "search", "login", "-g", "project"]);
        let Command::Issues(IssueCommand::Search { group_by, .. }) = cli.command else {
            panic!("expected issues search");
        };
        assert_eq!(group_by, Some(GroupBy::Project));
        assert_eq!(
            parse_err(&["issues", "list", "--group-by", "label"]),
            ErrorKind::InvalidValue
        );
    }

    #[test]
    fn view_is_an_alias_for_get() {
        let cli = parse(&["issues", "view", "ENG-123", "--format", "json"]);
        let Command::Issues(IssueCommand::Get(args)) = cli.command else {
            panic!("expected issues get");
        };
        assert_eq!(args.id, "ENG-123");
        assert_eq!(args.format, Some(OutputFormat::Json));
    }

    #[test]
    fn create_takes_title_and_description() {
        let cli = parse(&[
            "issues", "create", "Fix login", "-t", "ENG", "--desc", "SSO is broken",
        ]);
        let Command::Issues(IssueCommand::Create(args)) = cli.command else {
            panic!("expected issues create");
        };
        assert_eq!(args.title, "Fix login");
        assert_eq!(args.team, "ENG");
        assert_eq!(args.description.as_deref(), Some("SSO is broken"));
    }

    #[test]
    fn create_requires_team() {
        assert_eq!(
            parse_err(&["issues", "create", "Fix login"]),
            ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn priority_out_of_range_is_rejected() {
        assert_eq!(
            parse_err(&["issues", "list", "--priority", "9"]),
            ErrorKind::ValueValidation
        );
    }

    #[test]
    fn limit_is_bounded() {
        assert_eq!(
            parse_err(&["teams", "list", "--limit", "0"]),
            ErrorKind::ValueValidation
        );
        assert_eq!(
            parse_err(&["teams", "list", "--limit", "251"]),
            ErrorKind::ValueValidation
        );
    }

    #[test]
    fn cycle_timing_flags_are_exclusive() {
        assert_eq!(
            parse_err(&["cycles", "list", "--active", "--past"]),
            ErrorKind::ArgumentConflict
        );
        let cli = parse(&["cycles", "list", "--future"]);
        let Command::Cycles(CycleCommand::List {
            active,
            future,
            past,
            ..
        }) = cli.command
        else {
            panic!("expected cycles list");
        };
        assert_eq!(
            CycleCommand::timing(active, future, past),
            Some(CycleTiming::Future)
        );
    }

    #[test]
    fn unknown_resource_is_a_usage_error() {
        assert_eq!(parse_err(&["widgets", "list"]), ErrorKind::InvalidSubcommand);
    }

    #[test]
    fn priority_sort_has_no_server_order() {
        assert_eq!(SortKey::Priority.order_by(), None);
        assert_eq!(SortKey::Created.order_by(), Some(OrderBy::CreatedAt));
        assert_eq!(OrderBy::from(TimeSort::Updated), OrderBy::UpdatedAt);
    }

    #[test]
    fn verbose_is_global() {
        assert!(parse(&["users", "list", "-v"]).verbose);
    }
}
