//! One command, one accessor call, one rendering.

use std::io::{self, Write};

use anyhow::Result;
use tracing::debug;

use crate::api::filters::Filter;
use crate::api::{
    self, CycleFilter, IssueFilter, LabelFilter, ListOptions, NewIssue, OrderBy, ProjectFilter,
    Transport, UserFilter,
};
use crate::cli::{
    Command, CreateArgs, CycleCommand, GetArgs, IssueCommand, IssueFilterArgs, LabelCommand,
    ListArgs, OutputFormat, ProjectCommand, SortKey, TeamCommand, UserCommand,
};
use crate::config::Defaults;
use crate::model::{Cycle, Issue, Label, Page, Project, Team, User};
use crate::ui::{self, Detail, GroupBy, Tabular};

/// Everything a command needs besides its own arguments.
pub struct Context<'a> {
    pub transport: &'a dyn Transport,
    pub defaults: &'a Defaults,
    /// Terminal columns, when stdout is a terminal.
    pub width: Option<usize>,
    /// Write ANSI styling to stdout.
    pub color: bool,
}

impl Context<'_> {
    fn format(&self, flag: Option<OutputFormat>) -> OutputFormat {
        flag.or(self.defaults.format).unwrap_or_default()
    }

    fn team(&self, flag: &Option<String>) -> Option<String> {
        flag.clone().or_else(|| self.defaults.team.clone())
    }

    fn list_options(&self, args: &ListArgs, order_by: Option<OrderBy>) -> ListOptions {
        let fallback = ListOptions::default();
        ListOptions {
            limit: args
                .limit
                .or(self.defaults.limit)
                .map_or(fallback.limit, |n| n as usize),
            after: args.after.clone(),
            include_archived: args.include_archived,
            order_by,
        }
    }

    fn emit_page<R: Tabular>(
        &self,
        page: &Page<R>,
        format: Option<OutputFormat>,
        out: &mut dyn Write,
    ) -> Result<()> {
        let text = match self.format(format) {
            OutputFormat::Table => ui::render_table(page, self.width, self.color),
            OutputFormat::Json => ui::render_json(page)?,
        };
        writeln!(out, "{text}")?;
        Ok(())
    }

    fn emit_record<R: Detail + serde::Serialize>(
        &self,
        record: &R,
        format: Option<OutputFormat>,
        out: &mut dyn Write,
    ) -> Result<()> {
        let text = match self.format(format) {
            OutputFormat::Table => ui::render_detail(record, self.color),
            OutputFormat::Json => ui::render_record_json(record)?,
        };
        writeln!(out, "{text}")?;
        Ok(())
    }

    fn emit_issues(
        &self,
        page: &Page<Issue>,
        format: Option<OutputFormat>,
        group_by: Option<GroupBy>,
        out: &mut dyn Write,
    ) -> Result<()> {
        match (self.format(format), group_by) {
            (OutputFormat::Table, Some(by)) => {
                writeln!(out, "{}", ui::group::render(page, by, self.width, self.color))?;
                Ok(())
            }
            _ => self.emit_page(page, format, out),
        }
    }
}

/// Run `command` and print any failure to `err`; returns the process exit code.
pub async fn execute(
    command: &Command,
    ctx: &Context<'_>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> u8 {
    match run(command, ctx, out).await {
        Ok(()) => 0,
        Err(e) if is_broken_pipe(&e) => 0,
        Err(e) => {
            let _ = writeln!(err, "Error: {e:#}");
            1
        }
    }
}

/// The reader of our stdout went away (`linear issues list | head`).
fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<io::Error>())
        .any(|e| e.kind() == io::ErrorKind::BrokenPipe)
}

pub async fn run(command: &Command, ctx: &Context<'_>, out: &mut dyn Write) -> Result<()> {
    match command {
        Command::Issues(cmd) => issues(cmd, ctx, out).await,
        Command::Projects(cmd) => projects(cmd, ctx, out).await,
        Command::Teams(cmd) => teams(cmd, ctx, out).await,
        Command::Cycles(cmd) => cycles(cmd, ctx, out).await,
        Command::Users(cmd) => users(cmd, ctx, out).await,
        Command::Labels(cmd) => labels(cmd, ctx, out).await,
    }
}

async fn list_page<R: Tabular>(
    ctx: &Context<'_>,
    filter: &dyn Filter,
    list: &ListArgs,
    order_by: Option<OrderBy>,
    out: &mut dyn Write,
) -> Result<()> {
    let page = api::list::<R>(ctx.transport, filter, &ctx.list_options(list, order_by)).await?;
    ctx.emit_page(&page, list.format, out)
}

async fn show<R: Tabular + Detail>(
    ctx: &Context<'_>,
    args: &GetArgs,
    out: &mut dyn Write,
) -> Result<()> {
    let record: R = api::get(ctx.transport, &args.id).await?;
    ctx.emit_record(&record, args.format, out)
}

fn issue_filter(ctx: &Context<'_>, args: &IssueFilterArgs) -> IssueFilter {
    IssueFilter {
        assignee: args.assignee.clone(),
        project: args.project.clone(),
        status: args.status.clone(),
        team: ctx.team(&args.team),
        priority: args.priority,
        labels: args.labels.clone(),
        title: None,
    }
}

/// Urgent (1) through Low (4), then issues without a priority (0).
pub fn sort_by_priority(issues: &mut [Issue]) {
    issues.sort_by_key(|issue| match issue.priority {
        0 => u8::MAX,
        p => p,
    });
}

async fn issues(cmd: &IssueCommand, ctx: &Context<'_>, out: &mut dyn Write) -> Result<()> {
    match cmd {
        IssueCommand::List {
            filters,
            list,
            sort,
            group_by,
        } => {
            let filter = issue_filter(ctx, filters);
            let options = ctx.list_options(list, sort.order_by());
            let mut page: Page<Issue> = api::list(ctx.transport, &filter, &options).await?;
            if *sort == SortKey::Priority {
                sort_by_priority(&mut page.nodes);
            }
            ctx.emit_issues(&page, list.format, *group_by, out)
        }
        IssueCommand::Get(args) => show::<Issue>(ctx, args, out).await,
        IssueCommand::Search {
            query,
            filters,
            list,
            sort,
            group_by,
        } => {
            let filter = issue_filter(ctx, filters);
            let options = ctx.list_options(list, sort.order_by());
            let mut page = api::search_issues(ctx.transport, query, &filter, &options).await?;
            if *sort == SortKey::Priority {
                sort_by_priority(&mut page.nodes);
            }
            ctx.emit_issues(&page, list.format, *group_by, out)
        }
        IssueCommand::Create(args) => create(ctx, args, out).await,
    }
}

async fn create(ctx: &Context<'_>, args: &CreateArgs, out: &mut dyn Write) -> Result<()> {
    let new = NewIssue {
        team: args.team.clone(),
        title: args.title.clone(),
        description: args.description.clone(),
        priority: args.priority,
    };
    let issue = api::create_issue(ctx.transport, &new).await?;
    debug!(identifier = %issue.identifier, "created");
    match ctx.format(args.format) {
        OutputFormat::Json => writeln!(out, "{}", ui::render_record_json(&issue)?)?,
        OutputFormat::Table => {
            writeln!(out, "Created {}: {}", issue.identifier, issue.title)?;
            if !issue.url.is_empty() {
                writeln!(out, "  {}", issue.url)?;
            }
        }
    }
    Ok(())
}

async fn projects(cmd: &ProjectCommand, ctx: &Context<'_>, out: &mut dyn Write) -> Result<()> {
    match cmd {
        ProjectCommand::List {
            state,
            team,
            list,
            sort,
        } => {
            let filter = ProjectFilter {
                state: state.clone(),
                team: ctx.team(team),
            };
            list_page::<Project>(ctx, &filter, list, Some((*sort).into()), out).await
        }
        ProjectCommand::Get(args) => show::<Project>(ctx, args, out).await,
    }
}

async fn teams(cmd: &TeamCommand, ctx: &Context<'_>, out: &mut dyn Write) -> Result<()> {
    match cmd {
        TeamCommand::List { list, sort } => {
            list_page::<Team>(ctx, &(), list, Some((*sort).into()), out).await
        }
        TeamCommand::Get(args) => show::<Team>(ctx, args, out).await,
    }
}

async fn cycles(cmd: &CycleCommand, ctx: &Context<'_>, out: &mut dyn Write) -> Result<()> {
    match cmd {
        CycleCommand::List {
            team,
            active,
            future,
            past,
            list,
            sort,
        } => {
            let filter = CycleFilter {
                team: ctx.team(team),
                timing: CycleCommand::timing(*active, *future, *past),
            };
            list_page::<Cycle>(ctx, &filter, list, Some((*sort).into()), out).await
        }
        CycleCommand::Get(args) => show::<Cycle>(ctx, args, out).await,
    }
}

async fn users(cmd: &UserCommand, ctx: &Context<'_>, out: &mut dyn Write) -> Result<()> {
    match cmd {
        UserCommand::List {
            active_only,
            list,
            sort,
        } => {
            let filter = UserFilter {
                active_only: *active_only,
            };
            list_page::<User>(ctx, &filter, list, Some((*sort).into()), out).await
        }
        UserCommand::Get(args) if args.id.eq_ignore_ascii_case("me") => {
            let user = api::viewer(ctx.transport).await?;
            ctx.emit_record(&user, args.format, out)
        }
        UserCommand::Get(args) => show::<User>(ctx, args, out).await,
    }
}

async fn labels(cmd: &LabelCommand, ctx: &Context<'_>, out: &mut dyn Write) -> Result<()> {
    match cmd {
        LabelCommand::List {
            team,
            name,
            list,
            sort,
        } => {
            let filter = LabelFilter {
                team: ctx.team(team),
                name: name.clone(),
            };
            list_page::<Label>(ctx, &filter, list, Some((*sort).into()), out).await
        }
        LabelCommand::Get(args) => show::<Label>(ctx, args, out).await,
    }
}
