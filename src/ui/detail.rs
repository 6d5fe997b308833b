//! Single-record detail views.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::model::{Cycle, Issue, Label, Project, Team, User};
use crate::util::text::{format_date, format_day, format_percent, title_case, truncate, yes_no};

const COMMENTS_SHOWN: usize = 5;
const COMMENT_PREVIEW: usize = 200;
const PROGRESS_BAR_WIDTH: usize = 30;

pub trait Detail {
    fn detail_lines(&self) -> Vec<Line<'static>>;
}

fn label_style() -> Style {
    Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD)
}

fn field(label: &str, value: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label}: "), label_style()),
        Span::raw(value.into()),
    ])
}

fn heading(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(
        text.into(),
        Style::default().fg(Color::LightBlue).add_modifier(Modifier::BOLD),
    ))
}

fn section(title: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(format!("{}:", title.into()), label_style()))
}

fn dim(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(text.into(), Style::default().fg(Color::DarkGray)))
}

/// Paragraph text, one line per source line.
fn body(lines: &mut Vec<Line<'static>>, text: &str) {
    lines.extend(text.lines().map(|l| Line::raw(l.to_string())));
}

fn description(lines: &mut Vec<Line<'static>>, text: Option<&str>, title: &str) {
    if let Some(text) = text.filter(|t| !t.trim().is_empty()) {
        lines.push(Line::default());
        lines.push(section(title));
        body(lines, text);
    }
}

impl Detail for Issue {
    fn detail_lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![
            heading(format!("{}: {}", self.identifier, self.title)),
            dim(self.url.clone()),
            Line::default(),
            field("Status", self.state.name.clone()),
            field("Priority", self.priority_name()),
        ];

        lines.push(match &self.assignee {
            Some(assignee) => field("Assignee", assignee.display()),
            None => field("Assignee", "Unassigned"),
        });
        if let Some(creator) = &self.creator {
            lines.push(field("Creator", creator.display()));
        }
        if let Some(project) = &self.project {
            lines.push(field("Project", project.name.clone()));
        }
        if let Some(team) = &self.team {
            lines.push(field("Team", team.display()));
        }
        if let Some(cycle) = &self.cycle {
            let name = cycle.name.clone().unwrap_or_default();
            lines.push(field("Cycle", format!("{name} (#{})", cycle.number)));
        }

        lines.push(Line::default());
        lines.push(field("Created", format_date(self.created_at.as_ref())));
        lines.push(field("Updated", format_date(self.updated_at.as_ref())));
        if self.due_date.is_some() {
            lines.push(field("Due Date", format_day(self.due_date.as_ref())));
        }
        if self.completed_at.is_some() {
            lines.push(field("Completed", format_date(self.completed_at.as_ref())));
        }
        if let Some(estimate) = self.estimate.filter(|e| *e > 0.0) {
            lines.push(field("Estimate", format!("{estimate} points")));
        }
        if !self.labels.is_empty() {
            lines.push(field("Labels", self.labels.join(", ")));
        }
        if let Some(parent) = &self.parent {
            lines.push(field("Parent", format!("{} - {}", parent.identifier, parent.title)));
        }

        description(&mut lines, self.description.as_deref(), "Description");

        if !self.comments.is_empty() {
            lines.push(Line::default());
            lines.push(section(format!("Comments ({})", self.comments.len())));
            for comment in self.comments.iter().take(COMMENTS_SHOWN) {
                let author = comment
                    .user
                    .as_ref()
                    .map(|u| u.name.clone())
                    .unwrap_or_else(|| "Unknown".to_string());
                lines.push(Line::default());
                lines.push(Line::from(vec![
                    Span::styled(author, Style::default().fg(Color::Cyan)),
                    Span::raw(format!(" on {}:", format_date(comment.created_at.as_ref()))),
                ]));
                body(&mut lines, &truncate(&comment.body, COMMENT_PREVIEW));
            }
        }

        if !self.attachments.is_empty() {
            lines.push(Line::default());
            lines.push(section(format!("Attachments ({})", self.attachments.len())));
            for attachment in &self.attachments {
                lines.push(Line::raw(format!("  - {} - {}", attachment.title, attachment.url)));
            }
        }

        if !self.subscribers.is_empty() {
            lines.push(Line::default());
            lines.push(field("Subscribers", self.subscribers.join(", ")));
        }

        lines
    }
}

impl Detail for Project {
    fn detail_lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![
            heading(self.name.clone()),
            dim(self.url.clone()),
            Line::default(),
            field("State", title_case(&self.state)),
            field("Progress", format_percent(self.progress)),
        ];

        lines.push(match &self.lead {
            Some(lead) => field("Lead", lead.display()),
            None => field("Lead", "No lead assigned"),
        });
        if let Some(creator) = &self.creator {
            lines.push(field("Creator", creator.display()));
        }
        if !self.teams.is_empty() {
            let teams: Vec<String> = self.teams.iter().map(|t| t.display()).collect();
            lines.push(field("Teams", teams.join(", ")));
        }
        if !self.members.is_empty() {
            let members: Vec<&str> = self.members.iter().map(|m| m.name.as_str()).collect();
            lines.push(field("Members", members.join(", ")));
        }

        lines.push(Line::default());
        lines.push(field("Created", format_date(self.created_at.as_ref())));
        lines.push(field("Updated", format_date(self.updated_at.as_ref())));
        if self.start_date.is_some() {
            lines.push(field("Start Date", format_day(self.start_date.as_ref())));
        }
        if self.target_date.is_some() {
            lines.push(field("Target Date", format_day(self.target_date.as_ref())));
        }
        if self.completed_at.is_some() {
            lines.push(field("Completed", format_date(self.completed_at.as_ref())));
        }
        if self.canceled_at.is_some() {
            lines.push(field("Canceled", format_date(self.canceled_at.as_ref())));
        }

        description(&mut lines, self.description.as_deref(), "Description");
        lines
    }
}

impl Detail for Team {
    fn detail_lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![heading(format!("{} ({})", self.name, self.key))];
        if let Some(org) = &self.organization {
            lines.push(dim(format!("Organization: {}", org.name)));
        }
        lines.push(Line::default());
        lines.push(field("Team Key", self.key.clone()));
        lines.push(field("Private", yes_no(self.private)));
        lines.push(field("Cycles Enabled", yes_no(self.cycles_enabled)));
        if let Some(tz) = &self.timezone {
            lines.push(field("Timezone", tz.clone()));
        }
        if !self.members.is_empty() {
            lines.push(field("Members", self.members.len().to_string()));
        }
        if !self.states.is_empty() {
            let states: Vec<&str> = self.states.iter().map(|s| s.name.as_str()).collect();
            lines.push(field("Workflow", states.join(" -> ")));
        }

        lines.push(Line::default());
        let created = match &self.created_at {
            Some(at) => format_date(Some(at)),
            None => "Unknown".to_string(),
        };
        lines.push(field("Created", created));
        lines.push(field("Updated", format_date(self.updated_at.as_ref())));
        if self.archived_at.is_some() {
            lines.push(field("Archived", format_date(self.archived_at.as_ref())));
        }

        description(&mut lines, self.description.as_deref(), "Description");
        lines
    }
}

fn progress_bar(ratio: f64) -> String {
    let ratio = ratio.clamp(0.0, 1.0);
    let filled = (PROGRESS_BAR_WIDTH as f64 * ratio) as usize;
    format!(
        "{}{} {:.1}%",
        "█".repeat(filled),
        "░".repeat(PROGRESS_BAR_WIDTH - filled),
        ratio * 100.0
    )
}

impl Detail for Cycle {
    fn detail_lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![
            heading(format!("{} (Cycle #{})", self.display_name(), self.number)),
            dim(format!("Team: {}", self.team.display())),
            Line::default(),
            field("Status", self.status()),
            field("Progress", progress_bar(self.progress)),
            Line::default(),
            field("Start Date", format_date(self.starts_at.as_ref())),
            field("End Date", format_date(self.ends_at.as_ref())),
        ];
        if self.completed_at.is_some() {
            lines.push(field("Completed", format_date(self.completed_at.as_ref())));
        }

        lines.push(Line::default());
        lines.push(field("Created", format_date(self.created_at.as_ref())));
        lines.push(field("Updated", format_date(self.updated_at.as_ref())));
        if self.archived_at.is_some() {
            lines.push(field("Archived", format_date(self.archived_at.as_ref())));
        }

        let mut tags = Vec::new();
        if self.is_next {
            tags.push("Next Cycle");
        }
        if self.is_previous {
            tags.push("Previous Cycle");
        }
        if !tags.is_empty() {
            lines.push(field("Tags", tags.join(", ")));
        }

        description(&mut lines, self.description.as_deref(), "Description");

        if !self.scope_history.is_empty() {
            lines.push(Line::default());
            lines.push(field(
                "Scope History",
                format!("{} data points", self.scope_history.len()),
            ));
        }
        if !self.issue_count_history.is_empty() {
            lines.push(field(
                "Issue Count History",
                format!("{} data points", self.issue_count_history.len()),
            ));
        }
        lines
    }
}

impl Detail for User {
    fn detail_lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![
            heading(self.shown_name().to_string()),
            dim(self.email.clone()),
            Line::default(),
            field("Status", self.status()),
            field("Role", self.role()),
        ];
        if let Some(org) = &self.organization {
            lines.push(field("Organization", org.name.clone()));
        }
        if let Some(tz) = &self.timezone {
            lines.push(field("Timezone", tz.clone()));
        }
        if let Some(label) = self.status_label.as_deref().filter(|l| !l.is_empty()) {
            let message = match self.status_emoji.as_deref() {
                Some(emoji) if !emoji.is_empty() => format!("{emoji} {label}"),
                _ => label.to_string(),
            };
            lines.push(field("Status Message", message));
            if self.status_until_at.is_some() {
                lines.push(dim(format!(
                    "  (until {})",
                    format_date(self.status_until_at.as_ref())
                )));
            }
        }

        description(&mut lines, self.description.as_deref(), "Bio");

        lines.push(Line::default());
        lines.push(field("Joined", format_date(self.created_at.as_ref())));
        let updated = match &self.updated_at {
            Some(at) => format_date(Some(at)),
            None => "Unknown".to_string(),
        };
        lines.push(field("Last Updated", updated));
        lines
    }
}

impl Detail for Label {
    fn detail_lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![heading(self.name.clone()), Line::default()];
        lines.push(field("Team", self.scope().to_string()));
        if !self.color.is_empty() {
            lines.push(field("Color", self.color.clone()));
        }
        if let Some(parent) = &self.parent {
            lines.push(field("Group", parent.name.clone()));
        }
        lines.push(field("Created", format_date(self.created_at.as_ref())));
        description(&mut lines, self.description.as_deref(), "Description");
        lines
    }
}
