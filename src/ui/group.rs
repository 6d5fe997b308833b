//! Issue tables split into sections by cycle, project or team.

use clap::ValueEnum;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use super::paint::{dim, paint, paint_lines};
use super::table;
use crate::model::{Issue, Page};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GroupBy {
    Cycle,
    Project,
    Team,
}

impl GroupBy {
    /// Section title for issues outside any group of this kind.
    fn missing(self) -> &'static str {
        match self {
            GroupBy::Cycle => "No cycle",
            GroupBy::Project => "No project",
            GroupBy::Team => "No team",
        }
    }

    fn key(self, issue: &Issue) -> Option<String> {
        match self {
            GroupBy::Cycle => issue.cycle.as_ref().map(|cycle| {
                cycle
                    .name
                    .clone()
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| format!("Cycle {}", cycle.number))
            }),
            GroupBy::Project => issue
                .project
                .as_ref()
                .map(|project| project.name.clone())
                .filter(|name| !name.is_empty()),
            GroupBy::Team => issue
                .team
                .as_ref()
                .filter(|team| !team.key.is_empty())
                .map(|team| format!("{} - {}", team.key, team.name)),
        }
    }
}

/// Groups in display order: named groups alphabetically, the ungrouped section last.
/// Issues keep their incoming order within a group.
pub fn group_issues(issues: &[Issue], by: GroupBy) -> Vec<(String, Vec<&Issue>)> {
    let mut groups: Vec<(Option<String>, Vec<&Issue>)> = Vec::new();
    for issue in issues {
        let key = by.key(issue);
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(issue),
            None => groups.push((key, vec![issue])),
        }
    }
    groups.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (a, b) => a.is_none().cmp(&b.is_none()),
    });
    groups
        .into_iter()
        .map(|(key, members)| (key.unwrap_or_else(|| by.missing().to_string()), members))
        .collect()
}

/// One titled table per group, columns aligned across all of them.
pub fn render(page: &Page<Issue>, by: GroupBy, max_width: Option<usize>, color: bool) -> String {
    if page.is_empty() {
        return "No issues found.".to_string();
    }

    let groups = group_issues(&page.nodes, by);
    let ordered: Vec<Issue> = groups
        .iter()
        .flat_map(|(_, members)| members.iter().map(|issue| (*issue).clone()))
        .collect();
    let lines = table::draw(&ordered, max_width);
    let (header, mut rows) = match lines.split_first() {
        Some((header, rows)) => (header, rows),
        None => return String::new(),
    };

    let mut out = Vec::new();
    for (name, members) in &groups {
        let count = members.len();
        let noun = if count == 1 { "issue" } else { "issues" };
        out.push(String::new());
        out.push(paint(
            &Line::from(vec![
                Span::styled(
                    name.clone(),
                    Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!(" ({count} {noun})"), Style::new().fg(Color::DarkGray)),
            ]),
            color,
        ));
        out.push(paint(header, color));
        let (section, rest) = rows.split_at(count.min(rows.len()));
        out.push(paint_lines(section, color));
        rows = rest;
    }

    out.push(String::new());
    out.push(dim(
        format!(
            "Total: {} issue(s) across {} group(s)",
            page.len(),
            groups.len()
        ),
        color,
    ));
    if let Some(hint) = super::next_page_hint(page) {
        out.push(dim(hint, color));
    }
    out.join("\n")
}
