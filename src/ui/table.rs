//! Aligned tables, laid out by ratatui into an off-screen buffer and read back
//! as styled lines.

use std::iter;

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Row, Table, Widget};
use unicode_width::UnicodeWidthStr;

use crate::model::{Cycle, Issue, Label, Project, Resource, Team, User};
use crate::util::text::{
    first_line, format_date, format_day, format_percent, title_case, truncate, yes_no,
};

const COLUMN_SPACING: u16 = 2;
/// Floor for the column that shrinks to fit the terminal.
const MIN_FLEX_WIDTH: usize = 20;

pub const HEADER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);

pub struct Column {
    pub header: &'static str,
    /// Cells wider than this many columns are cut with an ellipsis.
    pub max_width: usize,
    /// Gives up width when the table is wider than the terminal.
    pub flex: bool,
    pub color: Option<Color>,
}

const fn col(header: &'static str, max_width: usize) -> Column {
    Column {
        header,
        max_width,
        flex: false,
        color: None,
    }
}

const fn flex(header: &'static str, max_width: usize) -> Column {
    Column {
        header,
        max_width,
        flex: true,
        color: None,
    }
}

impl Column {
    const fn tint(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    fn cell(&self, text: String) -> Cell<'static> {
        match self.color {
            Some(color) => Cell::from(text).style(Style::new().fg(color)),
            None => Cell::from(text),
        }
    }
}

/// Fixed column set and per-record cell values for a resource.
pub trait Tabular: Resource {
    const COLUMNS: &'static [Column];

    /// One value per entry in [`Tabular::COLUMNS`].
    fn cells(&self) -> Vec<String>;
}

/// Header plus one line per record, trailing blanks trimmed.
///
/// `max_width` is the terminal width when known; only the flex column shrinks.
pub fn draw<R: Tabular>(records: &[R], max_width: Option<usize>) -> Vec<Line<'static>> {
    let columns = R::COLUMNS;
    let mut rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            record
                .cells()
                .iter()
                .zip(columns)
                .map(|(value, column)| truncate(first_line(value), column.max_width))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            rows.iter()
                .map(|row| row[i].width())
                .chain(iter::once(column.header.width()))
                .max()
                .unwrap_or_default()
        })
        .collect();

    let spacing = usize::from(COLUMN_SPACING) * columns.len().saturating_sub(1);
    if let Some(limit) = max_width {
        let total = widths.iter().sum::<usize>() + spacing;
        if let (true, Some(i)) = (total > limit, columns.iter().position(|c| c.flex)) {
            let floor = MIN_FLEX_WIDTH.min(widths[i]);
            let shrunk = widths[i].saturating_sub(total - limit).max(floor);
            widths[i] = shrunk;
            for row in &mut rows {
                row[i] = truncate(&row[i], shrunk);
            }
        }
    }

    let total = widths.iter().sum::<usize>() + spacing;
    let area = Rect::new(0, 0, clamp_u16(total), clamp_u16(rows.len() + 1));
    let header = Row::new(columns.iter().map(|c| Cell::from(c.header))).style(HEADER_STYLE);
    let body = rows.into_iter().map(|cells| {
        Row::new(
            cells
                .into_iter()
                .zip(columns)
                .map(|(text, column)| column.cell(text)),
        )
    });
    let table = Table::new(body, widths.iter().map(|w| Constraint::Length(clamp_u16(*w))))
        .header(header)
        .column_spacing(COLUMN_SPACING);

    let mut buf = Buffer::empty(area);
    table.render(area, &mut buf);
    buffer_lines(&buf)
}

fn clamp_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Read the buffer back row by row, merging runs of equally styled cells into
/// spans and skipping the cells hidden behind wide glyphs.
fn buffer_lines(buf: &Buffer) -> Vec<Line<'static>> {
    let width = usize::from(buf.area.width).max(1);
    buf.content
        .chunks(width)
        .map(|row| {
            let mut spans: Vec<Span<'static>> = Vec::new();
            let mut run = String::new();
            let mut run_style = Style::default();
            let mut hidden = 0;
            for cell in row {
                if hidden > 0 {
                    hidden -= 1;
                    continue;
                }
                let symbol = cell.symbol();
                hidden = symbol.width().saturating_sub(1);
                let style = cell_style(cell);
                if style != run_style && !run.is_empty() {
                    spans.push(Span::styled(std::mem::take(&mut run), run_style));
                }
                run_style = style;
                run.push_str(symbol);
            }
            spans.push(Span::styled(run, run_style));
            trim_end(spans)
        })
        .collect()
}

/// Buffer cells store `Reset` for "unset"; map that back to an absent colour.
fn cell_style(cell: &ratatui::buffer::Cell) -> Style {
    let mut style = Style::new().add_modifier(cell.modifier);
    if cell.fg != Color::Reset {
        style = style.fg(cell.fg);
    }
    if cell.bg != Color::Reset {
        style = style.bg(cell.bg);
    }
    style
}

fn trim_end(mut spans: Vec<Span<'static>>) -> Line<'static> {
    while let Some(last) = spans.pop() {
        let trimmed = last.content.trim_end();
        if !trimmed.is_empty() {
            spans.push(Span::styled(trimmed.to_string(), last.style));
            break;
        }
    }
    Line::from(spans)
}

fn or_dash(value: Option<&str>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or("-").to_string()
}

impl Tabular for Issue {
    const COLUMNS: &'static [Column] = &[
        col("ID", 20).tint(Color::LightBlue),
        flex("Title", 50),
        col("Status", 20).tint(Color::Green),
        col("Priority", 12).tint(Color::Yellow),
        col("Assignee", 25).tint(Color::Magenta),
        col("Updated", 10).tint(Color::DarkGray),
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.identifier.clone(),
            self.title.clone(),
            self.state.name.clone(),
            self.priority_name().to_string(),
            self.assignee_name().to_string(),
            format_date(self.updated_at.as_ref()),
        ]
    }
}

impl Tabular for Project {
    const COLUMNS: &'static [Column] = &[
        flex("Name", 40),
        col("State", 12),
        col("Progress", 8),
        col("Lead", 25),
        col("Team", 8),
        col("Target Date", 11),
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            title_case(&self.state),
            format_percent(self.progress),
            self.lead_name().to_string(),
            self.team_key().to_string(),
            format_day(self.target_date.as_ref()),
        ]
    }
}

impl Tabular for Team {
    const COLUMNS: &'static [Column] = &[
        col("Key", 10),
        flex("Name", 40),
        col("Private", 7),
        col("Cycles", 6),
        col("Timezone", 25),
        col("Updated", 10),
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.key.clone(),
            self.name.clone(),
            yes_no(self.private).to_string(),
            yes_no(self.cycles_enabled).to_string(),
            or_dash(self.timezone.as_deref()),
            format_date(self.updated_at.as_ref()),
        ]
    }
}

impl Tabular for Cycle {
    const COLUMNS: &'static [Column] = &[
        col("Team", 10),
        flex("Name", 30),
        col("Number", 7),
        col("Status", 8),
        col("Progress", 8),
        col("Starts", 10),
        col("Ends", 10),
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.team.key.clone(),
            self.display_name().to_string(),
            format!("#{}", self.number),
            self.status().to_string(),
            format_percent(self.progress),
            format_date(self.starts_at.as_ref()),
            format_date(self.ends_at.as_ref()),
        ]
    }
}

impl Tabular for User {
    const COLUMNS: &'static [Column] = &[
        col("Name", 30),
        flex("Email", 35),
        col("Role", 6),
        col("Status", 8),
        col("Timezone", 25),
        col("Created", 10),
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.shown_name().to_string(),
            self.email.clone(),
            self.role().to_string(),
            self.status().to_string(),
            or_dash(self.timezone.as_deref()),
            format_date(self.created_at.as_ref()),
        ]
    }
}

impl Tabular for Label {
    const COLUMNS: &'static [Column] = &[
        col("Name", 30),
        col("Team", 10),
        col("Color", 9),
        flex("Description", 50),
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.scope().to_string(),
            self.color.clone(),
            self.description.clone().unwrap_or_default(),
        ]
    }
}
