//! Presentation: tables, detail views and JSON. Nothing here touches the network.

pub mod detail;
pub mod group;
pub mod paint;
pub mod table;

use std::io::IsTerminal;

use serde::Serialize;
use serde_json::{json, Map};

use crate::model::{Page, Resource};

pub use detail::Detail;
pub use group::GroupBy;
pub use table::Tabular;

/// Terminal columns when stdout is a terminal that reports its size.
pub fn terminal_width() -> Option<usize> {
    if !std::io::stdout().is_terminal() {
        return None;
    }
    crossterm::terminal::size()
        .ok()
        .map(|(cols, _)| usize::from(cols))
}

/// Colour only for a terminal, and never when `NO_COLOR` is set.
pub fn color_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

/// Aligned table with a total line, or a "no results" message for an empty page.
pub fn render_table<R: Tabular>(page: &Page<R>, max_width: Option<usize>, color: bool) -> String {
    if page.is_empty() {
        return format!("No {} found.", R::PLURAL);
    }

    let mut out = paint::paint_lines(&table::draw(&page.nodes, max_width), color);
    out.push_str("\n\n");
    out.push_str(&paint::dim(format!("Total: {} {}(s)", page.len(), R::NOUN), color));
    if let Some(hint) = next_page_hint(page) {
        out.push('\n');
        out.push_str(&paint::dim(hint, color));
    }
    out
}

fn next_page_hint<R>(page: &Page<R>) -> Option<String> {
    if !page.page_info.has_next_page {
        return None;
    }
    page.page_info
        .end_cursor
        .as_ref()
        .map(|cursor| format!("More results available: --after {cursor}"))
}

pub fn render_detail<R: Detail>(record: &R, color: bool) -> String {
    paint::paint_lines(&record.detail_lines(), color)
}

/// `{"<plural>": [...], "count": N, "page_info": {...}}`
pub fn render_json<R: Resource>(page: &Page<R>) -> serde_json::Result<String> {
    let mut out = Map::new();
    out.insert(R::PLURAL.to_string(), serde_json::to_value(&page.nodes)?);
    out.insert("count".into(), json!(page.len()));
    out.insert("page_info".into(), serde_json::to_value(&page.page_info)?);
    serde_json::to_string_pretty(&out)
}

pub fn render_record_json<R: Serialize>(record: &R) -> serde_json::Result<String> {
    serde_json::to_string_pretty(record)
}
