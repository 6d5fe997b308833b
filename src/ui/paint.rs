//! Styled lines to text, with ANSI escapes written by crossterm when colour is on.

use crossterm::style::{Attribute, Color as TermColor, ContentStyle};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

pub fn paint(line: &Line<'_>, color: bool) -> String {
    if !color {
        return line.to_string();
    }
    line.spans
        .iter()
        .map(|span| paint_span(span, line.style.patch(span.style)))
        .collect()
}

pub fn paint_lines(lines: &[Line<'_>], color: bool) -> String {
    lines
        .iter()
        .map(|line| paint(line, color))
        .collect::<Vec<_>>()
        .join("\n")
}

fn paint_span(span: &Span<'_>, style: Style) -> String {
    let content = span.content.as_ref();
    if style == Style::default() || content.is_empty() {
        return content.to_string();
    }

    let mut styled = ContentStyle::new();
    styled.foreground_color = style.fg.and_then(term_color);
    styled.background_color = style.bg.and_then(term_color);
    for (modifier, attribute) in [
        (Modifier::BOLD, Attribute::Bold),
        (Modifier::DIM, Attribute::Dim),
        (Modifier::ITALIC, Attribute::Italic),
        (Modifier::UNDERLINED, Attribute::Underlined),
    ] {
        if style.add_modifier.contains(modifier) {
            styled.attributes.set(attribute);
        }
    }
    styled.apply(content).to_string()
}

fn term_color(color: Color) -> Option<TermColor> {
    let mapped = match color {
        Color::Reset => return None,
        Color::Black => TermColor::Black,
        Color::Red => TermColor::DarkRed,
        Color::Green => TermColor::DarkGreen,
        Color::Yellow => TermColor::DarkYellow,
        Color::Blue => TermColor::DarkBlue,
        Color::Magenta => TermColor::DarkMagenta,
        Color::Cyan => TermColor::DarkCyan,
        Color::Gray => TermColor::Grey,
        Color::DarkGray => TermColor::DarkGrey,
        Color::LightRed => TermColor::Red,
        Color::LightGreen => TermColor::Green,
        Color::LightYellow => TermColor::Yellow,
        Color::LightBlue => TermColor::Blue,
        Color::LightMagenta => TermColor::Magenta,
        Color::LightCyan => TermColor::Cyan,
        Color::White => TermColor::White,
        Color::Rgb(r, g, b) => TermColor::Rgb { r, g, b },
        Color::Indexed(i) => TermColor::AnsiValue(i),
    };
    Some(mapped)
}

/// Dim one-off text such as totals and hints.
pub fn dim(text: impl Into<String>, color: bool) -> String {
    let text = text.into();
    if !color {
        return text;
    }
    let mut style = ContentStyle::new();
    style.attributes.set(Attribute::Dim);
    style.apply(text).to_string()
}
