use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::theme::Theme;

pub fn build_help_text() -> Text<'static> {
    let mut lines = Vec::new();

    lines.push(Line::from(Span::styled(
        "Key bindings",
        Style::default()
            .fg(Theme::ACCENT)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    lines.push(section_title("Global"));
    lines.extend(section_lines(&[
        "q: Quit (asks first while a task is in progress)",
        "?: Toggle help",
        "Left/Right: Switch tabs",
        "h/t/w/l/c: Tracker, Today, Weeks, Log, Categories",
        "esc: Back",
    ]));

    lines.push(Line::from(""));
    lines.push(section_title("Tracker"));
    lines.extend(section_lines(&[
        "n: Start a new task",
        "space: Pause/Resume",
        "f: Complete",
        "x: Discard",
    ]));

    lines.push(Line::from(""));
    lines.push(section_title("Weeks"));
    lines.extend(section_lines(&[
        "Up/Down: Select week",
        "Enter: Show four weeks starting at the selection",
        "Up/Down (in the four-week summary): Scroll",
        "d: Delete an entry (pick day, then entry)",
    ]));

    lines.push(Line::from(""));
    lines.push(section_title("Log"));
    lines.extend(section_lines(&["Up/Down: Select entry", "d: Delete entry"]));

    lines.push(Line::from(""));
    lines.push(section_title("Categories"));
    lines.extend(section_lines(&["n: New category"]));

    Text::from(lines)
}

fn section_title(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default()
            .fg(Theme::HIGHLIGHT)
            .add_modifier(Modifier::BOLD),
    ))
}

fn section_lines(items: &[&'static str]) -> Vec<Line<'static>> {
    items
        .iter()
        .map(|item| {
            Line::from(Span::styled(
                format!("  {item}"),
                Style::default().fg(Theme::TEXT),
            ))
        })
        .collect()
}
