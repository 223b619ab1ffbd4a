use chrono::Duration;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use super::theme::Theme;
use crate::summary::Total;

pub const NAME_WIDTH: usize = 28;

/// `hh:mm:ss`; hours keep growing past a day. Negative spans show as zero.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

pub fn clamp_name(value: &str, width: usize) -> String {
    let value_len = value.chars().count();
    if value_len <= width {
        return format!("{value:<width$}", width = width);
    }
    let trimmed = value
        .chars()
        .take(width.saturating_sub(2))
        .collect::<String>();
    format!("{trimmed}..")
}

/// The `>` column of a selectable list.
pub fn marker_style(selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(Theme::SELECTION_MARKER)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Theme::DIM)
    }
}

/// The label of a selectable list row.
pub fn label_style(selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(Theme::HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Theme::TEXT)
    }
}

pub fn section_title(title: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {}", title.into()),
        Style::default()
            .fg(Theme::SECONDARY)
            .add_modifier(Modifier::BOLD),
    ))
}

/// Two-column table of labels and their summed time.
pub fn totals_lines(heading: &str, totals: &[Total]) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("    {}", clamp_name(heading, NAME_WIDTH)),
            Style::default().fg(Theme::DIM),
        ),
        Span::styled("Time Spent", Style::default().fg(Theme::DIM)),
    ])];
    if totals.is_empty() {
        lines.push(Line::from(Span::styled(
            "    No entries.",
            Style::default().fg(Theme::DIM),
        )));
    }
    for total in totals {
        lines.push(Line::from(vec![
            Span::styled(
                format!("    {}", clamp_name(&total.label, NAME_WIDTH)),
                Style::default().fg(Theme::TEXT),
            ),
            Span::styled(
                format_duration(total.duration),
                Style::default().fg(Theme::ACCENT),
            ),
        ]));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_hours_minutes_seconds() {
        assert_eq!(format_duration(Duration::seconds(3_725)), "01:02:05");
        assert_eq!(format_duration(Duration::hours(27)), "27:00:00");
        assert_eq!(format_duration(Duration::seconds(-5)), "00:00:00");
    }

    #[test]
    fn clamps_long_names() {
        assert_eq!(clamp_name("abc", 5), "abc  ");
        assert_eq!(clamp_name("abcdefgh", 5), "abc..");
    }
}
