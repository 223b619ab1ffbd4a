use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::helpers::{format_duration, section_title};
use super::theme::Theme;
use crate::app::App;
use crate::clock::Clock;
use crate::service::Storage;
use crate::summary::{DailySummary, UNCATEGORIZED};
use crate::types::TaskStatus;

pub fn build_tracker_text<S: Storage, C: Clock>(app: &App<S, C>) -> Text<'static> {
    let now = app.service.now();
    let mut lines = Vec::new();

    lines.push(Line::from(Span::styled(
        format!("  {}", now.format("%A, %B %e, %Y")),
        Style::default()
            .fg(Theme::ACCENT)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));
    lines.push(section_title("Current Task"));
    lines.push(Line::from(Span::styled(
        "  ─────────────",
        Style::default().fg(Theme::DIM),
    )));

    match app.service.current_task() {
        Some(task) => {
            let category = app
                .service
                .category(task.category_id)
                .map(|category| category.name.clone())
                .unwrap_or_else(|| UNCATEGORIZED.to_string());
            let (marker, state_color) = match task.status() {
                TaskStatus::Running => ("  ● ", Theme::ACTIVE),
                _ => ("  ‖ ", Theme::WARN),
            };
            lines.push(Line::from(vec![
                Span::styled(
                    marker,
                    Style::default().fg(state_color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    task.name.clone(),
                    Style::default()
                        .fg(Theme::TEXT)
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
            lines.push(Line::from(vec![
                Span::raw("    "),
                Span::styled("Category: ", Style::default().fg(Theme::DIM)),
                Span::styled(category, Style::default().fg(Theme::HIGHLIGHT)),
                Span::raw("  "),
                Span::styled("State: ", Style::default().fg(Theme::DIM)),
                Span::styled(task.status().to_string(), Style::default().fg(state_color)),
            ]));
            lines.push(Line::from(vec![
                Span::raw("    "),
                Span::styled("Elapsed: ", Style::default().fg(Theme::DIM)),
                Span::styled(
                    format_duration(task.duration(now)),
                    Style::default().fg(state_color).add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled("Started: ", Style::default().fg(Theme::DIM)),
                Span::styled(
                    task.start_time.format("%H:%M").to_string(),
                    Style::default().fg(Theme::TEXT),
                ),
            ]));
        }
        None => {
            lines.push(Line::from(Span::styled(
                "  No task in progress. Press 'n' to start one.",
                Style::default().fg(Theme::DIM),
            )));
        }
    }
    lines.push(Line::from(""));

    let today = DailySummary::for_day_of(now, app.service.today_tasks());
    lines.push(section_title("Today"));
    lines.push(Line::from(Span::styled(
        "  ─────",
        Style::default().fg(Theme::DIM),
    )));
    lines.push(Line::from(vec![
        Span::styled("    Completed: ", Style::default().fg(Theme::DIM)),
        Span::styled(
            app.service.today_tasks().len().to_string(),
            Style::default().fg(Theme::ACCENT),
        ),
        Span::raw("  "),
        Span::styled("Tracked: ", Style::default().fg(Theme::DIM)),
        Span::styled(
            format_duration(today.total(now)),
            Style::default().fg(Theme::ACCENT),
        ),
    ]));

    Text::from(lines)
}
