use chrono::Duration;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::helpers::{format_duration, label_style, marker_style, section_title, totals_lines};
use super::theme::Theme;
use crate::app::App;
use crate::clock::Clock;
use crate::service::Storage;
use crate::summary::RollingWindow;

pub fn build_weeks_text<S: Storage, C: Clock>(app: &App<S, C>) -> Text<'static> {
    let groups = app.service.weekly_groups();
    if groups.is_empty() {
        return Text::from(Line::from(Span::styled(
            "  No weekly data available.",
            Style::default().fg(Theme::WARN),
        )));
    }

    let now = app.service.now();
    let mut lines = vec![
        Line::from(Span::styled(
            "  Select a week:",
            Style::default()
                .fg(Theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for (index, group) in groups.iter().enumerate() {
        let selected = index == app.selected_week_index;
        let total = group
            .records
            .iter()
            .fold(Duration::zero(), |acc, record| acc + record.duration(now));
        lines.push(Line::from(vec![
            Span::styled(if selected { "  > " } else { "    " }, marker_style(selected)),
            Span::styled(group.window.label(), label_style(selected)),
            Span::styled(
                format!("  {:>3} entries  ", group.records.len()),
                Style::default().fg(Theme::DIM),
            ),
            Span::styled(format_duration(total), Style::default().fg(Theme::ACCENT)),
        ]));
    }
    Text::from(lines)
}

/// The four-week summary, scrolled down by `app.window_scroll` rows.
pub fn build_window_text<S: Storage, C: Clock>(app: &App<S, C>) -> Text<'static> {
    let mut lines = window_lines(app);
    let scroll = app.window_scroll.min(lines.len().saturating_sub(1));
    lines.drain(..scroll);
    Text::from(lines)
}

pub fn window_lines<S: Storage, C: Clock>(app: &App<S, C>) -> Vec<Line<'static>> {
    let groups = app.service.weekly_groups();
    let Some(window) = RollingWindow::select(&groups, app.window_start_index) else {
        return vec![Line::from(Span::styled(
            "  No weekly data available.",
            Style::default().fg(Theme::WARN),
        ))];
    };

    let now = app.service.now();
    let categories = app.service.categories();
    let (oldest, newest) = window.range();
    let mut lines = vec![Line::from(Span::styled(
        format!(
            "  TOTAL AGGREGATES ({} to {})",
            oldest.format("%Y-%m-%d"),
            newest.format("%Y-%m-%d")
        ),
        Style::default()
            .fg(Theme::WARN)
            .add_modifier(Modifier::BOLD),
    ))];
    lines.push(Line::from(""));
    lines.extend(totals_lines("Category", &window.category_totals(categories, now)));
    lines.push(Line::from(""));
    lines.extend(totals_lines("Task", &window.task_totals(now)));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(
        "  WEEKLY BREAKDOWN",
        Style::default()
            .fg(Theme::SECONDARY)
            .add_modifier(Modifier::BOLD),
    )));
    for week in window.weeks() {
        lines.push(Line::from(""));
        lines.push(section_title(format!("Week {}", week.window.label())));
        lines.extend(totals_lines("Category", &week.category_totals(categories, now)));
        lines.extend(totals_lines("Task", &week.task_totals(now)));
    }

    lines
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, Local, TimeZone};

    use super::*;
    use crate::clock::FakeClock;
    use crate::service::{MemoryStorage, TaskService};
    use crate::types::TaskRecord;

    fn at(day: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, day, 9, 0, 0).unwrap()
    }

    fn app() -> App<MemoryStorage, FakeClock> {
        let logs = [(1, 4), (2, 12), (3, 19)]
            .into_iter()
            .map(|(id, day)| {
                let mut task = TaskRecord::started(id, format!("Task {id}"), 1, at(day));
                task.complete_at(at(day) + Duration::minutes(20));
                task
            })
            .collect();
        let storage = MemoryStorage {
            logs,
            ..MemoryStorage::default()
        };
        App::new(TaskService::new(storage, FakeClock::at(at(20))).unwrap())
    }

    #[test]
    fn window_lists_every_week_in_breakdown() {
        let app = app();
        let text: Vec<String> = window_lines(&app).iter().map(|line| line.to_string()).collect();
        assert!(text[0].contains("TOTAL AGGREGATES (2024-03-04 to 2024-03-24)"));
        let weeks = text.iter().filter(|line| line.contains("Week 2024-")).count();
        assert_eq!(weeks, 3);
    }

    #[test]
    fn scrolling_drops_leading_rows() {
        let mut app = app();
        let all = window_lines(&app);
        app.window_scroll = 2;
        assert_eq!(build_window_text(&app).lines, all[2..].to_vec());

        app.window_scroll = all.len() + 10;
        assert_eq!(build_window_text(&app).lines, vec![all[all.len() - 1].clone()]);
    }
}
