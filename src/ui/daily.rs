use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::helpers::{NAME_WIDTH, clamp_name, format_duration};
use super::theme::Theme;
use crate::app::App;
use crate::clock::Clock;
use crate::service::Storage;
use crate::summary::{DailySummary, UNCATEGORIZED};

pub fn build_daily_text<S: Storage, C: Clock>(app: &App<S, C>) -> Text<'static> {
    let now = app.service.now();
    let summary = DailySummary::for_day_of(now, app.service.today_tasks());
    let mut lines = vec![
        Line::from(Span::styled(
            format!("  Daily Summary - {}", summary.date().format("%Y-%m-%d")),
            Style::default()
                .fg(Theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if !summary.has_data() {
        lines.push(Line::from(Span::styled(
            "  No tasks recorded today.",
            Style::default().fg(Theme::WARN),
        )));
        return Text::from(lines);
    }

    lines.push(Line::from(Span::styled(
        format!(
            "    {}{:<12}Category",
            clamp_name("Task Name", NAME_WIDTH),
            "Time Spent"
        ),
        Style::default().fg(Theme::DIM),
    )));
    for total in summary.task_totals(now) {
        let category = summary
            .category_of(&total.label)
            .and_then(|id| app.service.category(id))
            .map(|category| category.name.clone())
            .unwrap_or_else(|| UNCATEGORIZED.to_string());
        lines.push(Line::from(vec![
            Span::styled(
                format!("    {}", clamp_name(&total.label, NAME_WIDTH)),
                Style::default().fg(Theme::TEXT),
            ),
            Span::styled(
                format!("{:<12}", format_duration(total.duration)),
                Style::default().fg(Theme::ACCENT),
            ),
            Span::styled(category, Style::default().fg(Theme::HIGHLIGHT)),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(
            format!("    {}", clamp_name("Total", NAME_WIDTH)),
            Style::default().fg(Theme::DIM),
        ),
        Span::styled(
            format_duration(summary.total(now)),
            Style::default()
                .fg(Theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
    ]));

    Text::from(lines)
}
