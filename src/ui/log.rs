use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::helpers::{NAME_WIDTH, clamp_name, format_duration, marker_style};
use super::theme::Theme;
use crate::app::App;
use crate::clock::Clock;
use crate::service::Storage;
use crate::summary::UNCATEGORIZED;

pub fn build_log_text<S: Storage, C: Clock>(app: &App<S, C>) -> Text<'static> {
    let entries = app.log_entries();
    if entries.is_empty() {
        return Text::from("  No entries recorded yet.");
    }

    let now = app.service.now();
    let lines = entries
        .iter()
        .enumerate()
        .map(|(index, log)| {
            let selected = index == app.selected_log_index;
            let category = app
                .service
                .category(log.category_id)
                .map(|category| category.name.clone())
                .unwrap_or_else(|| UNCATEGORIZED.to_string());
            Line::from(vec![
                Span::styled(if selected { "> " } else { "  " }, marker_style(selected)),
                Span::styled(format!("{:>4} ", log.id), Style::default().fg(Theme::DIM)),
                Span::styled(
                    log.start_time.format("%Y-%m-%d %H:%M  ").to_string(),
                    Style::default().fg(Theme::TEXT),
                ),
                Span::styled(
                    clamp_name(&log.name, NAME_WIDTH),
                    Style::default().fg(Theme::TEXT).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("{}  ", format_duration(log.duration(now))),
                    Style::default().fg(Theme::ACCENT),
                ),
                Span::styled(category, Style::default().fg(Theme::HIGHLIGHT)),
            ])
        })
        .collect::<Vec<_>>();

    Text::from(lines)
}
