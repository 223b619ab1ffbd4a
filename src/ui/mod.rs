mod categories;
mod daily;
mod help;
mod helpers;
mod log;
mod theme;
mod tracker;
mod weeks;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    prelude::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::app::{App, AppView, ConfirmPopup, DeleteFlow, NewCategoryPopup, NewTaskField, NewTaskPopup, TABS};
use crate::clock::Clock;
use crate::service::Storage;
use crate::types::{Category, TaskStatus};
use theme::Theme;

use helpers::marker_style;

pub use helpers::{NAME_WIDTH, clamp_name, format_duration};

/// Rows of the four-week summary before scrolling; bounds its scroll offset.
pub fn window_line_count<S: Storage, C: Clock>(app: &App<S, C>) -> usize {
    weeks::window_lines(app).len()
}

/// Renders the entire UI for a single frame.
pub fn draw<S: Storage, C: Clock>(frame: &mut Frame, app: &App<S, C>) {
    let area = frame.area();
    let (title, body_text) = match app.view {
        AppView::Tracker => (" Tracker ", tracker::build_tracker_text(app)),
        AppView::Today => (" Today ", daily::build_daily_text(app)),
        AppView::Weeks => (" Weeks ", weeks::build_weeks_text(app)),
        AppView::Window => (" Four-Week Summary ", weeks::build_window_text(app)),
        AppView::Log => (" Log ", log::build_log_text(app)),
        AppView::Categories => (" Categories ", categories::build_categories_text(app)),
        AppView::Help => (" Help ", help::build_help_text()),
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(area);

    let header_lines = vec![Line::from(vec![
        Span::styled(
            "  Taskman  ",
            Style::default().fg(Color::Black).bg(Theme::PRIMARY),
        ),
        Span::raw(" "),
        Span::styled(
            "task timer",
            Style::default()
                .fg(Theme::SECONDARY)
                .add_modifier(Modifier::BOLD),
        ),
    ])];
    let header = Paragraph::new(Text::from(header_lines))
        .alignment(Alignment::Left)
        .block(bordered());
    frame.render_widget(header, layout[0]);

    let mut body_lines = vec![
        tabs_line(app),
        Line::from(""),
        Line::from(Span::styled(
            format!("  {title}"),
            Style::default()
                .fg(Theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    body_lines.extend(body_text.lines);
    body_lines.push(Line::from(""));
    if let Some(status) = &app.status {
        body_lines.push(Line::from(Span::styled(
            format!("  {status}"),
            Style::default().fg(Theme::WARN),
        )));
    }
    body_lines.push(Line::from(Span::styled(
        "----------------------------------------",
        Style::default().fg(Theme::DIM),
    )));
    body_lines.extend(keybinds_lines(&app.view));
    let body = Paragraph::new(Text::from(body_lines))
        .style(Style::default().fg(Theme::TEXT))
        .alignment(Alignment::Left)
        .block(bordered());
    frame.render_widget(body, layout[1]);

    let footer = Paragraph::new(Text::from(current_task_line(app)))
        .alignment(Alignment::Left)
        .block(bordered());
    frame.render_widget(footer, layout[2]);

    if let Some(popup) = &app.new_task_popup {
        render_new_task_popup(frame, popup, app.service.categories());
    }
    if let Some(popup) = &app.new_category_popup {
        render_new_category_popup(frame, popup);
    }
    if let Some(flow) = &app.delete_flow {
        render_delete_popup(frame, flow, app);
    }
    if let Some(popup) = &app.confirm_popup {
        render_confirm_popup(frame, popup);
    }
}

fn bordered() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(Theme::SECONDARY))
}

fn field_title_style(active: bool) -> Style {
    if active {
        Style::default()
            .fg(Theme::HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Theme::DIM)
    }
}

fn render_new_task_popup(frame: &mut Frame, popup: &NewTaskPopup, categories: &[Category]) {
    let area = centered_rect(70, 70, frame.area());
    frame.render_widget(Clear, area);

    let name_active = popup.field == NewTaskField::Name;
    let category_active = popup.field == NewTaskField::Category;
    let new_category_active = popup.field == NewTaskField::NewCategory;

    let mut lines = vec![
        Line::from(Span::styled(
            "New task",
            Style::default()
                .fg(Theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(if name_active { "> " } else { "  " }, marker_style(true)),
            Span::styled("Name: ", field_title_style(name_active)),
            Span::styled(
                popup.name.as_str(),
                Style::default().fg(Theme::TEXT).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(if category_active { "> " } else { "  " }, marker_style(true)),
            Span::styled("Category", field_title_style(category_active)),
        ]),
    ];
    for (index, category) in categories.iter().enumerate() {
        let selected = index == popup.category_index;
        let name_style = if selected {
            Style::default().fg(Theme::TEXT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Theme::TEXT)
        };
        lines.push(Line::from(vec![
            Span::styled(if selected { "    > " } else { "      " }, marker_style(selected)),
            Span::styled(category.name.as_str(), name_style),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(if new_category_active { "> " } else { "  " }, marker_style(true)),
        Span::styled("Or new category: ", field_title_style(new_category_active)),
        Span::styled(popup.new_category.as_str(), Style::default().fg(Theme::TEXT)),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Type to edit. Tab: switch field. Up/Down: select. Enter: start. Esc: cancel.",
        Style::default().fg(Theme::DIM),
    )));

    let widget = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Left)
        .block(bordered().title(" New Task "));
    frame.render_widget(widget, area);
}

fn render_new_category_popup(frame: &mut Frame, popup: &NewCategoryPopup) {
    let area = centered_rect(60, 30, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled(
            "New category",
            Style::default()
                .fg(Theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Name: ", Style::default().fg(Theme::DIM)),
            Span::styled(
                popup.name.as_str(),
                Style::default()
                    .fg(Theme::HIGHLIGHT)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Type to edit. Enter: save. Esc: cancel.",
            Style::default().fg(Theme::DIM),
        )),
    ];

    let widget = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Left)
        .block(bordered().title(" New Category "));
    frame.render_widget(widget, area);
}

fn render_delete_popup<S: Storage, C: Clock>(frame: &mut Frame, flow: &DeleteFlow, app: &App<S, C>) {
    let area = centered_rect(70, 60, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = Vec::new();
    match flow {
        DeleteFlow::Day { days, index } => {
            lines.push(Line::from(Span::styled(
                "Select a day",
                Style::default()
                    .fg(Theme::DANGER)
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
            for (position, day) in days.iter().enumerate() {
                let selected = position == *index;
                lines.push(Line::from(vec![
                    Span::styled(if selected { "> " } else { "  " }, marker_style(selected)),
                    Span::styled(
                        day.format("%Y-%m-%d (%A)").to_string(),
                        Style::default().fg(Theme::TEXT),
                    ),
                ]));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Up/Down: select. Enter: show entries. Esc: cancel.",
                Style::default().fg(Theme::DIM),
            )));
        }
        DeleteFlow::Entry {
            day,
            entries,
            index,
        } => {
            lines.push(Line::from(Span::styled(
                format!("Entries on {}", day.format("%Y-%m-%d")),
                Style::default()
                    .fg(Theme::DANGER)
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
            let now = app.service.now();
            for (position, id) in entries.iter().enumerate() {
                let Some(record) = app.service.logs().iter().find(|log| log.id == *id) else {
                    continue;
                };
                let selected = position == *index;
                lines.push(Line::from(vec![
                    Span::styled(if selected { "> " } else { "  " }, marker_style(selected)),
                    Span::styled(
                        format!(
                            "{} | {} | {} | ",
                            record.id,
                            record.start_time.format("%H:%M"),
                            record.name
                        ),
                        Style::default().fg(Theme::TEXT),
                    ),
                    Span::styled(
                        format_duration(record.duration(now)),
                        Style::default().fg(Theme::ACCENT),
                    ),
                ]));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Up/Down: select. Enter: delete. Esc: back to days.",
                Style::default().fg(Theme::DIM),
            )));
        }
    }

    let widget = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Left)
        .block(bordered().title(" Delete Entry "));
    frame.render_widget(widget, area);
}

fn render_confirm_popup(frame: &mut Frame, popup: &ConfirmPopup) {
    let area = centered_rect(60, 30, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled(
            "Confirm Action",
            Style::default()
                .fg(Theme::DANGER)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            popup.message.as_str(),
            Style::default().fg(Theme::TEXT),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", Style::default().fg(Theme::DIM)),
            Span::styled("Y", Style::default().fg(Theme::HIGHLIGHT).add_modifier(Modifier::BOLD)),
            Span::styled(" to confirm or ", Style::default().fg(Theme::DIM)),
            Span::styled("N", Style::default().fg(Theme::HIGHLIGHT).add_modifier(Modifier::BOLD)),
            Span::styled("/", Style::default().fg(Theme::DIM)),
            Span::styled("ESC", Style::default().fg(Theme::HIGHLIGHT).add_modifier(Modifier::BOLD)),
            Span::styled(" to cancel", Style::default().fg(Theme::DIM)),
        ]),
    ];

    let widget = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Center)
        .block(bordered().title(" Confirm "));
    frame.render_widget(widget, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn tabs_line<S: Storage, C: Clock>(app: &App<S, C>) -> Line<'static> {
    let mut spans = Vec::new();
    for (index, (name, view)) in TABS.iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw("  "));
        }
        let active = match app.view {
            AppView::Window => *view == AppView::Weeks,
            _ => *view == app.view,
        };
        let style = if active {
            Style::default()
                .fg(Color::Black)
                .bg(Theme::HIGHLIGHT)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Theme::DIM)
        };
        spans.push(Span::styled(format!(" {name} "), style));
    }

    Line::from(spans)
}

fn current_task_line<S: Storage, C: Clock>(app: &App<S, C>) -> Line<'static> {
    let Some(task) = app.service.current_task() else {
        return Line::from(Span::styled(
            "● No task running",
            Style::default().fg(Theme::DIM),
        ));
    };

    let now = app.service.now();
    let (indicator, label, color) = match task.status() {
        TaskStatus::Running => {
            let spinner = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
            let frame = (now.timestamp().rem_euclid(spinner.len() as i64)) as usize;
            (spinner[frame], "Running", Theme::ACTIVE)
        }
        _ => ('‖', "Paused", Theme::WARN),
    };

    Line::from(vec![
        Span::styled(
            format!("{indicator} "),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{} > ", task.name),
            Style::default()
                .fg(Theme::TEXT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{label} {}", format_duration(task.duration(now))),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ])
}

fn keybinds_lines(view: &AppView) -> Vec<Line<'static>> {
    let (primary, secondary) = match view {
        AppView::Tracker => (
            "n: New task  space: Pause/Resume  f: Complete  x: Discard",
            "h/t/w/l/c: Quick nav  ?: Help  q: Quit",
        ),
        AppView::Today => ("h/t/w/l/c: Quick nav", "esc: Back  ?: Help  q: Quit"),
        AppView::Weeks => (
            "Up/Down: Select  Enter: Four-week summary",
            "esc: Back  ?: Help  q: Quit",
        ),
        AppView::Window => ("Up/Down: Scroll  d: Delete an entry", "esc: Back  ?: Help  q: Quit"),
        AppView::Log => ("Up/Down: Select  d: Delete", "esc: Back  ?: Help  q: Quit"),
        AppView::Categories => ("Up/Down: Select  n: New", "esc: Back  ?: Help  q: Quit"),
        AppView::Help => ("Press ? or ESC to close this help screen", ""),
    };
    vec![
        Line::from(Span::styled(
            "Left/Right: Switch tabs",
            Style::default().fg(Theme::HIGHLIGHT),
        )),
        Line::from(Span::styled(primary, Style::default().fg(Theme::DIM))),
        Line::from(Span::styled(secondary, Style::default().fg(Theme::DIM))),
    ]
}
