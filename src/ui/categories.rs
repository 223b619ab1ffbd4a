use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::helpers::marker_style;
use super::theme::Theme;
use crate::app::App;
use crate::clock::Clock;
use crate::service::Storage;

pub fn build_categories_text<S: Storage, C: Clock>(app: &App<S, C>) -> Text<'static> {
    let categories = app.service.categories();
    if categories.is_empty() {
        return Text::from("No categories found. Press 'n' to create one.");
    }

    let lines = categories
        .iter()
        .enumerate()
        .map(|(index, category)| {
            let selected = index == app.selected_category_index;
            Line::from(vec![
                Span::styled(if selected { "> " } else { "  " }, marker_style(selected)),
                Span::styled(format!("{:>3}. ", category.id), Style::default().fg(Theme::DIM)),
                Span::styled(
                    category.name.clone(),
                    Style::default().fg(Theme::TEXT).add_modifier(Modifier::BOLD),
                ),
            ])
        })
        .collect::<Vec<_>>();

    Text::from(lines)
}
