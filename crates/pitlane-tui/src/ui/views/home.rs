use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

use super::render_message;

/// Render the season list.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let seasons = &app.controller.seasons;
    let Some(years) = seasons.ready() else {
        let message = seasons.message().unwrap_or("Loading...");
        render_message(frame, area, "Seasons", message, true);
        return;
    };

    let items: Vec<ListItem> = years
        .iter()
        .map(|year| ListItem::new(format!("  {} Season", year)).style(styles::list_item_style()))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(format!(" Seasons ({}) - [Enter] view races ", years.len()))
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .highlight_style(styles::selected_style());

    let mut state = ListState::default();
    state.select(Some(app.season_selection));
    frame.render_stateful_widget(list, area, &mut state);
}
