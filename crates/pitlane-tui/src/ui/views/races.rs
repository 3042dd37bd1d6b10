use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

use super::render_message;

/// Render the selected season's races.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let season = app
        .controller
        .selected_season
        .map(|s| format!("{} Races", s))
        .unwrap_or_else(|| "Races".to_string());

    let races = &app.controller.races;
    let Some(list) = races.ready() else {
        let message = races.message().unwrap_or("Select a season to view its races.");
        render_message(frame, area, &season, message, true);
        return;
    };

    let items: Vec<ListItem> = list
        .iter()
        .map(|race| ListItem::new(format!("  {}", race.label())).style(styles::list_item_style()))
        .collect();

    let widget = List::new(items)
        .block(
            Block::default()
                .title(format!(" {} ({}) - [Enter] results ", season, list.len()))
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .highlight_style(styles::selected_style());

    let mut state = ListState::default();
    state.select(Some(app.race_selection));
    frame.render_stateful_widget(widget, area, &mut state);
}
