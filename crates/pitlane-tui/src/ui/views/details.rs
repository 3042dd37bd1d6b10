use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use pitlane_core::models::Race;
use pitlane_core::utils::format_date;
use pitlane_core::TableId;

use crate::app::App;
use crate::ui::styles;

use super::{render_message, table};

/// Render the selected race: heading, then results and qualifying tables.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref race) = app.controller.selected_race else {
        render_message(frame, area, "Race Details", "Select a race to view its results.", true);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(6)])
        .split(area);

    render_heading(frame, race, chunks[0]);

    let tables = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    // Focus belongs to the popup while one is open
    let popup_open = app.controller.popup.is_some();
    let focused = |id: TableId| !popup_open && app.detail_focus == id;

    table::render(
        frame,
        tables[0],
        TableId::RaceResults.title(),
        &app.controller.results,
        app.cursor(TableId::RaceResults),
        focused(TableId::RaceResults),
    );
    table::render(
        frame,
        tables[1],
        TableId::Qualifying.title(),
        &app.controller.qualifying,
        app.cursor(TableId::Qualifying),
        focused(TableId::Qualifying),
    );
}

fn render_heading(frame: &mut Frame, race: &Race, area: Rect) {
    let place: Vec<&str> = [race.circuit.location.as_deref(), race.circuit.country.as_deref()]
        .into_iter()
        .flatten()
        .collect();

    let lines = vec![
        Line::from(vec![
            Span::styled(race.name.clone(), styles::title_style()),
            Span::styled(format!("   {}", race.heading()), styles::muted_style()),
        ]),
        Line::from(vec![
            Span::styled("Circuit: ", styles::muted_style()),
            Span::styled(race.circuit.name.clone(), styles::highlight_style()),
            Span::raw(if place.is_empty() { String::new() } else { format!(", {}", place.join(", ")) }),
            Span::styled("  [i] info", styles::muted_style()),
        ]),
        Line::from(vec![
            Span::styled("Date:    ", styles::muted_style()),
            Span::raw(format_date(&race.date)),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
