use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use pitlane_core::tables::EntityTable;
use pitlane_core::LoadState;

use crate::app::TableCursor;
use crate::ui::styles;

use super::render_message;

/// Header text with the sort glyph appended when the column is active.
pub fn header_label(title: &str, glyph: &str) -> String {
    if glyph.is_empty() {
        title.to_string()
    } else {
        format!("{} {}", title, glyph)
    }
}

pub fn column_width(key: &str) -> Constraint {
    match key {
        "position" | "round" => Constraint::Length(5),
        "points" => Constraint::Length(6),
        "q1" | "q2" | "q3" | "time" => Constraint::Length(12),
        _ => Constraint::Fill(1),
    }
}

/// Render a sortable table, or its state message while it has no rows.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    state: &LoadState<EntityTable>,
    cursor: TableCursor,
    focused: bool,
) {
    let Some(table) = state.ready() else {
        let message = state.message().unwrap_or("");
        render_message(frame, area, title, message, focused);
        return;
    };

    let header_cells: Vec<Cell> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let style = if focused && i == cursor.column {
                styles::column_cursor_style()
            } else if column.sortable {
                styles::title_style()
            } else {
                styles::muted_style()
            };
            Cell::from(header_label(&column.title, table.indicator(i))).style(style)
        })
        .collect();

    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = table
        .rows
        .iter()
        .map(|row| {
            let cells: Vec<Cell> = table
                .columns
                .iter()
                .map(|column| Cell::from(row.text(&column.key).unwrap_or("").to_string()))
                .collect();
            Row::new(cells).style(styles::list_item_style())
        })
        .collect();

    let widths: Vec<Constraint> = table.columns.iter().map(|c| column_width(&c.key)).collect();

    let hint = if focused { " - [s]ort" } else { "" };
    let widget = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(" {} ({}){} ", title, table.rows.len(), hint))
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(focused)),
        )
        .row_highlight_style(styles::selected_style());

    let mut table_state = TableState::default();
    if focused {
        table_state.select(Some(cursor.row));
    }
    frame.render_stateful_widget(widget, area, &mut table_state);
}
