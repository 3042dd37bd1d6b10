//! Per-view content rendering.

pub mod details;
pub mod home;
pub mod popup;
pub mod races;
pub mod table;

use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::styles;

/// Bordered panel showing only a message (loading, empty or failed).
pub fn render_message(frame: &mut Frame, area: Rect, title: &str, message: &str, focused: bool) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let paragraph = Paragraph::new(message.to_string())
        .style(styles::muted_style())
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(paragraph, area);
}
