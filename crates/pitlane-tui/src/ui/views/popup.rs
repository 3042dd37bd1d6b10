use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use pitlane_core::favorites::FavoriteItem;
use pitlane_core::models::NOT_AVAILABLE;
use pitlane_core::utils::{format_date, format_optional};
use pitlane_core::{EntityDetail, EntityTarget, FavoriteKind, FavoritesCollection, Popup};

use crate::app::App;
use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;

use super::table;

pub fn render(frame: &mut Frame, app: &App, popup: &Popup) {
    match popup {
        Popup::Entity {
            target,
            detail,
            results,
        } => {
            let area = popup_area(frame.area());
            frame.render_widget(Clear, area);

            let block = Block::default()
                .title(format!(" {} ", target_title(target)))
                .title_style(styles::title_style())
                .title_bottom(Line::from(" [a] add to favorites | [Esc] close ").style(styles::muted_style()))
                .borders(Borders::ALL)
                .border_style(styles::border_style(true));
            let inner = block.inner(area);
            frame.render_widget(block, area);

            let detail_lines = match detail.ready() {
                Some(entity) => detail_lines(entity),
                None => vec![Line::from(Span::styled(
                    detail.message().unwrap_or("").to_string(),
                    styles::muted_style(),
                ))],
            };

            if matches!(target, EntityTarget::Circuit { .. }) {
                frame.render_widget(Paragraph::new(detail_lines), inner);
                return;
            }

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(detail_lines.len() as u16 + 1), Constraint::Min(4)])
                .split(inner);
            frame.render_widget(Paragraph::new(detail_lines), chunks[0]);

            let table_id = results.ready().map(|t| t.id);
            let title = match target {
                EntityTarget::Constructor { season, .. } => format!("{} Results", season),
                EntityTarget::Driver { season, .. } => format!("{} Results", season),
                EntityTarget::Circuit { .. } => String::new(),
            };
            let cursor = table_id.map(|id| app.cursor(id)).unwrap_or_default();
            table::render(frame, chunks[1], &title, results, cursor, true);
        }
        Popup::Favorites(favorites) => render_favorites(frame, favorites),
    }
}

fn popup_area(outer: Rect) -> Rect {
    let width = (outer.width * 4 / 5).max(40);
    let height = (outer.height * 4 / 5).max(12);
    centered_rect_fixed(width, height, outer)
}

fn target_title(target: &EntityTarget) -> &'static str {
    match target {
        EntityTarget::Driver { .. } => "Driver",
        EntityTarget::Constructor { .. } => "Constructor",
        EntityTarget::Circuit { .. } => "Circuit",
    }
}

fn field(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<13}", label), styles::muted_style()),
        Span::raw(value),
    ])
}

pub fn detail_lines(entity: &EntityDetail) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(entity.name(), styles::title_style()))];

    match entity {
        EntityDetail::Driver(d) => {
            lines.push(field("Code:", format_optional(&d.code, NOT_AVAILABLE)));
            lines.push(field("Number:", d.number.map(|n| n.to_string()).unwrap_or_else(|| NOT_AVAILABLE.to_string())));
            lines.push(field("Nationality:", format_optional(&d.nationality, NOT_AVAILABLE)));
            lines.push(field("Born:", d.dob.as_deref().map(format_date).unwrap_or_else(|| NOT_AVAILABLE.to_string())));
            lines.push(field("Biography:", format_optional(&d.url, NOT_AVAILABLE)));
        }
        EntityDetail::Constructor(c) => {
            lines.push(field("Nationality:", format_optional(&c.nationality, NOT_AVAILABLE)));
            lines.push(field("Biography:", format_optional(&c.url, NOT_AVAILABLE)));
        }
        EntityDetail::Circuit(c) => {
            lines.push(field("Location:", format_optional(&c.location, NOT_AVAILABLE)));
            lines.push(field("Country:", format_optional(&c.country, NOT_AVAILABLE)));
            if let (Some(lat), Some(lng)) = (c.lat, c.lng) {
                lines.push(field("Coordinates:", format!("{:.4}, {:.4}", lat, lng)));
            }
            lines.push(field("More info:", format_optional(&c.url, NOT_AVAILABLE)));
        }
    }

    lines
}

fn favorite_line(kind: FavoriteKind, item: &FavoriteItem) -> Line<'static> {
    let extra = match kind {
        FavoriteKind::Circuit => [item.location.as_deref(), item.country.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", "),
        FavoriteKind::Driver | FavoriteKind::Constructor => {
            item.nationality.clone().unwrap_or_default()
        }
    };

    let mut spans = vec![Span::raw(format!("  {}", item.name))];
    if !extra.is_empty() {
        spans.push(Span::styled(format!("  ({})", extra), styles::muted_style()));
    }
    Line::from(spans)
}

pub fn favorites_lines(favorites: &FavoritesCollection) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for kind in FavoriteKind::ALL {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(kind.title(), styles::highlight_style())));

        let items = favorites.list(kind);
        if items.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("  {}", kind.empty_message()),
                styles::muted_style(),
            )));
        } else {
            lines.extend(items.iter().map(|item| favorite_line(kind, item)));
        }
    }
    lines
}

fn render_favorites(frame: &mut Frame, favorites: &FavoritesCollection) {
    let area = popup_area(frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Favorites ")
        .title_style(styles::title_style())
        .title_bottom(Line::from(" [x] clear all | [Esc] close ").style(styles::muted_style()))
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(favorites_lines(favorites)).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_empty_favorites_show_messages() {
        let lines = favorites_lines(&FavoritesCollection::default());
        let text: Vec<String> = lines.iter().map(line_text).collect();
        assert!(text.contains(&"  No favorite drivers added.".to_string()));
        assert!(text.contains(&"  No favorite constructors added.".to_string()));
        assert!(text.contains(&"  No favorite circuits added.".to_string()));
    }

    #[test]
    fn test_favorite_circuit_shows_place() {
        let item = FavoriteItem::new(3, "Bahrain International Circuit")
            .with_place(Some("Sakhir".to_string()), Some("Bahrain".to_string()));
        let line = favorite_line(FavoriteKind::Circuit, &item);
        assert_eq!(line_text(&line), "  Bahrain International Circuit  (Sakhir, Bahrain)");
    }
}
