//! Keyboard input handling for the TUI.
//!
//! Translates key events into `App` actions. Overlays take precedence over
//! popups, popups over the current view.

use crossterm::event::{KeyCode, KeyEvent};

use pitlane_core::{Popup, View};

use crate::app::{App, AppState, PAGE_SCROLL_SIZE};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    match app.state {
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            return false;
        }
        AppState::ConfirmingQuit => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    app.state = AppState::Quitting;
                    return true;
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.state = AppState::Normal;
                }
                _ => {}
            }
            return false;
        }
        AppState::Quitting => return true,
        AppState::Normal => {}
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return false;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return false;
        }
        KeyCode::Esc => {
            app.go_back();
            return false;
        }
        KeyCode::Char('f') => {
            app.show_favorites();
            return false;
        }
        _ => {}
    }

    match app.controller.popup {
        Some(Popup::Entity { .. }) => handle_entity_popup_input(app, key),
        Some(Popup::Favorites(_)) => handle_favorites_input(app, key),
        None => handle_view_input(app, key),
    }

    false
}

/// Row, column and sort keys shared by every table.
fn handle_table_keys(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.move_row(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_row(1),
        KeyCode::PageUp => app.move_row(-(PAGE_SCROLL_SIZE as isize)),
        KeyCode::PageDown => app.move_row(PAGE_SCROLL_SIZE as isize),
        KeyCode::Left | KeyCode::Char('[') => app.move_column(-1),
        KeyCode::Right | KeyCode::Char(']') => app.move_column(1),
        KeyCode::Char('s') => app.sort_active_column(),
        _ => return false,
    }
    true
}

fn handle_entity_popup_input(app: &mut App, key: KeyEvent) {
    if handle_table_keys(app, key) {
        return;
    }
    if key.code == KeyCode::Char('a') {
        app.add_popup_to_favorites();
    }
}

fn handle_favorites_input(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('x') {
        app.clear_favorites();
    }
}

fn handle_view_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('h') => return app.show_view(View::Home),
        KeyCode::Char('r') => return app.show_view(View::RacesList),
        _ => {}
    }

    match app.controller.view() {
        View::Home | View::RacesList => handle_list_input(app, key),
        View::RaceDetails => handle_details_input(app, key),
    }
}

fn handle_list_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.move_list_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_list_selection(1),
        KeyCode::PageUp => app.move_list_selection(-(PAGE_SCROLL_SIZE as isize)),
        KeyCode::PageDown => app.move_list_selection(PAGE_SCROLL_SIZE as isize),
        KeyCode::Enter => match app.controller.view() {
            View::Home => app.select_current_season(),
            View::RacesList => app.select_current_race(),
            View::RaceDetails => {}
        },
        _ => {}
    }
}

fn handle_details_input(app: &mut App, key: KeyEvent) {
    if handle_table_keys(app, key) {
        return;
    }
    match key.code {
        KeyCode::Tab | KeyCode::BackTab => app.toggle_detail_focus(),
        KeyCode::Enter => app.sort_active_column(),
        KeyCode::Char('d') => app.open_driver(),
        KeyCode::Char('c') => app.open_constructor(),
        KeyCode::Char('i') => app.open_circuit(),
        _ => {}
    }
}
