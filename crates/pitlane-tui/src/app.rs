//! Application state for the pitlane TUI.
//!
//! `App` wraps the core `ViewController` with terminal concerns: list and
//! table cursors, overlays, the status line, and the channel that carries
//! finished background loads back to the event loop.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use pitlane_core::models::Race;
use pitlane_core::tables::{EntityTable, RowLinks};
use pitlane_core::{
    Config, FavoritesStore, FileStore, HttpDataProvider, KeyValueStore, KeyedCache, LoadOutcome,
    LoadState, LoadTarget, MemoryStore, PendingLoad, Popup, RenderedRow, TableId, View,
    ViewController,
};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background load channel.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Number of rows to move on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Row and column position inside one table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCursor {
    pub row: usize,
    pub column: usize,
}

/// Move `current` by `delta` within `0..len`, clamping at both ends.
pub fn step(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let next = current as isize + delta;
    next.clamp(0, len as isize - 1) as usize
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    pub config: Config,
    pub controller: ViewController,

    pub state: AppState,
    pub season_selection: usize,
    pub race_selection: usize,
    /// Table with keyboard focus on the race-details view.
    pub detail_focus: TableId,
    cursors: HashMap<TableId, TableCursor>,

    load_rx: mpsc::Receiver<LoadOutcome>,
    load_tx: mpsc::Sender<LoadOutcome>,

    pub status_message: Option<String>,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let store = Self::open_store(&config);
        let provider = Arc::new(HttpDataProvider::new(&config.api_base_url())?);
        info!(base_url = provider.base_url(), "Data provider configured");

        let controller = ViewController::new(
            KeyedCache::new(store.clone()),
            provider,
            Arc::new(FavoritesStore::new(store)),
        );

        Ok(Self::with_controller(config, controller))
    }

    pub fn with_controller(config: Config, controller: ViewController) -> Self {
        let (load_tx, load_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        Self {
            config,
            controller,
            state: AppState::Normal,
            season_selection: 0,
            race_selection: 0,
            detail_focus: TableId::RaceResults,
            cursors: HashMap::new(),
            load_rx,
            load_tx,
            status_message: None,
        }
    }

    /// File-backed store in the cache directory, or memory when that
    /// directory is unusable.
    fn open_store(config: &Config) -> Arc<dyn KeyValueStore> {
        let opened = config
            .cache_dir()
            .map_err(|e| e.to_string())
            .and_then(|dir| FileStore::new(dir).map_err(|e| e.to_string()));

        match opened {
            Ok(store) => {
                debug!(dir = %store.dir().display(), "Using file cache");
                Arc::new(store)
            }
            Err(e) => {
                warn!(error = %e, "Cache directory unavailable, caching in memory only");
                Arc::new(MemoryStore::new())
            }
        }
    }

    // ========================================================================
    // Background loads
    // ========================================================================

    /// Run a load on the runtime; its outcome arrives through the channel.
    fn dispatch(&self, pending: PendingLoad) {
        let tx = self.load_tx.clone();
        tokio::spawn(async move {
            let outcome = pending.run().await;
            if tx.send(outcome).await.is_err() {
                debug!("Load finished after the app closed its channel");
            }
        });
    }

    /// Apply every load that finished since the last frame.
    pub fn check_background_tasks(&mut self) {
        let mut outcomes = Vec::new();
        while let Ok(outcome) = self.load_rx.try_recv() {
            outcomes.push(outcome);
        }

        for outcome in outcomes {
            self.process_outcome(outcome);
        }
    }

    fn process_outcome(&mut self, outcome: LoadOutcome) {
        let target = outcome.target();
        if !self.controller.apply(outcome) {
            return;
        }

        match target {
            LoadTarget::Seasons => self.restore_last_season(),
            LoadTarget::Races => self.race_selection = 0,
            LoadTarget::RaceDetails => {
                self.cursors.remove(&TableId::RaceResults);
                self.cursors.remove(&TableId::Qualifying);
            }
            LoadTarget::Popup => {
                self.cursors.remove(&TableId::DriverResults);
                self.cursors.remove(&TableId::ConstructorResults);
            }
        }
    }

    fn restore_last_season(&mut self) {
        let Some(last) = self.config.last_season else {
            return;
        };
        if let Some(index) = self.seasons().iter().position(|s| *s == last) {
            self.season_selection = index;
        }
    }

    // ========================================================================
    // Lists
    // ========================================================================

    pub fn seasons(&self) -> &[i32] {
        self.controller.seasons.ready().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn races(&self) -> &[Race] {
        self.controller.races.ready().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn start(&mut self) {
        let pending = self.controller.load_seasons();
        self.dispatch(pending);
    }

    pub fn move_list_selection(&mut self, delta: isize) {
        match self.controller.view() {
            View::Home => {
                self.season_selection = step(self.season_selection, delta, self.seasons().len());
            }
            View::RacesList => {
                self.race_selection = step(self.race_selection, delta, self.races().len());
            }
            View::RaceDetails => self.move_row(delta),
        }
    }

    pub fn select_current_season(&mut self) {
        let Some(&season) = self.seasons().get(self.season_selection) else {
            return;
        };
        let pending = self.controller.select_season(season);
        self.dispatch(pending);

        self.config.last_season = Some(season);
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }
    }

    pub fn select_current_race(&mut self) {
        let Some(race) = self.races().get(self.race_selection).cloned() else {
            return;
        };
        let pending = self.controller.select_race(&race);
        self.detail_focus = TableId::RaceResults;
        self.dispatch(pending);
    }

    /// Esc: close the popup, otherwise step back one view.
    pub fn go_back(&mut self) {
        if self.controller.popup.is_some() {
            self.controller.close_popup();
            return;
        }
        match self.controller.view() {
            View::RaceDetails => self.controller.show_view(View::RacesList),
            View::RacesList => self.controller.show_view(View::Home),
            View::Home => {}
        }
    }

    pub fn show_view(&mut self, view: View) {
        // The races view needs a season to show
        if view == View::RacesList && self.controller.selected_season.is_none() {
            self.status_message = Some("Select a season first".to_string());
            return;
        }
        if view == View::RaceDetails && self.controller.selected_race.is_none() {
            self.status_message = Some("Select a race first".to_string());
            return;
        }
        self.controller.show_view(view);
    }

    // ========================================================================
    // Tables
    // ========================================================================

    /// Table receiving row/column/sort keys: the popup's results when an
    /// entity popup is open, otherwise the focused race-details table.
    pub fn active_table_id(&self) -> Option<TableId> {
        match &self.controller.popup {
            Some(Popup::Entity { results, .. }) => results.ready().map(|t| t.id),
            Some(Popup::Favorites(_)) => None,
            None if self.controller.view() == View::RaceDetails => Some(self.detail_focus),
            None => None,
        }
    }

    pub fn table(&self, id: TableId) -> Option<&EntityTable> {
        match id {
            TableId::RaceResults => self.controller.results.ready(),
            TableId::Qualifying => self.controller.qualifying.ready(),
            TableId::DriverResults | TableId::ConstructorResults => match &self.controller.popup {
                Some(Popup::Entity { results, .. }) => results.ready().filter(|t| t.id == id),
                _ => None,
            },
        }
    }

    pub fn cursor(&self, id: TableId) -> TableCursor {
        self.cursors.get(&id).copied().unwrap_or_default()
    }

    fn active(&self) -> Option<(TableId, &EntityTable)> {
        let id = self.active_table_id()?;
        Some((id, self.table(id)?))
    }

    pub fn move_row(&mut self, delta: isize) {
        let Some((id, table)) = self.active() else {
            return;
        };
        let len = table.rows.len();
        let cursor = self.cursors.entry(id).or_default();
        cursor.row = step(cursor.row, delta, len);
    }

    pub fn move_column(&mut self, delta: isize) {
        let Some((id, table)) = self.active() else {
            return;
        };
        let len = table.columns.len();
        let cursor = self.cursors.entry(id).or_default();
        cursor.column = step(cursor.column, delta, len);
    }

    pub fn toggle_detail_focus(&mut self) {
        self.detail_focus = match self.detail_focus {
            TableId::RaceResults => TableId::Qualifying,
            _ => TableId::RaceResults,
        };
    }

    /// Sort the active table by the column under the cursor.
    pub fn sort_active_column(&mut self) {
        let Some((id, table)) = self.active() else {
            return;
        };
        let cursor = self.cursor(id);
        let Some(column) = table.columns.get(cursor.column) else {
            return;
        };
        let (key, title) = (column.key.clone(), column.title.clone());

        match self.controller.sort_table(id, &key) {
            Some(direction) => {
                debug!(table = ?id, key = %key, ?direction, "Sorted table");
                self.cursors.entry(id).or_default().row = 0;
                self.status_message = None;
            }
            None => self.status_message = Some(format!("{} is not sortable", title)),
        }
    }

    // ========================================================================
    // Popups and favorites
    // ========================================================================

    fn selected_row(&self) -> Option<&RenderedRow<RowLinks>> {
        let (id, table) = self.active()?;
        table.rows.get(self.cursor(id).row)
    }

    pub fn open_driver(&mut self) {
        let Some(links) = self.selected_row().map(|r| r.data.clone()) else {
            return;
        };
        let pending = self.controller.open_driver(links.driver, links.season);
        self.dispatch(pending);
    }

    pub fn open_constructor(&mut self) {
        let Some(links) = self.selected_row().map(|r| r.data.clone()) else {
            return;
        };
        let pending = self.controller.open_constructor(links.constructor, links.season);
        self.dispatch(pending);
    }

    pub fn open_circuit(&mut self) {
        if let Some(pending) = self.controller.open_selected_circuit() {
            self.dispatch(pending);
        }
    }

    pub fn show_favorites(&mut self) {
        self.controller.show_favorites();
    }

    pub fn add_popup_to_favorites(&mut self) {
        match self.controller.add_popup_to_favorites() {
            Some(toast) => self.status_message = Some(toast.message),
            None => self.status_message = Some("Nothing to add yet".to_string()),
        }
    }

    pub fn clear_favorites(&mut self) {
        self.controller.clear_favorites();
        self.status_message = Some("Favorites cleared".to_string());
    }

    /// Status line text: the last message, otherwise the data age.
    pub fn status_text(&self) -> String {
        if let Some(ref msg) = self.status_message {
            return msg.clone();
        }
        match self.controller.cache_age() {
            Some(age) => format!("Updated {}", age),
            None if self.is_loading() => "Loading...".to_string(),
            None => String::new(),
        }
    }

    pub fn is_loading(&self) -> bool {
        let c = &self.controller;
        c.seasons.is_loading()
            || c.races.is_loading()
            || c.results.is_loading()
            || c.qualifying.is_loading()
            || matches!(&c.popup, Some(Popup::Entity { detail: LoadState::Loading, .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_clamps() {
        assert_eq!(step(0, -1, 5), 0);
        assert_eq!(step(3, 1, 5), 4);
        assert_eq!(step(4, 1, 5), 4);
        assert_eq!(step(2, PAGE_SCROLL_SIZE as isize, 5), 4);
        assert_eq!(step(2, 1, 0), 0);
    }

    #[test]
    fn test_table_cursor_default() {
        let cursor = TableCursor::default();
        assert_eq!((cursor.row, cursor.column), (0, 0));
    }
}
