//! View coordination.
//!
//! `ViewController` owns which view is visible, the data each view shows and
//! the open popup. User actions return a `PendingLoad`: a self-contained
//! fetch that can be awaited in place or spawned onto a runtime. Its
//! `LoadOutcome` is handed back through `apply`, which drops it when a newer
//! action for the same target was issued in the meantime. The latest
//! selection therefore always wins, whatever order fetches complete in.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::api::RaceDataProvider;
use crate::cache::{keys, KeyedCache};
use crate::error::DataError;
use crate::favorites::{FavoriteItem, FavoriteKind, FavoritesCollection, FavoritesStore};
use crate::models::race::seasons_of;
use crate::models::{Circuit, Constructor, Driver, EntityRef, Qualifying, Race, RaceResult};
use crate::sorter::{SortDirection, TableId, TableSorter};
use crate::tables::{self, EntityTable};

const NO_SEASONS: &str = "No seasons available.";
const NO_RACES: &str = "No races found for this season.";
const NO_RESULTS: &str = "No results available.";
const NO_QUALIFYING: &str = "No qualifying data available.";
const NO_DRIVER_RESULTS: &str = "No results found for this driver.";
const NO_CONSTRUCTOR_RESULTS: &str = "No results found for this constructor.";

/// Top-level views; exactly one is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Home,
    RacesList,
    RaceDetails,
}

/// Population state of one render target.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    /// Nothing to show; the message replaces the content.
    Empty(String),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// Text to display instead of content, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            LoadState::Loading => Some("Loading..."),
            LoadState::Empty(msg) | LoadState::Failed(msg) => Some(msg),
            LoadState::Idle | LoadState::Ready(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LoadState<U> {
        match self {
            LoadState::Idle => LoadState::Idle,
            LoadState::Loading => LoadState::Loading,
            LoadState::Ready(value) => LoadState::Ready(f(value)),
            LoadState::Empty(msg) => LoadState::Empty(msg),
            LoadState::Failed(msg) => LoadState::Failed(msg),
        }
    }

    pub fn from_item(result: Result<T, DataError>, not_found: &str) -> Self {
        match result {
            Ok(value) => LoadState::Ready(value),
            Err(DataError::NotFound(_)) => LoadState::Empty(not_found.to_string()),
            Err(e) => LoadState::Failed(e.empty_state_message()),
        }
    }
}

impl<T> LoadState<Vec<T>> {
    /// An empty list and a 404 both render as `empty_message`.
    pub fn from_list(result: Result<Vec<T>, DataError>, empty_message: &str) -> Self {
        match result {
            Ok(items) if items.is_empty() => LoadState::Empty(empty_message.to_string()),
            other => Self::from_item(other, empty_message),
        }
    }
}

/// Full record shown in an entity popup.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityDetail {
    Driver(Driver),
    Constructor(Constructor),
    Circuit(Circuit),
}

impl EntityDetail {
    pub fn name(&self) -> String {
        match self {
            EntityDetail::Driver(d) => d.full_name(),
            EntityDetail::Constructor(c) => c.name.clone(),
            EntityDetail::Circuit(c) => c.name.clone(),
        }
    }

    pub fn favorite(&self) -> (FavoriteKind, FavoriteItem) {
        match self {
            EntityDetail::Driver(d) => (
                FavoriteKind::Driver,
                FavoriteItem::new(d.id, &d.full_name()).with_nationality(d.nationality.clone()),
            ),
            EntityDetail::Constructor(c) => (
                FavoriteKind::Constructor,
                FavoriteItem::new(c.id, &c.name).with_nationality(c.nationality.clone()),
            ),
            EntityDetail::Circuit(c) => (
                FavoriteKind::Circuit,
                FavoriteItem::new(c.id, &c.name).with_place(c.location.clone(), c.country.clone()),
            ),
        }
    }
}

/// What an entity popup was opened for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityTarget {
    Driver { entity: EntityRef, season: i32 },
    Constructor { entity: EntityRef, season: i32 },
    Circuit { id: i64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Popup {
    Entity {
        target: EntityTarget,
        detail: LoadState<EntityDetail>,
        results: LoadState<EntityTable>,
    },
    Favorites(FavoritesCollection),
}

/// Confirmation shown after an add-to-favorites action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub added: bool,
}

/// Independent targets, each with its own generation counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadTarget {
    Seasons,
    Races,
    RaceDetails,
    Popup,
}

#[derive(Debug, Clone)]
enum LoadRequest {
    Seasons,
    Races { season: i32 },
    RaceDetails { race_id: i64 },
    Entity(EntityTarget),
}

/// A fetch dispatched by a user action, not yet run.
pub struct PendingLoad {
    target: LoadTarget,
    generation: u64,
    request: LoadRequest,
    cache: KeyedCache,
    provider: Arc<dyn RaceDataProvider>,
}

#[derive(Debug)]
enum LoadPayload {
    Seasons(Result<Vec<i32>, DataError>),
    Races(Result<Vec<Race>, DataError>),
    RaceDetails {
        results: Result<Vec<RaceResult>, DataError>,
        qualifying: Result<Vec<Qualifying>, DataError>,
    },
    Entity {
        detail: Result<EntityDetail, DataError>,
        results: Option<Result<Vec<RaceResult>, DataError>>,
    },
}

/// Completed fetch, tagged with the generation it was dispatched under.
#[derive(Debug)]
pub struct LoadOutcome {
    target: LoadTarget,
    generation: u64,
    payload: LoadPayload,
}

impl LoadOutcome {
    pub fn target(&self) -> LoadTarget {
        self.target
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl PendingLoad {
    pub fn target(&self) -> LoadTarget {
        self.target
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Fetch through the cache. Never panics on provider errors; failures
    /// travel inside the outcome.
    pub async fn run(self) -> LoadOutcome {
        let cache = &self.cache;
        let provider = self.provider.as_ref();

        let payload = match self.request {
            LoadRequest::Seasons => LoadPayload::Seasons(
                cache
                    .get(keys::SEASONS, move || async move {
                        provider.races().await.map(|races| seasons_of(&races))
                    })
                    .await,
            ),
            LoadRequest::Races { season } => LoadPayload::Races(
                cache
                    .get(&keys::races(season), move || async move {
                        provider.races_for_season(season).await
                    })
                    .await,
            ),
            LoadRequest::RaceDetails { race_id } => {
                let results_key = keys::results(race_id);
                let qualifying_key = keys::qualifying(race_id);
                let (results, qualifying) = futures::join!(
                    cache.get(&results_key, move || async move { provider.race_results(race_id).await }),
                    cache.get(&qualifying_key, move || async move { provider.qualifying(race_id).await }),
                );
                LoadPayload::RaceDetails { results, qualifying }
            }
            LoadRequest::Entity(target) => Self::run_entity(cache, provider, target).await,
        };

        LoadOutcome {
            target: self.target,
            generation: self.generation,
            payload,
        }
    }

    async fn run_entity(
        cache: &KeyedCache,
        provider: &dyn RaceDataProvider,
        target: EntityTarget,
    ) -> LoadPayload {
        match target {
            EntityTarget::Driver { entity, season } => {
                let reference = entity.reference.as_str();
                let detail_key = keys::driver(entity.id);
                let results_key = keys::driver_results(&entity, season);
                let (detail, results) = futures::join!(
                    cache.get(&detail_key, move || async move {
                        provider.driver(reference).await
                    }),
                    cache.get(&results_key, move || async move {
                        provider.driver_results(reference, season).await
                    }),
                );
                LoadPayload::Entity {
                    detail: detail.map(EntityDetail::Driver),
                    results: Some(results),
                }
            }
            EntityTarget::Constructor { entity, season } => {
                let reference = entity.reference.as_str();
                let detail_key = keys::constructor(entity.id);
                let results_key = keys::constructor_results(&entity, season);
                let (detail, results) = futures::join!(
                    cache.get(&detail_key, move || async move {
                        provider.constructor(reference).await
                    }),
                    cache.get(&results_key, move || async move {
                        provider.constructor_results(reference, season).await
                    }),
                );
                LoadPayload::Entity {
                    detail: detail.map(EntityDetail::Constructor),
                    results: Some(results),
                }
            }
            EntityTarget::Circuit { id } => {
                let detail = cache
                    .get(&keys::circuit(id), move || async move { provider.circuit(id).await })
                    .await;
                LoadPayload::Entity {
                    detail: detail.map(EntityDetail::Circuit),
                    results: None,
                }
            }
        }
    }
}

pub struct ViewController {
    cache: KeyedCache,
    provider: Arc<dyn RaceDataProvider>,
    favorites: Arc<FavoritesStore>,
    view: View,
    generations: HashMap<LoadTarget, u64>,

    pub seasons: LoadState<Vec<i32>>,
    pub selected_season: Option<i32>,
    pub races: LoadState<Vec<Race>>,
    pub selected_race: Option<Race>,
    pub qualifying: LoadState<EntityTable>,
    pub results: LoadState<EntityTable>,
    pub popup: Option<Popup>,
    pub sorter: TableSorter,
}

impl ViewController {
    pub fn new(
        cache: KeyedCache,
        provider: Arc<dyn RaceDataProvider>,
        favorites: Arc<FavoritesStore>,
    ) -> Self {
        Self {
            cache,
            provider,
            favorites,
            view: View::Home,
            generations: HashMap::new(),
            seasons: LoadState::Idle,
            selected_season: None,
            races: LoadState::Idle,
            selected_race: None,
            qualifying: LoadState::Idle,
            results: LoadState::Idle,
            popup: None,
            sorter: TableSorter::new(),
        }
    }

    // =========================================================================
    // Views
    // =========================================================================

    pub fn view(&self) -> View {
        self.view
    }

    pub fn show_view(&mut self, view: View) {
        debug!(?view, "Showing view");
        self.view = view;
    }

    fn bump(&mut self, target: LoadTarget) -> u64 {
        let generation = self.generations.entry(target).or_insert(0);
        *generation += 1;
        *generation
    }

    fn is_current(&self, target: LoadTarget, generation: u64) -> bool {
        self.generations.get(&target).copied().unwrap_or(0) == generation
    }

    fn pending(&mut self, target: LoadTarget, request: LoadRequest) -> PendingLoad {
        let generation = self.bump(target);
        PendingLoad {
            target,
            generation,
            request,
            cache: self.cache.clone(),
            provider: self.provider.clone(),
        }
    }

    // =========================================================================
    // User actions
    // =========================================================================

    /// Populate the season list shown on the home view.
    pub fn load_seasons(&mut self) -> PendingLoad {
        self.seasons = LoadState::Loading;
        self.pending(LoadTarget::Seasons, LoadRequest::Seasons)
    }

    pub fn select_season(&mut self, season: i32) -> PendingLoad {
        info!(season, "Season selected");
        self.selected_season = Some(season);
        self.races = LoadState::Loading;

        // The previous season's race details no longer apply
        self.bump(LoadTarget::RaceDetails);
        self.selected_race = None;
        self.results = LoadState::Idle;
        self.qualifying = LoadState::Idle;

        self.show_view(View::RacesList);
        self.pending(LoadTarget::Races, LoadRequest::Races { season })
    }

    pub fn select_race(&mut self, race: &Race) -> PendingLoad {
        info!(race_id = race.id, name = %race.name, "Race selected");
        self.selected_race = Some(race.clone());
        self.results = LoadState::Loading;
        self.qualifying = LoadState::Loading;
        self.show_view(View::RaceDetails);
        self.pending(LoadTarget::RaceDetails, LoadRequest::RaceDetails { race_id: race.id })
    }

    fn open_entity(&mut self, target: EntityTarget) -> PendingLoad {
        let results = match target {
            EntityTarget::Circuit { .. } => LoadState::Idle,
            _ => LoadState::Loading,
        };
        self.popup = Some(Popup::Entity {
            target: target.clone(),
            detail: LoadState::Loading,
            results,
        });
        self.pending(LoadTarget::Popup, LoadRequest::Entity(target))
    }

    pub fn open_driver(&mut self, entity: EntityRef, season: i32) -> PendingLoad {
        self.open_entity(EntityTarget::Driver { entity, season })
    }

    pub fn open_constructor(&mut self, entity: EntityRef, season: i32) -> PendingLoad {
        self.open_entity(EntityTarget::Constructor { entity, season })
    }

    pub fn open_circuit(&mut self, id: i64) -> PendingLoad {
        self.open_entity(EntityTarget::Circuit { id })
    }

    /// Circuit popup for the race currently shown, if any.
    pub fn open_selected_circuit(&mut self) -> Option<PendingLoad> {
        let id = self.selected_race.as_ref()?.circuit.id;
        Some(self.open_circuit(id))
    }

    pub fn close_popup(&mut self) {
        // Late results for the closed popup must not reopen it
        self.bump(LoadTarget::Popup);
        self.popup = None;
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    pub fn show_favorites(&mut self) {
        self.bump(LoadTarget::Popup);
        self.popup = Some(Popup::Favorites(self.favorites.get_all()));
    }

    pub fn clear_favorites(&mut self) {
        self.favorites.clear();
        if matches!(self.popup, Some(Popup::Favorites(_))) {
            self.popup = Some(Popup::Favorites(self.favorites.get_all()));
        }
    }

    pub fn add_to_favorites(&self, kind: FavoriteKind, item: FavoriteItem) -> Toast {
        let name = item.name.clone();
        let result = self.favorites.add(kind, item);
        let message = if result.added {
            format!("{} has been added to your favorites!", name)
        } else {
            format!("{} is already in your favorites!", name)
        };
        Toast {
            message,
            added: result.added,
        }
    }

    /// Add the entity shown in the open popup. `None` while it is still
    /// loading or failed to load.
    pub fn add_popup_to_favorites(&self) -> Option<Toast> {
        match &self.popup {
            Some(Popup::Entity { detail: LoadState::Ready(detail), .. }) => {
                let (kind, item) = detail.favorite();
                Some(self.add_to_favorites(kind, item))
            }
            _ => None,
        }
    }

    // =========================================================================
    // Tables
    // =========================================================================

    /// Sort one of the visible tables by column `key`.
    pub fn sort_table(&mut self, table: TableId, key: &str) -> Option<SortDirection> {
        let Self {
            sorter,
            qualifying,
            results,
            popup,
            ..
        } = self;

        let view = match table {
            TableId::Qualifying => qualifying.ready_mut(),
            TableId::RaceResults => results.ready_mut(),
            TableId::DriverResults | TableId::ConstructorResults => match popup {
                Some(Popup::Entity { results, .. }) => results.ready_mut().filter(|t| t.id == table),
                _ => None,
            },
        }?;

        sorter.sort(view, key)
    }

    /// Age of the data behind the current view, e.g. `5m ago`.
    pub fn cache_age(&self) -> Option<String> {
        match self.view {
            View::Home => self.cache.age(keys::SEASONS),
            View::RacesList => self.selected_season.and_then(|s| self.cache.age(&keys::races(s))),
            View::RaceDetails => self
                .selected_race
                .as_ref()
                .and_then(|r| self.cache.age(&keys::results(r.id))),
        }
    }

    // =========================================================================
    // Completed loads
    // =========================================================================

    /// Apply a finished load. Returns false when it was superseded.
    pub fn apply(&mut self, outcome: LoadOutcome) -> bool {
        if !self.is_current(outcome.target, outcome.generation) {
            debug!(target = ?outcome.target, generation = outcome.generation, "Discarding superseded load");
            return false;
        }

        match outcome.payload {
            LoadPayload::Seasons(result) => {
                self.seasons = LoadState::from_list(result, NO_SEASONS);
            }
            LoadPayload::Races(result) => {
                self.races = LoadState::from_list(result, NO_RACES);
            }
            LoadPayload::RaceDetails { results, qualifying } => {
                self.sorter.reset(TableId::RaceResults);
                self.sorter.reset(TableId::Qualifying);
                self.results = LoadState::from_list(results, NO_RESULTS)
                    .map(|r| tables::race_results_table(&r));
                self.qualifying = LoadState::from_list(qualifying, NO_QUALIFYING)
                    .map(|q| tables::qualifying_table(&q));
            }
            LoadPayload::Entity {
                detail: detail_result,
                results: results_result,
            } => {
                let Some(Popup::Entity { target, detail, results }) = &mut self.popup else {
                    return false;
                };

                *detail = LoadState::from_item(detail_result, "Not found.");
                if let Some(result) = results_result {
                    let (table_id, empty, build): (TableId, &str, fn(&[RaceResult]) -> EntityTable) =
                        match target {
                            EntityTarget::Constructor { .. } => (
                                TableId::ConstructorResults,
                                NO_CONSTRUCTOR_RESULTS,
                                tables::constructor_results_table,
                            ),
                            _ => (TableId::DriverResults, NO_DRIVER_RESULTS, tables::driver_results_table),
                        };
                    self.sorter.reset(table_id);
                    *results = LoadState::from_list(result, empty).map(|r| build(&r));
                }
            }
        }

        true
    }
}
