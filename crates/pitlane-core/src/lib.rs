//! Core library for pitlane.
//!
//! Everything the front-ends share lives here:
//!
//! - `api`: the `RaceDataProvider` seam and its HTTP implementation
//! - `cache`: durable key-value storage and the read-through `KeyedCache`
//! - `favorites`: the persisted drivers/constructors/circuits favorites lists
//! - `sorter`: generic rendered-row tables and the sort-toggle engine
//! - `tables`: builders turning racing entities into sortable tables
//! - `controller`: view state, fetch dispatch and favorites wiring
//! - `models`: racing-domain records as served by the data files

pub mod api;
pub mod cache;
pub mod config;
pub mod controller;
pub mod error;
pub mod favorites;
pub mod models;
pub mod sorter;
pub mod tables;
pub mod utils;

pub use api::{ApiError, HttpDataProvider, RaceDataProvider};
pub use cache::{FileStore, KeyValueStore, KeyedCache, MemoryStore};
pub use config::Config;
pub use controller::{
    EntityDetail, EntityTarget, LoadOutcome, LoadState, LoadTarget, PendingLoad, Popup, Toast, View,
    ViewController,
};
pub use error::{DataError, StorageError};
pub use favorites::{AddResult, FavoriteItem, FavoriteKind, FavoritesCollection, FavoritesStore};
pub use sorter::{RenderedRow, SortDirection, TableId, TableSorter, TableView};
