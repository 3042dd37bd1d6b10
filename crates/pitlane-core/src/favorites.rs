//! Persisted favorites: three named lists of drivers, constructors and
//! circuits.
//!
//! The whole collection lives under one storage key and is rewritten in full
//! on every mutation. Items are deduplicated by `name` within their list, not
//! by id: two entries with the same id but different names are both kept.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cache::KeyValueStore;
use crate::error::StorageError;

/// Storage key of the serialized collection.
pub const FAVORITES_KEY: &str = "favorites";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FavoriteKind {
    Driver,
    Constructor,
    Circuit,
}

impl FavoriteKind {
    pub const ALL: [FavoriteKind; 3] = [FavoriteKind::Driver, FavoriteKind::Constructor, FavoriteKind::Circuit];

    pub fn title(&self) -> &'static str {
        match self {
            FavoriteKind::Driver => "Drivers",
            FavoriteKind::Constructor => "Constructors",
            FavoriteKind::Circuit => "Circuits",
        }
    }

    pub fn empty_message(&self) -> &'static str {
        match self {
            FavoriteKind::Driver => "No favorite drivers added.",
            FavoriteKind::Constructor => "No favorite constructors added.",
            FavoriteKind::Circuit => "No favorite circuits added.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteItem {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl FavoriteItem {
    pub fn new(id: i64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            nationality: None,
            location: None,
            country: None,
        }
    }

    pub fn with_nationality(mut self, nationality: Option<String>) -> Self {
        self.nationality = nationality;
        self
    }

    pub fn with_place(mut self, location: Option<String>, country: Option<String>) -> Self {
        self.location = location;
        self.country = country;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FavoritesCollection {
    #[serde(default)]
    pub drivers: Vec<FavoriteItem>,
    #[serde(default)]
    pub constructors: Vec<FavoriteItem>,
    #[serde(default)]
    pub circuits: Vec<FavoriteItem>,
}

impl FavoritesCollection {
    pub fn list(&self, kind: FavoriteKind) -> &[FavoriteItem] {
        match kind {
            FavoriteKind::Driver => &self.drivers,
            FavoriteKind::Constructor => &self.constructors,
            FavoriteKind::Circuit => &self.circuits,
        }
    }

    fn list_mut(&mut self, kind: FavoriteKind) -> &mut Vec<FavoriteItem> {
        match kind {
            FavoriteKind::Driver => &mut self.drivers,
            FavoriteKind::Constructor => &mut self.constructors,
            FavoriteKind::Circuit => &mut self.circuits,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty() && self.constructors.is_empty() && self.circuits.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddResult {
    pub added: bool,
}

/// Last known collection, used when storage cannot be trusted.
#[derive(Default)]
struct Snapshot {
    favorites: Option<FavoritesCollection>,
    // Set while the stored copy is behind the in-memory one
    unsaved: bool,
}

/// Favorites backed by a shared key-value store.
///
/// Every operation reloads the stored collection, so several stores over the
/// same storage see each other's changes. When storage reads or writes fail
/// the last in-memory snapshot is used instead.
pub struct FavoritesStore {
    store: Arc<dyn KeyValueStore>,
    // Held across each read-modify-write so two adds never interleave
    state: Mutex<Snapshot>,
}

impl FavoritesStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            state: Mutex::new(Snapshot::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Snapshot> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read_stored(&self) -> Result<FavoritesCollection, StorageError> {
        let Some(raw) = self.store.get(FAVORITES_KEY)? else {
            return Ok(FavoritesCollection::default());
        };
        Ok(serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "Stored favorites are unreadable, starting empty");
            FavoritesCollection::default()
        }))
    }

    /// The collection to build on: storage unless a write is still pending
    /// or the read fails.
    fn current(&self, snapshot: &Snapshot) -> FavoritesCollection {
        if snapshot.unsaved {
            if let Some(ref favorites) = snapshot.favorites {
                return favorites.clone();
            }
        }
        match self.read_stored() {
            Ok(favorites) => favorites,
            Err(e) => {
                warn!(error = %e, "Failed to read favorites, using last known copy");
                snapshot.favorites.clone().unwrap_or_default()
            }
        }
    }

    fn persist(&self, snapshot: &mut Snapshot, favorites: FavoritesCollection) {
        let result = serde_json::to_string(&favorites)
            .map_err(StorageError::from)
            .and_then(|contents| self.store.set(FAVORITES_KEY, &contents));
        snapshot.unsaved = match result {
            Ok(()) => false,
            Err(e) => {
                warn!(error = %e, "Failed to save favorites, keeping them in memory only");
                true
            }
        };
        snapshot.favorites = Some(favorites);
    }

    pub fn get_all(&self) -> FavoritesCollection {
        let mut snapshot = self.lock();
        let favorites = self.current(&snapshot);
        snapshot.favorites = Some(favorites.clone());
        favorites
    }

    /// Append `item` to the `kind` list unless an entry with the same name
    /// is already there.
    pub fn add(&self, kind: FavoriteKind, item: FavoriteItem) -> AddResult {
        let mut snapshot = self.lock();
        let mut favorites = self.current(&snapshot);

        if favorites.list(kind).iter().any(|fav| fav.name == item.name) {
            debug!(name = %item.name, ?kind, "Already a favorite");
            return AddResult { added: false };
        }

        info!(name = %item.name, ?kind, "Added favorite");
        favorites.list_mut(kind).push(item);
        self.persist(&mut snapshot, favorites);
        AddResult { added: true }
    }

    /// Replace everything with the empty collection.
    pub fn clear(&self) {
        let mut snapshot = self.lock();
        self.persist(&mut snapshot, FavoritesCollection::default());
        info!("Favorites cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;

    fn store() -> (Arc<MemoryStore>, FavoritesStore) {
        let backing = Arc::new(MemoryStore::new());
        (backing.clone(), FavoritesStore::new(backing))
    }

    #[test]
    fn test_empty_when_nothing_stored() {
        let (_, favorites) = store();
        let all = favorites.get_all();
        assert!(all.is_empty());
        assert_eq!(all, FavoritesCollection::default());
    }

    #[test]
    fn test_same_name_added_once() {
        let (_, favorites) = store();

        let first = favorites.add(FavoriteKind::Driver, FavoriteItem::new(1, "Lewis Hamilton"));
        let second = favorites.add(FavoriteKind::Driver, FavoriteItem::new(1, "Lewis Hamilton"));

        assert!(first.added);
        assert!(!second.added);
        assert_eq!(favorites.get_all().drivers.len(), 1);
    }

    #[test]
    fn test_same_id_different_name_kept_twice() {
        let (_, favorites) = store();

        favorites.add(FavoriteKind::Constructor, FavoriteItem::new(9, "Red Bull"));
        let result = favorites.add(FavoriteKind::Constructor, FavoriteItem::new(9, "Red Bull Racing"));

        assert!(result.added);
        assert_eq!(favorites.get_all().constructors.len(), 2);
    }

    #[test]
    fn test_name_match_is_case_sensitive_and_per_list() {
        let (_, favorites) = store();

        favorites.add(FavoriteKind::Driver, FavoriteItem::new(1, "Monaco"));
        assert!(favorites.add(FavoriteKind::Circuit, FavoriteItem::new(6, "Monaco")).added);
        assert!(favorites.add(FavoriteKind::Driver, FavoriteItem::new(2, "monaco")).added);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let (_, favorites) = store();
        for (id, name) in [(3, "Monza"), (1, "Albert Park"), (14, "Silverstone")] {
            favorites.add(FavoriteKind::Circuit, FavoriteItem::new(id, name));
        }
        let names: Vec<String> = favorites.get_all().circuits.into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Monza", "Albert Park", "Silverstone"]);
    }

    #[test]
    fn test_clear_empties_all_lists() {
        let (_, favorites) = store();
        favorites.add(FavoriteKind::Driver, FavoriteItem::new(1, "Lewis Hamilton"));
        favorites.add(FavoriteKind::Circuit, FavoriteItem::new(14, "Silverstone"));

        favorites.clear();

        assert_eq!(favorites.get_all(), FavoritesCollection::default());
    }

    #[test]
    fn test_persisted_in_full_and_reloaded() {
        let (backing, favorites) = store();
        favorites.add(
            FavoriteKind::Constructor,
            FavoriteItem::new(6, "Ferrari").with_nationality(Some("Italian".to_string())),
        );

        let raw = backing.get(FAVORITES_KEY).expect("get").expect("stored");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
        assert_eq!(value["drivers"], serde_json::json!([]));
        assert_eq!(value["circuits"], serde_json::json!([]));
        assert_eq!(value["constructors"][0]["nationality"], "Italian");

        let reopened = FavoritesStore::new(backing);
        assert_eq!(reopened.get_all().constructors[0].name, "Ferrari");
    }

    #[test]
    fn test_unreadable_storage_starts_empty() {
        let (backing, _) = store();
        backing.set(FAVORITES_KEY, "{broken").expect("set");

        let favorites = FavoritesStore::new(backing);
        assert!(favorites.get_all().is_empty());
    }

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::InvalidKey(key.to_string()))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_keeps_in_memory() {
        let favorites = FavoritesStore::new(Arc::new(ReadOnlyStore));

        assert!(favorites.add(FavoriteKind::Driver, FavoriteItem::new(1, "Lewis Hamilton")).added);
        assert_eq!(favorites.get_all().drivers.len(), 1);
        assert!(!favorites.add(FavoriteKind::Driver, FavoriteItem::new(1, "Lewis Hamilton")).added);
    }

    #[test]
    fn test_stores_sharing_storage_keep_each_others_adds() {
        let backing = Arc::new(MemoryStore::new());
        let first = FavoritesStore::new(backing.clone());
        let second = FavoritesStore::new(backing.clone());

        assert!(first.get_all().is_empty());
        assert!(second.add(FavoriteKind::Driver, FavoriteItem::new(1, "Lewis Hamilton")).added);
        assert!(first.add(FavoriteKind::Driver, FavoriteItem::new(4, "Fernando Alonso")).added);
        assert!(!first.add(FavoriteKind::Driver, FavoriteItem::new(1, "Lewis Hamilton")).added);

        let names: Vec<String> = FavoritesStore::new(backing)
            .get_all()
            .drivers
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["Lewis Hamilton", "Fernando Alonso"]);
    }

    #[test]
    fn test_clear_seen_by_other_store() {
        let backing = Arc::new(MemoryStore::new());
        let first = FavoritesStore::new(backing.clone());
        let second = FavoritesStore::new(backing);

        first.add(FavoriteKind::Circuit, FavoriteItem::new(14, "Silverstone"));
        assert_eq!(second.get_all().circuits.len(), 1);

        second.clear();
        assert!(first.get_all().is_empty());
    }
}
