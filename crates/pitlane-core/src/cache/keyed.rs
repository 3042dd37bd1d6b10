use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::DataError;

use super::store::KeyValueStore;

/// Envelope written to storage for every cached value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        let now = Utc::now();
        (now - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Negative ages come from clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            let remaining_mins = minutes % 60;
            if remaining_mins >= 30 {
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            let remaining_hours = (minutes % 1440) / 60;
            if remaining_hours >= 12 {
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }
}

/// Read-through cache over a `KeyValueStore`.
///
/// A key, once populated, is returned as-is for the rest of its life; the
/// producer is only invoked on a miss. Clone is cheap and shares the store.
#[derive(Clone)]
pub struct KeyedCache {
    store: Arc<dyn KeyValueStore>,
}

impl KeyedCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Return the cached value for `key`, or run `producer`, store its result
    /// and return it.
    ///
    /// A failed producer writes nothing. A failed storage write is logged and
    /// the fetched value is still returned.
    pub async fn get<T, E, F, Fut>(&self, key: &str, producer: F) -> Result<T, DataError>
    where
        T: Serialize + DeserializeOwned,
        E: Into<DataError>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(cached) = self.load::<T>(key) {
            debug!(key, "Cache hit");
            return Ok(cached.data);
        }

        debug!(key, "Cache miss, fetching");
        let value = producer().await.map_err(|e| {
            let err = e.into();
            warn!(key, error = %err, "Fetch failed, nothing cached");
            err
        })?;

        if let Err(e) = self.save(key, &value) {
            warn!(key, error = %e, "Failed to cache value, continuing without it");
        }

        Ok(value)
    }

    /// Load an entry, treating unreadable or mismatched data as a miss.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<CachedData<T>> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, error = %e, "Failed to read cache entry");
                return None;
            }
        };

        match serde_json::from_str::<CachedData<T>>(&raw) {
            Ok(cached) => Some(cached),
            Err(e) => {
                warn!(key, error = %e, "Failed to parse cache entry, ignoring it");
                None
            }
        }
    }

    fn save<T: Serialize>(&self, key: &str, data: &T) -> Result<(), DataError> {
        let contents = serde_json::to_string(&CachedData::new(data))
            .map_err(|e| DataError::StorageWriteFailure(e.to_string()))?;
        self.store.set(key, &contents)?;
        Ok(())
    }

    pub fn contains(&self, key: &str) -> bool {
        matches!(self.store.get(key), Ok(Some(_)))
    }

    /// Drop an entry so the next `get` fetches again.
    pub fn invalidate(&self, key: &str) -> Result<(), DataError> {
        self.store.remove(key)?;
        debug!(key, "Cache entry invalidated");
        Ok(())
    }

    /// Human-readable age of an entry, e.g. `5m ago`.
    pub fn age(&self, key: &str) -> Option<String> {
        self.load::<serde_json::Value>(key).map(|cached| cached.age_display())
    }
}
