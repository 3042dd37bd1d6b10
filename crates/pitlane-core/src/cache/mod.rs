//! Local caching module.
//!
//! Values fetched from the data provider are written to durable key-value
//! storage and served from there on every later read. Entries never expire:
//! a populated key wins over the network until it is invalidated or the
//! cache directory is cleared.
//!
//! - `KeyValueStore`: string-keyed storage (`FileStore`, `MemoryStore`)
//! - `KeyedCache`: the read-through accessor
//! - `keys`: builders for fully parameterized cache keys

pub mod keyed;
pub mod keys;
pub mod store;

pub use keyed::{CachedData, KeyedCache};
pub use store::{FileStore, KeyValueStore, MemoryStore};
