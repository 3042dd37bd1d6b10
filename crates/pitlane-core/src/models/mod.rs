//! Data models for racing entities.
//!
//! Field names follow the JSON data files served by pitlane-server:
//!
//! - `Race`: a championship round with its nested circuit summary
//! - `RaceResult`, `Qualifying`: per-driver rows of a race
//! - `Driver`, `Constructor`, `Circuit`: full entity records
//! - `*Summary` types: the nested sub-objects embedded in results and races

pub mod entity;
pub mod race;
pub mod result;

pub use entity::{Circuit, Constructor, Driver, EntityRef};
pub use race::{CircuitSummary, Race, RaceSummary};
pub use result::{ConstructorSummary, DriverSummary, Qualifying, RaceResult, NOT_AVAILABLE};
