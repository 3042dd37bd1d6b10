use async_trait::async_trait;

use crate::models::{Circuit, Constructor, Driver, Qualifying, Race, RaceResult};

use super::ApiError;

/// Source of racing data.
///
/// Lookups that find nothing fail with `ApiError::NotFound`; list queries
/// may do the same when the server reports an empty filter as 404.
#[async_trait]
pub trait RaceDataProvider: Send + Sync {
    /// Every race of every season.
    async fn races(&self) -> Result<Vec<Race>, ApiError>;

    async fn races_for_season(&self, season: i32) -> Result<Vec<Race>, ApiError>;

    async fn race_results(&self, race_id: i64) -> Result<Vec<RaceResult>, ApiError>;

    async fn qualifying(&self, race_id: i64) -> Result<Vec<Qualifying>, ApiError>;

    async fn driver(&self, reference: &str) -> Result<Driver, ApiError>;

    async fn constructor(&self, reference: &str) -> Result<Constructor, ApiError>;

    async fn circuit(&self, id: i64) -> Result<Circuit, ApiError>;

    async fn driver_results(&self, reference: &str, year: i32) -> Result<Vec<RaceResult>, ApiError>;

    async fn constructor_results(&self, reference: &str, year: i32) -> Result<Vec<RaceResult>, ApiError>;
}
