//! Remote data access.
//!
//! `RaceDataProvider` is the seam the controller fetches through.
//! `HttpDataProvider` implements it against the pitlane REST server
//! (`/api/...` endpoints returning JSON arrays or objects).

pub mod client;
pub mod error;
pub mod provider;

pub use client::HttpDataProvider;
pub use error::ApiError;
pub use provider::RaceDataProvider;
