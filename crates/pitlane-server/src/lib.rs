//! Read-only REST passthrough over static racing JSON data files.
//!
//! The data set is loaded once at startup and shared immutably between
//! request handlers.

pub mod config;
pub mod data;
pub mod routes;

pub use config::ServerConfig;
pub use data::DataSet;
pub use routes::router;
