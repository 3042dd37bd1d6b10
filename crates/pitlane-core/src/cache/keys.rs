//! Cache key builders.
//!
//! Every parameter that changes the fetched content is part of the key, so
//! two different queries can never share an entry.

use crate::models::EntityRef;

pub const SEASONS: &str = "seasons";

pub fn races(season: i32) -> String {
    format!("races_{}", season)
}

pub fn results(race_id: i64) -> String {
    format!("results_{}", race_id)
}

pub fn qualifying(race_id: i64) -> String {
    format!("qualifying_{}", race_id)
}

pub fn driver(id: i64) -> String {
    format!("driver_{}", id)
}

pub fn constructor(id: i64) -> String {
    format!("constructor_{}", id)
}

pub fn circuit(id: i64) -> String {
    format!("circuit_{}", id)
}

pub fn driver_results(driver: &EntityRef, year: i32) -> String {
    format!("driver_results_{}_{}", sanitize(&driver.reference), year)
}

pub fn constructor_results(constructor: &EntityRef, year: i32) -> String {
    format!("constructor_results_{}_{}", sanitize(&constructor.reference), year)
}

/// References come from data files; keep them safe as file names.
fn sanitize(reference: &str) -> String {
    reference
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c.to_ascii_lowercase() } else { '_' })
        .collect()
}
