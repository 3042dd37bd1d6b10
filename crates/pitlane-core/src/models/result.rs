use serde::{Deserialize, Serialize};

use super::entity::EntityRef;
use super::race::RaceSummary;

/// Placeholder shown for missing positions and times.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverSummary {
    pub id: i64,
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(default)]
    pub code: Option<String>,
    pub forename: String,
    pub surname: String,
}

impl DriverSummary {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.forename, self.surname)
    }

    pub fn entity_ref(&self) -> EntityRef {
        EntityRef::new(self.id, &self.reference)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorSummary {
    pub id: i64,
    #[serde(rename = "ref")]
    pub reference: String,
    pub name: String,
    #[serde(default)]
    pub nationality: Option<String>,
}

impl ConstructorSummary {
    pub fn entity_ref(&self) -> EntityRef {
        EntityRef::new(self.id, &self.reference)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceResult {
    #[serde(alias = "resultId")]
    pub id: i64,
    pub race: RaceSummary,
    pub driver: DriverSummary,
    pub constructor: ConstructorSummary,
    #[serde(default)]
    pub grid: Option<i32>,
    #[serde(default)]
    pub position: Option<i32>,
    #[serde(default)]
    pub points: f64,
    #[serde(default)]
    pub laps: Option<i32>,
    #[serde(default)]
    pub time: Option<String>,
}

impl RaceResult {
    pub fn position_display(&self) -> String {
        self.position
            .map(|p| p.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    pub fn time_display(&self) -> String {
        display_or_na(&self.time)
    }

    /// Points without a trailing `.0` for whole numbers.
    pub fn points_display(&self) -> String {
        if self.points.fract() == 0.0 {
            format!("{}", self.points as i64)
        } else {
            format!("{}", self.points)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Qualifying {
    #[serde(alias = "qualifyId")]
    pub id: i64,
    pub race: RaceSummary,
    pub driver: DriverSummary,
    pub constructor: ConstructorSummary,
    #[serde(default)]
    pub number: Option<i32>,
    #[serde(default)]
    pub position: Option<i32>,
    #[serde(default)]
    pub q1: Option<String>,
    #[serde(default)]
    pub q2: Option<String>,
    #[serde(default)]
    pub q3: Option<String>,
}

impl Qualifying {
    pub fn position_display(&self) -> String {
        self.position
            .map(|p| p.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    pub fn q1_display(&self) -> String {
        display_or_na(&self.q1)
    }

    pub fn q2_display(&self) -> String {
        display_or_na(&self.q2)
    }

    pub fn q3_display(&self) -> String {
        display_or_na(&self.q3)
    }
}

/// Missing and empty values both render as `N/A`.
fn display_or_na(value: &Option<String>) -> String {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}
