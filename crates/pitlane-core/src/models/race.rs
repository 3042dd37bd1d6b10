use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::utils::format_date;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitSummary {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Race {
    pub id: i64,
    pub year: i32,
    pub round: i32,
    pub name: String,
    pub date: String,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    pub circuit: CircuitSummary,
}

impl Race {
    /// List label, e.g. `3. Australian Grand Prix (Apr 02, 2023)`.
    pub fn label(&self) -> String {
        format!("{}. {} ({})", self.round, self.name, format_date(&self.date))
    }

    pub fn heading(&self) -> String {
        format!("Year: {} - Round: {}", self.year, self.round)
    }
}

/// Distinct seasons present in a race list, newest first.
pub fn seasons_of(races: &[Race]) -> Vec<i32> {
    let years: BTreeSet<i32> = races.iter().map(|r| r.year).collect();
    years.into_iter().rev().collect()
}

/// Race as embedded in result and qualifying rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceSummary {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub round: i32,
    pub year: i32,
    #[serde(default)]
    pub date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn race(id: i64, year: i32, round: i32) -> Race {
        Race {
            id,
            year,
            round,
            name: format!("Race {}", id),
            date: "2023-03-05".to_string(),
            time: None,
            url: None,
            circuit: CircuitSummary {
                id: 3,
                name: "Bahrain International Circuit".to_string(),
                location: Some("Sakhir".to_string()),
                country: Some("Bahrain".to_string()),
            },
        }
    }

    #[test]
    fn test_seasons_distinct_newest_first() {
        let races = vec![race(1, 2021, 1), race(2, 2023, 1), race(3, 2021, 2), race(4, 2022, 1)];
        assert_eq!(seasons_of(&races), vec![2023, 2022, 2021]);
    }

    #[test]
    fn test_race_label() {
        let r = race(1100, 2023, 1);
        assert_eq!(r.label(), "1. Race 1100 (Mar 05, 2023)");
        assert_eq!(r.heading(), "Year: 2023 - Round: 1");
    }

    #[test]
    fn test_parse_race_json() {
        let json = r#"{"id":1098,"year":2023,"round":1,"name":"Bahrain Grand Prix","date":"2023-03-05","time":"15:00:00","url":"http://en.wikipedia.org/wiki/2023_Bahrain_Grand_Prix","circuit":{"id":3,"name":"Bahrain International Circuit","location":"Sakhir","country":"Bahrain"}}"#;
        let r: Race = serde_json::from_str(json).expect("race json");
        assert_eq!(r.id, 1098);
        assert_eq!(r.circuit.location.as_deref(), Some("Sakhir"));
    }
}
