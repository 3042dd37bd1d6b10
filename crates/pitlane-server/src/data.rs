//! In-memory data set served by the REST endpoints.
//!
//! Records are kept as raw JSON so every field in the files is passed
//! through unchanged. Lookups are pure filters over the loaded arrays.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{error, info};

#[derive(Debug, Clone, Default)]
pub struct DataSet {
    pub circuits: Vec<Value>,
    pub constructors: Vec<Value>,
    pub drivers: Vec<Value>,
    pub races: Vec<Value>,
    pub results: Vec<Value>,
    pub qualifying: Vec<Value>,
}

/// Read `<name>.json` from `dir`. Missing or malformed files are logged and
/// yield an empty array so the remaining endpoints keep working.
fn load_file(dir: &Path, name: &str) -> Vec<Value> {
    let path = dir.join(format!("{}.json", name));
    let parsed = fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|text| serde_json::from_str::<Vec<Value>>(&text).map_err(|e| e.to_string()));

    match parsed {
        Ok(records) => {
            info!(file = %path.display(), count = records.len(), "Loaded data file");
            records
        }
        Err(e) => {
            error!(file = %path.display(), error = %e, "Error reading data file");
            Vec::new()
        }
    }
}

/// Whole-string integer parse; `2023abc` or `3.7` match nothing and give a 404.
fn parse_number(param: &str) -> Option<i64> {
    param.trim().parse().ok()
}

fn int_field(value: &Value, pointer: &str) -> Option<i64> {
    value.pointer(pointer).and_then(Value::as_i64)
}

fn ref_matches(value: &Value, pointer: &str, reference: &str) -> bool {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .is_some_and(|r| r.eq_ignore_ascii_case(reference))
}

impl DataSet {
    pub fn load(dir: &Path) -> Self {
        Self {
            circuits: load_file(dir, "circuits"),
            constructors: load_file(dir, "constructors"),
            drivers: load_file(dir, "drivers"),
            races: load_file(dir, "races"),
            results: load_file(dir, "results"),
            qualifying: load_file(dir, "qualifying"),
        }
    }

    pub fn circuit(&self, id: &str) -> Option<&Value> {
        let id = parse_number(id)?;
        self.circuits.iter().find(|c| int_field(c, "/circuitId") == Some(id))
    }

    pub fn constructor(&self, reference: &str) -> Option<&Value> {
        self.constructors
            .iter()
            .find(|c| ref_matches(c, "/constructorRef", reference))
    }

    pub fn driver(&self, reference: &str) -> Option<&Value> {
        self.drivers.iter().find(|d| ref_matches(d, "/driverRef", reference))
    }

    pub fn race(&self, id: &str) -> Option<&Value> {
        let id = parse_number(id)?;
        self.races.iter().find(|r| int_field(r, "/id") == Some(id))
    }

    pub fn races_in_season(&self, year: &str) -> Vec<&Value> {
        let Some(year) = parse_number(year) else {
            return Vec::new();
        };
        self.races
            .iter()
            .filter(|r| int_field(r, "/year") == Some(year))
            .collect()
    }

    pub fn results_for_race(&self, id: &str) -> Vec<&Value> {
        filter_by_race(&self.results, id)
    }

    pub fn qualifying_for_race(&self, id: &str) -> Vec<&Value> {
        filter_by_race(&self.qualifying, id)
    }

    pub fn results_in_season(&self, year: &str) -> Vec<&Value> {
        let Some(year) = parse_number(year) else {
            return Vec::new();
        };
        self.results
            .iter()
            .filter(|r| int_field(r, "/race/year") == Some(year))
            .collect()
    }

    pub fn driver_results(&self, reference: &str, year: &str) -> Vec<&Value> {
        self.season_results_for(reference, year, "/driver/ref")
    }

    pub fn constructor_results(&self, reference: &str, year: &str) -> Vec<&Value> {
        self.season_results_for(reference, year, "/constructor/ref")
    }

    fn season_results_for(&self, reference: &str, year: &str, pointer: &str) -> Vec<&Value> {
        let Some(year) = parse_number(year) else {
            return Vec::new();
        };
        self.results
            .iter()
            .filter(|r| ref_matches(r, pointer, reference) && int_field(r, "/race/year") == Some(year))
            .collect()
    }
}

fn filter_by_race<'a>(records: &'a [Value], id: &str) -> Vec<&'a Value> {
    let Some(id) = parse_number(id) else {
        return Vec::new();
    };
    records
        .iter()
        .filter(|r| int_field(r, "/race/id") == Some(id))
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn sample() -> DataSet {
        DataSet {
            circuits: vec![json!({"circuitId": 3, "circuitRef": "bahrain", "name": "Bahrain International Circuit"})],
            constructors: vec![json!({"constructorId": 9, "constructorRef": "red_bull", "name": "Red Bull"})],
            drivers: vec![json!({"driverId": 1, "driverRef": "hamilton", "forename": "Lewis", "surname": "Hamilton"})],
            races: vec![
                json!({"id": 1098, "year": 2023, "round": 1, "name": "Bahrain Grand Prix"}),
                json!({"id": 1099, "year": 2023, "round": 2, "name": "Saudi Arabian Grand Prix"}),
                json!({"id": 1074, "year": 2022, "round": 1, "name": "Bahrain Grand Prix"}),
            ],
            results: vec![
                json!({"resultId": 1, "race": {"id": 1098, "year": 2023}, "driver": {"ref": "hamilton"}, "constructor": {"ref": "mercedes"}}),
                json!({"resultId": 2, "race": {"id": 1098, "year": 2023}, "driver": {"ref": "verstappen"}, "constructor": {"ref": "red_bull"}}),
                json!({"resultId": 3, "race": {"id": 1074, "year": 2022}, "driver": {"ref": "hamilton"}, "constructor": {"ref": "mercedes"}}),
            ],
            qualifying: vec![json!({"qualifyId": 7, "race": {"id": 1098, "year": 2023}, "q1": "1:31.295"})],
        }
    }

    #[test]
    fn test_lookup_by_numeric_id() {
        let data = sample();
        assert!(data.circuit("3").is_some());
        assert!(data.circuit("4").is_none());
        assert!(data.circuit("abc").is_none());
        assert!(data.circuit("3abc").is_none());
        assert!(data.circuit("3.7").is_none());
        assert_eq!(data.race("1099").and_then(|r| r["round"].as_i64()), Some(2));
    }

    #[test]
    fn test_refs_match_case_insensitively() {
        let data = sample();
        assert!(data.driver("HAMILTON").is_some());
        assert!(data.constructor("Red_Bull").is_some());
        assert!(data.driver("alonso").is_none());
    }

    #[test]
    fn test_season_filters() {
        let data = sample();
        assert_eq!(data.races_in_season("2023").len(), 2);
        assert!(data.races_in_season("1950").is_empty());
        assert_eq!(data.results_in_season("2022").len(), 1);
        assert_eq!(data.driver_results("Hamilton", "2023").len(), 1);
        assert_eq!(data.constructor_results("red_bull", "2023").len(), 1);
        assert!(data.constructor_results("red_bull", "2022").is_empty());
    }

    #[test]
    fn test_race_filters() {
        let data = sample();
        assert_eq!(data.results_for_race("1098").len(), 2);
        assert_eq!(data.qualifying_for_race("1098").len(), 1);
        assert!(data.qualifying_for_race("1074").is_empty());
    }

    #[test]
    fn test_unreadable_files_load_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("drivers.json"), r#"[{"driverRef": "hamilton"}]"#).unwrap();
        fs::write(dir.path().join("races.json"), "not json").unwrap();

        let data = DataSet::load(dir.path());
        assert_eq!(data.drivers.len(), 1);
        assert!(data.races.is_empty());
        assert!(data.circuits.is_empty());
    }
}
