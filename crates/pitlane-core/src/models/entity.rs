use serde::{Deserialize, Serialize};

/// Identifies an entity for lookups: `id` keys the cache, `reference` is
/// what the REST layer filters on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: i64,
    pub reference: String,
}

impl EntityRef {
    pub fn new(id: i64, reference: &str) -> Self {
        Self {
            id,
            reference: reference.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    #[serde(rename = "driverId")]
    pub id: i64,
    #[serde(rename = "driverRef")]
    pub reference: String,
    #[serde(default)]
    pub number: Option<i32>,
    #[serde(default)]
    pub code: Option<String>,
    pub forename: String,
    pub surname: String,
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Driver {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.forename, self.surname)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constructor {
    #[serde(rename = "constructorId")]
    pub id: i64,
    #[serde(rename = "constructorRef")]
    pub reference: String,
    pub name: String,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    #[serde(rename = "circuitId")]
    pub id: i64,
    #[serde(rename = "circuitRef", default)]
    pub reference: String,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub alt: Option<f64>,
    #[serde(default)]
    pub url: Option<String>,
}
