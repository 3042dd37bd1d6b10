//! HTTP routes.
//!
//! Every endpoint is a `GET` returning JSON. Lookups that find nothing answer
//! 404 with `{"error": "<message>"}`; unmatched paths get the same shape.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::debug;

use crate::data::DataSet;

type Shared = State<Arc<DataSet>>;

pub fn router(data: Arc<DataSet>) -> Router {
    Router::new()
        .route("/api/circuits", get(all_circuits))
        .route("/api/circuits/:id", get(circuit))
        .route("/api/constructors", get(all_constructors))
        .route("/api/constructors/:reference", get(constructor))
        .route("/api/constructorResults/:reference/:year", get(constructor_results))
        .route("/api/drivers", get(all_drivers))
        .route("/api/drivers/:reference", get(driver))
        .route("/api/driverResults/:reference/:year", get(driver_results))
        .route("/api/races", get(all_races))
        .route("/api/races/season/:year", get(races_in_season))
        .route("/api/races/id/:id", get(race))
        .route("/api/results/race/:id", get(results_for_race))
        .route("/api/results/season/:year", get(results_in_season))
        .route("/api/qualifying/race/:id", get(qualifying_for_race))
        .fallback(endpoint_not_found)
        .with_state(data)
}

fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
}

fn one(record: Option<&Value>, message: &str) -> Response {
    match record {
        Some(record) => Json(record).into_response(),
        None => not_found(message),
    }
}

fn many(records: Vec<&Value>, message: &str) -> Response {
    if records.is_empty() {
        not_found(message)
    } else {
        Json(records).into_response()
    }
}

async fn endpoint_not_found(uri: axum::http::Uri) -> Response {
    debug!(path = %uri.path(), "No route");
    not_found("Endpoint not found")
}

async fn all_circuits(State(data): Shared) -> Response {
    Json(&data.circuits).into_response()
}

async fn circuit(State(data): Shared, Path(id): Path<String>) -> Response {
    one(data.circuit(&id), "Circuit not found")
}

async fn all_constructors(State(data): Shared) -> Response {
    Json(&data.constructors).into_response()
}

async fn constructor(State(data): Shared, Path(reference): Path<String>) -> Response {
    one(data.constructor(&reference), "Constructor not found")
}

async fn constructor_results(
    State(data): Shared,
    Path((reference, year)): Path<(String, String)>,
) -> Response {
    many(
        data.constructor_results(&reference, &year),
        "No results found for the given constructor and year",
    )
}

async fn all_drivers(State(data): Shared) -> Response {
    Json(&data.drivers).into_response()
}

async fn driver(State(data): Shared, Path(reference): Path<String>) -> Response {
    one(data.driver(&reference), "Driver not found")
}

async fn driver_results(
    State(data): Shared,
    Path((reference, year)): Path<(String, String)>,
) -> Response {
    many(
        data.driver_results(&reference, &year),
        "No results found for the given driver and year",
    )
}

async fn all_races(State(data): Shared) -> Response {
    Json(&data.races).into_response()
}

async fn races_in_season(State(data): Shared, Path(year): Path<String>) -> Response {
    many(data.races_in_season(&year), "No races found for the given season")
}

async fn race(State(data): Shared, Path(id): Path<String>) -> Response {
    one(data.race(&id), "Race not found")
}

async fn results_for_race(State(data): Shared, Path(id): Path<String>) -> Response {
    many(data.results_for_race(&id), "No results found for the given race ID")
}

async fn results_in_season(State(data): Shared, Path(year): Path<String>) -> Response {
    many(data.results_in_season(&year), "No results found for the given season")
}

async fn qualifying_for_race(State(data): Shared, Path(id): Path<String>) -> Response {
    many(
        data.qualifying_for_race(&id),
        "No qualifying results found for the given race ID",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::sample;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    async fn get_json(path: &str) -> (StatusCode, Value) {
        let app = router(Arc::new(sample()));
        let response = app
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_list_endpoints() {
        for (path, len) in [
            ("/api/circuits", 1),
            ("/api/constructors", 1),
            ("/api/drivers", 1),
            ("/api/races", 3),
        ] {
            let (status, body) = get_json(path).await;
            assert_eq!(status, StatusCode::OK, "{}", path);
            assert_eq!(body.as_array().map(Vec::len), Some(len), "{}", path);
        }
    }

    #[tokio::test]
    async fn test_single_record_endpoints() {
        let (status, body) = get_json("/api/circuits/3").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["circuitRef"], "bahrain");

        let (status, body) = get_json("/api/drivers/Hamilton").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["surname"], "Hamilton");

        let (status, body) = get_json("/api/constructors/RED_BULL").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Red Bull");

        let (status, body) = get_json("/api/races/id/1098").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["round"], 1);
    }

    #[tokio::test]
    async fn test_filtered_endpoints() {
        let (status, body) = get_json("/api/races/season/2023").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(2));

        let (_, body) = get_json("/api/results/race/1098").await;
        assert_eq!(body.as_array().map(Vec::len), Some(2));

        let (_, body) = get_json("/api/results/season/2022").await;
        assert_eq!(body[0]["resultId"], 3);

        let (_, body) = get_json("/api/driverResults/hamilton/2022").await;
        assert_eq!(body[0]["resultId"], 3);

        let (_, body) = get_json("/api/constructorResults/red_bull/2023").await;
        assert_eq!(body[0]["resultId"], 2);

        let (_, body) = get_json("/api/qualifying/race/1098").await;
        assert_eq!(body[0]["q1"], "1:31.295");
    }

    #[tokio::test]
    async fn test_not_found_messages() {
        let cases = [
            ("/api/circuits/99", "Circuit not found"),
            ("/api/circuits/abc", "Circuit not found"),
            ("/api/constructors/lotus", "Constructor not found"),
            ("/api/constructorResults/red_bull/1990", "No results found for the given constructor and year"),
            ("/api/drivers/senna", "Driver not found"),
            ("/api/driverResults/hamilton/1990", "No results found for the given driver and year"),
            ("/api/races/season/1900", "No races found for the given season"),
            ("/api/races/id/1", "Race not found"),
            ("/api/results/race/1", "No results found for the given race ID"),
            ("/api/results/season/1900", "No results found for the given season"),
            ("/api/qualifying/race/1074", "No qualifying results found for the given race ID"),
            ("/api/pitstops", "Endpoint not found"),
            ("/", "Endpoint not found"),
        ];

        for (path, message) in cases {
            let (status, body) = get_json(path).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{}", path);
            assert_eq!(body["error"], message, "{}", path);
        }
    }
}
