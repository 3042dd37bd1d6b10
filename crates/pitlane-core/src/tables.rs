//! Builders turning racing entities into sortable tables.

use crate::models::{EntityRef, Qualifying, RaceResult};
use crate::sorter::{Column, RenderedRow, TableId, TableView};

/// Entities a table row links to, for opening detail popups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLinks {
    pub race_id: i64,
    pub season: i32,
    pub driver: EntityRef,
    pub constructor: EntityRef,
}

pub type EntityTable = TableView<RowLinks>;

fn links_of(race_id: i64, season: i32, driver: EntityRef, constructor: EntityRef) -> RowLinks {
    RowLinks {
        race_id,
        season,
        driver,
        constructor,
    }
}

pub fn qualifying_table(entries: &[Qualifying]) -> EntityTable {
    let columns = vec![
        Column::sortable("position", "Pos"),
        Column::sortable("driver", "Driver"),
        Column::sortable("constructor", "Constructor"),
        Column::sortable("q1", "Q1"),
        Column::sortable("q2", "Q2"),
        Column::sortable("q3", "Q3"),
    ];

    let rows = entries
        .iter()
        .map(|q| {
            RenderedRow::new(links_of(
                q.race.id,
                q.race.year,
                q.driver.entity_ref(),
                q.constructor.entity_ref(),
            ))
            .with_cell("position", q.position_display())
            .with_cell("driver", q.driver.full_name())
            .with_cell("constructor", q.constructor.name.clone())
            .with_cell("q1", q.q1_display())
            .with_cell("q2", q.q2_display())
            .with_cell("q3", q.q3_display())
        })
        .collect();

    TableView::new(TableId::Qualifying, columns, rows)
}

pub fn race_results_table(results: &[RaceResult]) -> EntityTable {
    let columns = vec![
        Column::sortable("position", "Pos"),
        Column::sortable("driver", "Driver"),
        Column::sortable("constructor", "Constructor"),
        Column::sortable("time", "Time"),
        Column::fixed("points", "Pts"),
    ];

    let rows = results
        .iter()
        .map(|r| {
            result_row(r)
                .with_cell("time", r.time_display())
                .with_cell("points", r.points_display())
        })
        .collect();

    TableView::new(TableId::RaceResults, columns, rows)
}

/// A driver's results across one season.
pub fn driver_results_table(results: &[RaceResult]) -> EntityTable {
    let columns = vec![
        Column::sortable("round", "Rnd"),
        Column::sortable("race", "Race"),
        Column::sortable("position", "Pos"),
        Column::sortable("constructor", "Constructor"),
        Column::sortable("points", "Pts"),
    ];

    let rows = results
        .iter()
        .map(|r| {
            result_row(r)
                .with_cell("round", r.race.round.to_string())
                .with_cell("race", r.race.name.clone())
                .with_cell("points", r.points_display())
        })
        .collect();

    TableView::new(TableId::DriverResults, columns, rows)
}

/// A constructor's results across one season.
pub fn constructor_results_table(results: &[RaceResult]) -> EntityTable {
    let columns = vec![
        Column::sortable("round", "Rnd"),
        Column::sortable("race", "Race"),
        Column::sortable("position", "Pos"),
        Column::sortable("driver", "Driver"),
        Column::sortable("time", "Time"),
        Column::sortable("points", "Pts"),
    ];

    let rows = results
        .iter()
        .map(|r| {
            result_row(r)
                .with_cell("round", r.race.round.to_string())
                .with_cell("race", r.race.name.clone())
                .with_cell("time", r.time_display())
                .with_cell("points", r.points_display())
        })
        .collect();

    TableView::new(TableId::ConstructorResults, columns, rows)
}

fn result_row(r: &RaceResult) -> RenderedRow<RowLinks> {
    RenderedRow::new(links_of(
        r.race.id,
        r.race.year,
        r.driver.entity_ref(),
        r.constructor.entity_ref(),
    ))
    .with_cell("position", r.position_display())
    .with_cell("driver", r.driver.full_name())
    .with_cell("constructor", r.constructor.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConstructorSummary, DriverSummary, RaceSummary};
    use crate::sorter::{SortDirection, TableSorter};

    fn result(position: Option<i32>, surname: &str, points: f64) -> RaceResult {
        RaceResult {
            id: 1,
            race: RaceSummary {
                id: 1098,
                name: "Bahrain Grand Prix".to_string(),
                round: 1,
                year: 2023,
                date: None,
            },
            driver: DriverSummary {
                id: 10,
                reference: surname.to_lowercase(),
                code: None,
                forename: "Test".to_string(),
                surname: surname.to_string(),
            },
            constructor: ConstructorSummary {
                id: 6,
                reference: "ferrari".to_string(),
                name: "Ferrari".to_string(),
                nationality: Some("Italian".to_string()),
            },
            grid: None,
            position,
            points,
            laps: None,
            time: None,
        }
    }

    #[test]
    fn test_race_results_cells() {
        let table = race_results_table(&[result(Some(1), "Leclerc", 25.0), result(None, "Sainz", 0.0)]);
        assert_eq!(table.id, TableId::RaceResults);
        assert_eq!(table.row_texts("position"), vec!["1", "N/A"]);
        assert_eq!(table.row_texts("driver"), vec!["Test Leclerc", "Test Sainz"]);
        assert_eq!(table.row_texts("time"), vec!["N/A", "N/A"]);
        assert_eq!(table.rows[1].data.driver.reference, "sainz");
    }

    #[test]
    fn test_race_results_points_not_sortable() {
        let mut table = race_results_table(&[result(Some(2), "A", 18.0), result(Some(1), "B", 25.0)]);
        let mut sorter = TableSorter::new();
        assert_eq!(sorter.sort(&mut table, "points"), None);
        assert_eq!(sorter.sort(&mut table, "position"), Some(SortDirection::Ascending));
        assert_eq!(table.row_texts("points"), vec!["25", "18"]);
    }

    #[test]
    fn test_constructor_results_points_sortable() {
        let mut table =
            constructor_results_table(&[result(Some(2), "A", 18.0), result(Some(1), "B", 25.0), result(Some(3), "C", 15.0)]);
        let mut sorter = TableSorter::new();
        sorter.sort(&mut table, "points");
        assert_eq!(table.row_texts("points"), vec!["15", "18", "25"]);
        assert_eq!(table.row_texts("round"), vec!["1", "1", "1"]);
    }
}
