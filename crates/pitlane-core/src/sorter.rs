//! Sortable tables of rendered rows.
//!
//! A `TableView` holds rows whose cells are plain display text addressed by
//! column key. `TableSorter` remembers, per table, which column was sorted
//! last and in which direction: sorting the same column again flips the
//! direction, sorting a different column starts over ascending.
//!
//! Cells compare numerically when both parse as numbers and as collated text
//! otherwise. That rule is decided per pair, so a column mixing numbers with
//! sentinels like `N/A` has no total order; the merge sort below stays stable
//! and never panics on such input.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::utils::{locale_compare, parse_numeric};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableId {
    Qualifying,
    RaceResults,
    DriverResults,
    ConstructorResults,
}

impl TableId {
    pub fn title(&self) -> &'static str {
        match self {
            TableId::Qualifying => "Qualifying",
            TableId::RaceResults => "Race Results",
            TableId::DriverResults => "Driver Results",
            TableId::ConstructorResults => "Constructor Results",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub key: String,
    pub title: String,
    pub sortable: bool,
}

impl Column {
    pub fn sortable(key: &str, title: &str) -> Self {
        Self {
            key: key.to_string(),
            title: title.to_string(),
            sortable: true,
        }
    }

    pub fn fixed(key: &str, title: &str) -> Self {
        Self {
            sortable: false,
            ..Self::sortable(key, title)
        }
    }
}

/// A row as displayed: cell text by column key, plus caller data (for
/// example the entities the row links to).
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRow<T> {
    cells: Vec<(String, String)>,
    pub data: T,
}

impl<T> RenderedRow<T> {
    pub fn new(data: T) -> Self {
        Self {
            cells: Vec::new(),
            data,
        }
    }

    pub fn with_cell(mut self, key: &str, text: impl Into<String>) -> Self {
        self.cells.push((key.to_string(), text.into()));
        self
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, text)| text.trim())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableView<T> {
    pub id: TableId,
    pub columns: Vec<Column>,
    pub rows: Vec<RenderedRow<T>>,
    indicators: Vec<&'static str>,
}

impl<T> TableView<T> {
    pub fn new(id: TableId, columns: Vec<Column>, rows: Vec<RenderedRow<T>>) -> Self {
        let indicators = vec![""; columns.len()];
        Self {
            id,
            columns,
            rows,
            indicators,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key == key)
    }

    /// Indicator glyph for the column at `index` (empty when inactive).
    pub fn indicator(&self, index: usize) -> &'static str {
        self.indicators.get(index).copied().unwrap_or("")
    }

    /// Clear every column's glyph, then mark `key` with `direction`.
    pub fn update_indicators(&mut self, key: &str, direction: SortDirection) {
        self.indicators.iter_mut().for_each(|glyph| *glyph = "");
        if let Some(index) = self.column_index(key) {
            self.indicators[index] = direction.glyph();
        }
    }

    pub fn row_texts(&self, key: &str) -> Vec<&str> {
        self.rows.iter().map(|r| r.text(key).unwrap_or("")).collect()
    }
}

/// Last sorted column and direction of one table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortState {
    pub active_key: Option<String>,
    pub direction: SortDirection,
}

#[derive(Debug, Default)]
pub struct TableSorter {
    states: HashMap<TableId, SortState>,
}

impl TableSorter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, table: TableId) -> Option<&SortState> {
        self.states.get(&table)
    }

    /// Advance the toggle state of `table` for a click on `key`.
    pub fn toggle(&mut self, table: TableId, key: &str) -> SortDirection {
        let state = self.states.entry(table).or_default();
        if state.active_key.as_deref() == Some(key) {
            state.direction = state.direction.flip();
        } else {
            state.active_key = Some(key.to_string());
            state.direction = SortDirection::Ascending;
        }
        state.direction
    }

    /// Sort `table` by `key` and update its indicators. Returns `None` for
    /// unknown or fixed columns, leaving everything untouched.
    pub fn sort<T>(&mut self, table: &mut TableView<T>, key: &str) -> Option<SortDirection> {
        let sortable = table
            .column_index(key)
            .map(|i| table.columns[i].sortable)
            .unwrap_or(false);
        if !sortable {
            return None;
        }

        let direction = self.toggle(table.id, key);
        sort_rows(&mut table.rows, key, direction);
        Self::update_indicators(table, key, direction);
        Some(direction)
    }

    pub fn update_indicators<T>(table: &mut TableView<T>, key: &str, direction: SortDirection) {
        table.update_indicators(key, direction);
    }

    /// Forget the toggle memory of a table whose rows were rebuilt.
    pub fn reset(&mut self, table: TableId) {
        self.states.remove(&table);
    }
}

/// Compare two cell texts: numerically when both are numbers, else as text.
pub fn compare_cells(a: &str, b: &str) -> Ordering {
    match (parse_numeric(a), parse_numeric(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => locale_compare(a.trim(), b.trim()),
    }
}

/// Missing cells compare as empty text, never as numbers.
fn compare_row_cells(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => compare_cells(a, b),
        (a, b) => locale_compare(a.unwrap_or(""), b.unwrap_or("")),
    }
}

/// Stable sort of rows by the text in column `key`.
pub fn sort_rows<T>(rows: &mut Vec<RenderedRow<T>>, key: &str, direction: SortDirection) {
    let taken = std::mem::take(rows);
    *rows = merge_sort(taken, &|a: &RenderedRow<T>, b: &RenderedRow<T>| {
        direction.apply(compare_row_cells(a.text(key), b.text(key)))
    });
}

// std's sort may panic when the comparator is not a total order
fn merge_sort<T, F>(mut items: Vec<T>, cmp: &F) -> Vec<T>
where
    F: Fn(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }

    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, cmp);
    let right = merge_sort(right, cmp);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    loop {
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => cmp(r, l) == Ordering::Less,
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };
        let next = if take_right { right.next() } else { left.next() };
        merged.extend(next);
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(id: TableId, values: &[&str]) -> TableView<usize> {
        let rows = values
            .iter()
            .enumerate()
            .map(|(i, v)| RenderedRow::new(i).with_cell("position", *v).with_cell("driver", format!("D{}", i)))
            .collect();
        TableView::new(
            id,
            vec![
                Column::sortable("position", "Pos"),
                Column::sortable("driver", "Driver"),
                Column::fixed("points", "Pts"),
            ],
            rows,
        )
    }

    #[test]
    fn test_numeric_columns_sort_numerically() {
        let mut t = table(TableId::RaceResults, &["2", "10", "1"]);
        let mut sorter = TableSorter::new();

        assert_eq!(sorter.sort(&mut t, "position"), Some(SortDirection::Ascending));
        assert_eq!(t.row_texts("position"), vec!["1", "2", "10"]);
    }

    #[test]
    fn test_same_key_flips_to_exact_reverse() {
        let mut t = table(TableId::RaceResults, &["3", "1", "4", "15", "9"]);
        let mut sorter = TableSorter::new();

        sorter.sort(&mut t, "position");
        let ascending: Vec<String> = t.row_texts("position").into_iter().map(String::from).collect();

        assert_eq!(sorter.sort(&mut t, "position"), Some(SortDirection::Descending));
        let descending: Vec<String> = t.row_texts("position").into_iter().map(String::from).collect();

        let mut reversed = ascending.clone();
        reversed.reverse();
        assert_eq!(descending, reversed);
        assert_eq!(sorter.sort(&mut t, "position"), Some(SortDirection::Ascending));
    }

    #[test]
    fn test_new_key_resets_to_ascending() {
        let mut t = table(TableId::Qualifying, &["3", "1", "2"]);
        let mut sorter = TableSorter::new();

        sorter.sort(&mut t, "position");
        sorter.sort(&mut t, "position");
        assert_eq!(sorter.sort(&mut t, "driver"), Some(SortDirection::Ascending));
        assert_eq!(t.row_texts("driver"), vec!["D0", "D1", "D2"]);
        assert_eq!(
            sorter.state(TableId::Qualifying).and_then(|s| s.active_key.as_deref()),
            Some("driver")
        );
    }

    #[test]
    fn test_resorting_is_idempotent() {
        let mut rows: Vec<RenderedRow<usize>> = ["b", "a", "b", "a", "c"]
            .iter()
            .enumerate()
            .map(|(i, v)| RenderedRow::new(i).with_cell("team", *v))
            .collect();

        sort_rows(&mut rows, "team", SortDirection::Ascending);
        let once: Vec<usize> = rows.iter().map(|r| r.data).collect();
        assert_eq!(once, vec![1, 3, 0, 2, 4]);

        sort_rows(&mut rows, "team", SortDirection::Ascending);
        let twice: Vec<usize> = rows.iter().map(|r| r.data).collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_toggle_memory_is_per_table() {
        let mut qualifying = table(TableId::Qualifying, &["2", "1"]);
        let mut results = table(TableId::RaceResults, &["2", "1"]);
        let mut sorter = TableSorter::new();

        sorter.sort(&mut qualifying, "position");
        assert_eq!(sorter.sort(&mut results, "position"), Some(SortDirection::Ascending));
        assert_eq!(sorter.sort(&mut qualifying, "position"), Some(SortDirection::Descending));
    }

    #[test]
    fn test_indicators_follow_active_column() {
        let mut t = table(TableId::RaceResults, &["2", "1"]);
        let mut sorter = TableSorter::new();

        sorter.sort(&mut t, "position");
        assert_eq!(t.indicator(0), "▲");
        assert_eq!(t.indicator(1), "");

        sorter.sort(&mut t, "position");
        assert_eq!(t.indicator(0), "▼");

        sorter.sort(&mut t, "driver");
        assert_eq!(t.indicator(0), "");
        assert_eq!(t.indicator(1), "▲");
    }

    #[test]
    fn test_fixed_and_unknown_columns_are_ignored() {
        let mut t = table(TableId::RaceResults, &["2", "1"]);
        let mut sorter = TableSorter::new();

        assert_eq!(sorter.sort(&mut t, "points"), None);
        assert_eq!(sorter.sort(&mut t, "nope"), None);
        assert_eq!(t.row_texts("position"), vec!["2", "1"]);
        assert!(sorter.state(TableId::RaceResults).is_none());
    }

    #[test]
    fn test_text_columns_use_collation() {
        let mut rows: Vec<RenderedRow<()>> = ["verstappen", "Alonso", "alonso", "Bottas"]
            .iter()
            .map(|v| RenderedRow::new(()).with_cell("driver", *v))
            .collect();
        sort_rows(&mut rows, "driver", SortDirection::Ascending);
        let names: Vec<&str> = rows.iter().map(|r| r.text("driver").unwrap_or("")).collect();
        assert_eq!(names, vec!["alonso", "Alonso", "Bottas", "verstappen"]);
    }

    #[test]
    fn test_mixed_column_sorts_without_panicking() {
        let values = ["10", "N/A", "9", "1a", "2", "N/A", "1:31.158", "", "3"];
        let mut rows: Vec<RenderedRow<usize>> = values
            .iter()
            .enumerate()
            .map(|(i, v)| RenderedRow::new(i).with_cell("q1", *v))
            .collect();

        sort_rows(&mut rows, "q1", SortDirection::Ascending);
        assert_eq!(rows.len(), values.len());

        let mut again: Vec<RenderedRow<usize>> = values
            .iter()
            .enumerate()
            .map(|(i, v)| RenderedRow::new(i).with_cell("q1", *v))
            .collect();
        sort_rows(&mut again, "q1", SortDirection::Ascending);
        assert_eq!(rows, again);
    }

    #[test]
    fn test_lap_times_sort_as_text() {
        assert_eq!(compare_cells("1:30.713", "1:31.158"), Ordering::Less);
        assert_eq!(compare_cells("2", "10"), Ordering::Less);
        assert_eq!(compare_cells("10", "N/A"), Ordering::Less);
    }

    #[test]
    fn test_reset_forgets_toggle() {
        let mut t = table(TableId::DriverResults, &["2", "1"]);
        let mut sorter = TableSorter::new();
        sorter.sort(&mut t, "position");
        sorter.reset(TableId::DriverResults);
        assert_eq!(sorter.sort(&mut t, "position"), Some(SortDirection::Ascending));
    }
}
