//! Bulk loading of row objects into the store.
//!
//! The first row's keys become the header row (grid row 0). Every input row
//! then lands on grid row `i + 1`, one column per header. Loading is split so
//! the host can write a synchronous prefix and feed the remainder through
//! idle callbacks without blocking input.

use serde_json::Value;

use super::CellStore;
use crate::error::{GridError, Result};

/// One input record: column name to value, in key order.
pub type RowObject = serde_json::Map<String, Value>;

/// Outcome of a load step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadProgress {
    /// More rows remain; schedule another step.
    Pending,
    /// Every row has been written.
    Done,
}

/// Parse a JSON array of objects.
///
/// # Errors
/// Returns an error if the text is not JSON or not an array of objects.
pub fn rows_from_json(text: &str) -> Result<Vec<RowObject>> {
    let value: Value = serde_json::from_str(text)?;
    rows_from_value(value)
}

/// Convert an already-decoded JSON value into row objects.
///
/// # Errors
/// Returns [`GridError::Import`] if `value` is not an array of objects.
pub fn rows_from_value(value: Value) -> Result<Vec<RowObject>> {
    let Value::Array(items) = value else {
        return Err(GridError::Import("expected an array of row objects".into()));
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(map) => Ok(map),
            other => Err(GridError::Import(format!(
                "row {i} is {}, expected an object",
                json_kind(&other)
            ))),
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Cell text for a JSON value; `None` leaves the cell empty.
fn cell_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        nested @ (Value::Array(_) | Value::Object(_)) => Some(nested.to_string()),
    }
}

/// An in-progress load. Rows are consumed front to back.
#[derive(Debug)]
pub struct BulkLoad {
    headers: Vec<String>,
    rows: std::vec::IntoIter<RowObject>,
    next_row: u32,
    loaded: usize,
    total: usize,
    headers_written: bool,
}

impl BulkLoad {
    /// Prepare a load into a grid of `total_rows` x `total_cols`.
    ///
    /// Rows and header columns that do not fit the grid are dropped with a warning.
    pub fn new(mut rows: Vec<RowObject>, total_rows: u32, total_cols: u32) -> Self {
        let mut headers: Vec<String> = rows
            .first()
            .map(|first| first.keys().cloned().collect())
            .unwrap_or_default();

        let col_cap = total_cols as usize;
        if headers.len() > col_cap {
            log::warn!(
                "bulk load has {} columns but the grid has {}; extra columns dropped",
                headers.len(),
                col_cap
            );
            headers.truncate(col_cap);
        }

        let row_cap = total_rows.saturating_sub(1) as usize;
        if rows.len() > row_cap {
            log::warn!(
                "bulk load has {} rows but the grid fits {}; extra rows dropped",
                rows.len(),
                row_cap
            );
            rows.truncate(row_cap);
        }

        let total = rows.len();
        Self {
            headers,
            rows: rows.into_iter(),
            next_row: 1,
            loaded: 0,
            total,
            headers_written: false,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows written so far.
    pub fn loaded(&self) -> usize {
        self.loaded
    }

    /// Data rows this load will write in total.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_done(&self) -> bool {
        self.headers_written && self.loaded >= self.total
    }

    /// Write the header row and up to `max_rows` data rows.
    pub fn load_rows(&mut self, store: &mut CellStore, max_rows: usize) -> LoadProgress {
        self.write_headers(store);
        for mut row in self.rows.by_ref().take(max_rows) {
            let grid_row = self.next_row;
            for (col, key) in (0u32..).zip(self.headers.iter()) {
                if let Some(text) = row.remove(key).and_then(cell_text) {
                    store.set(grid_row, col, text, None);
                }
            }
            self.next_row = self.next_row.saturating_add(1);
            self.loaded += 1;
        }
        self.progress()
    }

    /// Process chunks of `chunk_rows` while `has_time` reports idle time left.
    ///
    /// At least one chunk is written per call so the load always advances.
    pub fn run_idle(
        &mut self,
        store: &mut CellStore,
        chunk_rows: usize,
        mut has_time: impl FnMut() -> bool,
    ) -> LoadProgress {
        let chunk_rows = chunk_rows.max(1);
        loop {
            if self.load_rows(store, chunk_rows) == LoadProgress::Done {
                log::debug!("bulk load finished: {} rows", self.loaded);
                return LoadProgress::Done;
            }
            if !has_time() {
                return LoadProgress::Pending;
            }
        }
    }

    fn write_headers(&mut self, store: &mut CellStore) {
        if self.headers_written {
            return;
        }
        for (col, header) in (0u32..).zip(self.headers.iter()) {
            if !header.is_empty() {
                store.set(0, col, header.as_str(), None);
            }
        }
        self.headers_written = true;
    }

    fn progress(&self) -> LoadProgress {
        if self.is_done() {
            LoadProgress::Done
        } else {
            LoadProgress::Pending
        }
    }
}

impl CellStore {
    /// Write every row in one go. Produces the same store contents as a
    /// sliced load of the same rows.
    pub fn load_bulk_sync(&mut self, rows: Vec<RowObject>, total_rows: u32, total_cols: u32) {
        let mut load = BulkLoad::new(rows, total_rows, total_cols);
        load.load_rows(self, usize::MAX);
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_from_first_row() {
        let rows = rows_from_json(r#"[{"name":"Ada","age":36},{"age":41,"name":"Alan"}]"#).unwrap();
        let mut store = CellStore::new();
        store.load_bulk_sync(rows, 100, 10);

        assert_eq!(store.value(0, 0), "name");
        assert_eq!(store.value(0, 1), "age");
        assert_eq!(store.value(1, 0), "Ada");
        assert_eq!(store.value(1, 1), "36");
        // Second row keys are out of order but follow the header columns
        assert_eq!(store.value(2, 0), "Alan");
        assert_eq!(store.value(2, 1), "41");
    }

    #[test]
    fn test_value_conversion() {
        let rows =
            rows_from_json(r#"[{"s":"x","n":1.5,"b":true,"z":null,"e":""},{"s":"y"}]"#).unwrap();
        let mut store = CellStore::new();
        store.load_bulk_sync(rows, 100, 10);

        assert_eq!(store.value(1, 1), "1.5");
        assert_eq!(store.value(1, 2), "true");
        assert!(store.get(1, 3).is_none());
        assert!(store.get(1, 4).is_none());
        // Missing keys leave the cell empty
        assert!(store.get(2, 1).is_none());
    }

    #[test]
    fn test_rejects_non_objects() {
        assert!(matches!(
            rows_from_json(r#"{"a":1}"#),
            Err(GridError::Import(_))
        ));
        assert!(matches!(
            rows_from_json(r#"[{"a":1}, 3]"#),
            Err(GridError::Import(_))
        ));
        assert!(matches!(rows_from_json("[{"), Err(GridError::Json(_))));
    }

    #[test]
    fn test_run_idle_always_advances() {
        let rows = rows_from_json(r#"[{"a":1},{"a":2},{"a":3},{"a":4},{"a":5}]"#).unwrap();
        let mut store = CellStore::new();
        let mut load = BulkLoad::new(rows, 100, 10);

        assert_eq!(load.run_idle(&mut store, 2, || false), LoadProgress::Pending);
        assert_eq!(load.loaded(), 2);
        assert_eq!(load.run_idle(&mut store, 2, || true), LoadProgress::Done);
        assert_eq!(load.loaded(), 5);
        assert_eq!(store.value(5, 0), "5");
    }

    #[test]
    fn test_truncates_to_grid() {
        let rows = rows_from_json(r#"[{"a":1,"b":2},{"a":3,"b":4},{"a":5,"b":6}]"#).unwrap();
        let mut store = CellStore::new();
        let load = BulkLoad::new(rows.clone(), 3, 1);
        assert_eq!(load.total(), 2);
        assert_eq!(load.headers(), ["a".to_string()]);

        store.load_bulk_sync(rows, 3, 1);
        assert_eq!(store.len(), 3);
        assert!(store.get(3, 0).is_none());
    }
}
