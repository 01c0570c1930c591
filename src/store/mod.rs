//! Sparse cell storage keyed by `(row, col)`.
//!
//! Absent keys are empty cells. Structural edits keep the store aligned with
//! the axes by re-keying every entry at or beyond the edit point.

mod bulk;

use std::collections::HashMap;

use crate::types::{AxisKind, CellPos, CellRecord, CellStyle};

pub use bulk::{rows_from_json, rows_from_value, BulkLoad, LoadProgress, RowObject};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellStore {
    cells: HashMap<CellPos, CellRecord>,
}

impl CellStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of non-empty cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The record at `(row, col)`, or `None` for an empty cell.
    pub fn get(&self, row: u32, col: u32) -> Option<&CellRecord> {
        self.cells.get(&CellPos { row, col })
    }

    /// Text content at `(row, col)`; empty string for an empty cell.
    pub fn value(&self, row: u32, col: u32) -> &str {
        self.get(row, col).map_or("", |c| c.value.as_str())
    }

    /// Insert or overwrite a cell. A missing style means plain text.
    pub fn set(&mut self, row: u32, col: u32, value: impl Into<String>, style: Option<CellStyle>) {
        self.cells.insert(
            CellPos { row, col },
            CellRecord::new(value, style.unwrap_or_default()),
        );
    }

    /// Replace a cell's text, keeping any style flags it already has.
    pub fn set_value(&mut self, row: u32, col: u32, value: impl Into<String>) {
        let value = value.into();
        self.cells
            .entry(CellPos { row, col })
            .and_modify(|c| c.value.clone_from(&value))
            .or_insert_with(|| CellRecord::new(value.clone(), CellStyle::PLAIN));
    }

    /// Update the style flags of an existing cell. Empty cells are left empty.
    pub fn set_style(&mut self, row: u32, col: u32, style: CellStyle) -> bool {
        match self.cells.get_mut(&CellPos { row, col }) {
            Some(cell) => {
                cell.style = style;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, row: u32, col: u32) -> Option<CellRecord> {
        self.cells.remove(&CellPos { row, col })
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellPos, &CellRecord)> {
        self.cells.iter().map(|(pos, cell)| (*pos, cell))
    }

    /// Shift every key on `axis` at or beyond `index` up by one.
    pub fn reindex_for_insert(&mut self, axis: AxisKind, index: u32) {
        self.rekey(|pos| {
            let coord = pos.coord(axis);
            if coord >= index {
                coord.checked_add(1).map(|c| pos.with_coord(axis, c))
            } else {
                Some(pos)
            }
        });
    }

    /// Drop keys at `index` on `axis` and shift keys beyond it down by one.
    pub fn reindex_for_delete(&mut self, axis: AxisKind, index: u32) {
        self.rekey(|pos| {
            let coord = pos.coord(axis);
            match coord.cmp(&index) {
                std::cmp::Ordering::Less => Some(pos),
                std::cmp::Ordering::Equal => None,
                std::cmp::Ordering::Greater => Some(pos.with_coord(axis, coord - 1)),
            }
        });
    }

    fn rekey(&mut self, mut map: impl FnMut(CellPos) -> Option<CellPos>) {
        let old = std::mem::take(&mut self.cells);
        self.cells = old
            .into_iter()
            .filter_map(|(pos, cell)| map(pos).map(|new_pos| (new_pos, cell)))
            .collect();
    }
}

impl CellPos {
    fn coord(self, axis: AxisKind) -> u32 {
        match axis {
            AxisKind::Rows => self.row,
            AxisKind::Columns => self.col,
        }
    }

    fn with_coord(self, axis: AxisKind, value: u32) -> CellPos {
        match axis {
            AxisKind::Rows => CellPos { row: value, ..self },
            AxisKind::Columns => CellPos { col: value, ..self },
        }
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
    fn test_get_set() {
        let mut store = CellStore::new();
        assert!(store.get(3, 4).is_none());
        assert_eq!(store.value(3, 4), "");

        store.set(3, 4, "hello", Some(CellStyle::bold()));
        let cell = store.get(3, 4).unwrap();
        assert_eq!(cell.value, "hello");
        assert!(cell.style.bold);
        assert!(!cell.style.italic);

        store.set(3, 4, "again", None);
        assert_eq!(store.get(3, 4).unwrap().style, CellStyle::PLAIN);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_set_value_keeps_style() {
        let mut store = CellStore::new();
        store.set(1, 5, "123", Some(CellStyle { bold: true, italic: true }));
        store.set_value(1, 5, "456");
        let cell = store.get(1, 5).unwrap();
        assert_eq!(cell.value, "456");
        assert!(cell.style.bold && cell.style.italic);
    }

    #[test]
    fn test_reindex_rows() {
        let mut store = CellStore::new();
        store.set(2, 3, "a", None);
        store.set(5, 1, "b", None);

        store.reindex_for_insert(AxisKind::Rows, 3);
        assert_eq!(store.value(2, 3), "a");
        assert_eq!(store.value(6, 1), "b");
        assert!(store.get(5, 1).is_none());

        store.reindex_for_delete(AxisKind::Rows, 3);
        assert_eq!(store.value(2, 3), "a");
        assert_eq!(store.value(5, 1), "b");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_reindex_delete_drops_edited_column() {
        let mut store = CellStore::new();
        store.set(0, 0, "keep", None);
        store.set(0, 1, "gone", None);
        store.set(0, 2, "moved", None);

        store.reindex_for_delete(AxisKind::Columns, 1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.value(0, 0), "keep");
        assert_eq!(store.value(0, 1), "moved");
    }
}
