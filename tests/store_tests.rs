//! Cell store tests
//!
//! Tests for sparse storage, style preservation on edits and re-keying when
//! rows or columns are inserted and deleted.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use gridview::store::CellStore;
use gridview::types::{AxisKind, CellStyle};

fn values(store: &CellStore) -> Vec<((u32, u32), String)> {
    let mut out: Vec<_> = store
        .iter()
        .map(|(pos, cell)| ((pos.row, pos.col), cell.value.clone()))
        .collect();
    out.sort();
    out
}

#[test]
fn test_missing_cell_reads_empty() {
    let store = CellStore::new();
    assert!(store.get(3, 3).is_none());
    assert_eq!(store.value(3, 3), "");
    assert!(store.is_empty());
}

#[test]
fn test_set_value_keeps_style() {
    let mut store = CellStore::new();
    store.set(1, 1, "title", Some(CellStyle::bold()));
    store.set_value(1, 1, "renamed");
    let cell = store.get(1, 1).unwrap();
    assert_eq!(cell.value, "renamed");
    assert!(cell.style.bold);
    assert!(!cell.style.italic);
}

#[test]
fn test_insert_then_delete_row_restores_keys() {
    let mut store = CellStore::new();
    store.set(2, 3, "a", None);
    store.set(5, 1, "b", None);

    store.reindex_for_insert(AxisKind::Rows, 3);
    assert_eq!(
        values(&store),
        vec![((2, 3), "a".to_string()), ((6, 1), "b".to_string())]
    );

    store.reindex_for_delete(AxisKind::Rows, 3);
    assert_eq!(
        values(&store),
        vec![((2, 3), "a".to_string()), ((5, 1), "b".to_string())]
    );
}

#[test]
fn test_delete_column_drops_its_cells() {
    let mut store = CellStore::new();
    store.set(0, 0, "keep", None);
    store.set(0, 1, "gone", None);
    store.set(4, 1, "gone too", None);
    store.set(0, 2, "shift", Some(CellStyle::italic()));

    store.reindex_for_delete(AxisKind::Columns, 1);
    assert_eq!(store.len(), 2);
    assert_eq!(store.value(0, 0), "keep");
    assert_eq!(store.value(0, 1), "shift");
    assert!(store.get(0, 1).unwrap().style.italic);
    assert!(store.get(0, 2).is_none());
}

#[test]
fn test_insert_column_before_everything() {
    let mut store = CellStore::new();
    store.set(0, 0, "x", None);
    store.set(9, 4, "y", None);
    store.reindex_for_insert(AxisKind::Columns, 0);
    assert_eq!(
        values(&store),
        vec![((0, 1), "x".to_string()), ((9, 5), "y".to_string())]
    );
}

#[test]
fn test_remove_and_clear() {
    let mut store = CellStore::new();
    store.set(0, 0, "a", None);
    store.set(1, 0, "b", None);
    assert_eq!(store.remove(0, 0).unwrap().value, "a");
    assert_eq!(store.len(), 1);
    store.clear();
    assert!(store.is_empty());
}
