//! Bulk row import tests
//!
//! Tests that a load split into a synchronous prefix plus idle-time chunks
//! produces exactly the store a one-shot load does, and that payload shapes
//! map onto the header row and data rows as expected.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_precision_loss
)]

use gridview::store::{rows_from_json, LoadProgress, RowObject};
use gridview::{GridConfig, SheetView};
use serde_json::json;

fn rows(count: usize) -> Vec<RowObject> {
    (0..count)
        .map(|i| {
            let note = if i % 3 == 0 { json!(null) } else { json!("x") };
            let value = json!({
                "id": i,
                "name": format!("item {i}"),
                "price": (i as f64) * 1.25,
                "active": i % 2 == 0,
                "note": note,
            });
            let serde_json::Value::Object(map) = value else {
                panic!("row literal is an object");
            };
            map
        })
        .collect()
}

fn view() -> SheetView {
    SheetView::headless(GridConfig::with_size(10_000, 26)).unwrap()
}

#[test]
fn test_deferred_load_matches_sync_load() {
    let mut sync = view();
    sync.load_rows_sync(rows(2500));

    let mut deferred = view();
    assert_eq!(deferred.load_rows(rows(2500)), LoadProgress::Pending);
    assert!(deferred.is_loading());
    // Only the prefix is in place so far
    assert!(deferred.cell(100, 0).is_some());
    assert!(deferred.cell(101, 0).is_none());

    // Idle callbacks with room for one extra chunk each
    let mut callbacks = 0;
    loop {
        callbacks += 1;
        let mut budget = 1;
        let progress = deferred.on_idle(|| {
            let more = budget > 0;
            budget -= 1;
            more
        });
        if progress == LoadProgress::Done {
            break;
        }
        assert!(callbacks < 100, "load never finished");
    }
    assert!(callbacks > 1);
    assert!(!deferred.is_loading());
    assert_eq!(deferred.grid().store, sync.grid().store);
}

#[test]
fn test_header_row_and_value_text() {
    let mut view = view();
    view.load_rows_sync(rows(4));

    let header: Vec<_> = (0..5).map(|c| view.cell(0, c).unwrap().value.clone()).collect();
    assert_eq!(header, vec!["id", "name", "price", "active", "note"]);

    assert_eq!(view.cell(1, 0).unwrap().value, "0");
    assert_eq!(view.cell(2, 1).unwrap().value, "item 1");
    assert_eq!(view.cell(3, 2).unwrap().value, "2.5");
    assert_eq!(view.cell(2, 3).unwrap().value, "false");
    // null leaves the cell empty
    assert!(view.cell(1, 4).is_none());
    assert_eq!(view.cell(2, 4).unwrap().value, "x");
}

#[test]
fn test_rows_follow_first_row_keys() {
    let parsed = rows_from_json(
        r#"[{"a": 1, "b": 2}, {"b": 3, "c": 4}, {"a": [1, 2]}]"#,
    )
    .unwrap();
    let mut view = view();
    view.load_rows_sync(parsed);

    assert_eq!(view.cell(0, 0).unwrap().value, "a");
    assert_eq!(view.cell(0, 1).unwrap().value, "b");
    assert!(view.cell(0, 2).is_none());
    // Key "c" is not a header: dropped
    assert!(view.cell(2, 0).is_none());
    assert_eq!(view.cell(2, 1).unwrap().value, "3");
    assert_eq!(view.cell(3, 0).unwrap().value, "[1,2]");
}

#[test]
fn test_rejects_non_array_payloads() {
    assert!(rows_from_json(r#"{"a": 1}"#).is_err());
    assert!(rows_from_json("[1, 2]").is_err());
    assert!(rows_from_json("not json").is_err());
    assert_eq!(rows_from_json("[]").unwrap().len(), 0);
}

#[test]
fn test_rows_beyond_grid_are_dropped() {
    let mut view = SheetView::headless(GridConfig::with_size(5, 2)).unwrap();
    view.load_rows_sync(rows(10));
    // Header plus 4 data rows fill a 5-row grid; only 2 columns fit
    assert_eq!(view.cell(4, 0).unwrap().value, "3");
    assert!(view.cell(0, 2).is_none());
    assert_eq!(view.grid().store.len(), 2 + 4 * 2);
}

#[test]
fn test_new_load_replaces_previous_data() {
    let mut view = view();
    view.set_cell(500, 20, "stale", None);
    view.load_rows(rows(3));
    assert!(view.cell(500, 20).is_none());
    assert!(!view.is_loading());
}

#[test]
fn test_small_load_finishes_synchronously() {
    let mut view = view();
    assert_eq!(view.load_rows(rows(50)), LoadProgress::Done);
    assert!(!view.is_loading());
    assert_eq!(view.cell(50, 1).unwrap().value, "item 49");
}

#[test]
fn test_structural_edit_during_load_lands_rows_in_place() {
    let mut sync = view();
    sync.load_rows_sync(rows(300));
    sync.insert_row(1).unwrap();
    sync.delete_column(1).unwrap();

    let mut deferred = view();
    assert_eq!(deferred.load_rows(rows(300)), LoadProgress::Pending);
    deferred.insert_row(1).unwrap();
    assert!(!deferred.is_loading());
    deferred.delete_column(1).unwrap();
    assert_eq!(deferred.on_idle(|| true), LoadProgress::Done);

    assert_eq!(deferred.cell(102, 0).unwrap().value, "100");
    assert_eq!(deferred.cell(150, 0).unwrap().value, "148");
    assert_eq!(deferred.cell(301, 0).unwrap().value, "299");
    assert_eq!(deferred.grid().store, sync.grid().store);
}
