//! Inline editing tests
//!
//! Covers the edit surface lifecycle: typing over a blurred cell, editing a
//! focused cell, commit rules, keyboard navigation and structural edits that
//! commit an open session first.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use gridview::error::GridError;
use gridview::interaction::{KeyInput, PointerEvent};
use gridview::types::{AxisKind, CellPos, CellRange, CellStyle};
use gridview::{GridConfig, SheetView};
use test_case::test_case;

fn view() -> SheetView {
    let mut view = SheetView::headless(GridConfig::with_size(1000, 26)).unwrap();
    view.resize(550.0, 275.0);
    view
}

fn click(view: &mut SheetView, row: u32, col: u32, time_ms: f64) {
    let ev = PointerEvent::new(
        50.0 + f64::from(col) * 100.0 + 50.0,
        25.0 + f64::from(row) * 25.0 + 12.5,
        time_ms,
    );
    view.pointer_down(&ev);
    view.pointer_up(&ev);
}

fn double_click(view: &mut SheetView, row: u32, col: u32) {
    click(view, row, col, 1000.0);
    click(view, row, col, 1100.0);
}

fn type_str(view: &mut SheetView, text: &str) {
    for ch in text.chars() {
        assert!(view.key_down(KeyInput::Char(ch)));
    }
}

fn single(row: u32, col: u32) -> Option<CellRange> {
    let pos = CellPos::new(row, col);
    Some(CellRange::new(pos, pos))
}

#[test]
fn test_typing_on_blurred_cell_replaces_content() {
    let mut view = view();
    view.set_cell(2, 2, "old", None);
    click(&mut view, 2, 2, 0.0);
    type_str(&mut view, "new");

    let session = view.grid().editing.as_ref().unwrap();
    assert!(session.is_focused());
    assert_eq!(session.value(), "new");

    assert!(view.key_down(KeyInput::Enter));
    assert_eq!(view.cell(2, 2).unwrap().value, "new");
}

#[test]
fn test_focused_edit_appends_and_commits_on_blur() {
    let mut view = view();
    view.set_cell(2, 2, "old", None);
    double_click(&mut view, 2, 2);
    view.set_edit_value("old!");
    view.blur_edit();
    assert_eq!(view.cell(2, 2).unwrap().value, "old!");
    assert!(view.grid().editing.is_none());
}

#[test]
fn test_blur_of_unfocused_surface_is_ignored() {
    let mut view = view();
    click(&mut view, 2, 2, 0.0);
    view.blur_edit();
    assert!(view.grid().editing.is_some());
}

#[test]
fn test_blank_commit_removes_cell() {
    let mut view = view();
    view.set_cell(4, 1, "gone", None);
    double_click(&mut view, 4, 1);
    view.set_edit_value("   ");
    view.blur_edit();
    assert!(view.cell(4, 1).is_none());
}

#[test]
fn test_commit_keeps_style() {
    let mut view = view();
    view.set_cell(1, 1, "5", Some(CellStyle::bold()));
    double_click(&mut view, 1, 1);
    view.set_edit_value("6");
    view.blur_edit();
    let cell = view.cell(1, 1).unwrap();
    assert_eq!(cell.value, "6");
    assert!(cell.style.bold);
}

#[test]
fn test_blank_commit_keeps_style_of_styled_cell() {
    let mut view = view();
    view.set_cell(1, 1, "5", Some(CellStyle::italic()));
    double_click(&mut view, 1, 1);
    view.set_edit_value("");
    view.blur_edit();
    let cell = view.cell(1, 1).unwrap();
    assert_eq!(cell.value, "");
    assert!(cell.style.italic);
    assert_eq!(view.statistics().count, 0);
}

#[test]
fn test_untouched_session_writes_nothing() {
    let mut view = view();
    click(&mut view, 1, 1, 0.0);
    click(&mut view, 3, 3, 1000.0);
    assert!(view.cell(1, 1).is_none());
    assert!(view.grid().store.is_empty());
}

#[test_case(KeyInput::ArrowDown, (6, 3) ; "down")]
#[test_case(KeyInput::Enter, (6, 3) ; "enter moves down")]
#[test_case(KeyInput::ArrowUp, (4, 3) ; "up")]
#[test_case(KeyInput::ArrowLeft, (5, 2) ; "left")]
#[test_case(KeyInput::ArrowRight, (5, 4) ; "right")]
fn test_navigation_moves_cursor_and_selection(key: KeyInput, to: (u32, u32)) {
    let mut view = view();
    click(&mut view, 5, 3, 0.0);
    type_str(&mut view, "42");
    assert!(view.key_down(key));

    assert_eq!(view.cell(5, 3).unwrap().value, "42");
    let session = view.grid().editing.as_ref().unwrap();
    assert_eq!(session.cell(), CellPos::new(to.0, to.1));
    assert!(!session.is_focused());
    assert_eq!(view.selected_range(), single(to.0, to.1));
}

#[test]
fn test_navigation_clamps_at_grid_edge() {
    let mut view = view();
    click(&mut view, 0, 0, 0.0);
    view.key_down(KeyInput::ArrowUp);
    view.key_down(KeyInput::ArrowLeft);
    assert_eq!(
        view.grid().editing.as_ref().unwrap().cell(),
        CellPos::new(0, 0)
    );
}

#[test]
fn test_navigation_scrolls_cursor_into_view() {
    let mut view = view();
    // Row 9 ends exactly at the bottom of the 250px cell area
    click(&mut view, 9, 0, 0.0);
    assert_eq!(view.grid().viewport.scroll_y, 0.0);
    view.key_down(KeyInput::ArrowDown);
    assert_eq!(view.grid().viewport.scroll_y, 25.0);
    view.key_down(KeyInput::ArrowUp);
    view.key_down(KeyInput::ArrowUp);
    assert_eq!(view.grid().viewport.scroll_y, 25.0);
    // Row 8 starts at 200; still visible. Row 0 needs a scroll back.
    for _ in 0..8 {
        view.key_down(KeyInput::ArrowUp);
    }
    assert_eq!(view.grid().viewport.scroll_y, 0.0);
}

#[test]
fn test_keys_without_session_fall_through() {
    let mut view = view();
    assert!(!view.key_down(KeyInput::Char('x')));
    assert!(!view.key_down(KeyInput::ArrowDown));
    assert!(!view.key_down(KeyInput::Other));
}

#[test]
fn test_key_mapping() {
    assert_eq!(KeyInput::from_key("a"), KeyInput::Char('a'));
    assert_eq!(KeyInput::from_key("é"), KeyInput::Char('é'));
    assert_eq!(KeyInput::from_key("Enter"), KeyInput::Enter);
    assert_eq!(KeyInput::from_key("Shift"), KeyInput::Other);
    assert_eq!(KeyInput::from_key("Tab"), KeyInput::Other);
}

#[test]
fn test_insert_row_commits_then_shifts() {
    let mut view = view();
    view.set_cell(2, 3, "a", None);
    view.set_cell(5, 1, "b", None);
    double_click(&mut view, 5, 1);
    view.set_edit_value("b2");

    view.insert_row(3).unwrap();
    assert!(view.grid().editing.is_none());
    assert_eq!(view.cell(2, 3).unwrap().value, "a");
    assert_eq!(view.cell(6, 1).unwrap().value, "b2");
    assert!(view.cell(5, 1).is_none());
    assert_eq!(view.grid().total_rows(), 1001);

    view.delete_row(3).unwrap();
    assert_eq!(view.cell(5, 1).unwrap().value, "b2");
    assert_eq!(view.grid().total_rows(), 1000);
}

#[test]
fn test_insert_column_keeps_sizes_consistent() {
    let mut view = view();
    view.grid_mut().columns.resize(1, 180.0).unwrap();
    view.set_cell(0, 1, "wide", None);
    view.insert_column(1).unwrap();
    assert_eq!(view.grid().columns.size(1), Some(100.0));
    assert_eq!(view.grid().columns.size(2), Some(180.0));
    assert_eq!(view.cell(0, 2).unwrap().value, "wide");
}

#[test]
fn test_delete_last_row_is_refused() {
    let mut view = SheetView::headless(GridConfig::with_size(1, 3)).unwrap();
    view.set_cell(0, 0, "only", None);
    let err = view.delete_row(0).unwrap_err();
    assert!(matches!(err, GridError::LastSegment { axis: AxisKind::Rows }));
    assert_eq!(view.grid().total_rows(), 1);
    assert_eq!(view.cell(0, 0).unwrap().value, "only");
}

#[test]
fn test_refused_delete_keeps_edit_open() {
    let mut view = SheetView::headless(GridConfig::with_size(1, 3)).unwrap();
    view.resize(550.0, 275.0);
    double_click(&mut view, 0, 1);
    view.set_edit_value("typed");

    assert!(view.delete_row(0).is_err());
    assert!(view.cell(0, 1).is_none());
    let session = view.grid().editing.as_ref().unwrap();
    assert!(session.is_focused());
    assert_eq!(session.value(), "typed");

    view.blur_edit();
    assert_eq!(view.cell(0, 1).unwrap().value, "typed");
}

#[test]
fn test_delete_clamps_selection() {
    let mut view = SheetView::headless(GridConfig::with_size(10, 3)).unwrap();
    view.resize(550.0, 275.0);
    click(&mut view, 9, 2, 0.0);
    view.delete_row(9).unwrap();
    assert_eq!(view.selected_range(), single(8, 2));
}

#[test]
fn test_statistics_follow_selection() {
    let mut view = view();
    view.set_cell(0, 0, "10", None);
    view.set_cell(1, 0, "20", None);
    view.set_cell(2, 0, "abc", None);
    view.pointer_down(&PointerEvent::new(100.0, 37.5, 0.0));
    view.pointer_move(&PointerEvent::new(100.0, 112.5, 10.0));
    view.pointer_up(&PointerEvent::new(100.0, 112.5, 20.0));

    let stats = view.statistics();
    assert_eq!(stats.count, 2);
    assert_eq!(stats.sum, 30.0);
    assert_eq!(stats.average, 15.0);
}
