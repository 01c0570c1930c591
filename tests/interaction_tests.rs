//! Pointer interaction tests
//!
//! Drives a `SheetView` with synthetic pointer events and checks selection,
//! editing, header selection, boundary resize and capture behavior.
//!
//! Geometry: 550x275 container, 50px row index strip, 25px column header,
//! 100px columns and 25px rows.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use gridview::interaction::{Cursor, PointerEvent, PointerTarget};
use gridview::types::{CellPos, CellRange};
use gridview::{GridConfig, SheetView};

fn view() -> SheetView {
    let mut view = SheetView::headless(GridConfig::with_size(1000, 26)).unwrap();
    view.resize(550.0, 275.0);
    view
}

/// Container point at the center of a cell (no scroll).
fn center(row: u32, col: u32) -> (f64, f64) {
    (
        50.0 + f64::from(col) * 100.0 + 50.0,
        25.0 + f64::from(row) * 25.0 + 12.5,
    )
}

fn at(point: (f64, f64), time_ms: f64) -> PointerEvent {
    PointerEvent::new(point.0, point.1, time_ms)
}

fn click(view: &mut SheetView, row: u32, col: u32, time_ms: f64) {
    let ev = at(center(row, col), time_ms);
    assert!(view.pointer_down(&ev));
    view.pointer_up(&ev);
}

#[test]
fn test_click_selects_cell_and_opens_blurred_surface() {
    let mut view = view();
    click(&mut view, 3, 2, 0.0);

    let pos = CellPos::new(3, 2);
    assert_eq!(view.selected_range(), Some(CellRange::new(pos, pos)));
    let session = view.grid().editing.as_ref().unwrap();
    assert_eq!(session.cell(), pos);
    assert!(!session.is_focused());
    assert!(view.edit_surface_rect().is_some());
}

#[test]
fn test_double_click_focuses_surface() {
    let mut view = view();
    view.set_cell(3, 2, "hello", None);
    click(&mut view, 3, 2, 0.0);
    click(&mut view, 3, 2, 150.0);

    let session = view.grid().editing.as_ref().unwrap();
    assert!(session.is_focused());
    assert_eq!(session.value(), "hello");
}

#[test]
fn test_slow_second_click_is_not_double() {
    let mut view = view();
    click(&mut view, 3, 2, 0.0);
    click(&mut view, 3, 2, 900.0);
    assert!(!view.grid().editing.as_ref().unwrap().is_focused());
}

#[test]
fn test_second_click_on_other_cell_is_not_double() {
    let mut view = view();
    click(&mut view, 3, 2, 0.0);
    click(&mut view, 4, 2, 100.0);
    let session = view.grid().editing.as_ref().unwrap();
    assert_eq!(session.cell(), CellPos::new(4, 2));
    assert!(!session.is_focused());
}

#[test]
fn test_drag_selects_range_and_drops_surface() {
    let mut view = view();
    view.pointer_down(&at(center(1, 1), 0.0));
    // Surface is hidden while dragging
    view.pointer_move(&at(center(4, 3), 20.0));
    assert!(!view.grid().editing.as_ref().unwrap().is_visible());
    assert_eq!(view.captured(), Some("cell"));
    view.pointer_up(&at(center(4, 3), 40.0));

    assert_eq!(
        view.selected_range(),
        Some(CellRange::new(CellPos::new(1, 1), CellPos::new(4, 3)))
    );
    assert!(view.grid().editing.is_none());
    assert_eq!(view.captured(), None);
}

#[test]
fn test_click_after_drag_is_not_double() {
    let mut view = view();
    view.pointer_down(&at(center(1, 1), 0.0));
    view.pointer_move(&at(center(4, 3), 20.0));
    view.pointer_up(&at(center(4, 3), 40.0));

    click(&mut view, 1, 1, 120.0);
    let session = view.grid().editing.as_ref().unwrap();
    assert_eq!(session.cell(), CellPos::new(1, 1));
    assert!(!session.is_focused());
}

#[test]
fn test_small_jitter_is_still_a_click() {
    let mut view = view();
    let (x, y) = center(2, 2);
    view.pointer_down(&PointerEvent::new(x, y, 0.0));
    view.pointer_move(&PointerEvent::new(x + 2.0, y - 1.0, 5.0));
    view.pointer_up(&PointerEvent::new(x + 2.0, y - 1.0, 10.0));
    let pos = CellPos::new(2, 2);
    assert_eq!(view.selected_range(), Some(CellRange::new(pos, pos)));
    assert!(view.grid().editing.is_some());
}

#[test]
fn test_double_click_drag_keeps_range_and_focuses_anchor() {
    let mut view = view();
    let press = at(center(5, 2), 0.0);
    view.pointer_down(&press);
    view.pointer_up(&press);

    view.pointer_down(&at(center(5, 2), 200.0));
    view.pointer_move(&at(center(7, 2), 220.0));
    view.pointer_up(&at(center(7, 2), 240.0));

    assert_eq!(
        view.selected_range(),
        Some(CellRange::new(CellPos::new(5, 2), CellPos::new(7, 2)))
    );
    let session = view.grid().editing.as_ref().unwrap();
    assert_eq!(session.cell(), CellPos::new(5, 2));
    assert!(session.is_focused());
    assert!(session.is_visible());
}

#[test]
fn test_drag_past_grid_edge_clamps_focus() {
    let mut view = SheetView::headless(GridConfig::with_size(6, 3)).unwrap();
    view.resize(550.0, 275.0);
    view.pointer_down(&at(center(1, 1), 0.0));
    // Past the last column (x > 350) and last row (y > 175)
    view.pointer_move(&PointerEvent::new(420.0, 200.0, 10.0));
    view.pointer_up(&PointerEvent::new(420.0, 200.0, 20.0));
    assert_eq!(
        view.selected_range(),
        Some(CellRange::new(CellPos::new(1, 1), CellPos::new(5, 2)))
    );
}

#[test]
fn test_column_header_selects_full_columns() {
    let mut view = view();
    view.pointer_down(&PointerEvent::new(180.0, 10.0, 0.0));
    assert_eq!(view.captured(), Some("column-select"));
    // Dragging down into the cells still extends by column
    view.pointer_move(&PointerEvent::new(380.0, 150.0, 10.0));
    view.pointer_up(&PointerEvent::new(380.0, 150.0, 20.0));

    let sel = &view.grid().selection;
    assert!(sel.is_full_column());
    assert_eq!(sel.column_range(), Some((1, 3)));
    let range = view.selected_range().unwrap();
    assert_eq!((range.start_row, range.end_row), (0, 999));
    assert!(view.frame().full_column);
}

#[test]
fn test_row_index_selects_full_rows() {
    let mut view = view();
    view.pointer_down(&PointerEvent::new(20.0, center(2, 0).1, 0.0));
    view.pointer_move(&PointerEvent::new(20.0, center(0, 0).1, 10.0));
    view.pointer_up(&PointerEvent::new(20.0, center(0, 0).1, 20.0));

    let sel = &view.grid().selection;
    assert!(sel.is_full_row());
    assert!(!sel.is_full_column());
    assert_eq!(sel.row_range(), Some((0, 2)));
}

#[test]
fn test_header_press_commits_open_edit() {
    let mut view = view();
    click(&mut view, 0, 0, 0.0);
    click(&mut view, 0, 0, 100.0);
    view.set_edit_value("typed");
    view.pointer_down(&PointerEvent::new(180.0, 10.0, 200.0));
    view.pointer_up(&PointerEvent::new(180.0, 10.0, 210.0));
    assert_eq!(view.cell(0, 0).unwrap().value, "typed");
    assert!(view.grid().editing.is_none());
}

#[test]
fn test_column_boundary_drag_resizes() {
    let mut view = view();
    // Boundary between columns B and C sits at x = 250
    assert_eq!(
        view.pointer_move(&PointerEvent::new(251.0, 10.0, 0.0)),
        Cursor::ColResize
    );
    view.pointer_down(&PointerEvent::new(251.0, 10.0, 0.0));
    assert_eq!(view.captured(), Some("column-resize"));
    view.pointer_move(&PointerEvent::new(291.0, 10.0, 10.0));
    assert_eq!(view.grid().columns.size(1), Some(140.0));
    view.pointer_up(&PointerEvent::new(291.0, 10.0, 20.0));

    assert_eq!(view.grid().columns.position(2), Some(240.0));
    // Selection untouched by a resize
    assert_eq!(view.selected_range(), None);
}

#[test]
fn test_resize_respects_minimum() {
    let mut view = view();
    view.pointer_down(&PointerEvent::new(250.0, 10.0, 0.0));
    view.pointer_move(&PointerEvent::new(60.0, 10.0, 10.0));
    view.pointer_up(&PointerEvent::new(60.0, 10.0, 20.0));
    assert_eq!(view.grid().columns.size(1), Some(20.0));
}

#[test]
fn test_row_boundary_drag_resizes() {
    let mut view = view();
    // Bottom edge of row 0 at y = 50
    view.pointer_down(&PointerEvent::new(20.0, 49.0, 0.0));
    assert_eq!(view.captured(), Some("row-resize"));
    view.pointer_move(&PointerEvent::new(20.0, 79.0, 10.0));
    view.pointer_up(&PointerEvent::new(20.0, 79.0, 20.0));
    assert_eq!(view.grid().rows.size(0), Some(55.0));
}

#[test]
fn test_scrollbar_press_is_ignored() {
    let mut view = view();
    let ev = at(center(3, 3), 0.0).with_target(PointerTarget::Scrollbar);
    assert!(!view.pointer_down(&ev));
    view.pointer_up(&ev);
    assert_eq!(view.selected_range(), None);
    assert!(view.grid().editing.is_none());
}

#[test]
fn test_hover_cursor_by_zone() {
    let mut view = view();
    assert_eq!(view.pointer_move(&at(center(2, 2), 0.0)), Cursor::Cell);
    assert_eq!(view.pointer_move(&PointerEvent::new(180.0, 10.0, 0.0)), Cursor::Default);
    assert_eq!(view.pointer_move(&PointerEvent::new(10.0, 10.0, 0.0)), Cursor::Default);
}

#[test]
fn test_capture_holds_across_zones() {
    let mut view = view();
    view.pointer_down(&at(center(2, 2), 0.0));
    // Moving over the header strip keeps the cell handler in charge
    view.pointer_move(&PointerEvent::new(180.0, 10.0, 10.0));
    assert_eq!(view.captured(), Some("cell"));
    view.pointer_up(&PointerEvent::new(180.0, 10.0, 20.0));
    assert!(!view.grid().selection.is_full_column());
}

#[test]
fn test_cell_drag_over_whole_column_is_full_column() {
    let mut view = SheetView::headless(GridConfig::with_size(5, 3)).unwrap();
    view.resize(550.0, 275.0);
    view.pointer_down(&at(center(0, 1), 0.0));
    view.pointer_move(&at(center(4, 1), 10.0));
    view.pointer_up(&at(center(4, 1), 20.0));

    let sel = &view.grid().selection;
    assert_eq!(sel.anchor(), Some(CellPos::new(0, 1)));
    assert_eq!(sel.focus(), Some(CellPos::new(4, 1)));
    assert!(sel.is_full_column());
    assert!(!sel.is_full_row());
    assert_eq!(sel.column_range(), Some((1, 1)));
    assert!(view.frame().full_column);
}
