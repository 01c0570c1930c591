//! Viewport and scroll coordinate tests
//!
//! Tests for visible-window virtualization, point-to-cell resolution with
//! scroll offsets applied, and scroll clamping.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use gridview::layout::{visible_range, Axis, VisibleRange, Zone};
use gridview::types::{AxisKind, CellPos};
use gridview::{Grid, GridConfig};

/// 550x275 container: 50px index strip, 25px header, 500x250 of cells.
fn grid(rows: u32, cols: u32) -> Grid {
    let mut grid = Grid::new(GridConfig::with_size(rows, cols)).unwrap();
    grid.resize_viewport(550.0, 275.0);
    grid
}

#[test]
fn test_visible_range_is_padded_and_clamped() {
    let axis = Axis::new(AxisKind::Rows, 100_000, 25.0, 20.0);
    // Rows 400..=410 intersect [10_000, 10_250]
    let range = visible_range(10_000.0, 250.0, &axis);
    assert_eq!(range, VisibleRange { start: 399, end: 411 });

    let start = visible_range(0.0, 250.0, &axis);
    assert_eq!(start.start, 0);

    let end = visible_range(2_500_000.0 - 250.0, 250.0, &axis);
    assert_eq!(end.end, 99_999);
}

#[test]
fn test_visible_window_stays_small_on_huge_grid() {
    let mut g = grid(100_000, 26);
    g.set_scroll(0.0, 1_000_000.0);
    let window = g.visible_window();
    assert!(window.rows.contains(40_000));
    assert!(window.rows.end - window.rows.start <= 13);
    assert!(window.cols.end - window.cols.start <= 7);
}

#[test]
fn test_cell_at_applies_scroll() {
    let mut g = grid(1000, 26);
    assert_eq!(g.cell_at(60.0, 30.0), Some(CellPos::new(0, 0)));

    g.set_scroll(150.0, 100.0);
    // Axis x = 60 - 50 + 150 = 160 -> column 1; axis y = 30 - 25 + 100 = 105 -> row 4
    assert_eq!(g.cell_at(60.0, 30.0), Some(CellPos::new(4, 1)));
}

#[test]
fn test_cell_at_rejects_strips_and_outside() {
    let g = grid(1000, 26);
    assert_eq!(g.viewport.zone(10.0, 10.0), Zone::Corner);
    assert_eq!(g.cell_at(10.0, 100.0), None);
    assert_eq!(g.cell_at(100.0, 10.0), None);
    assert_eq!(g.cell_at(600.0, 100.0), None);
}

#[test]
fn test_cell_at_past_last_column_is_none() {
    // 3 columns end at x = 50 + 300
    let g = grid(1000, 3);
    assert_eq!(g.cell_at(349.0, 100.0).map(|p| p.col), Some(2));
    assert_eq!(g.cell_at(360.0, 100.0), None);
    assert_eq!(g.cell_at_clamped(360.0, 100.0).col, 2);
}

#[test]
fn test_scroll_is_clamped_to_content() {
    let mut g = grid(20, 5);
    // 500px of rows in a 250px cell area, 500px of columns in 500px
    g.set_scroll(1e6, 1e6);
    assert_eq!(g.viewport.scroll_x, 0.0);
    assert_eq!(g.viewport.scroll_y, 250.0);

    g.set_scroll(-10.0, -10.0);
    assert_eq!((g.viewport.scroll_x, g.viewport.scroll_y), (0.0, 0.0));

    assert_eq!(g.scroll_by(0.0, 100.0), (0.0, 100.0));
    assert_eq!(g.scroll_by(0.0, 1000.0), (0.0, 150.0));
}

#[test]
fn test_content_size_includes_strips() {
    let g = grid(100, 10);
    let size = g.content_size();
    assert_eq!(size.width, 1000.0 + 50.0);
    assert_eq!(size.height, 2500.0 + 25.0);
}

#[test]
fn test_shrinking_viewport_keeps_scroll_valid() {
    let mut g = grid(20, 5);
    g.set_scroll(0.0, 250.0);
    g.resize_viewport(550.0, 525.0);
    assert_eq!(g.viewport.scroll_y, 0.0);
}

#[test]
fn test_cell_rect_follows_scroll() {
    let mut g = grid(1000, 26);
    let before = g.cell_rect(CellPos::new(10, 2)).unwrap();
    assert_eq!((before.x, before.y), (250.0, 275.0));
    g.set_scroll(100.0, 200.0);
    let after = g.cell_rect(CellPos::new(10, 2)).unwrap();
    assert_eq!((after.x, after.y), (150.0, 75.0));
    assert_eq!((after.width, after.height), (100.0, 25.0));
}
