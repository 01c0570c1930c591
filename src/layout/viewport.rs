//! Viewport state and visible-range computation.
//!
//! All pointer coordinates handed to the core are container-relative. The
//! container shows the column header strip along its top edge and the row
//! index strip along its left edge; the cell area fills the rest and is the
//! part that scrolls.

use serde::Serialize;

use super::{Axis, AxisHit};

/// Extra rows/cols to include around the viewport to avoid seams during fast scroll.
pub const VISIBLE_PADDING: u32 = 1;

/// Inclusive index range of visible segments along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VisibleRange {
    pub start: u32,
    pub end: u32,
}

impl VisibleRange {
    pub fn contains(&self, index: u32) -> bool {
        index >= self.start && index <= self.end
    }
}

/// Visible rows and columns composed into a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VisibleWindow {
    pub rows: VisibleRange,
    pub cols: VisibleRange,
}

/// Axis-aligned rectangle in container pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Overlap of two rectangles, or `None` if they do not intersect.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        (right > x && bottom > y).then(|| Rect {
            x,
            y,
            width: right - x,
            height: bottom - y,
        })
    }
}

/// Which strip of the container a point falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// Top-left corner where the header strip meets the index strip
    Corner,
    ColumnHeader,
    RowIndex,
    Cells,
    /// Outside the container
    Outside,
}

/// Segments intersecting `[scroll_offset, scroll_offset + extent]`, padded by
/// one segment on each side and clamped to the axis.
///
/// Runs two binary searches on the axis, so it stays O(log n).
pub fn visible_range(scroll_offset: f64, extent: f64, axis: &Axis) -> VisibleRange {
    let len = axis.len();
    let first = axis.find_index_at(scroll_offset.max(0.0)).clamp(len);
    let last = match axis.find_index_at(scroll_offset.max(0.0) + extent.max(0.0)) {
        hit @ (AxisHit::Inside(_) | AxisHit::After) => hit.clamp(len),
        AxisHit::Before => first,
    };
    let max_index = len.saturating_sub(1);
    VisibleRange {
        start: first.saturating_sub(VISIBLE_PADDING),
        end: last.saturating_add(VISIBLE_PADDING).min(max_index).max(first),
    }
}

/// Viewport state - scroll offsets and container geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// Horizontal scroll position in axis coordinates
    pub scroll_x: f64,
    /// Vertical scroll position in axis coordinates
    pub scroll_y: f64,
    /// Container client width in pixels (includes the row index strip)
    pub width: f64,
    /// Container client height in pixels (includes the column header strip)
    pub height: f64,
    /// Height of the column header strip
    pub header_height: f64,
    /// Width of the row index strip
    pub index_width: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, header_height: f64, index_width: f64) -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            width,
            height,
            header_height,
            index_width,
        }
    }

    /// Width available to cells (container width minus the index strip).
    pub fn cells_width(&self) -> f64 {
        (self.width - self.index_width).max(0.0)
    }

    /// Height available to cells (container height minus the header strip).
    pub fn cells_height(&self) -> f64 {
        (self.height - self.header_height).max(0.0)
    }

    /// Get visible row range (inclusive, padded) based on current scroll position.
    pub fn visible_rows(&self, rows: &Axis) -> VisibleRange {
        visible_range(self.scroll_y, self.cells_height(), rows)
    }

    /// Get visible column range (inclusive, padded) based on current scroll position.
    pub fn visible_cols(&self, cols: &Axis) -> VisibleRange {
        visible_range(self.scroll_x, self.cells_width(), cols)
    }

    pub fn visible_window(&self, cols: &Axis, rows: &Axis) -> VisibleWindow {
        VisibleWindow {
            rows: self.visible_rows(rows),
            cols: self.visible_cols(cols),
        }
    }

    /// Classify a container-relative point.
    pub fn zone(&self, x: f64, y: f64) -> Zone {
        if x < 0.0 || y < 0.0 || x >= self.width || y >= self.height {
            return Zone::Outside;
        }
        match (x < self.index_width, y < self.header_height) {
            (true, true) => Zone::Corner,
            (false, true) => Zone::ColumnHeader,
            (true, false) => Zone::RowIndex,
            (false, false) => Zone::Cells,
        }
    }

    /// The scrolling cell area in container pixels.
    pub fn cells_rect(&self) -> Rect {
        Rect {
            x: self.index_width,
            y: self.header_height,
            width: self.cells_width(),
            height: self.cells_height(),
        }
    }

    /// Container x to column-axis coordinate.
    pub fn to_axis_x(&self, x: f64) -> f64 {
        x - self.index_width + self.scroll_x
    }

    /// Container y to row-axis coordinate.
    pub fn to_axis_y(&self, y: f64) -> f64 {
        y - self.header_height + self.scroll_y
    }

    /// Column-axis coordinate to container x.
    pub fn to_container_x(&self, axis_x: f64) -> f64 {
        axis_x - self.scroll_x + self.index_width
    }

    /// Row-axis coordinate to container y.
    pub fn to_container_y(&self, axis_y: f64) -> f64 {
        axis_y - self.scroll_y + self.header_height
    }

    /// Largest scroll offsets that still show content.
    pub fn max_scroll(&self, cols: &Axis, rows: &Axis) -> (f64, f64) {
        (
            (cols.total_extent() - self.cells_width()).max(0.0),
            (rows.total_extent() - self.cells_height()).max(0.0),
        )
    }

    /// Clamp scroll position to valid range.
    pub fn clamp_scroll(&mut self, cols: &Axis, rows: &Axis) {
        let (max_x, max_y) = self.max_scroll(cols, rows);
        self.scroll_x = self.scroll_x.clamp(0.0, max_x);
        self.scroll_y = self.scroll_y.clamp(0.0, max_y);
    }

    /// Set absolute scroll position
    pub fn set_scroll(&mut self, x: f64, y: f64, cols: &Axis, rows: &Axis) {
        self.scroll_x = x;
        self.scroll_y = y;
        self.clamp_scroll(cols, rows);
    }

    /// Scroll by delta amounts, returning the delta actually applied.
    pub fn scroll_by(&mut self, delta_x: f64, delta_y: f64, cols: &Axis, rows: &Axis) -> (f64, f64) {
        let (old_x, old_y) = (self.scroll_x, self.scroll_y);
        self.set_scroll(old_x + delta_x, old_y + delta_y, cols, rows);
        (self.scroll_x - old_x, self.scroll_y - old_y)
    }

    /// Resize the viewport
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
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
    use crate::types::AxisKind;

    fn rows(n: u32) -> Axis {
        Axis::new(AxisKind::Rows, n, 25.0, 20.0)
    }

    fn cols(n: u32) -> Axis {
        Axis::new(AxisKind::Columns, n, 100.0, 20.0)
    }

    #[test]
    fn test_visible_range_at_origin() {
        let axis = rows(1000);
        let range = visible_range(0.0, 100.0, &axis);
        // Rows 0..=4 intersect [0, 100]; one row of padding after
        assert_eq!(range, VisibleRange { start: 0, end: 5 });
    }

    #[test]
    fn test_visible_range_scrolled() {
        let axis = rows(1000);
        let range = visible_range(260.0, 100.0, &axis);
        // 260 is in row 10, 360 is in row 14
        assert_eq!(range, VisibleRange { start: 9, end: 15 });
    }

    #[test]
    fn test_visible_range_clamps_at_end() {
        let axis = rows(10);
        let range = visible_range(200.0, 500.0, &axis);
        assert_eq!(range.end, 9);
        assert_eq!(range.start, 7);
    }

    #[test]
    fn test_zone() {
        let vp = Viewport::new(800.0, 600.0, 25.0, 50.0);
        assert_eq!(vp.zone(10.0, 10.0), Zone::Corner);
        assert_eq!(vp.zone(60.0, 10.0), Zone::ColumnHeader);
        assert_eq!(vp.zone(10.0, 30.0), Zone::RowIndex);
        assert_eq!(vp.zone(60.0, 30.0), Zone::Cells);
        assert_eq!(vp.zone(900.0, 30.0), Zone::Outside);
    }

    #[test]
    fn test_axis_conversion_adds_scroll() {
        let mut vp = Viewport::new(800.0, 600.0, 25.0, 50.0);
        vp.scroll_x = 300.0;
        vp.scroll_y = 50.0;
        assert_eq!(vp.to_axis_x(60.0), 310.0);
        assert_eq!(vp.to_axis_y(30.0), 55.0);
        assert_eq!(vp.to_container_x(310.0), 60.0);
        assert_eq!(vp.to_container_y(55.0), 30.0);
    }

    #[test]
    fn test_clamp_scroll() {
        let (c, r) = (cols(10), rows(10));
        let mut vp = Viewport::new(550.0, 125.0, 25.0, 50.0);
        vp.set_scroll(-10.0, 9999.0, &c, &r);
        assert_eq!(vp.scroll_x, 0.0);
        // 10 rows * 25 = 250 total, 100 visible
        assert_eq!(vp.scroll_y, 150.0);
        let applied = vp.scroll_by(1000.0, -20.0, &c, &r);
        assert_eq!(applied, (500.0, -20.0));
    }
}
