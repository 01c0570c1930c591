//! Selection overlay helpers.
//!
//! These helpers keep selection math testable without depending on Canvas APIs.

use serde::Serialize;

use crate::layout::{Axis, Rect, Viewport};
use crate::types::CellRange;

/// The visible part of the selection rectangle in container pixels.
///
/// The `draw_*` flags say which edges of the full rectangle survived
/// clipping, so the renderer only strokes real selection borders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub draw_top: bool,
    pub draw_bottom: bool,
    pub draw_left: bool,
    pub draw_right: bool,
}

/// Container rectangle covering `range`, unclipped.
pub fn range_rect(range: CellRange, columns: &Axis, rows: &Axis, viewport: &Viewport) -> Option<Rect> {
    let x1 = columns.position(range.start_col)?;
    let x2 = columns.position(range.end_col.checked_add(1)?)?;
    let y1 = rows.position(range.start_row)?;
    let y2 = rows.position(range.end_row.checked_add(1)?)?;
    Some(Rect {
        x: viewport.to_container_x(x1),
        y: viewport.to_container_y(y1),
        width: x2 - x1,
        height: y2 - y1,
    })
}

/// Selection rectangle clipped to the cell area, or `None` when scrolled out of view.
pub fn selection_rect(
    range: CellRange,
    columns: &Axis,
    rows: &Axis,
    viewport: &Viewport,
) -> Option<SelectionRect> {
    let full = range_rect(range, columns, rows, viewport)?;
    let clip = full.intersect(&viewport.cells_rect())?;
    Some(SelectionRect {
        x: clip.x,
        y: clip.y,
        w: clip.width,
        h: clip.height,
        draw_top: full.y >= clip.y,
        draw_bottom: full.bottom() <= clip.bottom(),
        draw_left: full.x >= clip.x,
        draw_right: full.right() <= clip.right(),
    })
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
    use crate::types::{AxisKind, CellPos};

    fn setup() -> (Axis, Axis, Viewport) {
        (
            Axis::new(AxisKind::Columns, 20, 100.0, 20.0),
            Axis::new(AxisKind::Rows, 100, 25.0, 20.0),
            Viewport::new(550.0, 275.0, 25.0, 50.0),
        )
    }

    #[test]
    fn selection_rect_fully_visible() {
        let (cols, rows, vp) = setup();
        let range = CellRange::new(CellPos::new(1, 1), CellPos::new(2, 2));
        let r = selection_rect(range, &cols, &rows, &vp).unwrap();
        assert_eq!((r.x, r.y, r.w, r.h), (150.0, 50.0, 200.0, 50.0));
        assert!(r.draw_top && r.draw_bottom && r.draw_left && r.draw_right);
    }

    #[test]
    fn selection_rect_clipped_by_scroll() {
        let (cols, rows, mut vp) = setup();
        vp.scroll_y = 40.0;
        let range = CellRange::new(CellPos::new(0, 0), CellPos::new(3, 0));
        let r = selection_rect(range, &cols, &rows, &vp).unwrap();
        // Rows 0..=3 span 0..100; 40px are scrolled under the header strip
        assert_eq!(r.y, 25.0);
        assert_eq!(r.h, 60.0);
        assert!(!r.draw_top);
        assert!(r.draw_bottom);

        vp.scroll_y = 200.0;
        assert!(selection_rect(range, &cols, &rows, &vp).is_none());
    }
}
