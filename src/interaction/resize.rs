//! Boundary drag in the header/index strips to resize a column or row.

use super::{Cursor, InteractionHandler, PointerEvent};
use crate::grid::Grid;
use crate::layout::{AxisHit, Zone};
use crate::types::AxisKind;

#[derive(Debug, Clone, Copy)]
struct ResizeDrag {
    target: u32,
    start_coord: f64,
    start_size: f64,
}

/// Resizes columns from the header strip, or rows from the index strip.
#[derive(Debug)]
pub struct ResizeHandler {
    kind: AxisKind,
    drag: Option<ResizeDrag>,
}

impl ResizeHandler {
    pub fn columns() -> Self {
        Self {
            kind: AxisKind::Columns,
            drag: None,
        }
    }

    pub fn rows() -> Self {
        Self {
            kind: AxisKind::Rows,
            drag: None,
        }
    }

    fn strip(&self) -> Zone {
        match self.kind {
            AxisKind::Columns => Zone::ColumnHeader,
            AxisKind::Rows => Zone::RowIndex,
        }
    }

    /// Pointer coordinate along this handler's axis, in container pixels.
    fn coord(&self, ev: &PointerEvent) -> f64 {
        match self.kind {
            AxisKind::Columns => ev.x,
            AxisKind::Rows => ev.y,
        }
    }

    /// The segment whose trailing boundary is within the threshold of `ev`.
    ///
    /// Near the leading edge of segment `i` the target is `i - 1`, since that
    /// boundary belongs to the previous segment.
    fn boundary_target(&self, grid: &Grid, ev: &PointerEvent) -> Option<u32> {
        if !ev.on_grid() || grid.viewport.zone(ev.x, ev.y) != self.strip() {
            return None;
        }
        let axis = grid.axis(self.kind);
        let coord = match self.kind {
            AxisKind::Columns => grid.viewport.to_axis_x(ev.x),
            AxisKind::Rows => grid.viewport.to_axis_y(ev.y),
        };
        let threshold = grid.config().resize_edge_threshold;
        match axis.find_index_at(coord) {
            AxisHit::Inside(i) => {
                let start = axis.position(i)?;
                let end = axis.position(i + 1)?;
                if end - coord <= threshold {
                    Some(i)
                } else if coord - start <= threshold && i > 0 {
                    Some(i - 1)
                } else {
                    None
                }
            }
            AxisHit::After => {
                let last = axis.len().checked_sub(1)?;
                (coord - axis.total_extent() <= threshold).then_some(last)
            }
            AxisHit::Before => None,
        }
    }
}

impl InteractionHandler for ResizeHandler {
    fn name(&self) -> &'static str {
        match self.kind {
            AxisKind::Columns => "column-resize",
            AxisKind::Rows => "row-resize",
        }
    }

    fn hit_test(&self, grid: &Grid, ev: &PointerEvent) -> bool {
        self.boundary_target(grid, ev).is_some()
    }

    fn cursor(&self) -> Cursor {
        match self.kind {
            AxisKind::Columns => Cursor::ColResize,
            AxisKind::Rows => Cursor::RowResize,
        }
    }

    fn on_pointer_down(&mut self, grid: &mut Grid, ev: &PointerEvent) {
        let Some(target) = self.boundary_target(grid, ev) else {
            return;
        };
        let Some(start_size) = grid.axis(self.kind).size(target) else {
            return;
        };
        grid.commit_edit();
        self.drag = Some(ResizeDrag {
            target,
            start_coord: self.coord(ev),
            start_size,
        });
    }

    fn on_pointer_move(&mut self, grid: &mut Grid, ev: &PointerEvent) {
        let Some(drag) = self.drag else {
            return;
        };
        let delta = self.coord(ev) - drag.start_coord;
        let min = grid.axis(self.kind).min_size();
        let resized = grid
            .axis_mut(self.kind)
            .resize(drag.target, (drag.start_size + delta).max(min));
        if resized.is_ok() {
            grid.request_render();
        }
    }

    fn on_pointer_up(&mut self, grid: &mut Grid, _ev: &PointerEvent) {
        if let Some(drag) = self.drag.take() {
            if let Some(size) = grid.axis(self.kind).size(drag.target) {
                log::debug!("{} {} resized to {size}", self.kind, drag.target);
            }
            grid.viewport.clamp_scroll(&grid.columns, &grid.rows);
            grid.request_render();
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
    use crate::config::GridConfig;
    use crate::interaction::PointerTarget;

    fn grid() -> Grid {
        let mut g = Grid::new(GridConfig::with_size(100, 20)).unwrap();
        g.resize_viewport(800.0, 600.0);
        g
    }

    #[test]
    fn test_hit_only_near_boundaries() {
        let g = grid();
        let h = ResizeHandler::columns();
        // Column 0 spans container x 50..150 in the header strip
        assert_eq!(h.boundary_target(&g, &PointerEvent::new(148.0, 10.0, 0.0)), Some(0));
        assert_eq!(h.boundary_target(&g, &PointerEvent::new(152.0, 10.0, 0.0)), Some(0));
        assert_eq!(h.boundary_target(&g, &PointerEvent::new(100.0, 10.0, 0.0)), None);
        // Leading edge of column 0 is not a boundary
        assert_eq!(h.boundary_target(&g, &PointerEvent::new(51.0, 10.0, 0.0)), None);
        // Same x in the cell area is not the header strip
        assert_eq!(h.boundary_target(&g, &PointerEvent::new(148.0, 40.0, 0.0)), None);
    }

    #[test]
    fn test_scrollbar_events_ignored() {
        let g = grid();
        let h = ResizeHandler::rows();
        let ev = PointerEvent::new(20.0, 49.0, 0.0);
        assert!(h.hit_test(&g, &ev));
        let ev = ev.with_target(PointerTarget::Scrollbar);
        assert!(!h.hit_test(&g, &ev));
    }
}
