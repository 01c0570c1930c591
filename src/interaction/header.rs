//! Whole-column and whole-row selection from the header and index strips.

use super::{InteractionHandler, PointerEvent};
use crate::grid::Grid;
use crate::layout::Zone;
use crate::types::AxisKind;

#[derive(Debug)]
pub struct SelectHandler {
    kind: AxisKind,
    active: bool,
}

impl SelectHandler {
    /// Column selection from the header strip.
    pub fn columns() -> Self {
        Self {
            kind: AxisKind::Columns,
            active: false,
        }
    }

    /// Row selection from the index strip.
    pub fn rows() -> Self {
        Self {
            kind: AxisKind::Rows,
            active: false,
        }
    }
}

impl InteractionHandler for SelectHandler {
    fn name(&self) -> &'static str {
        match self.kind {
            AxisKind::Columns => "column-select",
            AxisKind::Rows => "row-select",
        }
    }

    fn hit_test(&self, grid: &Grid, ev: &PointerEvent) -> bool {
        if !ev.on_grid() {
            return false;
        }
        match (self.kind, grid.viewport.zone(ev.x, ev.y)) {
            (AxisKind::Columns, Zone::ColumnHeader) => grid.column_hit(ev.x).index().is_some(),
            (AxisKind::Rows, Zone::RowIndex) => grid.row_hit(ev.y).index().is_some(),
            _ => false,
        }
    }

    fn on_pointer_down(&mut self, grid: &mut Grid, ev: &PointerEvent) {
        grid.commit_edit();
        match self.kind {
            AxisKind::Columns => {
                let Some(col) = grid.column_hit(ev.x).index() else {
                    return;
                };
                grid.selection.begin_columns(col);
            }
            AxisKind::Rows => {
                let Some(row) = grid.row_hit(ev.y).index() else {
                    return;
                };
                grid.selection.begin_rows(row);
            }
        }
        self.active = true;
        grid.request_render();
    }

    fn on_pointer_move(&mut self, grid: &mut Grid, ev: &PointerEvent) {
        if !self.active {
            return;
        }
        match self.kind {
            AxisKind::Columns => {
                let col = grid.column_hit(ev.x).clamp(grid.total_cols());
                grid.selection.extend_columns(col);
            }
            AxisKind::Rows => {
                let row = grid.row_hit(ev.y).clamp(grid.total_rows());
                grid.selection.extend_rows(row);
            }
        }
        grid.request_render();
    }

    fn on_pointer_up(&mut self, _grid: &mut Grid, _ev: &PointerEvent) {
        self.active = false;
    }
}
