//! Per-frame snapshot for the external renderer.
//!
//! The renderer pulls everything it draws from [`FrameSnapshot::capture`]:
//! visible segments with their container positions and labels, non-empty
//! cells in the visible window, the selection overlay, header/index tinting
//! and the edit surface placement.

use serde::Serialize;

use super::selection::{selection_rect, SelectionRect};
use crate::cell_ref::{column_label, row_label};
use crate::grid::Grid;
use crate::layout::{Axis, Rect, VisibleRange};

/// One visible row or column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub index: u32,
    /// Leading edge in container pixels
    pub start: f64,
    pub size: f64,
    pub label: String,
}

/// A non-empty visible cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisibleCell {
    pub row: u32,
    pub col: u32,
    pub value: String,
    pub bold: bool,
    pub italic: bool,
}

/// Edit surface placement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditOverlay {
    pub row: u32,
    pub col: u32,
    pub rect: Rect,
    pub value: String,
    pub focused: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSnapshot {
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub width: f64,
    pub height: f64,
    pub header_height: f64,
    pub index_width: f64,
    pub rows: Vec<Segment>,
    pub cols: Vec<Segment>,
    pub cells: Vec<VisibleCell>,
    pub selection: Option<SelectionRect>,
    pub highlighted_rows: Option<VisibleRange>,
    pub highlighted_cols: Option<VisibleRange>,
    pub full_row: bool,
    pub full_column: bool,
    pub edit: Option<EditOverlay>,
}

fn segments(
    axis: &Axis,
    range: VisibleRange,
    to_container: impl Fn(f64) -> f64,
    label: fn(u32) -> String,
) -> Vec<Segment> {
    (range.start..=range.end)
        .filter_map(|i| {
            Some(Segment {
                index: i,
                start: to_container(axis.position(i)?),
                size: axis.size(i)?,
                label: label(i),
            })
        })
        .collect()
}

impl FrameSnapshot {
    pub fn capture(grid: &Grid) -> Self {
        let vp = &grid.viewport;
        let window = grid.visible_window();

        let mut cells = Vec::new();
        for row in window.rows.start..=window.rows.end {
            for col in window.cols.start..=window.cols.end {
                if let Some(cell) = grid.store.get(row, col) {
                    cells.push(VisibleCell {
                        row,
                        col,
                        value: cell.value.clone(),
                        bold: cell.style.bold,
                        italic: cell.style.italic,
                    });
                }
            }
        }

        let selection = grid
            .selection
            .range()
            .and_then(|range| selection_rect(range, &grid.columns, &grid.rows, vp));

        let edit = grid.editing.as_ref().and_then(|session| {
            let rect = grid.edit_surface_rect()?;
            let pos = session.cell();
            Some(EditOverlay {
                row: pos.row,
                col: pos.col,
                rect,
                value: session.value().to_string(),
                focused: session.is_focused(),
            })
        });

        Self {
            scroll_x: vp.scroll_x,
            scroll_y: vp.scroll_y,
            width: vp.width,
            height: vp.height,
            header_height: vp.header_height,
            index_width: vp.index_width,
            rows: segments(&grid.rows, window.rows, |y| vp.to_container_y(y), row_label),
            cols: segments(&grid.columns, window.cols, |x| vp.to_container_x(x), column_label),
            cells,
            selection,
            highlighted_rows: grid.selection.rows_highlighted(window.rows),
            highlighted_cols: grid.selection.cols_highlighted(window.cols),
            full_row: grid.selection.is_full_row(),
            full_column: grid.selection.is_full_column(),
            edit,
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
    use crate::editor::EditMode;
    use crate::types::{CellPos, CellStyle};

    #[test]
    fn capture_lists_visible_content() {
        let mut grid = Grid::new(GridConfig::with_size(1000, 50)).unwrap();
        grid.resize_viewport(550.0, 275.0);
        grid.store.set(2, 1, "hi", Some(CellStyle::bold()));
        grid.store.set(900, 1, "far", None);
        grid.selection.begin_columns(1);
        grid.begin_edit(CellPos::new(2, 1), EditMode::Blurred);

        let frame = FrameSnapshot::capture(&grid);
        assert_eq!(frame.cells.len(), 1);
        assert!(frame.cells[0].bold);
        assert_eq!(frame.rows[0].label, "1");
        assert_eq!(frame.cols[1].label, "B");
        assert_eq!(frame.cols[1].start, 150.0);
        assert!(frame.full_column);
        assert_eq!(frame.highlighted_cols, Some(VisibleRange { start: 1, end: 1 }));
        let edit = frame.edit.unwrap();
        assert_eq!(edit.value, "hi");
        assert!(!edit.focused);
    }
}
