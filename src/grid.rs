//! Grid state shared by the interaction handlers.
//!
//! `Grid` bundles the two axes, the cell store, the selection, the viewport
//! and the edit session. Handlers mutate it through `&mut Grid`; the renderer
//! reads it through `&Grid`. Mutations that need a redraw flag it with
//! [`Grid::request_render`] and the owner forwards the flag to the scheduler
//! after the event has been processed.

use serde::Serialize;

use crate::cell_ref::{column_label, row_label};
use crate::config::GridConfig;
use crate::editor::{apply_commit, CommitOutcome, EditMode, EditSession};
use crate::error::Result;
use crate::interaction::AutoScroll;
use crate::layout::{Axis, AxisHit, Rect, Viewport, VisibleWindow, Zone};
use crate::selection::SelectionModel;
use crate::store::CellStore;
use crate::types::{AxisKind, CellPos, SelectionStats};

#[derive(Debug, Clone)]
pub struct Grid {
    config: GridConfig,
    pub columns: Axis,
    pub rows: Axis,
    pub store: CellStore,
    pub selection: SelectionModel,
    pub viewport: Viewport,
    /// The edit cursor and surface text, if a cell is being edited
    pub editing: Option<EditSession>,
    pub autoscroll: AutoScroll,
    render_requested: bool,
}

/// Total scrollable size including the header and index strips.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContentSize {
    pub width: f64,
    pub height: f64,
}

/// Row and column under a point, for the structural-edit context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContextTarget {
    pub row: Option<u32>,
    pub col: Option<u32>,
}

/// Captions for the structural-edit context menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextMenuLabels {
    pub insert_row_above: Option<String>,
    pub insert_row_below: Option<String>,
    pub delete_row: Option<String>,
    pub insert_column_left: Option<String>,
    pub insert_column_right: Option<String>,
    pub delete_column: Option<String>,
}

impl ContextMenuLabels {
    pub fn for_target(target: ContextTarget) -> Self {
        let row = target.row.map(row_label);
        let col = target.col.map(column_label);
        Self {
            insert_row_above: row.as_ref().map(|r| format!("Insert row above {r}")),
            insert_row_below: row.as_ref().map(|r| format!("Insert row below {r}")),
            delete_row: row.as_ref().map(|r| format!("Delete row {r}")),
            insert_column_left: col.as_ref().map(|c| format!("Insert column left of {c}")),
            insert_column_right: col.as_ref().map(|c| format!("Insert column right of {c}")),
            delete_column: col.map(|c| format!("Delete column {c}")),
        }
    }
}

impl Grid {
    /// Build an empty grid.
    ///
    /// # Errors
    /// Returns [`GridError::InvalidConfig`](crate::error::GridError::InvalidConfig)
    /// if the config fails validation.
    pub fn new(config: GridConfig) -> Result<Self> {
        config.validate()?;
        let columns = Axis::new(
            AxisKind::Columns,
            config.total_cols,
            config.default_col_width,
            config.min_segment_size,
        );
        let rows = Axis::new(
            AxisKind::Rows,
            config.total_rows,
            config.default_row_height,
            config.min_segment_size,
        );
        let viewport = Viewport::new(0.0, 0.0, config.header_height, config.index_width);
        let selection = SelectionModel::new(rows.len(), columns.len());
        Ok(Self {
            config,
            columns,
            rows,
            store: CellStore::new(),
            selection,
            viewport,
            editing: None,
            autoscroll: AutoScroll::default(),
            render_requested: false,
        })
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn total_rows(&self) -> u32 {
        self.rows.len()
    }

    pub fn total_cols(&self) -> u32 {
        self.columns.len()
    }

    pub fn axis(&self, kind: AxisKind) -> &Axis {
        match kind {
            AxisKind::Rows => &self.rows,
            AxisKind::Columns => &self.columns,
        }
    }

    pub fn axis_mut(&mut self, kind: AxisKind) -> &mut Axis {
        match kind {
            AxisKind::Rows => &mut self.rows,
            AxisKind::Columns => &mut self.columns,
        }
    }

    // ---- Render requests ----

    /// Flag that something visible changed.
    pub fn request_render(&mut self) {
        self.render_requested = true;
    }

    /// Consume the render flag.
    pub fn take_render_request(&mut self) -> bool {
        std::mem::take(&mut self.render_requested)
    }

    // ---- Geometry ----

    /// Column under container x.
    pub fn column_hit(&self, x: f64) -> AxisHit {
        self.columns.find_index_at(self.viewport.to_axis_x(x))
    }

    /// Row under container y.
    pub fn row_hit(&self, y: f64) -> AxisHit {
        self.rows.find_index_at(self.viewport.to_axis_y(y))
    }

    /// The cell under a point in the cell area.
    pub fn cell_at(&self, x: f64, y: f64) -> Option<CellPos> {
        if self.viewport.zone(x, y) != Zone::Cells {
            return None;
        }
        let row = self.row_hit(y).index()?;
        let col = self.column_hit(x).index()?;
        Some(CellPos { row, col })
    }

    /// The cell under a point, with out-of-range coordinates pinned to the
    /// nearest edge cell. Used while a drag runs past the grid.
    pub fn cell_at_clamped(&self, x: f64, y: f64) -> CellPos {
        CellPos {
            row: self.row_hit(y).clamp(self.total_rows()),
            col: self.column_hit(x).clamp(self.total_cols()),
        }
    }

    /// Container-relative rectangle of a cell (not clipped to the viewport).
    pub fn cell_rect(&self, pos: CellPos) -> Option<Rect> {
        let x = self.columns.position(pos.col)?;
        let y = self.rows.position(pos.row)?;
        Some(Rect {
            x: self.viewport.to_container_x(x),
            y: self.viewport.to_container_y(y),
            width: self.columns.size(pos.col)?,
            height: self.rows.size(pos.row)?,
        })
    }

    /// Where the edit surface goes, recomputed from the current scroll offsets.
    pub fn edit_surface_rect(&self) -> Option<Rect> {
        let session = self.editing.as_ref().filter(|s| s.is_visible())?;
        self.cell_rect(session.cell())
    }

    /// Size of the scroll spacer the host lays out under the grid.
    pub fn content_size(&self) -> ContentSize {
        ContentSize {
            width: self.columns.total_extent() + self.config.index_width,
            height: self.rows.total_extent() + self.config.header_height,
        }
    }

    pub fn visible_window(&self) -> VisibleWindow {
        self.viewport.visible_window(&self.columns, &self.rows)
    }

    /// Row and column under a point; either may be absent over a strip or past the grid.
    pub fn context_target(&self, x: f64, y: f64) -> ContextTarget {
        let (row, col) = match self.viewport.zone(x, y) {
            Zone::Cells => (self.row_hit(y).index(), self.column_hit(x).index()),
            Zone::RowIndex => (self.row_hit(y).index(), None),
            Zone::ColumnHeader => (None, self.column_hit(x).index()),
            Zone::Corner | Zone::Outside => (None, None),
        };
        ContextTarget { row, col }
    }

    // ---- Scrolling ----

    /// Resize the container. Scroll offsets are re-clamped.
    pub fn resize_viewport(&mut self, width: f64, height: f64) {
        self.viewport.resize(width, height);
        self.viewport.clamp_scroll(&self.columns, &self.rows);
        self.request_render();
    }

    pub fn set_scroll(&mut self, x: f64, y: f64) {
        self.viewport.set_scroll(x, y, &self.columns, &self.rows);
        self.request_render();
    }

    /// Scroll by a delta, returning the delta actually applied.
    pub fn scroll_by(&mut self, dx: f64, dy: f64) -> (f64, f64) {
        let applied = self.viewport.scroll_by(dx, dy, &self.columns, &self.rows);
        if applied.0.abs() > 0.0 || applied.1.abs() > 0.0 {
            self.request_render();
        }
        applied
    }

    /// Scroll the minimum amount that brings `pos` fully into the cell area.
    pub fn scroll_into_view(&mut self, pos: CellPos) {
        let (Some(x0), Some(w), Some(y0), Some(h)) = (
            self.columns.position(pos.col),
            self.columns.size(pos.col),
            self.rows.position(pos.row),
            self.rows.size(pos.row),
        ) else {
            return;
        };
        let vp = &self.viewport;
        let x = reveal(vp.scroll_x, vp.cells_width(), x0, x0 + w);
        let y = reveal(vp.scroll_y, vp.cells_height(), y0, y0 + h);
        self.set_scroll(x, y);
    }

    // ---- Editing ----

    /// Bind the edit surface to `pos`, committing any session already open.
    pub fn begin_edit(&mut self, pos: CellPos, mode: EditMode) {
        self.commit_edit();
        let current = self.store.value(pos.row, pos.col);
        self.editing = Some(match mode {
            EditMode::Blurred => EditSession::blurred(pos, current),
            EditMode::Focused => EditSession::focused(pos, current),
        });
        self.request_render();
    }

    /// Write the open session to the store and clear the edit cursor.
    pub fn commit_edit(&mut self) -> CommitOutcome {
        let Some(session) = self.editing.take() else {
            return CommitOutcome::Unchanged;
        };
        let outcome = apply_commit(&mut self.store, &session);
        if outcome != CommitOutcome::Unchanged {
            let pos = session.cell();
            log::debug!("commit {:?} at ({}, {})", outcome, pos.row, pos.col);
            self.request_render();
        }
        outcome
    }

    /// Drop the open session without writing it.
    pub fn cancel_edit(&mut self) {
        if self.editing.take().is_some() {
            self.request_render();
        }
    }

    /// The surface lost focus: a focused session is committed and closed.
    ///
    /// Blurred sessions are left alone since they never had focus.
    pub fn blur_edit(&mut self) -> CommitOutcome {
        if self.editing.as_ref().is_some_and(EditSession::is_focused) {
            self.commit_edit()
        } else {
            CommitOutcome::Unchanged
        }
    }

    /// Mirror the host input element's text into the session.
    pub fn set_edit_value(&mut self, text: &str) {
        if let Some(session) = self.editing.as_mut() {
            session.set_value(text);
        }
    }

    /// Commit, then move the edit cursor one step, clamped to the grid.
    ///
    /// Returns false when no cell is being edited.
    pub fn move_edit_cursor(&mut self, d_row: i8, d_col: i8) -> bool {
        let Some(current) = self.editing.as_ref().map(EditSession::cell) else {
            return false;
        };
        self.commit_edit();
        let next = CellPos {
            row: step(current.row, d_row, self.total_rows()),
            col: step(current.col, d_col, self.total_cols()),
        };
        self.selection.collapse_to(next.row, next.col);
        self.begin_edit(next, EditMode::Blurred);
        self.scroll_into_view(next);
        true
    }

    // ---- Data ----

    /// Empty the store and close any edit.
    pub fn clear_data(&mut self) {
        self.editing = None;
        self.store.clear();
        self.request_render();
    }

    pub fn statistics(&self) -> SelectionStats {
        self.selection.compute_statistics(&self.store)
    }

    // ---- Structural edits ----

    /// Insert a row at `index` (0..=total_rows).
    ///
    /// # Errors
    /// Returns [`GridError::IndexOutOfRange`](crate::error::GridError::IndexOutOfRange)
    /// if `index` is past the end; nothing changes in that case.
    pub fn insert_row(&mut self, index: u32) -> Result<()> {
        self.insert(AxisKind::Rows, index)
    }

    /// Insert a column at `index` (0..=total_cols).
    ///
    /// # Errors
    /// See [`insert_row`](Self::insert_row).
    pub fn insert_column(&mut self, index: u32) -> Result<()> {
        self.insert(AxisKind::Columns, index)
    }

    /// Delete the row at `index`.
    ///
    /// # Errors
    /// Returns [`GridError::LastSegment`](crate::error::GridError::LastSegment) for
    /// the only remaining row, or `IndexOutOfRange`. Nothing changes on error.
    pub fn delete_row(&mut self, index: u32) -> Result<()> {
        self.delete(AxisKind::Rows, index)
    }

    /// Delete the column at `index`.
    ///
    /// # Errors
    /// See [`delete_row`](Self::delete_row).
    pub fn delete_column(&mut self, index: u32) -> Result<()> {
        self.delete(AxisKind::Columns, index)
    }

    fn insert(&mut self, kind: AxisKind, index: u32) -> Result<()> {
        if let Err(e) = self.axis(kind).check_insert(index) {
            log::warn!("insert refused: {e}");
            return Err(e);
        }
        self.commit_edit();
        let size = match kind {
            AxisKind::Rows => self.config.default_row_height,
            AxisKind::Columns => self.config.default_col_width,
        };
        self.axis_mut(kind).insert_at(index, size)?;
        self.store.reindex_for_insert(kind, index);
        log::debug!("inserted {kind} at {index}");
        self.after_structural_edit();
        Ok(())
    }

    fn delete(&mut self, kind: AxisKind, index: u32) -> Result<()> {
        if let Err(e) = self.axis(kind).check_delete(index) {
            log::warn!("delete refused: {e}");
            return Err(e);
        }
        self.commit_edit();
        self.axis_mut(kind).delete_at(index)?;
        self.store.reindex_for_delete(kind, index);
        log::debug!("deleted {kind} {index}");
        self.after_structural_edit();
        Ok(())
    }

    fn after_structural_edit(&mut self) {
        let (rows, cols) = (self.total_rows(), self.total_cols());
        self.selection.clamp_to(rows, cols);
        self.viewport.clamp_scroll(&self.columns, &self.rows);
        self.request_render();
    }
}

/// Scroll offset that shows `[start, end)` inside a window of `extent` at `scroll`.
fn reveal(scroll: f64, extent: f64, start: f64, end: f64) -> f64 {
    if start < scroll {
        start
    } else if end > scroll + extent {
        (end - extent).min(start)
    } else {
        scroll
    }
}

fn step(value: u32, delta: i8, len: u32) -> u32 {
    match delta.signum() {
        -1 => value.saturating_sub(1),
        1 => value.saturating_add(1).min(len.saturating_sub(1)),
        _ => value,
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
    use crate::error::GridError;

    fn grid() -> Grid {
        let mut g = Grid::new(GridConfig::with_size(100, 20)).unwrap();
        g.resize_viewport(550.0, 275.0);
        g
    }

    #[test]
    fn test_cell_at_respects_strips_and_scroll() {
        let mut g = grid();
        assert_eq!(g.cell_at(60.0, 30.0), Some(CellPos::new(0, 0)));
        assert_eq!(g.cell_at(10.0, 30.0), None);
        assert_eq!(g.cell_at(60.0, 10.0), None);
        g.set_scroll(100.0, 50.0);
        assert_eq!(g.cell_at(60.0, 30.0), Some(CellPos::new(2, 1)));
    }

    #[test]
    fn test_cell_rect_tracks_scroll() {
        let mut g = grid();
        let pos = CellPos::new(3, 2);
        let r = g.cell_rect(pos).unwrap();
        assert_eq!((r.x, r.y, r.width, r.height), (250.0, 100.0, 100.0, 25.0));
        g.set_scroll(30.0, 10.0);
        let r = g.cell_rect(pos).unwrap();
        assert_eq!((r.x, r.y), (220.0, 90.0));
    }

    #[test]
    fn test_content_size_includes_strips() {
        let g = grid();
        assert_eq!(
            g.content_size(),
            ContentSize {
                width: 2050.0,
                height: 2525.0
            }
        );
    }

    #[test]
    fn test_scroll_into_view() {
        let mut g = grid();
        g.scroll_into_view(CellPos::new(20, 7));
        // cells area is 500 x 250; column 7 ends at 800, row 20 ends at 525
        assert_eq!(g.viewport.scroll_x, 300.0);
        assert_eq!(g.viewport.scroll_y, 275.0);
        g.scroll_into_view(CellPos::new(0, 0));
        assert_eq!((g.viewport.scroll_x, g.viewport.scroll_y), (0.0, 0.0));
    }

    #[test]
    fn test_move_edit_cursor_clamps() {
        let mut g = grid();
        assert!(!g.move_edit_cursor(1, 0));
        g.begin_edit(CellPos::new(0, 19), EditMode::Blurred);
        assert!(g.move_edit_cursor(0, 1));
        assert_eq!(g.editing.as_ref().unwrap().cell(), CellPos::new(0, 19));
        assert!(g.move_edit_cursor(-1, 0));
        assert_eq!(g.editing.as_ref().unwrap().cell(), CellPos::new(0, 19));
        assert!(g.move_edit_cursor(1, -1));
        assert_eq!(g.editing.as_ref().unwrap().cell(), CellPos::new(1, 18));
    }

    #[test]
    fn test_blur_only_commits_focused() {
        let mut g = grid();
        g.begin_edit(CellPos::new(1, 1), EditMode::Blurred);
        g.set_edit_value("x");
        assert_eq!(g.blur_edit(), CommitOutcome::Unchanged);
        assert!(g.editing.is_some());

        g.editing.as_mut().unwrap().focus();
        assert_eq!(g.blur_edit(), CommitOutcome::Written);
        assert!(g.editing.is_none());
        assert_eq!(g.store.value(1, 1), "x");
    }

    #[test]
    fn test_failed_delete_leaves_store() {
        let mut g = Grid::new(GridConfig::with_size(1, 3)).unwrap();
        g.store.set(0, 2, "only", None);
        let err = g.delete_row(0).unwrap_err();
        assert!(matches!(err, GridError::LastSegment { axis: AxisKind::Rows }));
        assert_eq!(g.store.value(0, 2), "only");
        assert!(g.delete_column(3).is_err());
        assert_eq!(g.total_cols(), 3);
    }

    #[test]
    fn test_refused_edit_keeps_open_session() {
        let mut g = Grid::new(GridConfig::with_size(1, 3)).unwrap();
        g.begin_edit(CellPos::new(0, 1), EditMode::Focused);
        g.set_edit_value("typed");

        assert!(g.delete_row(0).is_err());
        assert!(g.insert_column(9).is_err());
        assert!(g.store.is_empty());
        let session = g.editing.as_ref().unwrap();
        assert_eq!(session.cell(), CellPos::new(0, 1));
        assert_eq!(session.value(), "typed");
        assert!(session.is_focused());
    }

    #[test]
    fn test_structural_edit_commits_open_session() {
        let mut g = grid();
        g.begin_edit(CellPos::new(4, 0), EditMode::Focused);
        g.set_edit_value("typed");
        g.insert_row(2).unwrap();
        assert!(g.editing.is_none());
        assert_eq!(g.store.value(5, 0), "typed");
        assert_eq!(g.total_rows(), 101);
    }

    #[test]
    fn test_context_labels() {
        let g = grid();
        let target = g.context_target(160.0, 80.0);
        assert_eq!(target, ContextTarget { row: Some(2), col: Some(1) });
        let labels = ContextMenuLabels::for_target(target);
        assert_eq!(labels.delete_row.as_deref(), Some("Delete row 3"));
        assert_eq!(labels.delete_column.as_deref(), Some("Delete column B"));

        let header = g.context_target(160.0, 10.0);
        assert_eq!(header.row, None);
        assert!(ContextMenuLabels::for_target(header).insert_row_above.is_none());
    }
}
