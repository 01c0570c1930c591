//! `SheetView`: the grid plus its event routing, render scheduling and
//! background loading.
//!
//! Every entry point follows the same order: mutate the grid synchronously,
//! then forward any render request to the scheduler. The wasm binding in
//! [`wasm`] only translates DOM events into these calls.

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::GridWidget;

use crate::config::GridConfig;
use crate::error::Result;
use crate::grid::{ContentSize, ContextMenuLabels, ContextTarget, Grid};
use crate::interaction::{autoscroll, Cursor, Dispatcher, KeyInput, PointerEvent};
use crate::layout::Rect;
use crate::render::{FrameSnapshot, RenderScheduler};
use crate::store::{BulkLoad, LoadProgress, RowObject};
use crate::types::{CellRange, CellRecord, CellStyle, SelectionStats};

/// What the host should do after an animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    /// Draw this frame
    pub render: bool,
    /// Schedule another frame (autoscroll is running)
    pub keep_running: bool,
}

pub struct SheetView {
    grid: Grid,
    dispatcher: Dispatcher,
    scheduler: RenderScheduler,
    pending_load: Option<BulkLoad>,
    context: Option<ContextTarget>,
}

impl SheetView {
    /// Build a view. `request_render` is called once per burst of changes and
    /// should schedule a next-frame callback that calls [`on_frame`](Self::on_frame).
    ///
    /// # Errors
    /// Returns an error if `config` fails validation.
    pub fn new(config: GridConfig, request_render: Box<dyn FnMut()>) -> Result<Self> {
        Ok(Self {
            grid: Grid::new(config)?,
            dispatcher: Dispatcher::with_default_handlers(),
            scheduler: RenderScheduler::new(request_render),
            pending_load: None,
            context: None,
        })
    }

    /// A view with no render hook, for tests and headless use.
    ///
    /// # Errors
    /// Returns an error if `config` fails validation.
    pub fn headless(config: GridConfig) -> Result<Self> {
        Self::new(config, Box::new(|| {}))
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Direct grid access. Changes made here are not scheduled for render
    /// until the next routed event or [`invalidate`](Self::invalidate).
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Request a redraw regardless of state changes.
    pub fn invalidate(&mut self) {
        self.grid.request_render();
        self.flush();
    }

    fn flush(&mut self) {
        if self.grid.take_render_request() {
            self.scheduler.request();
        }
    }

    pub fn render_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Whether the host needs another animation frame.
    pub fn needs_frame(&self) -> bool {
        self.scheduler.is_pending() || self.grid.autoscroll.is_active()
    }

    // ---- Input ----

    pub fn pointer_down(&mut self, ev: &PointerEvent) -> bool {
        let handled = self.dispatcher.pointer_down(&mut self.grid, ev);
        self.flush();
        handled
    }

    /// Route a move. Returns the cursor the host should show.
    pub fn pointer_move(&mut self, ev: &PointerEvent) -> Cursor {
        let cursor = self.dispatcher.pointer_move(&mut self.grid, ev);
        self.flush();
        cursor
    }

    pub fn pointer_up(&mut self, ev: &PointerEvent) {
        self.dispatcher.pointer_up(&mut self.grid, ev);
        self.flush();
    }

    /// Name of the handler owning the current pointer gesture.
    pub fn captured(&self) -> Option<&'static str> {
        self.dispatcher.captured()
    }

    /// Returns true if the key was consumed and its default action should be suppressed.
    pub fn key_down(&mut self, key: KeyInput) -> bool {
        let consumed = self.dispatcher.key_down(&mut self.grid, key);
        self.flush();
        consumed
    }

    /// The host container scrolled to `(x, y)`.
    pub fn on_scroll(&mut self, x: f64, y: f64) {
        self.grid.set_scroll(x, y);
        self.flush();
    }

    pub fn scroll_by(&mut self, dx: f64, dy: f64) -> (f64, f64) {
        let applied = self.grid.scroll_by(dx, dy);
        self.flush();
        applied
    }

    /// The host container changed size.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.grid.resize_viewport(width, height);
        self.flush();
    }

    /// Run one animation frame: step autoscroll and consume the render request.
    pub fn on_frame(&mut self) -> FrameReport {
        let scroll = autoscroll::run_frame(&mut self.grid);
        let dirty = self.grid.take_render_request();
        let requested = self.scheduler.begin_frame();
        FrameReport {
            render: dirty || requested,
            keep_running: scroll.keep_running,
        }
    }

    /// Everything the renderer draws this frame.
    pub fn frame(&self) -> FrameSnapshot {
        FrameSnapshot::capture(&self.grid)
    }

    // ---- Editing ----

    /// Mirror the host input element's text.
    pub fn set_edit_value(&mut self, text: &str) {
        self.grid.set_edit_value(text);
        self.grid.request_render();
        self.flush();
    }

    /// The host input element lost focus.
    pub fn blur_edit(&mut self) {
        self.grid.blur_edit();
        self.flush();
    }

    pub fn edit_surface_rect(&self) -> Option<Rect> {
        self.grid.edit_surface_rect()
    }

    // ---- Data ----

    /// Replace the grid contents with `rows`.
    ///
    /// Up to `sync_load_rows` rows are written now; the rest wait for
    /// [`on_idle`](Self::on_idle).
    pub fn load_rows(&mut self, rows: Vec<RowObject>) -> LoadProgress {
        self.clear_data();
        let prefix = self.grid.config().sync_load_rows;
        let mut load = BulkLoad::new(rows, self.grid.total_rows(), self.grid.total_cols());
        log::info!("bulk load started: {} rows", load.total());
        let progress = load.load_rows(&mut self.grid.store, prefix);
        match progress {
            LoadProgress::Done => log::info!("bulk load finished: {} rows", load.loaded()),
            LoadProgress::Pending => self.pending_load = Some(load),
        }
        self.grid.request_render();
        self.flush();
        progress
    }

    /// Replace the grid contents with `rows` in one pass.
    pub fn load_rows_sync(&mut self, rows: Vec<RowObject>) {
        self.clear_data();
        let (total_rows, total_cols) = (self.grid.total_rows(), self.grid.total_cols());
        self.grid.store.load_bulk_sync(rows, total_rows, total_cols);
        self.grid.request_render();
        self.flush();
    }

    pub fn is_loading(&self) -> bool {
        self.pending_load.is_some()
    }

    /// Continue a pending load while `has_time` reports idle time left.
    pub fn on_idle(&mut self, has_time: impl FnMut() -> bool) -> LoadProgress {
        let Some(load) = self.pending_load.as_mut() else {
            return LoadProgress::Done;
        };
        let chunk = self.grid.config().idle_chunk_rows;
        let progress = load.run_idle(&mut self.grid.store, chunk, has_time);
        if progress == LoadProgress::Done {
            log::info!("bulk load finished: {} rows", load.loaded());
            self.pending_load = None;
        }
        self.grid.request_render();
        self.flush();
        progress
    }

    /// Write whatever a pending load still holds, right now.
    ///
    /// Structural edits re-key the store; the rest of a load must land
    /// before that happens or it would be written at stale rows.
    fn finish_pending_load(&mut self) {
        if let Some(mut load) = self.pending_load.take() {
            load.load_rows(&mut self.grid.store, usize::MAX);
            log::info!("bulk load finished early: {} rows", load.loaded());
            self.grid.request_render();
        }
    }

    /// Drop all cell data, cancelling any pending load.
    pub fn clear_data(&mut self) {
        if let Some(load) = self.pending_load.take() {
            log::info!(
                "bulk load cancelled after {} of {} rows",
                load.loaded(),
                load.total()
            );
        }
        self.grid.clear_data();
        self.flush();
    }

    pub fn cell(&self, row: u32, col: u32) -> Option<&CellRecord> {
        self.grid.store.get(row, col)
    }

    pub fn set_cell(&mut self, row: u32, col: u32, value: &str, style: Option<CellStyle>) {
        self.grid.store.set(row, col, value, style);
        self.grid.request_render();
        self.flush();
    }

    // ---- Queries ----

    pub fn selected_range(&self) -> Option<CellRange> {
        self.grid.selection.range()
    }

    pub fn statistics(&self) -> SelectionStats {
        self.grid.statistics()
    }

    pub fn content_size(&self) -> ContentSize {
        self.grid.content_size()
    }

    // ---- Structural edits ----
    //
    // A pending bulk load is completed first.

    pub fn insert_row(&mut self, index: u32) -> Result<()> {
        self.finish_pending_load();
        let result = self.grid.insert_row(index);
        self.flush();
        result
    }

    pub fn insert_column(&mut self, index: u32) -> Result<()> {
        self.finish_pending_load();
        let result = self.grid.insert_column(index);
        self.flush();
        result
    }

    pub fn delete_row(&mut self, index: u32) -> Result<()> {
        self.finish_pending_load();
        let result = self.grid.delete_row(index);
        self.flush();
        result
    }

    pub fn delete_column(&mut self, index: u32) -> Result<()> {
        self.finish_pending_load();
        let result = self.grid.delete_column(index);
        self.flush();
        result
    }

    /// Resolve the row/column under a point and remember it for the
    /// context-menu actions below.
    pub fn context_target(&mut self, x: f64, y: f64) -> ContextTarget {
        let target = self.grid.context_target(x, y);
        self.context = Some(target);
        target
    }

    /// Captions for the remembered target.
    pub fn context_labels(&self) -> ContextMenuLabels {
        ContextMenuLabels::for_target(self.context.unwrap_or(ContextTarget {
            row: None,
            col: None,
        }))
    }

    fn target_row(&self) -> Option<u32> {
        self.context.and_then(|t| t.row)
    }

    fn target_col(&self) -> Option<u32> {
        self.context.and_then(|t| t.col)
    }

    /// Returns `Ok(false)` when the remembered target has no row.
    ///
    /// # Errors
    /// Propagates the structural edit's error.
    pub fn insert_row_above(&mut self) -> Result<bool> {
        let Some(row) = self.target_row() else {
            return Ok(false);
        };
        self.insert_row(row).map(|()| true)
    }

    /// # Errors
    /// Propagates the structural edit's error.
    pub fn insert_row_below(&mut self) -> Result<bool> {
        let Some(row) = self.target_row() else {
            return Ok(false);
        };
        self.insert_row(row.saturating_add(1)).map(|()| true)
    }

    /// # Errors
    /// Propagates the structural edit's error.
    pub fn insert_column_left(&mut self) -> Result<bool> {
        let Some(col) = self.target_col() else {
            return Ok(false);
        };
        self.insert_column(col).map(|()| true)
    }

    /// # Errors
    /// Propagates the structural edit's error.
    pub fn insert_column_right(&mut self) -> Result<bool> {
        let Some(col) = self.target_col() else {
            return Ok(false);
        };
        self.insert_column(col.saturating_add(1)).map(|()| true)
    }

    /// # Errors
    /// Returns [`GridError::LastSegment`](crate::error::GridError::LastSegment)
    /// when the target is the only row.
    pub fn delete_target_row(&mut self) -> Result<bool> {
        let Some(row) = self.target_row() else {
            return Ok(false);
        };
        self.context = None;
        self.delete_row(row).map(|()| true)
    }

    /// # Errors
    /// Returns [`GridError::LastSegment`](crate::error::GridError::LastSegment)
    /// when the target is the only column.
    pub fn delete_target_column(&mut self) -> Result<bool> {
        let Some(col) = self.target_col() else {
            return Ok(false);
        };
        self.context = None;
        self.delete_column(col).map(|()| true)
    }
}

impl std::fmt::Debug for SheetView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetView")
            .field("dispatcher", &self.dispatcher)
            .field("scheduler", &self.scheduler)
            .field("loading", &self.pending_load.is_some())
            .finish_non_exhaustive()
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
    use std::cell::Cell;
    use std::rc::Rc;

    fn view_with_counter() -> (SheetView, Rc<Cell<u32>>) {
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);
        let mut view = SheetView::new(
            GridConfig::with_size(1000, 26),
            Box::new(move || counter.set(counter.get() + 1)),
        )
        .unwrap();
        view.resize(550.0, 275.0);
        view.on_frame();
        fired.set(0);
        (view, fired)
    }

    #[test]
    fn scroll_bursts_coalesce_into_one_frame() {
        let (mut view, fired) = view_with_counter();
        view.on_scroll(0.0, 10.0);
        view.on_scroll(0.0, 20.0);
        view.on_scroll(0.0, 30.0);
        assert_eq!(fired.get(), 1);
        assert!(view.on_frame().render);
        assert!(!view.on_frame().render);
        assert_eq!(view.grid().viewport.scroll_y, 30.0);
    }

    #[test]
    fn context_actions_use_remembered_target() {
        let (mut view, _) = view_with_counter();
        view.set_cell(3, 0, "x", None);
        // Row 3 sits at container y 100..125
        let target = view.context_target(60.0, 110.0);
        assert_eq!(target.row, Some(3));
        assert_eq!(view.context_labels().insert_row_below.as_deref(), Some("Insert row below 4"));

        assert!(view.insert_row_above().unwrap());
        assert_eq!(view.cell(4, 0).unwrap().value, "x");
        assert!(view.delete_target_row().unwrap());
        assert_eq!(view.cell(3, 0).unwrap().value, "x");
        // Target consumed by the delete
        assert!(!view.delete_target_row().unwrap());
    }

    #[test]
    fn clear_data_cancels_pending_load() {
        let (mut view, _) = view_with_counter();
        let rows: Vec<RowObject> = (0..500)
            .map(|i| {
                let mut row = RowObject::new();
                row.insert("n".into(), serde_json::json!(i));
                row
            })
            .collect();
        assert_eq!(view.load_rows(rows), LoadProgress::Pending);
        assert!(view.is_loading());
        view.clear_data();
        assert!(!view.is_loading());
        assert!(view.grid().store.is_empty());
        assert_eq!(view.on_idle(|| true), LoadProgress::Done);
        assert!(view.grid().store.is_empty());
    }
}
