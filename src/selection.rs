//! Selection model: an anchor cell, a focus cell and the rectangle between them.
//!
//! A selection is full-column when the anchor sits on the first row and the
//! focus on the last, and full-row when the anchor sits on the first column
//! and the focus on the last. The model keeps the grid's size to answer those
//! queries; the gesture that built the selection only breaks ties and decides
//! how a structural edit re-stretches it.

use serde::Serialize;

use crate::layout::VisibleRange;
use crate::store::CellStore;
use crate::types::{CellPos, CellRange, SelectionStats};

/// How the current selection was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionKind {
    /// Cell range from a click or drag in the cell area
    #[default]
    Cells,
    /// Whole columns from the column header strip
    Columns,
    /// Whole rows from the row index strip
    Rows,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    anchor: CellPos,
    focus: CellPos,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionModel {
    span: Option<Span>,
    kind: SelectionKind,
    total_rows: u32,
    total_cols: u32,
}

impl SelectionModel {
    /// Empty selection over a grid of `total_rows` x `total_cols`.
    pub fn new(total_rows: u32, total_cols: u32) -> Self {
        Self {
            span: None,
            kind: SelectionKind::Cells,
            total_rows,
            total_cols,
        }
    }

    /// Start a new cell selection at `(row, col)`: anchor = focus.
    pub fn set_anchor(&mut self, row: u32, col: u32) {
        let pos = CellPos { row, col };
        self.span = Some(Span {
            anchor: pos,
            focus: pos,
        });
        self.kind = SelectionKind::Cells;
    }

    /// Move the focus corner, keeping the anchor. No-op without an anchor.
    pub fn set_focus(&mut self, row: u32, col: u32) {
        if let Some(span) = self.span.as_mut() {
            span.focus = CellPos { row, col };
        }
    }

    /// Discard any range and select the single cell `(row, col)`.
    pub fn collapse_to(&mut self, row: u32, col: u32) {
        self.set_anchor(row, col);
    }

    /// Select all of column `col`.
    pub fn begin_columns(&mut self, col: u32) {
        self.set_anchor(0, col);
        self.extend_columns(col);
        self.kind = SelectionKind::Columns;
    }

    /// Extend a column selection to column `col`.
    pub fn extend_columns(&mut self, col: u32) {
        self.set_focus(self.last_row(), col);
    }

    /// Select all of row `row`.
    pub fn begin_rows(&mut self, row: u32) {
        self.set_anchor(row, 0);
        self.extend_rows(row);
        self.kind = SelectionKind::Rows;
    }

    /// Extend a row selection to row `row`.
    pub fn extend_rows(&mut self, row: u32) {
        self.set_focus(row, self.last_col());
    }

    pub fn clear(&mut self) {
        self.span = None;
        self.kind = SelectionKind::Cells;
    }

    pub fn kind(&self) -> SelectionKind {
        self.kind
    }

    /// Grid size the full-row / full-column queries are measured against.
    pub fn bounds(&self) -> (u32, u32) {
        (self.total_rows, self.total_cols)
    }

    pub fn anchor(&self) -> Option<CellPos> {
        self.span.map(|s| s.anchor)
    }

    pub fn focus(&self) -> Option<CellPos> {
        self.span.map(|s| s.focus)
    }

    /// Normalized rectangle, or `None` when nothing is selected.
    pub fn range(&self) -> Option<CellRange> {
        self.span.map(|s| CellRange::new(s.anchor, s.focus))
    }

    /// Anchor on the first row and focus on the last.
    ///
    /// A selection spanning the whole grid also meets the full-row test; only
    /// a row-index gesture reports it as full-row instead.
    pub fn is_full_column(&self) -> bool {
        self.spans_rows() && !(self.spans_cols() && self.kind == SelectionKind::Rows)
    }

    /// Anchor on the first column and focus on the last.
    pub fn is_full_row(&self) -> bool {
        self.spans_cols() && !self.is_full_column()
    }

    fn spans_rows(&self) -> bool {
        self.span
            .is_some_and(|s| s.anchor.row == 0 && s.focus.row == self.last_row())
    }

    fn spans_cols(&self) -> bool {
        self.span
            .is_some_and(|s| s.anchor.col == 0 && s.focus.col == self.last_col())
    }

    fn last_row(&self) -> u32 {
        self.total_rows.saturating_sub(1)
    }

    fn last_col(&self) -> u32 {
        self.total_cols.saturating_sub(1)
    }

    /// Selected columns `(first, last)` while a full-column selection is active.
    pub fn column_range(&self) -> Option<(u32, u32)> {
        if !self.is_full_column() {
            return None;
        }
        self.range().map(|r| (r.start_col, r.end_col))
    }

    /// Selected rows `(first, last)` while a full-row selection is active.
    pub fn row_range(&self) -> Option<(u32, u32)> {
        if !self.is_full_row() {
            return None;
        }
        self.range().map(|r| (r.start_row, r.end_row))
    }

    /// Selected rows that fall inside `visible`, for tinting the row index strip.
    pub fn rows_highlighted(&self, visible: VisibleRange) -> Option<VisibleRange> {
        let r = self.range()?;
        intersect(r.start_row, r.end_row, visible)
    }

    /// Selected columns that fall inside `visible`, for tinting the column header strip.
    pub fn cols_highlighted(&self, visible: VisibleRange) -> Option<VisibleRange> {
        let r = self.range()?;
        intersect(r.start_col, r.end_col, visible)
    }

    /// Adopt a new grid size of `total_rows` x `total_cols` and pull the
    /// selection back inside it.
    ///
    /// Selections made from the header or index strip are re-stretched
    /// across the opposite axis so they stay full after rows or columns change.
    pub fn clamp_to(&mut self, total_rows: u32, total_cols: u32) {
        self.total_rows = total_rows;
        self.total_cols = total_cols;
        let (max_row, max_col) = (self.last_row(), self.last_col());
        let Some(span) = self.span.as_mut() else {
            return;
        };
        for pos in [&mut span.anchor, &mut span.focus] {
            pos.row = pos.row.min(max_row);
            pos.col = pos.col.min(max_col);
        }
        match self.kind {
            SelectionKind::Cells => {}
            SelectionKind::Columns => {
                span.anchor.row = 0;
                span.focus.row = max_row;
            }
            SelectionKind::Rows => {
                span.anchor.col = 0;
                span.focus.col = max_col;
            }
        }
    }

    /// Aggregate the numeric cells inside the selection.
    ///
    /// When the rectangle holds more positions than the store has entries,
    /// the store is scanned instead so full-column selections stay cheap.
    pub fn compute_statistics(&self, store: &CellStore) -> SelectionStats {
        let Some(range) = self.range() else {
            return SelectionStats::default();
        };
        let mut acc = StatsAccumulator::default();
        if range.cell_count() > store.len() as u64 {
            for (pos, cell) in store.iter() {
                if range.contains(pos.row, pos.col) {
                    acc.push(cell.numeric_value());
                }
            }
        } else {
            for pos in range.cells() {
                acc.push(store.get(pos.row, pos.col).and_then(|c| c.numeric_value()));
            }
        }
        acc.finish()
    }
}

fn intersect(start: u32, end: u32, visible: VisibleRange) -> Option<VisibleRange> {
    let start = start.max(visible.start);
    let end = end.min(visible.end);
    (start <= end).then_some(VisibleRange { start, end })
}

#[derive(Default)]
struct StatsAccumulator {
    count: u64,
    sum: f64,
    bounds: Option<(f64, f64)>,
}

impl StatsAccumulator {
    fn push(&mut self, value: Option<f64>) {
        let Some(n) = value else {
            return;
        };
        self.count += 1;
        self.sum += n;
        self.bounds = Some(match self.bounds {
            Some((min, max)) => (min.min(n), max.max(n)),
            None => (n, n),
        });
    }

    fn finish(self) -> SelectionStats {
        let Some((min, max)) = self.bounds else {
            return SelectionStats::default();
        };
        SelectionStats {
            count: self.count,
            sum: self.sum,
            average: self.sum / self.count as f64,
            min,
            max,
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

    #[test]
    fn test_anchor_focus_normalizes() {
        let mut sel = SelectionModel::new(100, 26);
        assert!(sel.range().is_none());
        sel.set_focus(1, 1);
        assert!(sel.range().is_none());

        sel.set_anchor(7, 4);
        sel.set_focus(2, 9);
        let r = sel.range().unwrap();
        assert_eq!((r.start_row, r.start_col, r.end_row, r.end_col), (2, 4, 7, 9));
        assert_eq!(sel.anchor(), Some(CellPos::new(7, 4)));

        sel.collapse_to(3, 3);
        assert!(sel.range().unwrap().is_single());
    }

    #[test]
    fn test_column_selection() {
        let mut sel = SelectionModel::new(100, 26);
        sel.begin_columns(4);
        sel.extend_columns(2);
        assert!(sel.is_full_column());
        assert!(!sel.is_full_row());
        assert_eq!(sel.column_range(), Some((2, 4)));
        assert_eq!(sel.row_range(), None);
        let r = sel.range().unwrap();
        assert_eq!((r.start_row, r.end_row), (0, 99));
    }

    #[test]
    fn test_cell_span_top_to_bottom_is_full_column() {
        let mut sel = SelectionModel::new(5, 3);
        sel.set_anchor(0, 1);
        sel.set_focus(4, 1);
        assert!(sel.is_full_column());
        assert_eq!(sel.column_range(), Some((1, 1)));

        // Reversed corners do not meet the anchor-on-first-row rule
        sel.set_anchor(4, 1);
        sel.set_focus(0, 1);
        assert!(!sel.is_full_column());
    }

    #[test]
    fn test_whole_grid_is_one_kind_only() {
        let mut sel = SelectionModel::new(5, 3);
        sel.set_anchor(0, 0);
        sel.set_focus(4, 2);
        assert!(sel.is_full_column());
        assert!(!sel.is_full_row());

        sel.begin_rows(0);
        sel.extend_rows(4);
        assert!(sel.is_full_row());
        assert!(!sel.is_full_column());
    }

    #[test]
    fn test_highlight_clipped_to_visible() {
        let mut sel = SelectionModel::new(100, 26);
        sel.set_anchor(5, 0);
        sel.set_focus(30, 0);
        let visible = VisibleRange { start: 20, end: 40 };
        assert_eq!(sel.rows_highlighted(visible), Some(VisibleRange { start: 20, end: 30 }));
        assert_eq!(sel.rows_highlighted(VisibleRange { start: 31, end: 40 }), None);
    }

    #[test]
    fn test_clamp_keeps_full_rows_full() {
        let mut sel = SelectionModel::new(10, 10);
        sel.begin_rows(9);
        sel.clamp_to(5, 12);
        let r = sel.range().unwrap();
        assert_eq!((r.start_row, r.end_row), (4, 4));
        assert_eq!((r.start_col, r.end_col), (0, 11));
        assert!(sel.is_full_row());
        assert_eq!(sel.bounds(), (5, 12));
    }

    #[test]
    fn test_statistics_ignores_text() {
        let mut store = CellStore::new();
        store.set(0, 0, "10", None);
        store.set(0, 1, "20", None);
        store.set(1, 0, "abc", None);
        store.set(1, 1, "", None);

        let mut sel = SelectionModel::new(100, 26);
        sel.set_anchor(0, 0);
        sel.set_focus(1, 1);
        let stats = sel.compute_statistics(&store);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.sum, 30.0);
        assert_eq!(stats.average, 15.0);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 20.0);
    }

    #[test]
    fn test_statistics_sparse_scan_matches() {
        let mut store = CellStore::new();
        store.set(10, 3, "-2.5", None);
        store.set(99_000, 3, "4.5", None);
        store.set(5, 4, "100", None);

        let mut sel = SelectionModel::new(100_000, 26);
        sel.begin_columns(3);
        let stats = sel.compute_statistics(&store);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.sum, 2.0);
        assert_eq!(stats.min, -2.5);
        assert_eq!(stats.max, 4.5);
    }

    #[test]
    fn test_statistics_empty() {
        let sel = SelectionModel::new(100, 26);
        assert_eq!(sel.compute_statistics(&CellStore::new()), SelectionStats::default());
    }
}
