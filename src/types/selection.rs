use serde::Serialize;

/// A logical cell coordinate (0-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CellPos {
    pub row: u32,
    pub col: u32,
}

impl CellPos {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl From<(u32, u32)> for CellPos {
    fn from((row, col): (u32, u32)) -> Self {
        Self { row, col }
    }
}

/// A rectangular range of cells, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRange {
    pub start_row: u32,
    pub start_col: u32,
    pub end_row: u32,
    pub end_col: u32,
}

impl CellRange {
    /// Create a new range from two corners, normalizing so start <= end.
    pub fn new(a: CellPos, b: CellPos) -> Self {
        Self {
            start_row: a.row.min(b.row),
            start_col: a.col.min(b.col),
            end_row: a.row.max(b.row),
            end_col: a.col.max(b.col),
        }
    }

    /// Create a single-cell range.
    pub fn single(pos: CellPos) -> Self {
        Self::new(pos, pos)
    }

    /// Check if this range contains a cell.
    pub fn contains(&self, row: u32, col: u32) -> bool {
        row >= self.start_row && row <= self.end_row && col >= self.start_col && col <= self.end_col
    }

    pub fn row_count(&self) -> u64 {
        u64::from(self.end_row - self.start_row) + 1
    }

    pub fn col_count(&self) -> u64 {
        u64::from(self.end_col - self.start_col) + 1
    }

    /// Number of cells in this range.
    pub fn cell_count(&self) -> u64 {
        self.row_count() * self.col_count()
    }

    /// Iterate over all cells in this range (row-major order).
    pub fn cells(&self) -> impl Iterator<Item = CellPos> {
        let (start_col, end_col) = (self.start_col, self.end_col);
        (self.start_row..=self.end_row)
            .flat_map(move |row| (start_col..=end_col).map(move |col| CellPos { row, col }))
    }

    pub fn is_single(&self) -> bool {
        self.start_row == self.end_row && self.start_col == self.end_col
    }
}

/// Aggregates over the numeric cells of a selection.
///
/// `count` is the number of numeric cells; non-numeric and empty cells are
/// excluded from every field. `average`, `min` and `max` are 0 when no cell
/// is numeric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SelectionStats {
    pub count: u64,
    pub sum: f64,
    pub average: f64,
    pub min: f64,
    pub max: f64,
}
