//! Grid configuration.
//!
//! Every tunable the grid uses lives here. The JS host may pass a partial
//! object; missing fields fall back to [`GridConfig::default`].

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Default number of rows in a new grid.
pub const DEFAULT_TOTAL_ROWS: u32 = 100_000;

/// Default number of columns in a new grid.
pub const DEFAULT_TOTAL_COLS: u32 = 500;

/// Default column width in pixels.
pub const DEFAULT_COL_WIDTH: f64 = 100.0;

/// Default row height in pixels.
pub const DEFAULT_ROW_HEIGHT: f64 = 25.0;

/// Smallest size a row or column can be resized to.
pub const MIN_SEGMENT_SIZE: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    pub total_rows: u32,
    pub total_cols: u32,
    pub default_row_height: f64,
    pub default_col_width: f64,
    /// Height of the column header strip.
    pub header_height: f64,
    /// Width of the row index strip.
    pub index_width: f64,
    pub min_segment_size: f64,
    /// Distance from a boundary (px) within which a header press resizes.
    pub resize_edge_threshold: f64,
    /// Pointer displacement (px) that turns a press into a drag.
    pub drag_threshold: f64,
    /// Max gap between two presses on one cell that counts as a double click.
    pub double_click_ms: f64,
    /// Rows loaded synchronously before the remainder is deferred to idle time.
    pub sync_load_rows: usize,
    /// Rows processed between idle-deadline checks.
    pub idle_chunk_rows: usize,
    /// Distance from a viewport edge (px) that arms drag autoscroll.
    pub autoscroll_edge: f64,
    /// Scroll step per frame when the pointer is at (or past) the edge.
    pub autoscroll_max_step: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            total_rows: DEFAULT_TOTAL_ROWS,
            total_cols: DEFAULT_TOTAL_COLS,
            default_row_height: DEFAULT_ROW_HEIGHT,
            default_col_width: DEFAULT_COL_WIDTH,
            header_height: DEFAULT_ROW_HEIGHT,
            index_width: DEFAULT_COL_WIDTH / 2.0,
            min_segment_size: MIN_SEGMENT_SIZE,
            resize_edge_threshold: 3.0,
            drag_threshold: 3.0,
            double_click_ms: 300.0,
            sync_load_rows: 100,
            idle_chunk_rows: 500,
            autoscroll_edge: 24.0,
            autoscroll_max_step: 20.0,
        }
    }
}

impl GridConfig {
    /// Parse a (possibly partial) JSON object.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or the values fail [`validate`](Self::validate).
    pub fn from_json(text: &str) -> Result<Self> {
        let config: GridConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// A config with a custom grid size and every other field defaulted.
    pub fn with_size(total_rows: u32, total_cols: u32) -> Self {
        Self {
            total_rows,
            total_cols,
            ..Self::default()
        }
    }

    /// Check the invariants the axes rely on.
    ///
    /// # Errors
    /// Returns [`GridError::InvalidConfig`] describing the first violated rule.
    pub fn validate(&self) -> Result<()> {
        if self.total_rows == 0 || self.total_cols == 0 {
            return Err(GridError::InvalidConfig(
                "grid needs at least one row and one column".into(),
            ));
        }
        if self.min_segment_size.is_nan() || self.min_segment_size <= 0.0 {
            return Err(GridError::InvalidConfig(
                "minSegmentSize must be positive".into(),
            ));
        }
        if self.default_row_height < self.min_segment_size
            || self.default_col_width < self.min_segment_size
        {
            return Err(GridError::InvalidConfig(format!(
                "default sizes must be at least minSegmentSize ({})",
                self.min_segment_size
            )));
        }
        if self.header_height < 0.0 || self.index_width < 0.0 {
            return Err(GridError::InvalidConfig(
                "header strip sizes cannot be negative".into(),
            ));
        }
        if self.idle_chunk_rows == 0 {
            return Err(GridError::InvalidConfig(
                "idleChunkRows must be at least 1".into(),
            ));
        }
        Ok(())
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
    fn defaults_match_widget() {
        let c = GridConfig::default();
        assert_eq!(c.total_rows, 100_000);
        assert_eq!(c.total_cols, 500);
        assert_eq!(c.index_width, 50.0);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let c = GridConfig::from_json(r#"{"totalRows": 10, "defaultColWidth": 80}"#).unwrap();
        assert_eq!(c.total_rows, 10);
        assert_eq!(c.total_cols, DEFAULT_TOTAL_COLS);
        assert_eq!(c.default_col_width, 80.0);
    }

    #[test]
    fn rejects_empty_grid() {
        let err = GridConfig::from_json(r#"{"totalCols": 0}"#).unwrap_err();
        assert!(matches!(err, GridError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_default_below_minimum() {
        let c = GridConfig {
            default_row_height: 5.0,
            ..GridConfig::default()
        };
        assert!(c.validate().is_err());
    }
}
