//! A non-uniform axis of rows or columns.
//!
//! Sizes are stored per segment and a prefix-sum array of positions is kept
//! alongside, enabling O(log n) point lookup by binary search.

use crate::error::{GridError, Result};
use crate::types::AxisKind;

/// Result of looking up which segment covers a coordinate.
///
/// Only `Inside` carries a usable index. Coordinates before the first
/// segment or at/after the end of the last one map to `Before`/`After`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisHit {
    Before,
    Inside(u32),
    After,
}

impl AxisHit {
    /// The segment index, if the coordinate fell inside the axis.
    pub fn index(self) -> Option<u32> {
        match self {
            AxisHit::Inside(i) => Some(i),
            AxisHit::Before | AxisHit::After => None,
        }
    }

    /// Map out-of-range hits onto the first/last segment of an axis with `len` segments.
    ///
    /// Used to keep a drag tracking once the pointer leaves the grid.
    pub fn clamp(self, len: u32) -> u32 {
        match self {
            AxisHit::Before => 0,
            AxisHit::Inside(i) => i.min(len.saturating_sub(1)),
            AxisHit::After => len.saturating_sub(1),
        }
    }
}

/// Segment sizes along one axis plus their cumulative positions.
#[derive(Debug, Clone)]
pub struct Axis {
    kind: AxisKind,
    /// Size of each segment (always >= `min_size`)
    sizes: Vec<f64>,
    /// Cumulative positions (`positions[i]` = start of segment i, `positions[len]` = total extent)
    positions: Vec<f64>,
    min_size: f64,
}

impl Axis {
    /// Create an axis of `count` equal segments.
    pub fn new(kind: AxisKind, count: u32, default_size: f64, min_size: f64) -> Self {
        let size = default_size.max(min_size);
        let sizes = vec![size; count as usize];
        let mut axis = Self {
            kind,
            positions: Vec::with_capacity(sizes.len() + 1),
            sizes,
            min_size,
        };
        axis.recompute_positions_from(0);
        axis
    }

    pub fn kind(&self) -> AxisKind {
        self.kind
    }

    /// Number of segments.
    pub fn len(&self) -> u32 {
        u32::try_from(self.sizes.len()).unwrap_or(u32::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn min_size(&self) -> f64 {
        self.min_size
    }

    /// Start offset of segment `index`; `index == len()` gives the end of the axis.
    pub fn position(&self, index: u32) -> Option<f64> {
        self.positions.get(index as usize).copied()
    }

    /// Current size of segment `index`.
    pub fn size(&self, index: u32) -> Option<f64> {
        self.sizes.get(index as usize).copied()
    }

    /// Sum of all segment sizes.
    pub fn total_extent(&self) -> f64 {
        self.positions.last().copied().unwrap_or(0.0)
    }

    pub fn sizes(&self) -> &[f64] {
        &self.sizes
    }

    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    /// Find the segment whose `[start, end)` interval contains `coord` (binary search).
    pub fn find_index_at(&self, coord: f64) -> AxisHit {
        if coord.is_nan() || coord < 0.0 || self.sizes.is_empty() {
            return AxisHit::Before;
        }
        if coord >= self.total_extent() {
            return AxisHit::After;
        }
        // First position strictly greater than coord, minus one
        let upper = self.positions.partition_point(|&pos| pos <= coord);
        match u32::try_from(upper.saturating_sub(1)) {
            Ok(i) => AxisHit::Inside(i),
            Err(_) => AxisHit::After,
        }
    }

    /// Resize segment `index`, flooring the size at the axis minimum.
    ///
    /// Returns the size actually applied.
    ///
    /// # Errors
    /// Returns [`GridError::IndexOutOfRange`] if `index` is not a segment.
    pub fn resize(&mut self, index: u32, new_size: f64) -> Result<f64> {
        let applied = self.clamp_size(new_size);
        let Some(size) = self.sizes.get_mut(index as usize) else {
            return Err(self.out_of_range(index));
        };
        *size = applied;
        self.recompute_positions_from(index as usize);
        Ok(applied)
    }

    /// Insert a segment at `index` (0..=len), shifting later segments up by one.
    ///
    /// # Errors
    /// Returns [`GridError::IndexOutOfRange`] if `index > len()`.
    pub fn insert_at(&mut self, index: u32, size: f64) -> Result<()> {
        self.check_insert(index)?;
        let at = index as usize;
        let size = self.clamp_size(size);
        self.sizes.insert(at, size);
        self.recompute_positions_from(at);
        Ok(())
    }

    /// Remove segment `index`, shifting later segments down by one.
    ///
    /// # Errors
    /// Returns [`GridError::LastSegment`] if only one segment remains, or
    /// [`GridError::IndexOutOfRange`] if `index` is not a segment. The axis is
    /// unchanged on error.
    pub fn delete_at(&mut self, index: u32) -> Result<()> {
        self.check_delete(index)?;
        let at = index as usize;
        self.sizes.remove(at);
        self.recompute_positions_from(at);
        Ok(())
    }

    /// Whether [`insert_at`](Self::insert_at) would accept `index`.
    ///
    /// # Errors
    /// The error `insert_at` would return.
    pub fn check_insert(&self, index: u32) -> Result<()> {
        if index > self.len() || self.len() == u32::MAX {
            return Err(self.out_of_range(index));
        }
        Ok(())
    }

    /// Whether [`delete_at`](Self::delete_at) would accept `index`.
    ///
    /// # Errors
    /// The error `delete_at` would return.
    pub fn check_delete(&self, index: u32) -> Result<()> {
        if index >= self.len() {
            return Err(self.out_of_range(index));
        }
        if self.len() <= 1 {
            return Err(GridError::LastSegment { axis: self.kind });
        }
        Ok(())
    }

    fn clamp_size(&self, size: f64) -> f64 {
        if size.is_nan() {
            self.min_size
        } else {
            size.max(self.min_size)
        }
    }

    fn out_of_range(&self, index: u32) -> GridError {
        GridError::IndexOutOfRange {
            axis: self.kind,
            index,
            len: self.len(),
        }
    }

    /// Rebuild `positions[from..=len]` from the sizes.
    fn recompute_positions_from(&mut self, from: usize) {
        let len = self.sizes.len();
        self.positions.resize(len + 1, 0.0);
        let from = from.min(len);
        let mut pos = if from == 0 {
            0.0
        } else {
            self.positions.get(from).copied().unwrap_or(0.0)
        };
        for (slot, size) in self
            .positions
            .iter_mut()
            .skip(from)
            .zip(self.sizes.iter().skip(from).map(Some).chain(std::iter::once(None)))
        {
            *slot = pos;
            if let Some(size) = size {
                pos += size;
            }
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

    fn cols(n: u32) -> Axis {
        Axis::new(AxisKind::Columns, n, 100.0, 20.0)
    }

    #[test]
    fn test_basic_axis() {
        let axis = cols(5);
        assert_eq!(axis.len(), 5);
        assert_eq!(axis.total_extent(), 500.0);
        assert_eq!(axis.positions(), &[0.0, 100.0, 200.0, 300.0, 400.0, 500.0]);
        assert_eq!(axis.position(5), Some(500.0));
        assert_eq!(axis.position(6), None);
        assert_eq!(axis.size(4), Some(100.0));
        assert_eq!(axis.size(5), None);
    }

    #[test]
    fn test_find_index_at() {
        let axis = cols(5);
        assert_eq!(axis.find_index_at(0.0), AxisHit::Inside(0));
        assert_eq!(axis.find_index_at(99.9), AxisHit::Inside(0));
        assert_eq!(axis.find_index_at(100.0), AxisHit::Inside(1));
        assert_eq!(axis.find_index_at(499.0), AxisHit::Inside(4));
        assert_eq!(axis.find_index_at(500.0), AxisHit::After);
        assert_eq!(axis.find_index_at(-0.5), AxisHit::Before);
        assert_eq!(axis.find_index_at(f64::NAN), AxisHit::Before);
    }

    #[test]
    fn test_resize_recomputes_downstream() {
        let mut axis = cols(4);
        assert_eq!(axis.resize(1, 150.0).unwrap(), 150.0);
        assert_eq!(axis.positions(), &[0.0, 100.0, 250.0, 350.0, 450.0]);
        assert_eq!(axis.find_index_at(240.0), AxisHit::Inside(1));
    }

    #[test]
    fn test_resize_clamps_to_minimum() {
        let mut axis = cols(3);
        assert_eq!(axis.resize(0, 5.0).unwrap(), 20.0);
        assert_eq!(axis.size(0), Some(20.0));
        assert!(axis.resize(3, 50.0).is_err());
    }

    #[test]
    fn test_insert_and_delete() {
        let mut axis = cols(3);
        axis.insert_at(1, 40.0).unwrap();
        assert_eq!(axis.sizes(), &[100.0, 40.0, 100.0, 100.0]);
        assert_eq!(axis.total_extent(), 340.0);
        axis.insert_at(4, 30.0).unwrap();
        assert_eq!(axis.len(), 5);
        assert!(axis.insert_at(6, 30.0).is_err());

        axis.delete_at(4).unwrap();
        axis.delete_at(1).unwrap();
        assert_eq!(axis.sizes(), &[100.0, 100.0, 100.0]);
        assert_eq!(axis.positions(), &[0.0, 100.0, 200.0, 300.0]);
    }

    #[test]
    fn test_delete_refuses_last_segment() {
        let mut axis = cols(1);
        let err = axis.delete_at(0).unwrap_err();
        assert!(matches!(err, GridError::LastSegment { axis: AxisKind::Columns }));
        assert_eq!(axis.len(), 1);
        assert_eq!(axis.total_extent(), 100.0);
    }
}
