//! Axis layout tests
//!
//! Tests for the prefix-sum bookkeeping behind row/column positions, point
//! lookup and the structural operations (resize, insert, delete).

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_lossless
)]

use gridview::error::GridError;
use gridview::layout::{Axis, AxisHit};
use gridview::types::AxisKind;
use test_case::test_case;

fn rows(count: u32) -> Axis {
    Axis::new(AxisKind::Rows, count, 25.0, 20.0)
}

/// positions[0] == 0 and positions[i+1] == positions[i] + sizes[i]
fn assert_prefix_sums(axis: &Axis) {
    let sizes = axis.sizes();
    let positions = axis.positions();
    assert_eq!(positions.len(), sizes.len() + 1);
    assert_eq!(positions[0], 0.0);
    for (i, size) in sizes.iter().enumerate() {
        assert!(
            (positions[i + 1] - (positions[i] + size)).abs() < 1e-9,
            "prefix sum broken at {i}"
        );
        assert!(*size >= axis.min_size());
    }
    assert!((axis.total_extent() - sizes.iter().sum::<f64>()).abs() < 1e-6);
}

#[test]
fn test_uniform_axis() {
    let axis = rows(100);
    assert_eq!(axis.len(), 100);
    assert_eq!(axis.total_extent(), 2500.0);
    assert_eq!(axis.position(4), Some(100.0));
    assert_eq!(axis.position(100), Some(2500.0));
    assert_eq!(axis.position(101), None);
    assert_prefix_sums(&axis);
}

#[test]
fn test_default_size_floored_at_minimum() {
    let axis = Axis::new(AxisKind::Columns, 3, 5.0, 20.0);
    assert_eq!(axis.size(0), Some(20.0));
    assert_eq!(axis.total_extent(), 60.0);
}

#[test_case(-0.1 => AxisHit::Before ; "negative coordinate")]
#[test_case(0.0 => AxisHit::Inside(0) ; "leading edge")]
#[test_case(24.999 => AxisHit::Inside(0) ; "just before boundary")]
#[test_case(25.0 => AxisHit::Inside(1) ; "boundary belongs to next segment")]
#[test_case(249.9 => AxisHit::Inside(9) ; "inside last segment")]
#[test_case(250.0 => AxisHit::After ; "total extent")]
#[test_case(1e9 => AxisHit::After ; "far past the end")]
#[test_case(f64::NAN => AxisHit::Before ; "nan")]
fn test_find_index_at(coord: f64) -> AxisHit {
    rows(10).find_index_at(coord)
}

#[test]
fn test_lookup_round_trip_on_mixed_sizes() {
    let mut axis = rows(200);
    for i in (0..200).step_by(7) {
        axis.resize(i, 20.0 + f64::from(i % 13) * 3.5).unwrap();
    }
    assert_prefix_sums(&axis);
    for i in 0..200 {
        let start = axis.position(i).unwrap();
        let size = axis.size(i).unwrap();
        assert_eq!(axis.find_index_at(start), AxisHit::Inside(i));
        assert_eq!(axis.find_index_at(start + size / 2.0), AxisHit::Inside(i));
        assert_eq!(axis.find_index_at(start + size - 1e-6), AxisHit::Inside(i));
    }
}

#[test]
fn test_resize_floors_and_shifts_later_positions() {
    let mut axis = rows(5);
    assert_eq!(axis.resize(1, 3.0).unwrap(), 20.0);
    assert_eq!(axis.resize(2, 70.0).unwrap(), 70.0);
    assert_eq!(axis.position(3), Some(25.0 + 20.0 + 70.0));
    assert_eq!(axis.total_extent(), 25.0 + 20.0 + 70.0 + 50.0);
    assert_prefix_sums(&axis);
}

#[test]
fn test_resize_out_of_range() {
    let mut axis = rows(5);
    let err = axis.resize(5, 40.0).unwrap_err();
    assert!(matches!(
        err,
        GridError::IndexOutOfRange {
            axis: AxisKind::Rows,
            index: 5,
            len: 5
        }
    ));
}

#[test]
fn test_insert_then_delete_restores_axis() {
    let mut axis = rows(50);
    axis.resize(10, 60.0).unwrap();
    axis.resize(30, 33.0).unwrap();
    let sizes_before = axis.sizes().to_vec();
    let positions_before = axis.positions().to_vec();

    for at in [0, 10, 29, 50] {
        axis.insert_at(at, 25.0).unwrap();
        assert_eq!(axis.len(), 51);
        assert_prefix_sums(&axis);
        axis.delete_at(at).unwrap();
        assert_eq!(axis.sizes(), sizes_before.as_slice());
        assert_eq!(axis.positions(), positions_before.as_slice());
    }
}

#[test]
fn test_insert_past_end_rejected() {
    let mut axis = rows(3);
    assert!(axis.insert_at(4, 25.0).is_err());
    assert_eq!(axis.len(), 3);
}

#[test]
fn test_cannot_delete_last_segment() {
    let mut axis = rows(2);
    axis.delete_at(0).unwrap();
    let err = axis.delete_at(0).unwrap_err();
    assert!(matches!(err, GridError::LastSegment { axis: AxisKind::Rows }));
    assert_eq!(axis.len(), 1);
    assert_prefix_sums(&axis);
}

#[test]
fn test_large_axis_lookup() {
    let axis = rows(100_000);
    assert_eq!(axis.total_extent(), 2_500_000.0);
    assert_eq!(axis.find_index_at(1_234_567.0), AxisHit::Inside(49_382));
    assert_eq!(axis.find_index_at(2_499_999.0), AxisHit::Inside(99_999));
}

#[test]
fn test_clamp_hits() {
    assert_eq!(AxisHit::Before.clamp(10), 0);
    assert_eq!(AxisHit::Inside(4).clamp(10), 4);
    assert_eq!(AxisHit::After.clamp(10), 9);
    assert_eq!(AxisHit::After.index(), None);
}
