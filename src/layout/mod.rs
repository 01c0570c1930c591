//! Layout engine for segment positions and viewport management.
//!
//! This module handles:
//! - Prefix-sum positions over resizable rows and columns
//! - Binary search for the segment at a coordinate
//! - Viewport state (scroll position, visible range, coordinate conversion)

mod axis;
mod viewport;

pub use axis::{Axis, AxisHit};
pub use viewport::{
    visible_range, Rect, VisibleRange, VisibleWindow, Viewport, Zone, VISIBLE_PADDING,
};
