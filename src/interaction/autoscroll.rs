//! Drag autoscroll.
//!
//! While a cell drag holds the pointer near (or past) an edge of the cell
//! area, every animation frame scrolls toward that edge and extends the
//! selection to the cell now under the pointer. The loop keeps running until
//! [`AutoScroll::cancel`] is called on pointer-up or Escape.

use crate::grid::Grid;
use crate::layout::Rect;

/// Per-frame scroll velocity, armed by pointer position during a drag.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AutoScroll {
    velocity: Option<(f64, f64)>,
    pointer: (f64, f64),
}

/// Result of one animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameOutcome {
    /// The viewport moved this frame
    pub scrolled: bool,
    /// Another frame should be scheduled
    pub keep_running: bool,
}

impl AutoScroll {
    pub fn is_active(&self) -> bool {
        self.velocity.is_some()
    }

    /// Pixels per frame along x and y.
    pub fn velocity(&self) -> Option<(f64, f64)> {
        self.velocity
    }

    /// Re-evaluate against the pointer's container position.
    ///
    /// Speed ramps linearly from 1px at `edge` pixels inside `area` up to
    /// `max_step` at the boundary and beyond. Returns true when this call
    /// armed a loop that was not running.
    pub fn track(&mut self, x: f64, y: f64, area: Rect, edge: f64, max_step: f64) -> bool {
        let was_active = self.is_active();
        self.pointer = (x, y);
        let dx = edge_speed(x, area.x, area.right(), edge, max_step);
        let dy = edge_speed(y, area.y, area.bottom(), edge, max_step);
        self.velocity = match (dx, dy) {
            (None, None) => None,
            (dx, dy) => Some((dx.unwrap_or(0.0), dy.unwrap_or(0.0))),
        };
        if !was_active && self.is_active() {
            log::debug!("autoscroll armed at ({x}, {y})");
            true
        } else {
            false
        }
    }

    /// Stop the loop. The next frame reports `keep_running: false`.
    pub fn cancel(&mut self) {
        if self.velocity.take().is_some() {
            log::debug!("autoscroll cancelled");
        }
    }
}

fn edge_speed(p: f64, lo: f64, hi: f64, edge: f64, max_step: f64) -> Option<f64> {
    if edge <= 0.0 || max_step <= 0.0 {
        return None;
    }
    let ramp = |depth: f64| (max_step * depth / edge).clamp(1.0, max_step);
    if p < lo + edge {
        Some(-ramp(lo + edge - p))
    } else if p > hi - edge {
        Some(ramp(p - (hi - edge)))
    } else {
        None
    }
}

/// Advance the autoscroll loop by one frame.
pub fn run_frame(grid: &mut Grid) -> FrameOutcome {
    let Some((dx, dy)) = grid.autoscroll.velocity() else {
        return FrameOutcome::default();
    };
    let (ax, ay) = grid.scroll_by(dx, dy);
    let scrolled = ax.abs() > 0.0 || ay.abs() > 0.0;
    if scrolled {
        let (px, py) = grid.autoscroll.pointer;
        let cell = grid.cell_at_clamped(px, py);
        grid.selection.set_focus(cell.row, cell.col);
        grid.request_render();
    }
    FrameOutcome {
        scrolled,
        keep_running: true,
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

    const AREA: Rect = Rect {
        x: 50.0,
        y: 25.0,
        width: 500.0,
        height: 250.0,
    };

    #[test]
    fn test_idle_in_middle() {
        let mut a = AutoScroll::default();
        assert!(!a.track(300.0, 150.0, AREA, 24.0, 20.0));
        assert!(!a.is_active());
    }

    #[test]
    fn test_ramps_toward_edges() {
        let mut a = AutoScroll::default();
        assert!(a.track(548.0, 150.0, AREA, 24.0, 20.0));
        let (dx, dy) = a.velocity().unwrap();
        assert!(dx > 0.0 && dx < 20.0);
        assert_eq!(dy, 0.0);

        // Already running: not re-armed
        assert!(!a.track(700.0, 0.0, AREA, 24.0, 20.0));
        assert_eq!(a.velocity(), Some((20.0, -20.0)));

        a.cancel();
        assert!(!a.is_active());
    }
}
