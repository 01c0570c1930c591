//! Render scheduling and renderer-facing geometry.
//!
//! This module provides:
//! - A coalescing render-request scheduler (one frame per burst of changes)
//! - Selection overlay geometry
//! - A per-frame snapshot the external renderer draws from

mod frame;
pub mod selection;

pub use frame::{EditOverlay, FrameSnapshot, Segment, VisibleCell};
pub use selection::{selection_rect, SelectionRect};

/// Coalesces render requests into at most one pending frame.
///
/// The hook fires only when the scheduler goes from idle to pending; the host
/// uses it to schedule a next-frame callback, which calls [`begin_frame`].
///
/// [`begin_frame`]: RenderScheduler::begin_frame
pub struct RenderScheduler {
    pending: bool,
    hook: Box<dyn FnMut()>,
}

impl RenderScheduler {
    pub fn new(hook: Box<dyn FnMut()>) -> Self {
        Self {
            pending: false,
            hook,
        }
    }

    /// A scheduler whose hook does nothing; frames are polled instead.
    pub fn detached() -> Self {
        Self::new(Box::new(|| {}))
    }

    /// Ask for a frame. Returns true if this call scheduled one.
    pub fn request(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        (self.hook)();
        true
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Start a frame. Returns whether a render was requested since the last one.
    pub fn begin_frame(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

impl std::fmt::Debug for RenderScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderScheduler")
            .field("pending", &self.pending)
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

    #[test]
    fn requests_coalesce_until_frame() {
        let fired = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&fired);
        let mut sched = RenderScheduler::new(Box::new(move || counter.set(counter.get() + 1)));

        assert!(sched.request());
        assert!(!sched.request());
        assert!(!sched.request());
        assert_eq!(fired.get(), 1);

        assert!(sched.begin_frame());
        assert!(!sched.begin_frame());

        assert!(sched.request());
        assert_eq!(fired.get(), 2);
    }
}
