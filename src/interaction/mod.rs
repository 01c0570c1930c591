//! Pointer and keyboard routing.
//!
//! Handlers are registered in priority order. A pointer press captures the
//! first handler whose hit test matches, and every later event of that
//! gesture goes to it until release, whatever zone the pointer crosses.

pub mod autoscroll;
mod cell;
mod header;
mod resize;

use crate::grid::Grid;

pub use autoscroll::{AutoScroll, FrameOutcome};
pub use cell::CellHandler;
pub use header::SelectHandler;
pub use resize::ResizeHandler;

/// What the pointer was over when the host saw the event.
///
/// The host reports scrollbar presses itself; handlers only react to `Grid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerTarget {
    #[default]
    Grid,
    Scrollbar,
    Outside,
}

/// A pointer event in container-relative pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    /// Event timestamp in milliseconds, used for double-click detection
    pub time_ms: f64,
    pub target: PointerTarget,
}

impl PointerEvent {
    pub fn new(x: f64, y: f64, time_ms: f64) -> Self {
        Self {
            x,
            y,
            time_ms,
            target: PointerTarget::Grid,
        }
    }

    pub fn with_target(self, target: PointerTarget) -> Self {
        Self { target, ..self }
    }

    pub fn on_grid(&self) -> bool {
        self.target == PointerTarget::Grid
    }
}

/// Pointer cursor the host should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Cell,
    ColResize,
    RowResize,
}

impl Cursor {
    /// CSS `cursor` value.
    pub fn as_css(self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Cell => "cell",
            Cursor::ColResize => "col-resize",
            Cursor::RowResize => "row-resize",
        }
    }
}

/// Keys the grid reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Enter,
    Escape,
    Other,
}

impl KeyInput {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_key(key: &str) -> Self {
        match key {
            "ArrowUp" => KeyInput::ArrowUp,
            "ArrowDown" => KeyInput::ArrowDown,
            "ArrowLeft" => KeyInput::ArrowLeft,
            "ArrowRight" => KeyInput::ArrowRight,
            "Enter" => KeyInput::Enter,
            "Escape" | "Esc" => KeyInput::Escape,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if !c.is_control() => KeyInput::Char(c),
                    _ => KeyInput::Other,
                }
            }
        }
    }

    /// Row/column step for navigation keys. Enter moves down.
    pub fn direction(self) -> Option<(i8, i8)> {
        match self {
            KeyInput::ArrowUp => Some((-1, 0)),
            KeyInput::ArrowDown | KeyInput::Enter => Some((1, 0)),
            KeyInput::ArrowLeft => Some((0, -1)),
            KeyInput::ArrowRight => Some((0, 1)),
            KeyInput::Char(_) | KeyInput::Escape | KeyInput::Other => None,
        }
    }
}

/// One pointer gesture recognizer.
///
/// Only `hit_test` is required; the event callbacks default to doing nothing.
pub trait InteractionHandler {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// Whether this handler wants a gesture starting at `ev`. Must not mutate.
    fn hit_test(&self, grid: &Grid, ev: &PointerEvent) -> bool;

    /// Cursor to show while hovering a point this handler hit-tests true for.
    fn cursor(&self) -> Cursor {
        Cursor::Default
    }

    fn on_pointer_down(&mut self, _grid: &mut Grid, _ev: &PointerEvent) {}

    fn on_pointer_move(&mut self, _grid: &mut Grid, _ev: &PointerEvent) {}

    fn on_pointer_up(&mut self, _grid: &mut Grid, _ev: &PointerEvent) {}

    /// Handle a key press. Returns true if the key was consumed.
    fn on_key_down(&mut self, _grid: &mut Grid, _key: KeyInput) -> bool {
        false
    }
}

/// First-match router with pointer capture.
#[derive(Default)]
pub struct Dispatcher {
    handlers: Vec<Box<dyn InteractionHandler>>,
    captured: Option<usize>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// The grid's handler set: resize edges win over header selection, and
    /// both win over the cell area.
    pub fn with_default_handlers() -> Self {
        let mut d = Self::new();
        d.register(Box::new(ResizeHandler::columns()));
        d.register(Box::new(ResizeHandler::rows()));
        d.register(Box::new(SelectHandler::columns()));
        d.register(Box::new(SelectHandler::rows()));
        d.register(Box::new(CellHandler::new()));
        d
    }

    /// Append a handler; earlier registrations take priority.
    pub fn register(&mut self, handler: Box<dyn InteractionHandler>) {
        self.handlers.push(handler);
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Name of the handler owning the current gesture.
    pub fn captured(&self) -> Option<&'static str> {
        self.captured
            .and_then(|i| self.handlers.get(i))
            .map(|h| h.name())
    }

    /// Route a press. Returns true if some handler took it.
    pub fn pointer_down(&mut self, grid: &mut Grid, ev: &PointerEvent) -> bool {
        if self.captured.is_none() {
            self.captured = self.handlers.iter().position(|h| h.hit_test(grid, ev));
            if let Some(name) = self.captured() {
                log::debug!("pointer captured by {name}");
            }
        }
        match self.captured.and_then(|i| self.handlers.get_mut(i)) {
            Some(handler) => {
                handler.on_pointer_down(grid, ev);
                true
            }
            None => false,
        }
    }

    /// Route a move to the captured handler.
    ///
    /// With nothing captured the move only resolves the hover cursor.
    pub fn pointer_move(&mut self, grid: &mut Grid, ev: &PointerEvent) -> Cursor {
        if let Some(handler) = self.captured.and_then(|i| self.handlers.get_mut(i)) {
            handler.on_pointer_move(grid, ev);
            return handler.cursor();
        }
        self.hover_cursor(grid, ev)
    }

    /// Route a release to the captured handler, then release capture.
    pub fn pointer_up(&mut self, grid: &mut Grid, ev: &PointerEvent) {
        if let Some(handler) = self.captured.and_then(|i| self.handlers.get_mut(i)) {
            handler.on_pointer_up(grid, ev);
        }
        if let Some(name) = self.captured() {
            log::debug!("pointer released by {name}");
        }
        self.captured = None;
    }

    /// Cursor of the first handler matching `ev`, without capturing.
    pub fn hover_cursor(&self, grid: &Grid, ev: &PointerEvent) -> Cursor {
        self.handlers
            .iter()
            .find(|h| h.hit_test(grid, ev))
            .map_or(Cursor::Default, |h| h.cursor())
    }

    /// Offer a key to each handler in order until one consumes it.
    pub fn key_down(&mut self, grid: &mut Grid, key: KeyInput) -> bool {
        self.handlers.iter_mut().any(|h| h.on_key_down(grid, key))
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field(
                "handlers",
                &self.handlers.iter().map(|h| h.name()).collect::<Vec<_>>(),
            )
            .field("captured", &self.captured())
            .finish()
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
    fn test_key_mapping() {
        assert_eq!(KeyInput::from_key("a"), KeyInput::Char('a'));
        assert_eq!(KeyInput::from_key("é"), KeyInput::Char('é'));
        assert_eq!(KeyInput::from_key("Enter"), KeyInput::Enter);
        assert_eq!(KeyInput::from_key("Shift"), KeyInput::Other);
        assert_eq!(KeyInput::Enter.direction(), KeyInput::ArrowDown.direction());
        assert_eq!(KeyInput::ArrowLeft.direction(), Some((0, -1)));
    }

    #[test]
    fn test_cursor_css() {
        assert_eq!(Cursor::ColResize.as_css(), "col-resize");
        assert_eq!(Cursor::default().as_css(), "default");
    }
}
