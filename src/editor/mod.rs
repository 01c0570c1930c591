//! Inline cell editing.
//!
//! An [`EditSession`] binds the edit surface to one cell (the edit cursor).
//! The session is owned by [`Grid`](crate::grid::Grid) and only the cell
//! handler and the keyboard path change it; the renderer and the surface
//! positioning read it by reference.

#[cfg(target_arch = "wasm32")]
mod input;
pub(crate) mod mutation;

#[cfg(target_arch = "wasm32")]
pub(crate) use input::InputOverlay;

pub use mutation::{apply_commit, CommitOutcome};

use serde::Serialize;

use crate::types::CellPos;

/// Whether the edit surface has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EditMode {
    /// Shown over the cell but not focused; the first typed character
    /// replaces the content.
    Blurred,
    /// Focused for in-place editing of the existing content.
    Focused,
}

/// The edit cursor plus the surface's current text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    cell: CellPos,
    buffer: String,
    mode: EditMode,
    overwrite_on_type: bool,
    dirty: bool,
    visible: bool,
}

impl EditSession {
    /// Open an unfocused surface pre-filled with `current`.
    pub fn blurred(cell: CellPos, current: &str) -> Self {
        Self {
            cell,
            buffer: current.to_string(),
            mode: EditMode::Blurred,
            overwrite_on_type: true,
            dirty: false,
            visible: true,
        }
    }

    /// Open a focused surface that keeps `current` for cursor editing.
    pub fn focused(cell: CellPos, current: &str) -> Self {
        Self {
            mode: EditMode::Focused,
            overwrite_on_type: false,
            ..Self::blurred(cell, current)
        }
    }

    pub fn cell(&self) -> CellPos {
        self.cell
    }

    pub fn value(&self) -> &str {
        &self.buffer
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn is_focused(&self) -> bool {
        self.mode == EditMode::Focused
    }

    /// True once the text differs from what the cell held when the session opened.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Hidden while a drag suspends single-cell editing.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn focus(&mut self) {
        self.mode = EditMode::Focused;
    }

    /// Feed one typed character.
    ///
    /// On a blurred surface the first keystroke focuses it and discards the
    /// previous content.
    pub fn type_char(&mut self, ch: char) {
        self.focus();
        if self.overwrite_on_type {
            self.buffer.clear();
            self.overwrite_on_type = false;
        }
        self.buffer.push(ch);
        self.dirty = true;
        self.visible = true;
    }

    /// Replace the text wholesale, as reported by the host's input element.
    pub fn set_value(&mut self, text: &str) {
        if self.buffer != text {
            self.buffer.clear();
            self.buffer.push_str(text);
            self.dirty = true;
        }
        self.overwrite_on_type = false;
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
    fn test_blurred_overwrites_on_first_key() {
        let mut s = EditSession::blurred(CellPos::new(1, 1), "old");
        assert_eq!(s.mode(), EditMode::Blurred);
        assert_eq!(s.value(), "old");
        assert!(!s.is_dirty());

        s.type_char('n');
        s.type_char('e');
        assert_eq!(s.value(), "ne");
        assert!(s.is_focused());
        assert!(s.is_dirty());
    }

    #[test]
    fn test_focused_appends() {
        let mut s = EditSession::focused(CellPos::new(0, 0), "ab");
        s.type_char('c');
        assert_eq!(s.value(), "abc");
    }

    #[test]
    fn test_set_value_same_text_is_clean() {
        let mut s = EditSession::blurred(CellPos::new(0, 0), "x");
        s.set_value("x");
        assert!(!s.is_dirty());
        s.set_value("y");
        assert!(s.is_dirty());
        // Host-provided text disables overwrite
        s.type_char('z');
        assert_eq!(s.value(), "yz");
    }
}
