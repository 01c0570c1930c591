//! Cell editing mutations.
//!
//! Applies a finished edit session to the cell store.

use super::EditSession;
use crate::store::CellStore;
use crate::types::CellStyle;

/// What a commit did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The session was never modified; the store is untouched.
    Unchanged,
    /// The trimmed value was written.
    Written,
    /// The trimmed value was empty: the value is gone, and so is the cell
    /// unless it carries bold/italic.
    Cleared,
}

/// Apply a session to the store.
///
/// - Unmodified session: nothing is written
/// - Empty after trimming: a plain cell is removed; a styled cell keeps its
///   flags with an empty value
/// - Otherwise: the trimmed text replaces the value, keeping bold/italic
pub fn apply_commit(store: &mut CellStore, session: &EditSession) -> CommitOutcome {
    if !session.is_dirty() {
        return CommitOutcome::Unchanged;
    }
    let pos = session.cell();
    let trimmed = session.value().trim();

    if trimmed.is_empty() {
        let styled = store
            .get(pos.row, pos.col)
            .is_some_and(|cell| cell.style != CellStyle::PLAIN);
        if styled {
            store.set_value(pos.row, pos.col, "");
        } else {
            store.remove(pos.row, pos.col);
        }
        return CommitOutcome::Cleared;
    }

    store.set_value(pos.row, pos.col, trimmed);
    CommitOutcome::Written
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
    use crate::types::CellPos;

    #[test]
    fn test_commit_trims_and_keeps_style() {
        let mut store = CellStore::new();
        store.set(2, 2, "old", Some(CellStyle::italic()));
        let mut s = EditSession::focused(CellPos::new(2, 2), "old");
        s.set_value("  new value \t");

        assert_eq!(apply_commit(&mut store, &s), CommitOutcome::Written);
        let cell = store.get(2, 2).unwrap();
        assert_eq!(cell.value, "new value");
        assert!(cell.style.italic);
    }

    #[test]
    fn test_commit_empty_removes() {
        let mut store = CellStore::new();
        store.set(0, 1, "x", None);
        let mut s = EditSession::blurred(CellPos::new(0, 1), "x");
        s.set_value("   ");
        assert_eq!(apply_commit(&mut store, &s), CommitOutcome::Cleared);
        assert!(store.get(0, 1).is_none());
    }

    #[test]
    fn test_commit_empty_keeps_style_flags() {
        let mut store = CellStore::new();
        store.set(3, 0, "title", Some(CellStyle::bold()));
        let mut s = EditSession::focused(CellPos::new(3, 0), "title");
        s.set_value("");
        assert_eq!(apply_commit(&mut store, &s), CommitOutcome::Cleared);
        let cell = store.get(3, 0).unwrap();
        assert_eq!(cell.value, "");
        assert!(cell.style.bold);
    }

    #[test]
    fn test_untouched_session_writes_nothing() {
        let mut store = CellStore::new();
        let s = EditSession::blurred(CellPos::new(4, 4), "");
        assert_eq!(apply_commit(&mut store, &s), CommitOutcome::Unchanged);
        assert!(store.is_empty());
    }
}
