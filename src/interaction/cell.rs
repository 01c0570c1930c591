//! Cell selection and inline editing.
//!
//! A press on a cell selects it and opens the edit surface over it. A second
//! press on the same cell within the double-click window opens the surface
//! focused instead. Moving past the drag threshold turns the press into a
//! range drag: the surface is hidden until release, and the viewport
//! autoscrolls while the pointer sits near an edge.

use super::{Cursor, InteractionHandler, KeyInput, PointerEvent};
use crate::editor::EditMode;
use crate::grid::Grid;
use crate::types::CellPos;

#[derive(Debug, Clone, Copy)]
struct Press {
    anchor: CellPos,
    origin: (f64, f64),
    double_click: bool,
    dragging: bool,
}

#[derive(Debug, Default)]
pub struct CellHandler {
    /// Cell and timestamp of the last single press, for double-click detection
    last_click: Option<(CellPos, f64)>,
    press: Option<Press>,
}

impl CellHandler {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_double_click(&self, grid: &Grid, cell: CellPos, time_ms: f64) -> bool {
        self.last_click.is_some_and(|(prev, at)| {
            let elapsed = time_ms - at;
            prev == cell && elapsed >= 0.0 && elapsed < grid.config().double_click_ms
        })
    }
}

impl InteractionHandler for CellHandler {
    fn name(&self) -> &'static str {
        "cell"
    }

    fn hit_test(&self, grid: &Grid, ev: &PointerEvent) -> bool {
        ev.on_grid() && grid.cell_at(ev.x, ev.y).is_some()
    }

    fn cursor(&self) -> Cursor {
        Cursor::Cell
    }

    fn on_pointer_down(&mut self, grid: &mut Grid, ev: &PointerEvent) {
        let Some(cell) = grid.cell_at(ev.x, ev.y) else {
            return;
        };
        let double_click = self.is_double_click(grid, cell, ev.time_ms);

        grid.selection.set_anchor(cell.row, cell.col);
        if double_click {
            grid.begin_edit(cell, EditMode::Focused);
            self.last_click = None;
        } else {
            grid.begin_edit(cell, EditMode::Blurred);
            self.last_click = Some((cell, ev.time_ms));
        }
        self.press = Some(Press {
            anchor: cell,
            origin: (ev.x, ev.y),
            double_click,
            dragging: false,
        });
        grid.request_render();
    }

    fn on_pointer_move(&mut self, grid: &mut Grid, ev: &PointerEvent) {
        let Some(press) = self.press.as_mut() else {
            return;
        };
        if !press.dragging {
            let threshold = grid.config().drag_threshold;
            let (ox, oy) = press.origin;
            if (ev.x - ox).abs() <= threshold && (ev.y - oy).abs() <= threshold {
                return;
            }
            press.dragging = true;
            if let Some(session) = grid.editing.as_mut() {
                session.hide();
            }
        }

        let focus = grid.cell_at_clamped(ev.x, ev.y);
        grid.selection.set_focus(focus.row, focus.col);

        let area = grid.viewport.cells_rect();
        let (edge, max_step) = (grid.config().autoscroll_edge, grid.config().autoscroll_max_step);
        grid.autoscroll.track(ev.x, ev.y, area, edge, max_step);
        grid.request_render();
    }

    fn on_pointer_up(&mut self, grid: &mut Grid, _ev: &PointerEvent) {
        grid.autoscroll.cancel();
        let Some(press) = self.press.take() else {
            return;
        };
        if press.dragging {
            self.last_click = None;
        }
        match (press.dragging, press.double_click) {
            // Range stays, editing targets the anchor
            (true, true) => {
                if let Some(session) = grid.editing.as_mut() {
                    session.show();
                    session.focus();
                }
            }
            (true, false) => grid.cancel_edit(),
            (false, _) => grid.selection.collapse_to(press.anchor.row, press.anchor.col),
        }
        grid.request_render();
    }

    fn on_key_down(&mut self, grid: &mut Grid, key: KeyInput) -> bool {
        match key {
            KeyInput::Escape => {
                grid.autoscroll.cancel();
                true
            }
            KeyInput::Char(ch) => match grid.editing.as_mut() {
                Some(session) => {
                    session.type_char(ch);
                    grid.request_render();
                    true
                }
                None => false,
            },
            KeyInput::ArrowUp
            | KeyInput::ArrowDown
            | KeyInput::ArrowLeft
            | KeyInput::ArrowRight
            | KeyInput::Enter => match key.direction() {
                Some((d_row, d_col)) => grid.move_edit_cursor(d_row, d_col),
                None => false,
            },
            KeyInput::Other => false,
        }
    }
}
