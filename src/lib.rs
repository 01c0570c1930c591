//! gridview - virtualized spreadsheet grid for the web
//!
//! The grid core behind a canvas-drawn spreadsheet, compiled to WebAssembly:
//! - Variable-size rows and columns with O(log n) position lookup
//! - Viewport virtualization over 100k+ rows
//! - Range, full-row and full-column selection with sum/count/average
//! - Inline editing with keyboard navigation
//! - Drag autoscroll, header resize, row/column insert and delete
//! - Bulk row import that finishes in idle time
//!
//! Drawing is left to the host: each frame it pulls a [`render::FrameSnapshot`].
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { GridWidget } from 'gridview';
//! await init();
//! const grid = new GridWidget(container, { totalRows: 100000, totalCols: 26 });
//! grid.setRenderCallback(() => draw(grid.frame()));
//! grid.loadRows(rows);
//! ```

pub mod cell_ref;
pub mod config;
pub mod editor;
pub mod error;
pub mod grid;
pub mod interaction;
pub mod layout;
pub mod logging;
pub mod render;
pub mod selection;
pub mod store;
pub mod types;
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use config::GridConfig;
pub use error::{GridError, Result};
pub use grid::Grid;
pub use viewer::{FrameReport, SheetView};

#[cfg(target_arch = "wasm32")]
pub use viewer::GridWidget;

pub use types::*;

/// Route `log` records to the browser console at `level`
/// (`error`, `warn`, `info`, `debug`, `trace` or `off`).
#[wasm_bindgen(js_name = "initLogging")]
pub fn init_logging(level: &str) {
    logging::init(logging::parse_level(level));
}

/// A1-style label for a zero-based cell position.
#[wasm_bindgen(js_name = "cellLabel")]
pub fn cell_label(row: u32, col: u32) -> String {
    cell_ref::cell_label(CellPos::new(row, col))
}

/// Get the library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
