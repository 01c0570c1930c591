//! Structured error types for gridview.

use crate::types::AxisKind;

/// All errors that can occur while mutating or loading the grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// An index was outside the axis it addresses.
    #[error("{axis} index {index} out of range (len {len})")]
    IndexOutOfRange {
        axis: AxisKind,
        index: u32,
        len: u32,
    },

    /// Deleting would leave the axis with no segments.
    #[error("cannot delete the last remaining {axis} segment")]
    LastSegment { axis: AxisKind },

    /// Configuration rejected by [`GridConfig::validate`](crate::config::GridConfig::validate).
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Bulk-load payload could not be interpreted as row objects.
    #[error("Import: {0}")]
    Import(String),

    /// JSON decoding error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
