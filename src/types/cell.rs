use serde::{Deserialize, Serialize};

/// Style flags a cell may carry. Only bold and italic exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellStyle {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}

impl CellStyle {
    pub const PLAIN: CellStyle = CellStyle {
        bold: false,
        italic: false,
    };

    pub fn bold() -> Self {
        Self {
            bold: true,
            italic: false,
        }
    }

    pub fn italic() -> Self {
        Self {
            bold: false,
            italic: true,
        }
    }
}

/// A stored cell: its text content plus style flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRecord {
    pub value: String,
    #[serde(flatten)]
    pub style: CellStyle,
}

impl CellRecord {
    pub fn new(value: impl Into<String>, style: CellStyle) -> Self {
        Self {
            value: value.into(),
            style,
        }
    }

    /// Parse the content as a finite number, ignoring surrounding whitespace.
    ///
    /// Empty cells and text such as `"NaN"` or `"inf"` are not numeric.
    pub fn numeric_value(&self) -> Option<f64> {
        let trimmed = self.value.trim();
        if trimmed.is_empty() {
            return None;
        }
        trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
    }
}
