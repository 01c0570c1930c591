use serde::{Deserialize, Serialize};
use std::fmt;

/// Which dimension of the grid an operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisKind {
    Rows,
    Columns,
}

impl fmt::Display for AxisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisKind::Rows => f.write_str("row"),
            AxisKind::Columns => f.write_str("column"),
        }
    }
}
