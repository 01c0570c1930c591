//! Data types shared by the grid core and its JS bindings.

mod axis;
mod cell;
mod selection;

pub use axis::*;
pub use cell::*;
pub use selection::*;
