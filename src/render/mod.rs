//! Reference painter for device-space display lists.
//!
//! The view pipeline stops at device coordinates; this module turns its
//! output into pixels for the interactive viewer and PNG snapshots.

mod canvas;
mod painter;

pub use canvas::Canvas;
pub use painter::{fill_polygon, Painter, GRID_SPACING, POINT_SIZE};
