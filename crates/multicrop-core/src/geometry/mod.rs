//! Geometry for the crop engine: rectangles and the display/source mapping.

mod rect;
mod space;

pub use rect::{Point, Rect};
pub use space::{fit_thumbnail, CoordinateSpace, StateError, ViewConfig};
