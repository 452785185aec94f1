//! A prelude exporting commonly used items.

pub use crate::dir::Dir;
pub use crate::point::Point;
pub use crate::polyset::{Polygon, PolygonSet};
pub use crate::rect::Rect;
