//! 2-D integer geometry for routed-layout analysis.
//!
//! Coordinates are in database units (dbu). The crate provides the
//! primitives an extraction or checking pass needs: [points](point::Point),
//! [axis-aligned rectangles](rect::Rect), and [rectilinear polygon
//! sets](polyset::PolygonSet) that decompose into maximal connected
//! polygons.
//!
//! # Examples
//!
//! Create a [rectangle](crate::rect::Rect):
//!
//! ```
//! # use geometry::prelude::*;
//! let rect = Rect::from_sides(10, 20, 30, 40);
//! ```
#![warn(missing_docs)]

pub mod dir;
pub mod point;
pub mod polyset;
pub mod prelude;
pub mod rect;
