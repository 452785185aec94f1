//! Axis-aligned rectangles.

use serde::{Deserialize, Serialize};

use crate::point::Point;

/// An axis-aligned rectangle, specified by lower-left and upper-right corners.
#[derive(
    Debug, Default, Copy, Clone, Hash, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord,
)]
pub struct Rect {
    /// The lower-left corner.
    p0: Point,
    /// The upper-right corner.
    p1: Point,
}

impl Rect {
    /// Creates a rectangle from the given opposite corner points.
    ///
    /// The corners need not be in any particular order.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let rect = Rect::new(Point::new(30, 40), Point::new(15, 20));
    /// assert_eq!(rect.left(), 15);
    /// assert_eq!(rect.bot(), 20);
    /// assert_eq!(rect.right(), 30);
    /// assert_eq!(rect.top(), 40);
    /// ```
    pub fn new(p0: Point, p1: Point) -> Self {
        Self {
            p0: Point::new(p0.x.min(p1.x), p0.y.min(p1.y)),
            p1: Point::new(p0.x.max(p1.x), p0.y.max(p1.y)),
        }
    }

    /// Creates a rectangle from all 4 sides (left, bottom, right, top).
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let rect = Rect::from_sides(15, 20, 30, 40);
    /// assert_eq!(rect.left(), 15);
    /// assert_eq!(rect.bot(), 20);
    /// assert_eq!(rect.right(), 30);
    /// assert_eq!(rect.top(), 40);
    /// ```
    ///
    /// # Panics
    ///
    /// This method panics if `left > right` or if `bot > top`.
    #[inline]
    pub fn from_sides(left: i64, bot: i64, right: i64, top: i64) -> Self {
        assert!(
            left <= right,
            "Rect::from_sides requires that left ({}) <= right ({})",
            left,
            right
        );
        assert!(
            bot <= top,
            "Rect::from_sides requires that bot ({}) <= top ({})",
            bot,
            top
        );
        Self {
            p0: Point::new(left, bot),
            p1: Point::new(right, top),
        }
    }

    /// Returns the leftmost x-coordinate of the rectangle.
    #[inline]
    pub const fn left(&self) -> i64 {
        self.p0.x
    }

    /// Returns the bottom y-coordinate of the rectangle.
    #[inline]
    pub const fn bot(&self) -> i64 {
        self.p0.y
    }

    /// Returns the rightmost x-coordinate of the rectangle.
    #[inline]
    pub const fn right(&self) -> i64 {
        self.p1.x
    }

    /// Returns the top y-coordinate of the rectangle.
    #[inline]
    pub const fn top(&self) -> i64 {
        self.p1.y
    }

    /// Returns the horizontal extent of the rectangle.
    #[inline]
    pub const fn width(&self) -> i64 {
        self.p1.x - self.p0.x
    }

    /// Returns the vertical extent of the rectangle.
    #[inline]
    pub const fn height(&self) -> i64 {
        self.p1.y - self.p0.y
    }

    /// Returns the area of the rectangle.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let rect = Rect::from_sides(0, 0, 40, 10);
    /// assert_eq!(rect.area(), 400);
    /// ```
    #[inline]
    pub const fn area(&self) -> i64 {
        self.width() * self.height()
    }

    /// Returns the rectangle translated by the given point.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let rect = Rect::from_sides(-5, -5, 5, 5).translate(Point::new(100, 20));
    /// assert_eq!(rect, Rect::from_sides(95, 15, 105, 25));
    /// ```
    pub fn translate(&self, p: Point) -> Self {
        Self {
            p0: self.p0 + p,
            p1: self.p1 + p,
        }
    }

    /// Returns the intersection of this rectangle with `other`,
    /// or [`None`] if the closed rectangles do not meet.
    pub fn intersection(&self, other: Rect) -> Option<Rect> {
        let left = self.left().max(other.left());
        let bot = self.bot().max(other.bot());
        let right = self.right().min(other.right());
        let top = self.top().min(other.top());
        if left > right || bot > top {
            return None;
        }
        Some(Self::from_sides(left, bot, right, top))
    }

    /// Returns `true` if this rectangle and `other` overlap with positive
    /// area or share a boundary segment of positive length.
    ///
    /// Touching at a single corner point does not count: a corner contact
    /// carries no conducting cross-section.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let rect = Rect::from_sides(0, 0, 10, 10);
    /// assert!(rect.connects(Rect::from_sides(5, 5, 20, 20)));
    /// assert!(rect.connects(Rect::from_sides(10, 2, 20, 8)));
    /// assert!(!rect.connects(Rect::from_sides(10, 10, 20, 20)));
    /// assert!(!rect.connects(Rect::from_sides(11, 0, 20, 10)));
    /// ```
    pub fn connects(&self, other: Rect) -> bool {
        let ix = self.right().min(other.right()) - self.left().max(other.left());
        let iy = self.top().min(other.top()) - self.bot().max(other.bot());
        ix >= 0 && iy >= 0 && ix + iy > 0
    }
}
