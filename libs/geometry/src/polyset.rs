//! Rectilinear polygon sets.
//!
//! A [`PolygonSet`] accumulates additive and subtractive axis-aligned
//! rectangles and decomposes the resulting region into maximal connected
//! [`Polygon`]s. Rectangles that overlap or abut along an edge of positive
//! length belong to the same polygon; rectangles that touch only at a
//! corner do not.

use serde::{Deserialize, Serialize};

use crate::rect::Rect;

/// A set of additive and subtractive rectangles on one plane.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PolygonSet {
    adds: Vec<Rect>,
    cuts: Vec<Rect>,
}

impl PolygonSet {
    /// Creates an empty polygon set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rectangle to the covered region.
    pub fn add(&mut self, rect: Rect) {
        self.adds.push(rect);
    }

    /// Subtracts a rectangle from the covered region.
    ///
    /// Subtraction applies to the union of everything [added](PolygonSet::add),
    /// regardless of insertion order.
    pub fn cut(&mut self, rect: Rect) {
        self.cuts.push(rect);
    }

    /// Decomposes the covered region into maximal connected polygons.
    ///
    /// Polygons are returned in a deterministic order: by the bottom-left
    /// corner of their lowest leftmost tile, scanning bottom to top.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let mut set = PolygonSet::new();
    /// set.add(Rect::from_sides(0, 0, 10, 10));
    /// set.add(Rect::from_sides(10, 0, 20, 10));
    /// set.add(Rect::from_sides(0, 20, 10, 30));
    /// let polygons = set.polygons();
    /// assert_eq!(polygons.len(), 2);
    /// assert_eq!(polygons[0].area(), 200);
    /// ```
    pub fn polygons(&self) -> Vec<Polygon> {
        if self.adds.is_empty() {
            return Vec::new();
        }

        let mut xs = Vec::with_capacity(2 * (self.adds.len() + self.cuts.len()));
        let mut ys = Vec::with_capacity(xs.capacity());
        for rect in self.adds.iter().chain(self.cuts.iter()) {
            xs.push(rect.left());
            xs.push(rect.right());
            ys.push(rect.bot());
            ys.push(rect.top());
        }
        xs.sort_unstable();
        xs.dedup();
        ys.sort_unstable();
        ys.dedup();

        let nx = xs.len() - 1;
        let ny = ys.len() - 1;
        if nx == 0 || ny == 0 {
            return Vec::new();
        }

        // Every rectangle edge lies on a grid line, so each cell is either
        // fully inside or fully outside any given rectangle.
        let mut covered = vec![false; nx * ny];
        let cell_range = |rect: &Rect| {
            let i0 = xs.partition_point(|&x| x < rect.left());
            let i1 = xs.partition_point(|&x| x < rect.right());
            let j0 = ys.partition_point(|&y| y < rect.bot());
            let j1 = ys.partition_point(|&y| y < rect.top());
            (i0, i1, j0, j1)
        };
        for rect in &self.adds {
            let (i0, i1, j0, j1) = cell_range(rect);
            for j in j0..j1 {
                for i in i0..i1 {
                    covered[j * nx + i] = true;
                }
            }
        }
        for rect in &self.cuts {
            let (i0, i1, j0, j1) = cell_range(rect);
            for j in j0..j1 {
                for i in i0..i1 {
                    covered[j * nx + i] = false;
                }
            }
        }

        // Flood-fill 4-connected components of covered cells.
        let mut component = vec![usize::MAX; nx * ny];
        let mut polygons = Vec::new();
        let mut stack = Vec::new();
        for j in 0..ny {
            for i in 0..nx {
                let cell = j * nx + i;
                if !covered[cell] || component[cell] != usize::MAX {
                    continue;
                }
                let id = polygons.len();
                let mut cells = Vec::new();
                component[cell] = id;
                stack.push((i, j));
                while let Some((ci, cj)) = stack.pop() {
                    cells.push((ci, cj));
                    let mut visit = |ni: usize, nj: usize| {
                        let ncell = nj * nx + ni;
                        if covered[ncell] && component[ncell] == usize::MAX {
                            component[ncell] = id;
                            stack.push((ni, nj));
                        }
                    };
                    if ci > 0 {
                        visit(ci - 1, cj);
                    }
                    if ci + 1 < nx {
                        visit(ci + 1, cj);
                    }
                    if cj > 0 {
                        visit(ci, cj - 1);
                    }
                    if cj + 1 < ny {
                        visit(ci, cj + 1);
                    }
                }
                polygons.push(Polygon::from_cells(&xs, &ys, cells));
            }
        }
        polygons
    }
}

/// One horizontal strip of a [`Polygon`]: a y-interval with the maximal
/// x-spans covered within it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
struct Row {
    y0: i64,
    y1: i64,
    spans: Vec<(i64, i64)>,
}

/// A maximal connected rectilinear polygon, stored as horizontal strips.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Polygon {
    rows: Vec<Row>,
}

impl Polygon {
    fn from_cells(xs: &[i64], ys: &[i64], mut cells: Vec<(usize, usize)>) -> Self {
        cells.sort_unstable_by_key(|&(i, j)| (j, i));
        let mut rows: Vec<Row> = Vec::new();
        for (i, j) in cells {
            let (x0, x1) = (xs[i], xs[i + 1]);
            let same_row = rows.last().is_some_and(|row| row.y0 == ys[j]);
            if same_row {
                let spans = &mut rows.last_mut().unwrap().spans;
                let last = spans.last_mut().unwrap();
                if last.1 == x0 {
                    last.1 = x1;
                } else {
                    spans.push((x0, x1));
                }
            } else {
                rows.push(Row {
                    y0: ys[j],
                    y1: ys[j + 1],
                    spans: vec![(x0, x1)],
                });
            }
        }
        Self { rows }
    }

    /// Iterates over the disjoint rectangular tiles making up this polygon.
    pub fn tiles(&self) -> impl Iterator<Item = Rect> + '_ {
        self.rows.iter().flat_map(|row| {
            row.spans
                .iter()
                .map(move |&(x0, x1)| Rect::from_sides(x0, row.y0, x1, row.y1))
        })
    }

    /// Returns the bounding box of this polygon.
    pub fn bbox(&self) -> Rect {
        let bot = self.rows.first().unwrap().y0;
        let top = self.rows.last().unwrap().y1;
        let left = self
            .rows
            .iter()
            .map(|row| row.spans.first().unwrap().0)
            .min()
            .unwrap();
        let right = self
            .rows
            .iter()
            .map(|row| row.spans.last().unwrap().1)
            .max()
            .unwrap();
        Rect::from_sides(left, bot, right, top)
    }

    /// Returns the area of this polygon.
    pub fn area(&self) -> i64 {
        self.rows
            .iter()
            .map(|row| (row.y1 - row.y0) * row.spans.iter().map(|&(x0, x1)| x1 - x0).sum::<i64>())
            .sum()
    }

    /// Returns the perimeter of this polygon.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let mut set = PolygonSet::new();
    /// set.add(Rect::from_sides(0, 0, 30, 10));
    /// set.add(Rect::from_sides(0, 10, 10, 30));
    /// let polygons = set.polygons();
    /// assert_eq!(polygons.len(), 1);
    /// assert_eq!(polygons[0].perimeter(), 120);
    /// ```
    pub fn perimeter(&self) -> i64 {
        let mut perimeter = 0;
        for (idx, row) in self.rows.iter().enumerate() {
            let height = row.y1 - row.y0;
            for &(x0, x1) in &row.spans {
                perimeter += 2 * height + 2 * (x1 - x0);
            }
            // Boundary shared with the strip below is interior; it was
            // counted once in each strip's tile perimeter.
            if idx > 0 {
                let below = &self.rows[idx - 1];
                if below.y1 == row.y0 {
                    perimeter -= 2 * overlap_len(&below.spans, &row.spans);
                }
            }
        }
        perimeter
    }

    /// Returns `true` if `rect` overlaps this polygon or abuts it along an
    /// edge of positive length.
    pub fn connects_rect(&self, rect: Rect) -> bool {
        self.tiles().any(|tile| tile.connects(rect))
    }

    /// Returns `true` if `other` overlaps this polygon or abuts it along an
    /// edge of positive length.
    pub fn connects(&self, other: &Polygon) -> bool {
        if !self.bbox().connects(other.bbox()) {
            return false;
        }
        self.tiles().any(|tile| other.connects_rect(tile))
    }
}

/// Total overlap length between two sorted, disjoint span lists.
fn overlap_len(a: &[(i64, i64)], b: &[(i64, i64)]) -> i64 {
    let mut total = 0;
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        let lo = a[i].0.max(b[j].0);
        let hi = a[i].1.min(b[j].1);
        if hi > lo {
            total += hi - lo;
        }
        if a[i].1 < b[j].1 {
            i += 1;
        } else {
            j += 1;
        }
    }
    total
}
