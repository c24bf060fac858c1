use std::collections::HashMap;

use crate::error::GeometryError;
use crate::math::{Bounds, Point2};

/// Grid coordinates stay below this many cells per axis, which keeps every
/// predicate on grid points exact in `i128`.
const MAX_GRID_CELLS: f64 = 1_099_511_627_776.0; // 2^40

/// A point on the snap grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPoint {
    pub x: i64,
    pub y: i64,
}

impl GridPoint {
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Twice the signed area of the triangle `abc`; positive when `c` lies to
/// the left of `a -> b`.
#[must_use]
pub fn orient(a: GridPoint, b: GridPoint, c: GridPoint) -> i128 {
    cross(
        i128::from(b.x - a.x),
        i128::from(b.y - a.y),
        i128::from(c.x - a.x),
        i128::from(c.y - a.y),
    )
}

#[must_use]
pub fn cross(ax: i128, ay: i128, bx: i128, by: i128) -> i128 {
    ax * by - ay * bx
}

/// Twice the signed area of a closed ring.
#[must_use]
pub fn doubled_area(ring: &[GridPoint]) -> i128 {
    let n = ring.len();
    (0..n)
        .map(|i| {
            let (a, b) = (ring[i], ring[(i + 1) % n]);
            cross(i128::from(a.x), i128::from(a.y), i128::from(b.x), i128::from(b.y))
        })
        .sum()
}

/// Exact winding number of `p` with respect to a closed ring.
#[must_use]
pub fn winding_number(p: GridPoint, ring: &[GridPoint]) -> i32 {
    let n = ring.len();
    let mut winding = 0;
    for i in 0..n {
        let (a, b) = (ring[i], ring[(i + 1) % n]);
        if a.y <= p.y {
            if b.y > p.y && orient(a, b, p) > 0 {
                winding += 1;
            }
        } else if b.y <= p.y && orient(a, b, p) < 0 {
            winding -= 1;
        }
    }
    winding
}

/// Uniform grid every input coordinate is rounded onto.
///
/// The cell is a power of two, so coordinates that are multiples of the cell
/// map to grid points and back without change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapGrid {
    origin_x: f64,
    origin_y: f64,
    cell: f64,
}

impl SnapGrid {
    /// Builds the grid for the given extent. The cell is the largest power of
    /// two not exceeding `snap_tolerance` times the diagonal of `bounds`,
    /// coarsened when the extent would need more than 2^40 cells.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if the extent has no length.
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(bounds: &Bounds, snap_tolerance: f64) -> Result<Self, GeometryError> {
        let diagonal = bounds.diagonal();
        let target = snap_tolerance * diagonal;
        if !(target.is_finite() && target > 0.0) {
            return Err(GeometryError::Degenerate(format!(
                "cannot derive a snap cell from an extent of {diagonal}"
            )));
        }

        let mut cell = 2f64.powi(target.log2().floor() as i32);
        while cell > target {
            cell *= 0.5;
        }
        while cell * 2.0 <= target {
            cell *= 2.0;
        }
        let extent = bounds.width().max(bounds.height());
        while extent / cell > MAX_GRID_CELLS {
            cell *= 2.0;
        }

        Ok(Self {
            origin_x: (bounds.min_x / cell).floor() * cell,
            origin_y: (bounds.min_y / cell).floor() * cell,
            cell,
        })
    }

    #[must_use]
    pub fn cell(&self) -> f64 {
        self.cell
    }

    /// Rounds a world point to the nearest grid point.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn snap(&self, p: &Point2) -> GridPoint {
        GridPoint::new(
            ((p.x - self.origin_x) / self.cell).round() as i64,
            ((p.y - self.origin_y) / self.cell).round() as i64,
        )
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_world(&self, g: GridPoint) -> Point2 {
        Point2::new(
            self.origin_x + g.x as f64 * self.cell,
            self.origin_y + g.y as f64 * self.cell,
        )
    }

    /// Converts a doubled grid area into a world area.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn area_to_world(&self, doubled: i128) -> f64 {
        doubled as f64 * 0.5 * self.cell * self.cell
    }
}

/// World positions of the input vertices, keyed by the grid point they
/// snapped to.
///
/// Output vertices that coincide with an input vertex take its original
/// coordinates instead of the grid position. When several input vertices
/// share a grid point the lexicographically smallest wins, so the choice does
/// not depend on operand order.
#[derive(Debug, Clone, Default)]
pub struct InputVertices {
    points: HashMap<GridPoint, Point2>,
}

impl InputVertices {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, g: GridPoint, p: Point2) {
        self.points
            .entry(g)
            .and_modify(|q| {
                if p.x.total_cmp(&q.x).then(p.y.total_cmp(&q.y)).is_lt() {
                    *q = p;
                }
            })
            .or_insert(p);
    }

    /// Original coordinates of `g` if an input vertex snapped there, its grid
    /// position otherwise.
    #[must_use]
    pub fn to_world(&self, grid: &SnapGrid, g: GridPoint) -> Point2 {
        self.points.get(&g).copied().unwrap_or_else(|| grid.to_world(g))
    }
}
