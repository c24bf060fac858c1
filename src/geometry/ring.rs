use crate::math::polygon_2d::{signed_area_2d, winding_number};
use crate::math::{Bounds, Point2};

/// A closed loop of points. The closing edge from the last point back to
/// the first is implicit and the first point is never repeated.
///
/// Counter-clockwise rings (positive signed area) bound polygons; clockwise
/// rings are holes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ring {
    pub points: Vec<Point2>,
}

impl Ring {
    /// Creates a ring from its vertices without any cleanup.
    #[must_use]
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    /// Creates a ring from `(x, y)` pairs.
    #[must_use]
    pub fn from_coords(coords: &[(f64, f64)]) -> Self {
        Self::new(coords.iter().map(|&(x, y)| Point2::new(x, y)).collect())
    }

    /// Axis-aligned rectangle, counter-clockwise from `(x0, y0)`.
    #[must_use]
    pub fn rectangle(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::from_coords(&[(x0, y0), (x1, y0), (x1, y1), (x0, y1)])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Signed area, positive for counter-clockwise rings.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        signed_area_2d(&self.points)
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    #[must_use]
    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Returns the ring traversed in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }

    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::of_points(&self.points)
    }

    /// Winding number of the ring around `p`.
    #[must_use]
    pub fn winding_number(&self, p: &Point2) -> i32 {
        winding_number(p, &self.points)
    }
}
