use std::cmp::Ordering;

use crate::math::polygon_2d::{leftmost_bottom, rotate_to_canonical_start};
use crate::math::{Bounds, Point2};

use super::{Polygon, Ring};

/// Decides from a winding number whether a point is inside an operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FillRule {
    /// Inside where the winding number is non-zero.
    #[default]
    NonZero,
    /// Inside where the winding number is odd.
    EvenOdd,
    /// Inside where the winding number is positive.
    Positive,
}

impl FillRule {
    #[must_use]
    pub fn is_inside(self, winding: i32) -> bool {
        match self {
            Self::NonZero => winding != 0,
            Self::EvenOdd => winding % 2 != 0,
            Self::Positive => winding > 0,
        }
    }
}

/// One operand of a boolean operation: polygons treated as their union.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolygonSet {
    pub polygons: Vec<Polygon>,
}

impl PolygonSet {
    #[must_use]
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    /// The empty set.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Polygon> {
        self.polygons.iter()
    }

    pub fn push(&mut self, polygon: Polygon) {
        self.polygons.push(polygon);
    }

    /// Sum of the polygon areas. Equals the covered area only when the
    /// polygons do not overlap, as is the case for boolean results.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.polygons.iter().map(Polygon::area).sum()
    }

    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        self.polygons
            .iter()
            .filter_map(Polygon::bounds)
            .reduce(|a, b| a.union(&b))
    }

    /// Total winding number of `p` over all polygons, holes counted negatively.
    #[must_use]
    pub fn winding_number(&self, p: &Point2) -> i32 {
        self.polygons.iter().map(|poly| poly.oriented_winding(p)).sum()
    }

    /// Point membership under the given fill rule.
    #[must_use]
    pub fn contains_point(&self, p: &Point2, rule: FillRule) -> bool {
        rule.is_inside(self.winding_number(p))
    }

    /// Returns an equivalent set in canonical form: every ring starts at its
    /// leftmost-bottom vertex, holes and polygons are sorted by that vertex.
    #[must_use]
    pub fn canonical(&self) -> Self {
        let mut polygons: Vec<Polygon> = self
            .polygons
            .iter()
            .map(|poly| {
                let mut holes: Vec<Ring> = poly.holes.iter().map(canonical_ring).collect();
                holes.sort_by(compare_rings);
                Polygon::new(canonical_ring(&poly.outer), holes)
            })
            .collect();
        polygons.sort_by(|a, b| compare_rings(&a.outer, &b.outer));
        Self { polygons }
    }
}

impl FromIterator<Polygon> for PolygonSet {
    fn from_iter<I: IntoIterator<Item = Polygon>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PolygonSet {
    type Item = &'a Polygon;
    type IntoIter = std::slice::Iter<'a, Polygon>;

    fn into_iter(self) -> Self::IntoIter {
        self.polygons.iter()
    }
}

fn canonical_ring(ring: &Ring) -> Ring {
    Ring::new(rotate_to_canonical_start(&ring.points, |p| (p.x, p.y)))
}

fn compare_rings(a: &Ring, b: &Ring) -> Ordering {
    let key = |r: &Ring| leftmost_bottom(&r.points).map(|p| (p.x, p.y));
    match (key(a), key(b)) {
        (Some((ax, ay)), Some((bx, by))) => ax.total_cmp(&bx).then(ay.total_cmp(&by)),
        (ka, kb) => ka.is_some().cmp(&kb.is_some()),
    }
    .then_with(|| a.len().cmp(&b.len()))
    .then_with(|| b.area().total_cmp(&a.area()))
}
