use super::intersect_2d::collinear_between;
use super::predicates::{orientation, Orientation};
use super::Point2;

/// Classification of a point relative to a closed ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointLocation {
    Inside,
    Outside,
    OnBoundary,
}

/// Computes the signed area of a closed polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    // Anchor at the first vertex to limit cancellation for far-away coordinates.
    let origin = points[0];
    let mut sum = 0.0;
    for i in 1..n - 1 {
        let a = points[i] - origin;
        let b = points[i + 1] - origin;
        sum += a.x * b.y - b.x * a.y;
    }
    sum * 0.5
}

/// Returns `true` if every vertex lies on one line (or there are fewer than 3).
#[must_use]
pub fn is_collinear(points: &[Point2]) -> bool {
    let Some(first) = points.first() else {
        return true;
    };
    let Some(second) = points.iter().find(|p| *p != first) else {
        return true;
    };
    points
        .iter()
        .all(|p| orientation(first, second, p) == Orientation::Collinear)
}

/// Rotates a closed polygon so it starts at the leftmost vertex (smallest x),
/// breaking ties by smallest y. Ensures deterministic output.
#[must_use]
pub fn rotate_to_canonical_start<T: Copy>(points: &[T], key: impl Fn(&T) -> (f64, f64)) -> Vec<T> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let mut best = 0;
    for (i, pt) in points.iter().enumerate().skip(1) {
        let (x, y) = key(pt);
        let (bx, by) = key(&points[best]);
        if x < bx || (x == bx && y < by) {
            best = i;
        }
    }
    let mut rotated = Vec::with_capacity(points.len());
    rotated.extend_from_slice(&points[best..]);
    rotated.extend_from_slice(&points[..best]);
    rotated
}

/// Returns the leftmost-bottommost vertex of a polygon.
#[must_use]
pub fn leftmost_bottom(points: &[Point2]) -> Option<Point2> {
    points.iter().copied().reduce(|best, pt| {
        if pt.x < best.x || (pt.x == best.x && pt.y < best.y) {
            pt
        } else {
            best
        }
    })
}

/// Winding number of a closed ring around `p`.
///
/// Counts signed crossings of the upward/downward edges with the horizontal
/// ray to the right of `p`; the crossing side is decided with the exact
/// orientation predicate. Points on the boundary get an unspecified value;
/// use [`locate_point`] when the boundary matters.
#[must_use]
pub fn winding_number(p: &Point2, ring: &[Point2]) -> i32 {
    let n = ring.len();
    let mut winding = 0;
    for i in 0..n {
        let a = &ring[i];
        let b = &ring[(i + 1) % n];
        if a.y <= p.y {
            if b.y > p.y && orientation(a, b, p) == Orientation::Left {
                winding += 1;
            }
        } else if b.y <= p.y && orientation(a, b, p) == Orientation::Right {
            winding -= 1;
        }
    }
    winding
}

/// Nonzero-winding inside test.
#[must_use]
pub fn point_in_ring(p: &Point2, ring: &[Point2]) -> bool {
    winding_number(p, ring) != 0
}

/// Locates `p` against a ring, detecting boundary points exactly.
#[must_use]
pub fn locate_point(p: &Point2, ring: &[Point2]) -> PointLocation {
    let n = ring.len();
    for i in 0..n {
        let a = &ring[i];
        let b = &ring[(i + 1) % n];
        if orientation(a, b, p) == Orientation::Collinear && collinear_between(a, b, p) {
            return PointLocation::OnBoundary;
        }
    }
    if point_in_ring(p, ring) {
        PointLocation::Inside
    } else {
        PointLocation::Outside
    }
}
