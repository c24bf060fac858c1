use super::predicates::{orientation, Orientation};
use super::{Point2, Vector2};

/// Result of intersecting two closed segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentIntersection {
    None,
    /// A single shared point: a crossing, a T-junction or a shared endpoint.
    Point(Point2),
    /// Collinear overlap of positive length, ordered along the first segment.
    Overlap(Point2, Point2),
}

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` if not parallel.
#[must_use]
pub fn line_line_intersect_2d(
    p1: &Point2,
    d1: &Vector2,
    p2: &Point2,
    d2: &Vector2,
) -> Option<(f64, f64)> {
    let cross = d1.x * d2.y - d1.y * d2.x;
    if cross == 0.0 {
        return None;
    }
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let t = (dx * d2.y - dy * d2.x) / cross;
    let u = (dx * d1.y - dy * d1.x) / cross;
    Some((t, u))
}

/// Bounded segment-segment intersection in 2D.
///
/// Touches and T-junctions are classified with the exact orientation
/// predicate and report the touching endpoint itself, so segments that share a
/// vertex always agree on the shared point. Only proper crossings compute a
/// new point.
#[must_use]
pub fn segment_intersect(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> SegmentIntersection {
    if a0 == a1 || b0 == b1 {
        return degenerate_intersect(a0, a1, b0, b1);
    }

    let o1 = orientation(a0, a1, b0);
    let o2 = orientation(a0, a1, b1);
    let o3 = orientation(b0, b1, a0);
    let o4 = orientation(b0, b1, a1);

    if o1 == Orientation::Collinear && o2 == Orientation::Collinear {
        return collinear_overlap(a0, a1, b0, b1);
    }

    if o1.signum() * o2.signum() > 0 || o3.signum() * o4.signum() > 0 {
        return SegmentIntersection::None;
    }

    // Endpoint touches, checked in a fixed order.
    if o1 == Orientation::Collinear {
        return SegmentIntersection::Point(*b0);
    }
    if o2 == Orientation::Collinear {
        return SegmentIntersection::Point(*b1);
    }
    if o3 == Orientation::Collinear {
        return SegmentIntersection::Point(*a0);
    }
    if o4 == Orientation::Collinear {
        return SegmentIntersection::Point(*a1);
    }

    let da = a1 - a0;
    let db = b1 - b0;
    match line_line_intersect_2d(a0, &da, b0, &db) {
        Some((t, _)) => {
            let t = t.clamp(0.0, 1.0);
            SegmentIntersection::Point(Point2::new(a0.x + da.x * t, a0.y + da.y * t))
        }
        None => SegmentIntersection::None,
    }
}

/// Returns `true` if `p`, already known to be collinear with `a`-`b`, lies
/// within the closed segment.
#[must_use]
pub fn collinear_between(a: &Point2, b: &Point2, p: &Point2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

fn degenerate_intersect(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> SegmentIntersection {
    let (point, s0, s1) = if a0 == a1 { (a0, b0, b1) } else { (b0, a0, a1) };
    let on = if s0 == s1 {
        point == s0
    } else {
        orientation(s0, s1, point) == Orientation::Collinear && collinear_between(s0, s1, point)
    };
    if on {
        SegmentIntersection::Point(*point)
    } else {
        SegmentIntersection::None
    }
}

fn collinear_overlap(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> SegmentIntersection {
    // Project on the dominant axis of segment a.
    let use_x = (a1.x - a0.x).abs() >= (a1.y - a0.y).abs();
    let key = |p: &Point2| if use_x { p.x } else { p.y };
    let forward = key(a1) >= key(a0);
    let along = |p: &Point2| if forward { key(p) } else { -key(p) };

    let (a_lo, a_hi) = (a0, a1);
    let (b_lo, b_hi) = if along(b0) <= along(b1) { (b0, b1) } else { (b1, b0) };

    let lo = if along(b_lo) > along(a_lo) { b_lo } else { a_lo };
    let hi = if along(b_hi) < along(a_hi) { b_hi } else { a_hi };

    let (lo_key, hi_key) = (along(lo), along(hi));
    if lo_key > hi_key {
        SegmentIntersection::None
    } else if lo_key == hi_key {
        SegmentIntersection::Point(*lo)
    } else {
        SegmentIntersection::Overlap(*lo, *hi)
    }
}
