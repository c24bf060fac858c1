use crate::math::bounds::{overlapping_pairs, Bounds};
use crate::math::intersect_2d::{segment_intersect, SegmentIntersection};
use crate::math::Point2;

use super::normalize::dedup_ring;

fn edge_boxes(points: &[Point2]) -> Vec<Bounds> {
    let n = points.len();
    (0..n)
        .map(|i| {
            let (a, b) = (points[i], points[(i + 1) % n]);
            Bounds::from_corners(a.x, a.y, b.x, b.y)
        })
        .collect()
}

/// Finds a point where a closed ring touches or crosses itself.
///
/// Reports crossings and touches between non-adjacent edges, collinear
/// backtracking between adjacent edges, and repeated vertices. Among several
/// defects the one on the lowest pair of edge indices is returned.
#[must_use]
pub fn find_self_intersection(points: &[Point2]) -> Option<Point2> {
    let n = points.len();
    if n < 3 {
        return None;
    }
    let mut pairs = overlapping_pairs(&edge_boxes(points));
    pairs.sort_unstable();

    for (i, j) in pairs {
        let adjacent = j == i + 1 || (i == 0 && j == n - 1);
        let hit = segment_intersect(
            &points[i],
            &points[(i + 1) % n],
            &points[j],
            &points[(j + 1) % n],
        );
        match hit {
            SegmentIntersection::None => {}
            SegmentIntersection::Overlap(p, _) => return Some(p),
            SegmentIntersection::Point(p) => {
                if !adjacent {
                    return Some(p);
                }
            }
        }
    }
    None
}

/// Inserts every self-intersection point of a ring as a vertex of both edges
/// involved, so crossings and touches turn into repeated vertices.
///
/// A crossing point is computed once and inserted into both edges, which
/// makes the two copies compare equal.
#[must_use]
pub fn node_ring(points: &[Point2]) -> Vec<Point2> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }
    let mut cuts: Vec<Vec<Point2>> = vec![Vec::new(); n];
    for (i, j) in overlapping_pairs(&edge_boxes(points)) {
        match segment_intersect(
            &points[i],
            &points[(i + 1) % n],
            &points[j],
            &points[(j + 1) % n],
        ) {
            SegmentIntersection::None => {}
            SegmentIntersection::Point(p) => {
                cuts[i].push(p);
                cuts[j].push(p);
            }
            SegmentIntersection::Overlap(p, q) => {
                cuts[i].extend([p, q]);
                cuts[j].extend([p, q]);
            }
        }
    }

    let mut noded = Vec::with_capacity(n);
    for (i, edge_cuts) in cuts.into_iter().enumerate() {
        let a = points[i];
        let b = points[(i + 1) % n];
        let d = b - a;
        let mut inner: Vec<(f64, Point2)> = edge_cuts
            .into_iter()
            .filter(|p| *p != a && *p != b)
            .map(|p| ((p - a).dot(&d), p))
            .collect();
        inner.sort_by(|x, y| x.0.total_cmp(&y.0));
        inner.dedup_by(|x, y| x.1 == y.1);
        noded.push(a);
        noded.extend(inner.into_iter().map(|(_, p)| p));
    }
    dedup_ring(&mut noded);
    noded
}
