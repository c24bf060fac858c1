use crate::error::DataError;
use crate::geometry::{Polygon, PolygonSet, Ring};
use crate::math::polygon_2d::{locate_point, signed_area_2d, PointLocation};
use crate::math::{Bounds, Point2};

use super::normalize::{clean_ring, has_zero_area, orient};

/// Builds polygons from loose rings by containment depth.
///
/// A ring enclosed by an even number of other rings is an outer ring; a ring
/// enclosed by an odd number is a hole of the smallest ring enclosing it.
/// Orientation of the input rings is ignored.
///
/// # Errors
///
/// Returns a [`DataError`] if a ring has a non-finite coordinate, fewer than
/// three distinct points, or zero area. The reported polygon index is the
/// ring's position in `rings`.
pub fn nest_rings(rings: &[Ring]) -> Result<PolygonSet, DataError> {
    let mut loops = Vec::with_capacity(rings.len());
    for (index, ring) in rings.iter().enumerate() {
        let points = clean_ring(ring, index, 0)?;
        if has_zero_area(&points) {
            return Err(DataError::ZeroArea {
                polygon: index,
                ring: 0,
            });
        }
        loops.push(points);
    }
    Ok(PolygonSet::new(nest_loops(loops)))
}

/// Returns `true` if `outer` encloses `inner`.
///
/// The first vertex of `inner` that is not on the boundary of `outer`
/// decides. Loops that coincide along their whole vertex set do not enclose
/// each other.
pub(crate) fn encloses(outer: &[Point2], inner: &[Point2]) -> bool {
    if let (Some(ob), Some(ib)) = (Bounds::of_points(outer), Bounds::of_points(inner)) {
        if ib.min_x < ob.min_x || ib.max_x > ob.max_x || ib.min_y < ob.min_y || ib.max_y > ob.max_y {
            return false;
        }
    }
    for p in inner {
        match locate_point(p, outer) {
            PointLocation::OnBoundary => {}
            PointLocation::Inside => return true,
            PointLocation::Outside => return false,
        }
    }
    false
}

pub(crate) fn nest_loops(loops: Vec<Vec<Point2>>) -> Vec<Polygon> {
    let n = loops.len();
    let areas: Vec<f64> = loops.iter().map(|l| signed_area_2d(l).abs()).collect();

    let mut depth = vec![0usize; n];
    let mut parent: Vec<Option<usize>> = vec![None; n];
    for i in 0..n {
        for j in 0..n {
            if i == j || areas[j] <= areas[i] || !encloses(&loops[j], &loops[i]) {
                continue;
            }
            depth[i] += 1;
            if parent[i].map_or(true, |p| areas[j] < areas[p]) {
                parent[i] = Some(j);
            }
        }
    }

    let mut polygon_of: Vec<Option<usize>> = vec![None; n];
    let mut polygons = Vec::new();
    for i in (0..n).filter(|&i| depth[i] % 2 == 0) {
        polygon_of[i] = Some(polygons.len());
        polygons.push(Polygon::from_outer(orient(loops[i].clone(), true)));
    }
    for i in (0..n).filter(|&i| depth[i] % 2 == 1) {
        match parent[i].and_then(|p| polygon_of[p]) {
            Some(k) => polygons[k].holes.push(orient(loops[i].clone(), false)),
            // Overlapping loops break the depth parity; keep the loop as an outer.
            None => polygons.push(Polygon::from_outer(orient(loops[i].clone(), true))),
        }
    }
    polygons
}
