use tracing::debug;

use crate::error::DataError;
use crate::geometry::{Polygon, PolygonSet, Ring};
use crate::math::polygon_2d::{is_collinear, signed_area_2d};
use crate::math::Point2;

/// Normalizes a polygon.
///
/// Consecutive duplicate vertices are removed, including a closing point that
/// repeats the first one. The outer ring is oriented counter-clockwise and
/// every hole clockwise.
///
/// # Errors
///
/// Returns a [`DataError`] if a coordinate is not finite, a ring has fewer
/// than three distinct points, or a ring has zero area.
pub fn normalize(polygon: &Polygon) -> Result<Polygon, DataError> {
    normalize_at(polygon, 0)
}

pub(crate) fn normalize_at(polygon: &Polygon, index: usize) -> Result<Polygon, DataError> {
    let outer = normalize_ring(&polygon.outer, index, 0, true)?;
    let holes = polygon
        .holes
        .iter()
        .enumerate()
        .map(|(k, hole)| normalize_ring(hole, index, k + 1, false))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(outer, holes))
}

fn normalize_ring(ring: &Ring, polygon: usize, index: usize, outer: bool) -> Result<Ring, DataError> {
    let points = clean_ring(ring, polygon, index)?;
    if has_zero_area(&points) {
        return Err(DataError::ZeroArea {
            polygon,
            ring: index,
        });
    }
    Ok(orient(points, outer))
}

/// Rejects non-finite coordinates and removes consecutive duplicates.
pub(crate) fn clean_ring(ring: &Ring, polygon: usize, index: usize) -> Result<Vec<Point2>, DataError> {
    if let Some(p) = ring.points.iter().find(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return Err(DataError::NonFiniteCoordinate {
            polygon,
            ring: index,
            x: p.x,
            y: p.y,
        });
    }
    let mut points = ring.points.clone();
    dedup_ring(&mut points);
    if points.len() < 3 {
        return Err(DataError::TooFewPoints {
            polygon,
            ring: index,
            count: points.len(),
        });
    }
    Ok(points)
}

/// Drops consecutive duplicates, treating the ring as cyclic.
pub(crate) fn dedup_ring(points: &mut Vec<Point2>) {
    points.dedup();
    while points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
}

pub(crate) fn has_zero_area(points: &[Point2]) -> bool {
    is_collinear(points) || signed_area_2d(points) == 0.0
}

/// Builds a ring with the requested orientation.
pub(crate) fn orient(mut points: Vec<Point2>, ccw: bool) -> Ring {
    if (signed_area_2d(&points) > 0.0) != ccw {
        points.reverse();
    }
    Ring::new(points)
}

/// Prepares one boolean operand: every usable ring, with outer rings
/// counter-clockwise and holes clockwise.
///
/// Preparation is forgiving. Rings with fewer than three distinct points or
/// with all points on one line are skipped (a polygon whose outer ring is
/// skipped loses its holes too). Self-intersecting rings are kept as they
/// are; rings with zero net area keep their orientation.
pub(crate) fn prepare_operand(set: &PolygonSet) -> Result<Vec<Vec<Point2>>, DataError> {
    let mut rings = Vec::new();
    for (index, polygon) in set.iter().enumerate() {
        let Some(outer) = prepare_ring(&polygon.outer, index, 0, true)? else {
            debug!(polygon = index, "skipping polygon with degenerate outer ring");
            continue;
        };
        rings.push(outer);
        for (k, hole) in polygon.holes.iter().enumerate() {
            match prepare_ring(hole, index, k + 1, false)? {
                Some(points) => rings.push(points),
                None => debug!(polygon = index, ring = k + 1, "skipping degenerate hole"),
            }
        }
    }
    Ok(rings)
}

fn prepare_ring(ring: &Ring, polygon: usize, index: usize, outer: bool) -> Result<Option<Vec<Point2>>, DataError> {
    let mut points = match clean_ring(ring, polygon, index) {
        Ok(points) => points,
        Err(DataError::TooFewPoints { .. }) => return Ok(None),
        Err(e) => return Err(e),
    };
    if is_collinear(&points) {
        return Ok(None);
    }
    let area = signed_area_2d(&points);
    if (outer && area < 0.0) || (!outer && area > 0.0) {
        points.reverse();
    }
    Ok(Some(points))
}
