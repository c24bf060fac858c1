use slotmap::SecondaryMap;
use tracing::debug;

use crate::error::GeometryError;
use crate::geometry::{Polygon, PolygonSet, Ring};
use crate::operations::validate::split::split_at_repeated_vertices;

use super::arrangement::{Arrangement, FaceId, HalfEdgeId, VertexId};
use super::merge::Regions;
use super::snap::{doubled_area, orient, winding_number, GridPoint, InputVertices, SnapGrid};

/// A closed boundary loop of one region, in grid coordinates.
struct BoundaryLoop {
    region: usize,
    points: Vec<GridPoint>,
    doubled_area: i128,
}

/// Traces the boundaries of the kept regions and builds the result set.
///
/// Rings whose absolute area is below `min_area` are dropped. Vertices that
/// came straight from an input vertex get its original coordinates back; the
/// rest are placed on the grid. The result is in canonical form.
///
/// # Errors
///
/// Returns [`GeometryError::OpenBoundary`] if a boundary walk does not close
/// and [`GeometryError::UnplacedHole`] if a hole cannot be assigned to an
/// outer ring of its region.
pub fn assemble_result(
    arrangement: &Arrangement,
    kept: &SecondaryMap<FaceId, bool>,
    regions: &Regions,
    grid: &SnapGrid,
    inputs: &InputVertices,
    min_area: f64,
) -> Result<PolygonSet, GeometryError> {
    let cycles = trace_boundaries(arrangement, kept, regions)?;

    let mut outers: Vec<BoundaryLoop> = Vec::new();
    let mut holes: Vec<BoundaryLoop> = Vec::new();
    for (region, cycle) in cycles {
        for piece in split_at_repeated_vertices(&cycle, |v| *v) {
            let mut points: Vec<GridPoint> = piece.iter().map(|&v| arrangement.point(v)).collect();
            remove_collinear(&mut points);
            if points.len() < 3 {
                continue;
            }
            let area2 = doubled_area(&points);
            let area = grid.area_to_world(area2).abs();
            if area2 == 0 || area < min_area {
                debug!(area, "dropping sliver ring");
                continue;
            }
            let boundary = BoundaryLoop {
                region,
                points,
                doubled_area: area2,
            };
            if area2 > 0 {
                outers.push(boundary);
            } else {
                holes.push(boundary);
            }
        }
    }

    let mut outers_of_region: Vec<Vec<usize>> = vec![Vec::new(); regions.count()];
    for (i, outer) in outers.iter().enumerate() {
        outers_of_region[outer.region].push(i);
    }

    let mut holes_of_outer: Vec<Vec<usize>> = vec![Vec::new(); outers.len()];
    for (k, hole) in holes.iter().enumerate() {
        let owner = match outers_of_region[hole.region].as_slice() {
            [] => {
                debug!("dropping hole of a region without an outer ring");
                continue;
            }
            [only] => *only,
            candidates => smallest_enclosing(hole, candidates, &outers).ok_or(GeometryError::UnplacedHole)?,
        };
        holes_of_outer[owner].push(k);
    }

    let to_ring = |points: &[GridPoint]| {
        Ring::new(points.iter().map(|&g| inputs.to_world(grid, g)).collect())
    };
    let polygons: PolygonSet = outers
        .iter()
        .zip(&holes_of_outer)
        .map(|(outer, hole_ids)| {
            Polygon::new(
                to_ring(&outer.points),
                hole_ids.iter().map(|&k| to_ring(&holes[k].points)).collect(),
            )
        })
        .collect();
    Ok(polygons.canonical())
}

/// Walks every half-edge with a kept face on its left and a dropped face on
/// its right. At each vertex the walk turns clockwise past edges interior to
/// the region, so each cycle follows one region's boundary with the region
/// on the left: outer boundaries come out counter-clockwise and holes
/// clockwise.
fn trace_boundaries(
    arrangement: &Arrangement,
    kept: &SecondaryMap<FaceId, bool>,
    regions: &Regions,
) -> Result<Vec<(usize, Vec<VertexId>)>, GeometryError> {
    let is_kept = |f: FaceId| kept.get(f).copied().unwrap_or(false);
    let is_interface =
        |h: HalfEdgeId| is_kept(arrangement.face(h)) && !is_kept(arrangement.face(arrangement.twin(h)));

    let mut visited: SecondaryMap<HalfEdgeId, ()> = SecondaryMap::new();
    let mut cycles = Vec::new();
    let limit = arrangement.half_edges.len();

    for start in arrangement.half_edges.keys() {
        if visited.contains_key(start) || !is_interface(start) {
            continue;
        }
        let region = regions
            .region_of(arrangement.face(start))
            .ok_or_else(|| GeometryError::Degenerate("kept face without a region".into()))?;

        let mut vertices = Vec::new();
        let mut current = start;
        loop {
            visited.insert(current, ());
            vertices.push(arrangement.origin(current));
            current = next_interface(arrangement, current, &is_interface)?;
            if current == start {
                break;
            }
            if visited.contains_key(current) || vertices.len() > limit {
                return Err(GeometryError::OpenBoundary);
            }
        }
        cycles.push((region, vertices));
    }
    debug!(cycles = cycles.len(), "traced region boundaries");
    Ok(cycles)
}

fn next_interface(
    arrangement: &Arrangement,
    h: HalfEdgeId,
    is_interface: &impl Fn(HalfEdgeId) -> bool,
) -> Result<HalfEdgeId, GeometryError> {
    let mut candidate = arrangement.next(h);
    for _ in 0..arrangement.degree(arrangement.origin(candidate)) {
        if is_interface(candidate) {
            return Ok(candidate);
        }
        candidate = arrangement.next(arrangement.twin(candidate));
    }
    Err(GeometryError::OpenBoundary)
}

/// Removes vertices where the ring goes straight on or doubles back, until
/// none is left.
fn remove_collinear(points: &mut Vec<GridPoint>) {
    let mut changed = true;
    while changed && points.len() >= 3 {
        changed = false;
        let mut out: Vec<GridPoint> = Vec::with_capacity(points.len());
        for &p in points.iter() {
            while out.len() >= 2 && orient(out[out.len() - 2], out[out.len() - 1], p) == 0 {
                out.pop();
                changed = true;
            }
            if out.last() == Some(&p) {
                changed = true;
                continue;
            }
            out.push(p);
        }
        while out.len() >= 3 {
            let n = out.len();
            if out[n - 1] == out[0] || orient(out[n - 2], out[n - 1], out[0]) == 0 {
                out.pop();
            } else if orient(out[n - 1], out[0], out[1]) == 0 {
                out.remove(0);
            } else {
                break;
            }
            changed = true;
        }
        *points = out;
    }
}

/// Index of the smallest outer loop that contains the hole, tested at the
/// midpoint of the hole's first edge in doubled coordinates.
fn smallest_enclosing(hole: &BoundaryLoop, candidates: &[usize], outers: &[BoundaryLoop]) -> Option<usize> {
    let doubled = |g: GridPoint| GridPoint::new(g.x * 2, g.y * 2);
    let (a, b) = (hole.points[0], hole.points[1]);
    let probe = GridPoint::new(a.x + b.x, a.y + b.y);
    candidates
        .iter()
        .copied()
        .filter(|&i| {
            let ring: Vec<GridPoint> = outers[i].points.iter().map(|&g| doubled(g)).collect();
            winding_number(probe, &ring) != 0
        })
        .min_by_key(|&i| outers[i].doubled_area)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn g(x: i64, y: i64) -> GridPoint {
        GridPoint::new(x, y)
    }

    #[test]
    fn collinear_vertices_are_removed() {
        let mut points = vec![g(0, 0), g(1, 0), g(2, 0), g(2, 1), g(2, 2), g(0, 2), g(0, 1)];
        remove_collinear(&mut points);
        assert_eq!(points, vec![g(0, 0), g(2, 0), g(2, 2), g(0, 2)]);
    }

    #[test]
    fn spikes_are_removed() {
        let mut points = vec![g(0, 0), g(4, 0), g(6, 0), g(4, 0), g(4, 4), g(0, 4)];
        remove_collinear(&mut points);
        assert_eq!(points, vec![g(0, 0), g(4, 0), g(4, 4), g(0, 4)]);
    }

    #[test]
    fn wrap_around_vertex_is_removed() {
        let mut points = vec![g(1, 0), g(2, 0), g(2, 2), g(0, 2), g(0, 0)];
        remove_collinear(&mut points);
        assert_eq!(points, vec![g(2, 0), g(2, 2), g(0, 2), g(0, 0)]);
    }

    #[test]
    fn flat_loop_collapses() {
        let mut points = vec![g(0, 0), g(3, 0), g(1, 0)];
        remove_collinear(&mut points);
        assert!(points.len() < 3);
    }
}
