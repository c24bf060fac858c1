mod nest;
mod normalize;
mod self_intersect;
pub(crate) mod split;

use tracing::{debug, warn};

use crate::error::DataError;
use crate::geometry::{Polygon, PolygonSet, Ring};
use crate::math::polygon_2d::is_collinear;

pub use nest::nest_rings;
pub use normalize::normalize;
pub use self_intersect::{find_self_intersection, node_ring};

pub(crate) use normalize::prepare_operand;

use nest::{encloses, nest_loops};
use normalize::{clean_ring, has_zero_area, normalize_at, orient};
use split::split_at_repeated_vertices;

/// How [`validate`] treats defective rings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValidationMode {
    /// Any defect is an error.
    #[default]
    Strict,
    /// Defects are repaired where a deterministic repair exists.
    Lenient,
}

/// Validates and normalizes a polygon set.
///
/// In [`ValidationMode::Strict`] every polygon is normalized and an outer
/// ring that touches or crosses itself is rejected.
///
/// In [`ValidationMode::Lenient`]:
///
/// 1. every self-intersection point of an outer ring is inserted as a vertex,
/// 2. the ring is cut at each repeated vertex into simple loops,
/// 3. loops with zero area are discarded,
/// 4. loops are nested by containment depth: even depth loops become outer
///    rings, odd depth loops become holes of the smallest loop around them,
/// 5. the original holes attach to the smallest resulting outer ring that
///    contains them, or to the largest one if none does.
///
/// Degenerate holes are dropped, and so is a polygon whose outer ring is
/// degenerate.
///
/// # Errors
///
/// Returns a [`DataError`] for non-finite coordinates in either mode, and in
/// strict mode for rings with fewer than three distinct points, rings with
/// zero area, and self-intersecting outer rings.
pub fn validate(set: &PolygonSet, mode: ValidationMode) -> Result<PolygonSet, DataError> {
    match mode {
        ValidationMode::Strict => validate_strict(set),
        ValidationMode::Lenient => validate_lenient(set),
    }
}

fn validate_strict(set: &PolygonSet) -> Result<PolygonSet, DataError> {
    let mut out = PolygonSet::empty();
    for (index, polygon) in set.iter().enumerate() {
        let normalized = normalize_at(polygon, index)?;
        if let Some(p) = find_self_intersection(&normalized.outer.points) {
            return Err(DataError::SelfIntersection {
                polygon: index,
                x: p.x,
                y: p.y,
            });
        }
        out.push(normalized);
    }
    Ok(out)
}

fn validate_lenient(set: &PolygonSet) -> Result<PolygonSet, DataError> {
    let mut out = PolygonSet::empty();
    for (index, polygon) in set.iter().enumerate() {
        let repaired = repair_polygon(polygon, index)?;
        if repaired.is_empty() {
            debug!(polygon = index, "dropping degenerate polygon");
        } else if repaired.len() > 1 {
            warn!(polygon = index, pieces = repaired.len(), "split self-intersecting polygon");
        }
        for piece in repaired {
            out.push(piece);
        }
    }
    Ok(out)
}

fn repair_polygon(polygon: &Polygon, index: usize) -> Result<Vec<Polygon>, DataError> {
    let outer = match clean_ring(&polygon.outer, index, 0) {
        Ok(points) if !is_collinear(&points) => points,
        Ok(_) | Err(DataError::TooFewPoints { .. }) => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut holes: Vec<Ring> = Vec::with_capacity(polygon.holes.len());
    for (k, hole) in polygon.holes.iter().enumerate() {
        match clean_ring(hole, index, k + 1) {
            Ok(points) if !has_zero_area(&points) => holes.push(orient(points, false)),
            Ok(_) | Err(DataError::TooFewPoints { .. }) => {
                debug!(polygon = index, ring = k + 1, "dropping degenerate hole");
            }
            Err(e) => return Err(e),
        }
    }

    let noded = node_ring(&outer);
    let loops: Vec<_> = split_at_repeated_vertices(&noded, |p| ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits()))
        .into_iter()
        .filter(|l| l.len() >= 3 && !has_zero_area(l))
        .collect();
    if loops.is_empty() {
        return Ok(Vec::new());
    }

    let mut pieces = nest_loops(loops);
    attach_holes(&mut pieces, holes);
    Ok(pieces)
}

fn attach_holes(pieces: &mut [Polygon], holes: Vec<Ring>) {
    if pieces.is_empty() {
        return;
    }
    let areas: Vec<f64> = pieces.iter().map(|p| p.outer.area()).collect();
    for hole in holes {
        let smallest_container = (0..pieces.len())
            .filter(|&k| encloses(&pieces[k].outer.points, &hole.points))
            .min_by(|&a, &b| areas[a].total_cmp(&areas[b]));
        let target = smallest_container.unwrap_or_else(|| {
            (0..pieces.len())
                .max_by(|&a, &b| areas[a].total_cmp(&areas[b]))
                .unwrap_or(0)
        });
        pieces[target].holes.push(hole);
    }
}

/// Returns `true` if every ring of the set is simple enough for strict
/// validation, without building the validated copy.
#[must_use]
pub fn is_valid(set: &PolygonSet) -> bool {
    validate_strict(set).is_ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;

    fn set_of(rings: Vec<Ring>) -> PolygonSet {
        PolygonSet::new(rings.into_iter().map(Polygon::from_outer).collect())
    }

    fn bowtie() -> Ring {
        Ring::from_coords(&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0)])
    }

    #[test]
    fn strict_accepts_simple_polygons() {
        let set = set_of(vec![Ring::rectangle(0.0, 0.0, 1.0, 1.0).reversed()]);
        let valid = validate(&set, ValidationMode::Strict).unwrap();
        assert!(valid.polygons[0].outer.is_ccw());
        assert!(is_valid(&set));
    }

    #[test]
    fn strict_rejects_crossing_outer() {
        let crossed = Ring::from_coords(&[(0.0, 0.0), (4.0, 4.0), (4.0, 0.0), (1.0, 3.0)]);
        let err = validate(&set_of(vec![crossed]), ValidationMode::Strict).unwrap_err();
        let DataError::SelfIntersection { polygon, x, y } = err else {
            panic!("unexpected error {err:?}");
        };
        assert_eq!(polygon, 0);
        assert!((x - 2.0).abs() < 1e-12 && (y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn strict_rejects_symmetric_bowtie_as_zero_area() {
        let err = validate(&set_of(vec![bowtie()]), ValidationMode::Strict).unwrap_err();
        assert_eq!(err, DataError::ZeroArea { polygon: 0, ring: 0 });
    }

    #[test]
    fn strict_rejects_zero_area_hole() {
        let poly = Polygon::new(
            Ring::rectangle(0.0, 0.0, 4.0, 4.0),
            vec![Ring::from_coords(&[(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)])],
        );
        let err = validate(&PolygonSet::new(vec![poly]), ValidationMode::Strict).unwrap_err();
        assert_eq!(err, DataError::ZeroArea { polygon: 0, ring: 1 });
    }

    #[test]
    fn lenient_splits_bowtie_into_two_outers() {
        let valid = validate(&set_of(vec![bowtie()]), ValidationMode::Lenient).unwrap();
        assert_eq!(valid.len(), 2);
        for poly in &valid {
            assert!(poly.outer.is_ccw());
            assert!((poly.area() - 1.0).abs() < 1e-12);
        }
        assert!(is_valid(&valid));
    }

    #[test]
    fn lenient_pinched_loop_becomes_hole() {
        // Outer boundary that touches itself at (0, 2) around an inner triangle.
        let ring = Ring::from_coords(&[
            (0.0, 0.0),
            (6.0, 0.0),
            (6.0, 6.0),
            (0.0, 6.0),
            (0.0, 2.0),
            (3.0, 2.0),
            (3.0, 4.0),
            (0.0, 2.0),
        ]);
        let valid = validate(&set_of(vec![ring]), ValidationMode::Lenient).unwrap();
        assert_eq!(valid.len(), 1);
        assert_eq!(valid.polygons[0].holes.len(), 1);
        assert!((valid.area() - 33.0).abs() < 1e-12);
    }

    #[test]
    fn lenient_drops_degenerate_parts() {
        let poly = Polygon::new(
            Ring::rectangle(0.0, 0.0, 4.0, 4.0),
            vec![Ring::from_coords(&[(1.0, 1.0), (1.0, 1.0), (2.0, 1.0)])],
        );
        let flat = Polygon::from_outer(Ring::from_coords(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]));
        let valid = validate(&PolygonSet::new(vec![poly, flat]), ValidationMode::Lenient).unwrap();
        assert_eq!(valid.len(), 1);
        assert!(valid.polygons[0].holes.is_empty());
    }

    #[test]
    fn lenient_attaches_holes_to_smallest_container() {
        let outer = Ring::from_coords(&[(0.0, 0.0), (4.0, 4.0), (4.0, 0.0), (0.0, 4.0)]);
        let hole = Ring::from_coords(&[(3.0, 1.5), (3.5, 2.0), (3.0, 2.5)]);
        let valid = validate(&PolygonSet::new(vec![Polygon::new(outer, vec![hole])]), ValidationMode::Lenient)
            .unwrap();
        assert_eq!(valid.len(), 2);
        let with_hole = valid.iter().find(|p| !p.holes.is_empty()).unwrap();
        assert!(with_hole.outer.points.contains(&Point2::new(4.0, 4.0)));
        assert!(with_hole.holes[0].signed_area() < 0.0);
    }

    #[test]
    fn lenient_still_rejects_nan() {
        let ring = Ring::from_coords(&[(0.0, 0.0), (1.0, f64::INFINITY), (1.0, 1.0)]);
        assert!(matches!(
            validate(&set_of(vec![ring]), ValidationMode::Lenient),
            Err(DataError::NonFiniteCoordinate { .. })
        ));
    }
}
