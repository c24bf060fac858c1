use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::geometry::{FillRule, PolygonSet};
use crate::math::{Bounds, Point2};
use crate::operations::validate::prepare_operand;

use super::arrangement::Arrangement;
use super::assemble::assemble_result;
use super::classify::classify_faces;
use super::merge::merge_regions;
use super::noding::{node_segments, Segment};
use super::options::BooleanOptions;
use super::select::{select_faces, Operation};
use super::snap::{InputVertices, SnapGrid};

/// Executes a boolean operation on two polygon sets.
///
/// Runs the full pipeline: input preparation, snapping, noding, arrangement
/// construction, face classification, selection, region merging and output
/// assembly. Neither input is modified.
///
/// # Errors
///
/// Returns a [`DataError`](crate::error::DataError) for invalid options or
/// non-finite input coordinates, and a
/// [`GeometryError`](crate::error::GeometryError) if the arrangement cannot
/// be built or traced.
#[instrument(skip(source, clip, options), fields(source_polygons = source.len(), clip_polygons = clip.len()))]
pub fn boolean_execute(
    source: &PolygonSet,
    clip: &PolygonSet,
    op: Operation,
    options: &BooleanOptions,
) -> Result<PolygonSet> {
    options.validate()?;

    // Step 1: drop degenerate rings and orient the rest
    let operands = [prepare_operand(source)?, prepare_operand(clip)?];
    let extents = [ring_bounds(&operands[0]), ring_bounds(&operands[1])];

    // Step 2: bounding-box early-outs
    let combined = match extents {
        [Some(a), Some(b)] => {
            if op == Operation::Intersect && !a.overlaps(&b) {
                debug!("operands are disjoint");
                return Ok(PolygonSet::empty());
            }
            a.union(&b)
        }
        [Some(only), None] | [None, Some(only)] => {
            if op == Operation::Intersect {
                return Ok(PolygonSet::empty());
            }
            only
        }
        [None, None] => return Ok(PolygonSet::empty()),
    };

    // Step 3: snap every ring edge to the grid
    let grid = SnapGrid::new(&combined, options.snap_tolerance)?;
    let mut segments = Vec::new();
    let mut inputs = InputVertices::new();
    for (operand, rings) in operands.iter().enumerate() {
        for ring in rings {
            push_ring_segments(&mut segments, &mut inputs, ring, operand, &grid);
        }
    }
    debug!(segments = segments.len(), cell = grid.cell(), "snapped input edges");

    // Step 4: node until no two segments cross
    let noded = node_segments(segments)?;
    if noded.is_empty() {
        debug!("all input edges cancelled");
        return Ok(PolygonSet::empty());
    }

    // Step 5: build and label the planar arrangement
    let mut arrangement = Arrangement::build(&noded)?;
    debug!(
        vertices = arrangement.vertices.len(),
        half_edges = arrangement.half_edges.len(),
        faces = arrangement.faces.len(),
        "built arrangement"
    );
    classify_faces(&mut arrangement, options.fill_rule)?;

    // Step 6: pick result faces and trace them
    let kept = select_faces(&arrangement, op)?;
    let regions = merge_regions(&arrangement, &kept);
    let diagonal = combined.diagonal();
    let min_area = options.area_tolerance * diagonal * diagonal;
    let result = assemble_result(&arrangement, &kept, &regions, &grid, &inputs, min_area)?;

    info!(regions = regions.count(), polygons = result.len(), "boolean operation finished");
    Ok(result)
}

fn ring_bounds(rings: &[Vec<Point2>]) -> Option<Bounds> {
    Bounds::of_points(rings.iter().flatten())
}

/// Appends the snapped edges of a closed ring and records where its vertices
/// came from. Each edge counts once for its operand; edges that collapse to a
/// point are skipped.
fn push_ring_segments(
    segments: &mut Vec<Segment>,
    inputs: &mut InputVertices,
    ring: &[Point2],
    operand: usize,
    grid: &SnapGrid,
) {
    let mut snapped = Vec::with_capacity(ring.len());
    for p in ring {
        let g = grid.snap(p);
        inputs.insert(g, *p);
        snapped.push(g);
    }
    let mut wind = [0, 0];
    wind[operand] = 1;
    for (i, &a) in snapped.iter().enumerate() {
        let b = snapped[(i + 1) % snapped.len()];
        if a != b {
            segments.push(Segment::new(a, b, wind));
        }
    }
}

/// A configurable boolean operation between a source and a clip set.
///
/// ```
/// use polyset::geometry::{Polygon, PolygonSet, Ring};
/// use polyset::operations::boolean::{BooleanOperation, Operation};
///
/// let a = PolygonSet::new(vec![Polygon::from_outer(Ring::rectangle(0.0, 0.0, 2.0, 2.0))]);
/// let b = PolygonSet::new(vec![Polygon::from_outer(Ring::rectangle(1.0, 1.0, 3.0, 3.0))]);
/// let common = BooleanOperation::new(&a, &b, Operation::Intersect).execute().unwrap();
/// assert!((common.area() - 1.0).abs() < 1e-12);
/// ```
pub struct BooleanOperation<'a> {
    source: &'a PolygonSet,
    clip: &'a PolygonSet,
    op: Operation,
    options: BooleanOptions,
}

impl<'a> BooleanOperation<'a> {
    /// Creates a new `BooleanOperation` with default options.
    #[must_use]
    pub fn new(source: &'a PolygonSet, clip: &'a PolygonSet, op: Operation) -> Self {
        Self {
            source,
            clip,
            op,
            options: BooleanOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: BooleanOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_fill_rule(mut self, fill_rule: FillRule) -> Self {
        self.options.fill_rule = fill_rule;
        self
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// See [`boolean_execute`].
    pub fn execute(&self) -> Result<PolygonSet> {
        boolean_execute(self.source, self.clip, self.op, &self.options)
    }
}

/// Computes `op` over two polygon sets with default options.
///
/// # Errors
///
/// See [`boolean_execute`].
pub fn boolean_op(source: &PolygonSet, clip: &PolygonSet, op: Operation) -> Result<PolygonSet> {
    boolean_execute(source, clip, op, &BooleanOptions::default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::error::{DataError, PolysetError};
    use crate::geometry::{Polygon, Ring};

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> PolygonSet {
        PolygonSet::new(vec![Polygon::from_outer(Ring::rectangle(x0, y0, x1, y1))])
    }

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn overlapping_squares() {
        let a = square(0.0, 0.0, 10.0, 10.0);
        let b = square(5.0, 5.0, 15.0, 15.0);

        let intersect = boolean_op(&a, &b, Operation::Intersect).unwrap();
        assert_eq!(intersect.len(), 1);
        assert_relative_eq!(intersect.area(), 25.0);
        assert_eq!(intersect.polygons[0].outer.len(), 4);

        let union = boolean_op(&a, &b, Operation::Union).unwrap();
        assert_eq!(union.len(), 1);
        assert_relative_eq!(union.area(), 175.0);
        assert_eq!(union.polygons[0].outer.len(), 8);

        let xor = boolean_op(&a, &b, Operation::Xor).unwrap();
        assert_eq!(xor.len(), 2);
        assert_relative_eq!(xor.area(), 150.0);

        let difference = boolean_op(&a, &b, Operation::Difference).unwrap();
        assert_eq!(difference.len(), 1);
        assert_relative_eq!(difference.area(), 75.0);
        assert_eq!(difference.polygons[0].outer.len(), 6);
    }

    #[test]
    fn clip_inside_hole_misses_source() {
        let outer = Ring::rectangle(0.0, 0.0, 10.0, 10.0);
        let hole = Ring::rectangle(3.0, 3.0, 7.0, 7.0);
        let a = PolygonSet::new(vec![Polygon::new(outer, vec![hole])]);
        let b = square(4.0, 4.0, 6.0, 6.0);

        assert!(boolean_op(&a, &b, Operation::Intersect).unwrap().is_empty());

        let union = boolean_op(&a, &b, Operation::Union).unwrap();
        assert_eq!(union.len(), 2);
        assert_relative_eq!(union.area(), 100.0 - 16.0 + 4.0);
        let framed = union.iter().find(|poly| poly.holes.len() == 1).unwrap();
        assert_relative_eq!(framed.area(), 84.0);
    }

    #[test]
    fn difference_cuts_a_hole() {
        let a = square(0.0, 0.0, 10.0, 10.0);
        let b = square(2.0, 2.0, 4.0, 4.0);
        let result = boolean_op(&a, &b, Operation::Difference).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.polygons[0].holes.len(), 1);
        assert!(result.polygons[0].holes[0].signed_area() < 0.0);
        assert_relative_eq!(result.area(), 96.0);
    }

    #[test]
    fn shared_edge_union_has_four_vertices() {
        let a = square(0.0, 0.0, 1.0, 1.0);
        let b = square(1.0, 0.0, 2.0, 1.0);
        let union = boolean_op(&a, &b, Operation::Union).unwrap();
        assert_eq!(union.len(), 1);
        assert_eq!(union.polygons[0].outer.points, vec![p(0.0, 0.0), p(2.0, 0.0), p(2.0, 1.0), p(0.0, 1.0)]);
    }

    #[test]
    fn corner_touch_stays_two_polygons() {
        let a = square(0.0, 0.0, 1.0, 1.0);
        let b = square(1.0, 1.0, 2.0, 2.0);
        let union = boolean_op(&a, &b, Operation::Union).unwrap();
        assert_eq!(union.len(), 2);
        assert!(boolean_op(&a, &b, Operation::Intersect).unwrap().is_empty());
    }

    #[test]
    fn disjoint_operands() {
        let a = square(0.0, 0.0, 1.0, 1.0);
        let b = square(5.0, 5.0, 6.0, 6.0);
        assert!(boolean_op(&a, &b, Operation::Intersect).unwrap().is_empty());
        assert_eq!(boolean_op(&a, &b, Operation::Union).unwrap().len(), 2);
        assert_eq!(boolean_op(&a, &b, Operation::Difference).unwrap(), a);
    }

    #[test]
    fn empty_operands() {
        let a = square(0.0, 0.0, 1.0, 1.0);
        let empty = PolygonSet::empty();
        assert!(boolean_op(&empty, &empty, Operation::Union).unwrap().is_empty());
        assert!(boolean_op(&a, &empty, Operation::Intersect).unwrap().is_empty());
        assert_eq!(boolean_op(&empty, &a, Operation::Union).unwrap(), a);
        assert_eq!(boolean_op(&a, &empty, Operation::Xor).unwrap(), a);
    }

    #[test]
    fn identical_operands() {
        let a = square(0.0, 0.0, 3.0, 2.0);
        assert_eq!(boolean_op(&a, &a, Operation::Union).unwrap(), a);
        assert_eq!(boolean_op(&a, &a, Operation::Intersect).unwrap(), a);
        assert!(boolean_op(&a, &a, Operation::Xor).unwrap().is_empty());
        assert!(boolean_op(&a, &a, Operation::Difference).unwrap().is_empty());
    }

    #[test]
    fn clockwise_input_is_reoriented() {
        let cw = PolygonSet::new(vec![Polygon::from_outer(Ring::rectangle(0.0, 0.0, 4.0, 4.0).reversed())]);
        let b = square(2.0, 0.0, 6.0, 4.0);
        let result = boolean_op(&cw, &b, Operation::Intersect).unwrap();
        assert_relative_eq!(result.area(), 8.0);
    }

    #[test]
    fn fill_rule_applies_to_overlapping_polygons() {
        let a = PolygonSet::new(vec![
            Polygon::from_outer(Ring::rectangle(0.0, 0.0, 4.0, 4.0)),
            Polygon::from_outer(Ring::rectangle(2.0, 0.0, 6.0, 4.0)),
        ]);
        let empty = PolygonSet::empty();

        let nonzero = BooleanOperation::new(&a, &empty, Operation::Union).execute().unwrap();
        assert_relative_eq!(nonzero.area(), 24.0);

        let even_odd = BooleanOperation::new(&a, &empty, Operation::Union)
            .with_fill_rule(FillRule::EvenOdd)
            .execute()
            .unwrap();
        assert_eq!(even_odd.len(), 2);
        assert_relative_eq!(even_odd.area(), 16.0);
    }

    #[test]
    fn non_finite_input_is_a_data_error() {
        let bad = PolygonSet::new(vec![Polygon::from_outer(Ring::new(vec![
            p(0.0, 0.0),
            p(f64::NAN, 0.0),
            p(1.0, 1.0),
        ]))]);
        let a = square(0.0, 0.0, 1.0, 1.0);
        assert!(matches!(
            boolean_op(&bad, &a, Operation::Union),
            Err(PolysetError::Data(DataError::NonFiniteCoordinate { .. }))
        ));
    }

    #[test]
    fn invalid_options_are_rejected() {
        let a = square(0.0, 0.0, 1.0, 1.0);
        let options = BooleanOptions::default().with_snap_tolerance(2.0);
        let result = BooleanOperation::new(&a, &a, Operation::Union).with_options(options).execute();
        assert!(matches!(
            result,
            Err(PolysetError::Data(DataError::InvalidParameter { parameter: "snap_tolerance", .. }))
        ));
    }

    #[test]
    fn area_tolerance_drops_thin_ring() {
        let a = square(0.0, 0.0, 10.0, 10.0);
        let b = square(0.0, 0.0, 10.0, 10.001);

        let kept = boolean_op(&a, &b, Operation::Xor).unwrap();
        assert_eq!(kept.len(), 1);
        assert_relative_eq!(kept.area(), 0.01, max_relative = 1e-4);

        let dropped = BooleanOperation::new(&a, &b, Operation::Xor)
            .with_options(BooleanOptions::default().with_area_tolerance(1e-3))
            .execute()
            .unwrap();
        assert!(dropped.is_empty());
    }

    #[test]
    fn input_vertices_are_not_moved_by_snapping() {
        let a = square(0.1, 0.1, 0.3, 0.7);
        assert_eq!(boolean_op(&a, &a, Operation::Union).unwrap(), a);

        let b = square(0.2, 0.3, 0.5, 0.9);
        let union = boolean_op(&a, &b, Operation::Union).unwrap();
        for corner in [p(0.1, 0.1), p(0.3, 0.1), p(0.5, 0.9), p(0.2, 0.9)] {
            assert!(union.polygons[0].outer.points.contains(&corner), "{corner:?} moved");
        }
    }

    #[test]
    fn coarse_snap_removes_sliver() {
        let a = square(0.0, 0.0, 10.0, 10.0);
        let b = square(0.0, 0.0, 10.000_000_001, 10.0);
        let xor = BooleanOperation::new(&a, &b, Operation::Xor)
            .with_options(BooleanOptions::default().with_snap_tolerance(1e-6))
            .execute()
            .unwrap();
        assert!(xor.is_empty());
    }
}
