use std::collections::VecDeque;

use slotmap::SecondaryMap;
use tracing::debug;

use crate::error::GeometryError;
use crate::geometry::FillRule;

use super::arrangement::{Arrangement, FaceId};

/// Assigns every face its winding number in each operand and the matching
/// fill-rule membership.
///
/// Windings spread outward from the unbounded face, which has winding zero:
/// crossing a half-edge from its right face to its left face adds the
/// half-edge's contribution. The resulting numbers equal the winding number
/// of any interior point of the face.
///
/// # Errors
///
/// Returns [`GeometryError::InconsistentWinding`] if two paths reach a face
/// with different windings, and [`GeometryError::Degenerate`] if some face is
/// not reachable.
pub fn classify_faces(arrangement: &mut Arrangement, rule: FillRule) -> Result<(), GeometryError> {
    let windings = propagate_windings(arrangement)?;
    for (face, data) in &mut arrangement.faces {
        let Some(&winding) = windings.get(face) else {
            return Err(GeometryError::Degenerate("face unreachable from the unbounded face".into()));
        };
        data.winding = winding;
        data.inside = [rule.is_inside(winding[0]), rule.is_inside(winding[1])];
    }
    debug!(faces = arrangement.faces.len(), "classified faces");
    Ok(())
}

fn propagate_windings(arrangement: &Arrangement) -> Result<SecondaryMap<FaceId, [i32; 2]>, GeometryError> {
    let start = arrangement.unbounded();
    let mut windings: SecondaryMap<FaceId, [i32; 2]> = SecondaryMap::new();
    windings.insert(start, [0, 0]);
    let mut queue = VecDeque::from([start]);

    while let Some(face) = queue.pop_front() {
        let here = windings[face];
        for h in arrangement.face_boundary(face) {
            let edge = &arrangement.half_edges[h];
            let neighbor = arrangement.face(edge.twin);
            let expected = [here[0] - edge.wind[0], here[1] - edge.wind[1]];
            match windings.get(neighbor) {
                Some(&known) if known != expected => return Err(GeometryError::InconsistentWinding),
                Some(_) => {}
                None => {
                    windings.insert(neighbor, expected);
                    queue.push_back(neighbor);
                }
            }
        }
    }
    Ok(windings)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::boolean::noding::{node_segments, Segment};
    use crate::operations::boolean::snap::GridPoint;

    fn ring(points: &[(i64, i64)], operand: usize) -> Vec<Segment> {
        let n = points.len();
        (0..n)
            .map(|i| {
                let mut wind = [0, 0];
                wind[operand] = 1;
                let (a, b) = (points[i], points[(i + 1) % n]);
                Segment::new(GridPoint::new(a.0, a.1), GridPoint::new(b.0, b.1), wind)
            })
            .collect()
    }

    fn classified(segments: Vec<Segment>, rule: FillRule) -> Arrangement {
        let noded = node_segments(segments).unwrap();
        let mut arr = Arrangement::build(&noded).unwrap();
        classify_faces(&mut arr, rule).unwrap();
        arr
    }

    #[test]
    fn overlapping_squares_have_four_labels() {
        let mut segments = ring(&[(0, 0), (10, 0), (10, 10), (0, 10)], 0);
        segments.extend(ring(&[(5, 5), (15, 5), (15, 15), (5, 15)], 1));
        let arr = classified(segments, FillRule::NonZero);

        let mut labels: Vec<[bool; 2]> = arr.faces.values().map(|f| f.inside).collect();
        labels.sort_unstable();
        assert_eq!(
            labels,
            vec![[false, false], [false, true], [true, false], [true, true]]
        );
    }

    #[test]
    fn hole_face_is_outside() {
        let mut segments = ring(&[(0, 0), (10, 0), (10, 10), (0, 10)], 0);
        segments.extend(ring(&[(3, 3), (3, 7), (7, 7), (7, 3)], 0));
        let arr = classified(segments, FillRule::NonZero);
        let windings: Vec<i32> = arr.faces.values().map(|f| f.winding[0]).collect();
        assert_eq!(windings.iter().filter(|&&w| w == 1).count(), 1);
        assert_eq!(windings.iter().filter(|&&w| w == 0).count(), 2);
    }

    #[test]
    fn fill_rule_decides_double_cover() {
        let mut segments = ring(&[(0, 0), (4, 0), (4, 4), (0, 4)], 0);
        segments.extend(ring(&[(2, 2), (6, 2), (6, 6), (2, 6)], 0));

        let nonzero = classified(segments.clone(), FillRule::NonZero);
        assert_eq!(nonzero.faces.values().filter(|f| f.inside[0]).count(), 3);

        let even_odd = classified(segments, FillRule::EvenOdd);
        assert_eq!(even_odd.faces.values().filter(|f| f.inside[0]).count(), 2);
        assert!(even_odd.faces.values().any(|f| f.winding[0] == 2 && !f.inside[0]));
    }

    #[test]
    fn reversed_ring_has_negative_winding() {
        let segments = ring(&[(0, 0), (0, 4), (4, 4), (4, 0)], 1);
        let arr = classified(segments.clone(), FillRule::Positive);
        assert!(arr.faces.values().any(|f| f.winding[1] == -1 && !f.inside[1]));
        let arr = classified(segments, FillRule::NonZero);
        assert!(arr.faces.values().any(|f| f.inside[1]));
    }
}
