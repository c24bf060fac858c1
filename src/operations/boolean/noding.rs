use tracing::trace;

use crate::error::GeometryError;
use crate::math::bounds::{overlapping_pairs, Bounds};

use super::snap::{cross, orient, GridPoint};

/// Upper bound on snap-rounding rounds before giving up.
pub const MAX_ROUNDS: usize = 32;

/// A directed grid segment with its winding contribution per operand
/// (index 0 is the source, index 1 the clip).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub a: GridPoint,
    pub b: GridPoint,
    pub wind: [i32; 2],
}

impl Segment {
    #[must_use]
    pub fn new(a: GridPoint, b: GridPoint, wind: [i32; 2]) -> Self {
        Self { a, b, wind }
    }

    /// Same segment directed from its smaller to its larger endpoint.
    fn canonical(self) -> Self {
        if self.b < self.a {
            Self::new(self.b, self.a, [-self.wind[0], -self.wind[1]])
        } else {
            self
        }
    }

    fn bounds(&self) -> Bounds<i64> {
        Bounds::from_corners(self.a.x, self.a.y, self.b.x, self.b.y)
    }
}

/// Merges coincident segments, summing their winding contributions, and drops
/// the segments that no longer separate different windings.
///
/// The result is canonical (every segment directed from its smaller endpoint)
/// and sorted.
#[must_use]
pub fn merge_segments(segments: Vec<Segment>) -> Vec<Segment> {
    let mut sorted: Vec<Segment> = segments.into_iter().map(Segment::canonical).collect();
    sorted.sort_unstable_by_key(|s| (s.a, s.b));

    let mut merged: Vec<Segment> = Vec::with_capacity(sorted.len());
    for seg in sorted {
        match merged.last_mut() {
            Some(last) if last.a == seg.a && last.b == seg.b => {
                last.wind[0] += seg.wind[0];
                last.wind[1] += seg.wind[1];
            }
            _ => merged.push(seg),
        }
    }
    merged.retain(|s| s.wind != [0, 0]);
    merged
}

/// Nodes a segment soup by iterated snap rounding.
///
/// Each round finds every proper crossing, rounds it to the nearest grid
/// point and splits both segments there, and splits every segment whose
/// interior passes through the hot pixel (a square of half-width 3/8 cell)
/// of some vertex. Rounds repeat until nothing splits; the output segments
/// then meet only at shared endpoints.
///
/// # Errors
///
/// Returns [`GeometryError::NoConvergence`] if splits still occur after
/// [`MAX_ROUNDS`] rounds.
pub fn node_segments(segments: Vec<Segment>) -> Result<Vec<Segment>, GeometryError> {
    let mut segments = merge_segments(segments);
    for round in 1..=MAX_ROUNDS {
        let splits = find_splits(&segments);
        let split_count: usize = splits.iter().map(Vec::len).sum();
        trace!(round, segments = segments.len(), split_count, "snap rounding");
        if split_count == 0 {
            return Ok(segments);
        }
        segments = merge_segments(apply_splits(&segments, splits));
    }
    Err(GeometryError::NoConvergence { rounds: MAX_ROUNDS })
}

/// Collects the interior split points of every segment.
fn find_splits(segments: &[Segment]) -> Vec<Vec<GridPoint>> {
    let mut vertices: Vec<GridPoint> = segments.iter().flat_map(|s| [s.a, s.b]).collect();
    vertices.sort_unstable();
    vertices.dedup();

    // Segments and vertices share one sweep: segment boxes come first, then
    // the degenerate boxes of the vertices.
    let n = segments.len();
    let mut boxes: Vec<Bounds<i64>> = segments.iter().map(Segment::bounds).collect();
    boxes.extend(vertices.iter().map(|v| Bounds::from_corners(v.x, v.y, v.x, v.y)));

    let mut splits: Vec<Vec<GridPoint>> = vec![Vec::new(); n];
    for (i, j) in overlapping_pairs(&boxes) {
        if j < n {
            if let Some(p) = proper_crossing(&segments[i], &segments[j]) {
                for k in [i, j] {
                    if p != segments[k].a && p != segments[k].b {
                        splits[k].push(p);
                    }
                }
            }
        } else if i < n {
            let v = vertices[j - n];
            let seg = &segments[i];
            if v != seg.a && v != seg.b && passes_hot_pixel(seg, v) {
                splits[i].push(v);
            }
        }
    }
    splits
}

fn apply_splits(segments: &[Segment], splits: Vec<Vec<GridPoint>>) -> Vec<Segment> {
    let mut out = Vec::with_capacity(segments.len() * 2);
    for (seg, mut points) in segments.iter().zip(splits) {
        if points.is_empty() {
            out.push(*seg);
            continue;
        }
        let dx = i128::from(seg.b.x - seg.a.x);
        let dy = i128::from(seg.b.y - seg.a.y);
        points.sort_unstable_by_key(|p| {
            let t = i128::from(p.x - seg.a.x) * dx + i128::from(p.y - seg.a.y) * dy;
            (t, *p)
        });
        points.dedup();

        let mut prev = seg.a;
        for p in points.into_iter().chain(std::iter::once(seg.b)) {
            if p != prev {
                out.push(Segment::new(prev, p, seg.wind));
                prev = p;
            }
        }
    }
    out
}

/// Rounded intersection point of two segments that cross at a single point
/// interior to both.
fn proper_crossing(s: &Segment, t: &Segment) -> Option<GridPoint> {
    let o1 = orient(s.a, s.b, t.a).signum();
    let o2 = orient(s.a, s.b, t.b).signum();
    let o3 = orient(t.a, t.b, s.a).signum();
    let o4 = orient(t.a, t.b, s.b).signum();
    if o1 * o2 >= 0 || o3 * o4 >= 0 {
        return None;
    }

    let (sdx, sdy) = (i128::from(s.b.x - s.a.x), i128::from(s.b.y - s.a.y));
    let (tdx, tdy) = (i128::from(t.b.x - t.a.x), i128::from(t.b.y - t.a.y));
    let den = cross(sdx, sdy, tdx, tdy);
    let num = cross(
        i128::from(t.a.x - s.a.x),
        i128::from(t.a.y - s.a.y),
        tdx,
        tdy,
    );
    let x = round_div(i128::from(s.a.x) * den + sdx * num, den);
    let y = round_div(i128::from(s.a.y) * den + sdy * num, den);
    Some(GridPoint::new(i64::try_from(x).ok()?, i64::try_from(y).ok()?))
}

/// `n / d` rounded to the nearest integer, halves away from zero.
fn round_div(n: i128, d: i128) -> i128 {
    let (n, d) = if d < 0 { (-n, -d) } else { (n, d) };
    if n >= 0 {
        (2 * n + d) / (2 * d)
    } else {
        -((-2 * n + d) / (2 * d))
    }
}

/// Returns `true` if the segment passes through the closed square of
/// half-width 3/8 around `v`. Works in coordinates scaled by 8 so the square
/// corners are integers.
fn passes_hot_pixel(seg: &Segment, v: GridPoint) -> bool {
    let (ax, ay) = (i128::from(seg.a.x) * 8, i128::from(seg.a.y) * 8);
    let (bx, by) = (i128::from(seg.b.x) * 8, i128::from(seg.b.y) * 8);
    let (cx, cy) = (i128::from(v.x) * 8, i128::from(v.y) * 8);

    if ax.max(bx) < cx - 3 || ax.min(bx) > cx + 3 || ay.max(by) < cy - 3 || ay.min(by) > cy + 3 {
        return false;
    }

    let sides = [(-3, -3), (3, -3), (3, 3), (-3, 3)]
        .map(|(ox, oy)| cross(bx - ax, by - ay, cx + ox - ax, cy + oy - ay).signum());
    !(sides.iter().all(|&s| s > 0) || sides.iter().all(|&s| s < 0))
}
