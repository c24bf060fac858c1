use super::Point2;

/// Axis-aligned bounding box, generic over the coordinate type so it serves
/// both world coordinates (`f64`) and snapped grid coordinates (`i64`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<T = f64> {
    pub min_x: T,
    pub min_y: T,
    pub max_x: T,
    pub max_y: T,
}

impl<T: Copy + PartialOrd> Bounds<T> {
    /// Box spanning the two corner points in any order.
    #[must_use]
    pub fn from_corners(x0: T, y0: T, x1: T, y1: T) -> Self {
        let (min_x, max_x) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let (min_y, max_y) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Closed-interval overlap test.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    /// Smallest box containing both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min_x: pick(self.min_x, other.min_x, true),
            min_y: pick(self.min_y, other.min_y, true),
            max_x: pick(self.max_x, other.max_x, false),
            max_y: pick(self.max_y, other.max_y, false),
        }
    }
}

fn pick<T: PartialOrd>(a: T, b: T, smaller: bool) -> T {
    if (a <= b) == smaller {
        a
    } else {
        b
    }
}

impl Bounds<f64> {
    /// Bounding box of a point sequence, `None` when empty.
    #[must_use]
    pub fn of_points<'a>(points: impl IntoIterator<Item = &'a Point2>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self::from_corners(first.x, first.y, first.x, first.y);
        for p in iter {
            bounds.min_x = bounds.min_x.min(p.x);
            bounds.min_y = bounds.min_y.min(p.y);
            bounds.max_x = bounds.max_x.max(p.x);
            bounds.max_y = bounds.max_y.max(p.y);
        }
        Some(bounds)
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Length of the box diagonal.
    #[must_use]
    pub fn diagonal(&self) -> f64 {
        self.width().hypot(self.height())
    }
}

/// Sweep-line broad phase: returns every pair `(i, j)` with `i < j` whose
/// boxes overlap.
///
/// Boxes are visited in order of increasing `min_x`; an active list holds the
/// boxes whose x-extent still reaches the sweep position, and only active
/// boxes are tested against the incoming one.
///
/// The active list is scanned linearly, so the cost is `O(n log n + n·a)`
/// where `a` is the largest number of simultaneously active boxes. Inputs
/// with many edges spanning most of the x range degrade to `O(n²)`.
#[must_use]
pub fn overlapping_pairs<T: Copy + PartialOrd>(boxes: &[Bounds<T>]) -> Vec<(usize, usize)> {
    let mut order: Vec<usize> = (0..boxes.len()).collect();
    order.sort_by(|&a, &b| {
        boxes[a]
            .min_x
            .partial_cmp(&boxes[b].min_x)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });

    let mut pairs = Vec::new();
    let mut active: Vec<usize> = Vec::new();
    for &idx in &order {
        let current = &boxes[idx];
        active.retain(|&other| boxes[other].max_x >= current.min_x);
        for &other in &active {
            let candidate = &boxes[other];
            if candidate.min_y <= current.max_y && current.min_y <= candidate.max_y {
                pairs.push((other.min(idx), other.max(idx)));
            }
        }
        active.push(idx);
    }
    pairs
}
