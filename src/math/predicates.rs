use super::Point2;

/// Relative error bound of the naive determinant: `(3 + 16ε)ε`, ε = 2⁻⁵³.
const CCW_ERR_BOUND: f64 = (3.0 + 16.0 * f64::EPSILON / 2.0) * (f64::EPSILON / 2.0);

/// Side of the directed line `a → b` on which a point lies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Counter-clockwise turn.
    Left,
    /// Clockwise turn.
    Right,
    Collinear,
}

impl Orientation {
    fn from_sign(value: f64) -> Self {
        if value > 0.0 {
            Self::Left
        } else if value < 0.0 {
            Self::Right
        } else {
            Self::Collinear
        }
    }

    /// Returns `+1`, `-1` or `0`.
    #[must_use]
    pub fn signum(self) -> i32 {
        match self {
            Self::Left => 1,
            Self::Right => -1,
            Self::Collinear => 0,
        }
    }
}

/// Orientation of `c` relative to the directed line through `a` and `b`.
///
/// The fast path evaluates the determinant in plain floating point and trusts
/// its sign when it exceeds a forward error bound. Otherwise the determinant
/// is re-evaluated as a non-overlapping floating-point expansion, which is
/// exact for all finite inputs that do not overflow or underflow.
#[must_use]
pub fn orientation(a: &Point2, b: &Point2, c: &Point2) -> Orientation {
    let det_left = (a.x - c.x) * (b.y - c.y);
    let det_right = (a.y - c.y) * (b.x - c.x);
    let det = det_left - det_right;

    let det_sum = if det_left > 0.0 {
        if det_right <= 0.0 {
            return Orientation::from_sign(det);
        }
        det_left + det_right
    } else if det_left < 0.0 {
        if det_right >= 0.0 {
            return Orientation::from_sign(det);
        }
        -det_left - det_right
    } else {
        return Orientation::from_sign(det);
    };

    if det.abs() >= CCW_ERR_BOUND * det_sum {
        return Orientation::from_sign(det);
    }
    Orientation::from_sign(exact_orient(a, b, c))
}

/// Sign-exact determinant via expansion arithmetic.
///
/// `det = ax·by − ax·cy + bx·cy − bx·ay + cx·ay − cx·by`
fn exact_orient(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    let terms = [
        (a.x, b.y),
        (-a.x, c.y),
        (b.x, c.y),
        (-b.x, a.y),
        (c.x, a.y),
        (-c.x, b.y),
    ];
    let mut expansion: Vec<f64> = Vec::with_capacity(16);
    for (u, v) in terms {
        let (hi, lo) = two_product(u, v);
        grow_expansion(&mut expansion, lo);
        grow_expansion(&mut expansion, hi);
    }
    expansion.last().copied().unwrap_or(0.0)
}

fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let x = a + b;
    let b_virtual = x - a;
    let a_virtual = x - b_virtual;
    let b_round = b - b_virtual;
    let a_round = a - a_virtual;
    (x, a_round + b_round)
}

fn two_product(a: f64, b: f64) -> (f64, f64) {
    let x = a * b;
    (x, a.mul_add(b, -x))
}

/// Adds `b` to a non-overlapping expansion sorted by increasing magnitude,
/// eliminating zero components. The largest component stays last.
fn grow_expansion(expansion: &mut Vec<f64>, b: f64) {
    let mut q = b;
    let mut out = Vec::with_capacity(expansion.len() + 1);
    for &e in expansion.iter() {
        let (sum, err) = two_sum(q, e);
        if err != 0.0 {
            out.push(err);
        }
        q = sum;
    }
    if q != 0.0 {
        out.push(q);
    }
    *expansion = out;
}
