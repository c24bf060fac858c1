use crate::math::{Bounds, Point2};

use super::Ring;

/// One outer boundary plus zero or more holes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    pub outer: Ring,
    pub holes: Vec<Ring>,
}

impl Polygon {
    #[must_use]
    pub fn new(outer: Ring, holes: Vec<Ring>) -> Self {
        Self { outer, holes }
    }

    /// Polygon without holes.
    #[must_use]
    pub fn from_outer(outer: Ring) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    /// Outer ring first, then the holes in order.
    pub fn rings(&self) -> impl Iterator<Item = &Ring> + '_ {
        std::iter::once(&self.outer).chain(self.holes.iter())
    }

    /// Area of the outer ring minus the areas of the holes.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.outer.area() - self.holes.iter().map(Ring::area).sum::<f64>()
    }

    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        self.outer.bounds()
    }

    /// Winding number of `p` with the outer ring counted positively and holes
    /// negatively, whatever their stored orientation.
    #[must_use]
    pub fn oriented_winding(&self, p: &Point2) -> i32 {
        let outer = self.outer.winding_number(p);
        let outer = if self.outer.signed_area() < 0.0 { -outer } else { outer };
        self.holes.iter().fold(outer, |acc, hole| {
            let w = hole.winding_number(p);
            if hole.signed_area() > 0.0 {
                acc - w
            } else {
                acc + w
            }
        })
    }
}
