use crate::error::DataError;
use crate::math::Point2;

use super::{Polygon, PolygonSet, Ring};

/// Polygon set flattened into count and coordinate arrays, as exchanged with
/// digitizers and storage layers.
///
/// - `component_counts[i]`: number of rings of polygon `i` (outer + holes).
/// - `point_counts[j]`: number of points of ring `j`, rings in polygon order
///   with each polygon's outer ring first.
/// - `xs`, `ys`: every ring's coordinates concatenated.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlatPolygons {
    pub component_counts: Vec<usize>,
    pub point_counts: Vec<usize>,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl FlatPolygons {
    /// Flattens a set. Rings are written without a closing point.
    #[must_use]
    pub fn from_set(set: &PolygonSet) -> Self {
        let mut flat = Self::default();
        for polygon in set {
            flat.component_counts.push(1 + polygon.holes.len());
            for ring in polygon.rings() {
                flat.point_counts.push(ring.len());
                flat.xs.extend(ring.points.iter().map(|p| p.x));
                flat.ys.extend(ring.points.iter().map(|p| p.y));
            }
        }
        flat
    }

    /// Number of polygons.
    #[must_use]
    pub fn polygon_count(&self) -> usize {
        self.component_counts.len()
    }

    /// Rebuilds the polygon set.
    ///
    /// A ring whose last point repeats its first point is stored without
    /// the repetition.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::MalformedExchange`] if the counts do not match the
    /// array lengths, overflow when summed, or a polygon declares zero
    /// components.
    pub fn to_set(&self) -> Result<PolygonSet, DataError> {
        if self.xs.len() != self.ys.len() {
            return Err(DataError::MalformedExchange(format!(
                "{} x coordinates but {} y coordinates",
                self.xs.len(),
                self.ys.len()
            )));
        }
        let ring_total = checked_total(&self.component_counts, "component")?;
        if ring_total != self.point_counts.len() {
            return Err(DataError::MalformedExchange(format!(
                "component counts declare {ring_total} rings but {} point counts are present",
                self.point_counts.len()
            )));
        }
        let point_total = checked_total(&self.point_counts, "point")?;
        if point_total != self.xs.len() {
            return Err(DataError::MalformedExchange(format!(
                "point counts declare {point_total} points but {} coordinates are present",
                self.xs.len()
            )));
        }

        let mut set = PolygonSet::empty();
        let mut ring_index = 0;
        let mut offset = 0;
        for (polygon, &components) in self.component_counts.iter().enumerate() {
            if components == 0 {
                return Err(DataError::MalformedExchange(format!(
                    "polygon {polygon} has no rings"
                )));
            }
            let mut rings = Vec::with_capacity(components);
            for _ in 0..components {
                let count = self.point_counts[ring_index];
                rings.push(self.read_ring(offset, count));
                offset += count;
                ring_index += 1;
            }
            let mut rings = rings.into_iter();
            let outer = rings.next().unwrap_or_default();
            set.push(Polygon::new(outer, rings.collect()));
        }
        Ok(set)
    }

    fn read_ring(&self, offset: usize, count: usize) -> Ring {
        let mut points: Vec<Point2> = (offset..offset + count)
            .map(|i| Point2::new(self.xs[i], self.ys[i]))
            .collect();
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        Ring::new(points)
    }
}

impl From<&PolygonSet> for FlatPolygons {
    fn from(set: &PolygonSet) -> Self {
        Self::from_set(set)
    }
}

impl TryFrom<&FlatPolygons> for PolygonSet {
    type Error = DataError;

    fn try_from(flat: &FlatPolygons) -> Result<Self, Self::Error> {
        flat.to_set()
    }
}

fn checked_total(counts: &[usize], kind: &str) -> Result<usize, DataError> {
    counts
        .iter()
        .try_fold(0usize, |total, &count| total.checked_add(count))
        .ok_or_else(|| DataError::MalformedExchange(format!("{kind} counts overflow")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn framed_square() -> PolygonSet {
        let outer = Ring::rectangle(0.0, 0.0, 10.0, 10.0);
        let hole = Ring::rectangle(3.0, 3.0, 7.0, 7.0).reversed();
        let second = Ring::from_coords(&[(20.0, 0.0), (25.0, 0.0), (22.5, 4.0)]);
        PolygonSet::new(vec![
            Polygon::new(outer, vec![hole]),
            Polygon::from_outer(second),
        ])
    }

    #[test]
    fn layout_of_counts() {
        let flat = FlatPolygons::from_set(&framed_square());
        assert_eq!(flat.component_counts, vec![2, 1]);
        assert_eq!(flat.point_counts, vec![4, 4, 3]);
        assert_eq!(flat.xs.len(), 11);
        assert_eq!(flat.polygon_count(), 2);
    }

    #[test]
    fn lossless_round_trip() {
        let set = framed_square();
        let back = FlatPolygons::from_set(&set).to_set().unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn closing_point_is_stripped() {
        let flat = FlatPolygons {
            component_counts: vec![1],
            point_counts: vec![5],
            xs: vec![0.0, 1.0, 1.0, 0.0, 0.0],
            ys: vec![0.0, 0.0, 1.0, 1.0, 0.0],
        };
        let set = flat.to_set().unwrap();
        assert_eq!(set.polygons[0].outer.len(), 4);
    }

    #[test]
    fn count_mismatch_is_malformed() {
        let mut flat = FlatPolygons::from_set(&framed_square());
        flat.point_counts[2] = 4;
        assert!(matches!(flat.to_set(), Err(DataError::MalformedExchange(_))));

        let mut flat = FlatPolygons::from_set(&framed_square());
        flat.ys.pop();
        assert!(matches!(flat.to_set(), Err(DataError::MalformedExchange(_))));

        let mut flat = FlatPolygons::from_set(&framed_square());
        flat.component_counts = vec![3];
        assert!(matches!(flat.to_set(), Err(DataError::MalformedExchange(_))));
    }

    #[test]
    fn zero_component_polygon_is_malformed() {
        let flat = FlatPolygons {
            component_counts: vec![0],
            ..FlatPolygons::default()
        };
        assert!(matches!(flat.to_set(), Err(DataError::MalformedExchange(_))));
    }
    #[test]
    fn overflowing_counts_are_malformed() {
        let flat = FlatPolygons {
            component_counts: vec![usize::MAX, 2],
            point_counts: vec![3],
            xs: vec![0.0, 1.0, 0.0],
            ys: vec![0.0, 0.0, 1.0],
        };
        assert!(matches!(flat.to_set(), Err(DataError::MalformedExchange(_))));

        let flat = FlatPolygons {
            component_counts: vec![2],
            point_counts: vec![usize::MAX, 2],
            xs: vec![0.0],
            ys: vec![0.0],
        };
        assert!(matches!(flat.to_set(), Err(DataError::MalformedExchange(_))));
    }
}
