#![allow(dead_code)]

use std::f64::consts::TAU;

use polyset::geometry::{Polygon, PolygonSet, Ring};
use polyset::math::Point2;
use rand::rngs::StdRng;
use rand::Rng;

/// Installs a test subscriber once; filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> PolygonSet {
    PolygonSet::new(vec![Polygon::from_outer(Ring::rectangle(x0, y0, x1, y1))])
}

/// `n` by `n` unit squares, each its own polygon, sharing edges with their
/// neighbours.
pub fn tiled_grid(n: u32) -> PolygonSet {
    (0..n)
        .flat_map(|i| (0..n).map(move |j| (f64::from(i), f64::from(j))))
        .map(|(x, y)| Polygon::from_outer(Ring::rectangle(x, y, x + 1.0, y + 1.0)))
        .collect()
}

/// A star-shaped ring with `points` vertices at evenly spaced angles and
/// random radii in `[r_min, r_max]`.
pub fn random_star(rng: &mut StdRng, center: Point2, points: usize, r_min: f64, r_max: f64) -> Ring {
    #[allow(clippy::cast_precision_loss)]
    let step = TAU / points as f64;
    let offset: f64 = rng.gen_range(0.0..step);
    Ring::new(
        (0..points)
            .map(|k| {
                #[allow(clippy::cast_precision_loss)]
                let angle = offset + step * k as f64;
                let r = rng.gen_range(r_min..=r_max);
                Point2::new(center.x + r * angle.cos(), center.y + r * angle.sin())
            })
            .collect(),
    )
}

/// A 10-point star polygon with a smaller star hole around its center.
pub fn random_star_with_hole(rng: &mut StdRng, center: Point2) -> PolygonSet {
    let outer = random_star(rng, center, 10, 4.0, 10.0);
    let hole = random_star(rng, center, 10, 1.0, 3.0).reversed();
    PolygonSet::new(vec![Polygon::new(outer, vec![hole])])
}

/// Asserts that two sets cover the same area within a relative tolerance.
pub fn assert_area_eq(a: f64, b: f64) {
    let scale = a.abs().max(b.abs()).max(1.0);
    assert!((a - b).abs() <= 1e-9 * scale, "areas differ: {a} vs {b}");
}

/// Every outer ring is counter-clockwise and every hole clockwise.
pub fn assert_well_oriented(set: &PolygonSet) {
    for polygon in set {
        assert!(polygon.outer.signed_area() > 0.0, "outer ring is not counter-clockwise");
        for hole in &polygon.holes {
            assert!(hole.signed_area() < 0.0, "hole ring is not clockwise");
        }
        assert!(polygon.area() >= 0.0);
    }
}
