pub mod bounds;
pub mod intersect_2d;
pub mod polygon_2d;
pub mod predicates;

pub use bounds::Bounds;
pub use intersect_2d::{segment_intersect, SegmentIntersection};
pub use polygon_2d::{locate_point, point_in_ring, winding_number, PointLocation};
pub use predicates::{orientation, Orientation};

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;
