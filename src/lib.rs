pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;

pub use error::{DataError, GeometryError, PolysetError, Result};
pub use geometry::{FillRule, FlatPolygons, Polygon, PolygonSet, Ring};
pub use operations::boolean::{boolean_op, BooleanOperation, BooleanOptions, Operation};
pub use operations::validate::{validate, ValidationMode};
