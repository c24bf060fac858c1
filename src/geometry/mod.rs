pub mod exchange;
pub mod polygon;
pub mod polygon_set;
pub mod ring;

pub use exchange::FlatPolygons;
pub use polygon::Polygon;
pub use polygon_set::{FillRule, PolygonSet};
pub use ring::Ring;
