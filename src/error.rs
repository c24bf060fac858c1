use thiserror::Error;

/// Top-level error type for the polyset engine.
#[derive(Debug, Error)]
pub enum PolysetError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Malformed input. Expected and recoverable; surfaced directly to the caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("polygon {polygon}, ring {ring}: {count} distinct points, at least 3 required")]
    TooFewPoints {
        polygon: usize,
        ring: usize,
        count: usize,
    },

    #[error("polygon {polygon}, ring {ring}: non-finite coordinate ({x}, {y})")]
    NonFiniteCoordinate {
        polygon: usize,
        ring: usize,
        x: f64,
        y: f64,
    },

    #[error("polygon {polygon}, ring {ring}: ring has zero area")]
    ZeroArea { polygon: usize, ring: usize },

    #[error("polygon {polygon}: outer ring self-intersects near ({x}, {y})")]
    SelfIntersection { polygon: usize, x: f64, y: f64 },

    #[error("malformed exchange data: {0}")]
    MalformedExchange(String),

    #[error("parameter {parameter} = {value} is invalid: {reason}")]
    InvalidParameter {
        parameter: &'static str,
        value: f64,
        reason: &'static str,
    },
}

/// Internal arrangement construction failed. The call produced no output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("snap rounding did not converge after {rounds} rounds")]
    NoConvergence { rounds: usize },

    #[error("inconsistent winding numbers across an arrangement edge")]
    InconsistentWinding,

    #[error("boundary walk did not close")]
    OpenBoundary,

    #[error("hole ring has no enclosing outer ring")]
    UnplacedHole,

    #[error("degenerate arrangement: {0}")]
    Degenerate(String),
}

/// Convenience type alias for results using [`PolysetError`].
pub type Result<T> = std::result::Result<T, PolysetError>;
