use crate::error::Result;
use crate::geometry::PolygonSet;

use super::engine::boolean_execute;
use super::options::BooleanOptions;
use super::select::Operation;

/// Computes the boolean difference of two polygon sets.
pub struct Subtract<'a> {
    a: &'a PolygonSet,
    b: &'a PolygonSet,
    options: BooleanOptions,
}

impl<'a> Subtract<'a> {
    /// Creates a new `Subtract` operation (A - B).
    #[must_use]
    pub fn new(a: &'a PolygonSet, b: &'a PolygonSet) -> Self {
        Self {
            a,
            b,
            options: BooleanOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: BooleanOptions) -> Self {
        self.options = options;
        self
    }

    /// Executes the subtraction.
    ///
    /// # Errors
    ///
    /// Returns an error if either input is malformed or the arrangement
    /// cannot be built.
    pub fn execute(&self) -> Result<PolygonSet> {
        boolean_execute(self.a, self.b, Operation::Difference, &self.options)
    }
}
