use crate::error::Result;
use crate::geometry::PolygonSet;

use super::engine::boolean_execute;
use super::options::BooleanOptions;
use super::select::Operation;

/// Computes the symmetric difference of two polygon sets.
pub struct Xor<'a> {
    a: &'a PolygonSet,
    b: &'a PolygonSet,
    options: BooleanOptions,
}

impl<'a> Xor<'a> {
    /// Creates a new `Xor` operation.
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

    /// Executes the symmetric difference.
    ///
    /// # Errors
    ///
    /// Returns an error if either input is malformed or the arrangement
    /// cannot be built.
    pub fn execute(&self) -> Result<PolygonSet> {
        boolean_execute(self.a, self.b, Operation::Xor, &self.options)
    }
}
