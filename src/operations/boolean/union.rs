use crate::error::Result;
use crate::geometry::PolygonSet;

use super::engine::boolean_execute;
use super::options::BooleanOptions;
use super::select::Operation;

/// Computes the boolean union of two polygon sets.
pub struct Union<'a> {
    a: &'a PolygonSet,
    b: &'a PolygonSet,
    options: BooleanOptions,
}

impl<'a> Union<'a> {
    /// Creates a new `Union` operation.
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

    /// Executes the union.
    ///
    /// # Errors
    ///
    /// Returns an error if either input is malformed or the arrangement
    /// cannot be built.
    pub fn execute(&self) -> Result<PolygonSet> {
        boolean_execute(self.a, self.b, Operation::Union, &self.options)
    }
}

/// Dissolves the polygons of one set into non-overlapping polygons covering
/// the same area.
///
/// # Errors
///
/// Returns an error if the set is malformed or the arrangement cannot be
/// built.
pub fn union_components(set: &PolygonSet) -> Result<PolygonSet> {
    boolean_execute(set, &PolygonSet::empty(), Operation::Union, &BooleanOptions::default())
}
