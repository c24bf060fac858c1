use crate::error::DataError;
use crate::geometry::FillRule;

/// Tunable parameters of a boolean operation.
///
/// Both tolerances are relative to the diagonal of the combined bounding box
/// of the two operands, so results do not depend on the absolute scale.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BooleanOptions {
    /// Snap grid cell size as a fraction of the diagonal.
    ///
    /// Output vertices that coincide with an input vertex keep its exact
    /// coordinates. Computed crossings lie on the grid and may be off the
    /// true crossing by up to half a cell.
    pub snap_tolerance: f64,
    /// Output rings smaller than this fraction of the squared diagonal are
    /// dropped.
    pub area_tolerance: f64,
    pub fill_rule: FillRule,
}

impl Default for BooleanOptions {
    fn default() -> Self {
        Self {
            snap_tolerance: 1e-9,
            area_tolerance: 1e-12,
            fill_rule: FillRule::NonZero,
        }
    }
}

impl BooleanOptions {
    #[must_use]
    pub fn with_snap_tolerance(mut self, snap_tolerance: f64) -> Self {
        self.snap_tolerance = snap_tolerance;
        self
    }

    #[must_use]
    pub fn with_area_tolerance(mut self, area_tolerance: f64) -> Self {
        self.area_tolerance = area_tolerance;
        self
    }

    #[must_use]
    pub fn with_fill_rule(mut self, fill_rule: FillRule) -> Self {
        self.fill_rule = fill_rule;
        self
    }

    /// Checks that the tolerances are usable.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::InvalidParameter`] if `snap_tolerance` is not in
    /// the open interval (0, 1) or `area_tolerance` is negative or not finite.
    pub fn validate(&self) -> Result<(), DataError> {
        if !(self.snap_tolerance.is_finite() && self.snap_tolerance > 0.0 && self.snap_tolerance < 1.0) {
            return Err(DataError::InvalidParameter {
                parameter: "snap_tolerance",
                value: self.snap_tolerance,
                reason: "must be in (0, 1)",
            });
        }
        if !(self.area_tolerance.is_finite() && self.area_tolerance >= 0.0) {
            return Err(DataError::InvalidParameter {
                parameter: "area_tolerance",
                value: self.area_tolerance,
                reason: "must be finite and non-negative",
            });
        }
        Ok(())
    }
}
