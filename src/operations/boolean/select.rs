use slotmap::SecondaryMap;

use crate::error::{DataError, GeometryError};

use super::arrangement::{Arrangement, FaceId};

/// The type of boolean operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operation {
    Intersect,
    Union,
    Xor,
    /// Source minus clip.
    Difference,
}

/// Keep/drop decision for a face, by operation and by its membership flags.
///
/// | in source | in clip | Intersect | Union | Xor  | Difference |
/// |-----------|---------|-----------|-------|------|------------|
/// | false     | false   | drop      | drop  | drop | drop       |
/// | false     | true    | drop      | keep  | keep | drop       |
/// | true      | false   | drop      | keep  | keep | keep       |
/// | true      | true    | keep      | keep  | drop | drop       |
const KEEP_TABLE: [[bool; 4]; 4] = [
    [false, false, false, true],
    [false, true, true, true],
    [false, true, true, false],
    [false, false, true, false],
];

impl Operation {
    const fn row(self) -> usize {
        match self {
            Self::Intersect => 0,
            Self::Union => 1,
            Self::Xor => 2,
            Self::Difference => 3,
        }
    }

    /// Returns `true` if a face with the given membership belongs to the result.
    #[must_use]
    pub fn keeps(self, inside_source: bool, inside_clip: bool) -> bool {
        let column = usize::from(inside_source) * 2 + usize::from(inside_clip);
        KEEP_TABLE[self.row()][column]
    }
}

/// Numeric operation codes of the flat exchange format:
/// 1 = intersect, 2 = union, 3 = xor.
impl TryFrom<i32> for Operation {
    type Error = DataError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Intersect),
            2 => Ok(Self::Union),
            3 => Ok(Self::Xor),
            other => Err(DataError::InvalidParameter {
                parameter: "operation",
                value: f64::from(other),
                reason: "unknown operation code",
            }),
        }
    }
}

/// Marks the faces that belong to the result of `op`.
///
/// # Errors
///
/// Returns [`GeometryError::Degenerate`] if the unbounded face would be kept.
pub fn select_faces(
    arrangement: &Arrangement,
    op: Operation,
) -> Result<SecondaryMap<FaceId, bool>, GeometryError> {
    let kept: SecondaryMap<FaceId, bool> = arrangement
        .faces
        .iter()
        .map(|(id, face)| (id, op.keeps(face.inside[0], face.inside[1])))
        .collect();
    if kept.get(arrangement.unbounded()).copied().unwrap_or(false) {
        return Err(GeometryError::Degenerate("unbounded face selected".into()));
    }
    Ok(kept)
}
