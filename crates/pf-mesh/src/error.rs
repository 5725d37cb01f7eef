//! Mesh-specific error types.

use pf_core::{CellId, FaceId, PatchId, PfError};

pub type MeshResult<T> = Result<T, MeshError>;

/// Mesh construction and validation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MeshError {
    /// A face refers to a cell that doesn't exist.
    InvalidCellRef { face: FaceId, cell: CellId },

    /// A boundary face refers to a patch that doesn't exist.
    InvalidPatchRef { face: FaceId, patch: PatchId },

    /// An internal face has the same cell on both sides.
    DegenerateFace { face: FaceId },

    /// A cell has a non-positive or non-finite volume.
    BadVolume { cell: CellId, volume: f64 },

    /// Two patches share a name.
    DuplicatePatch { name: String },

    /// Mesh has no cells.
    Empty,
}

impl std::fmt::Display for MeshError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeshError::InvalidCellRef { face, cell } => {
                write!(f, "Face {} refers to non-existent cell {}", face, cell)
            }
            MeshError::InvalidPatchRef { face, patch } => {
                write!(f, "Face {} refers to non-existent patch {}", face, patch)
            }
            MeshError::DegenerateFace { face } => {
                write!(f, "Internal face {} has identical owner and neighbour", face)
            }
            MeshError::BadVolume { cell, volume } => {
                write!(f, "Cell {} has invalid volume {}", cell, volume)
            }
            MeshError::DuplicatePatch { name } => {
                write!(f, "Patch name '{}' is used more than once", name)
            }
            MeshError::Empty => write!(f, "Mesh has no cells"),
        }
    }
}

impl std::error::Error for MeshError {}

impl From<MeshError> for PfError {
    fn from(err: MeshError) -> Self {
        match err {
            MeshError::InvalidCellRef { .. } | MeshError::InvalidPatchRef { .. } => {
                PfError::Invariant {
                    what: "mesh face addressing",
                }
            }
            MeshError::DegenerateFace { .. } => PfError::Invariant {
                what: "degenerate internal face",
            },
            MeshError::BadVolume { volume, .. } => PfError::NonFinite {
                what: "cell volume",
                value: volume,
            },
            MeshError::DuplicatePatch { .. } => PfError::InvalidArg {
                what: "duplicate patch name",
            },
            MeshError::Empty => PfError::InvalidArg { what: "empty mesh" },
        }
    }
}
