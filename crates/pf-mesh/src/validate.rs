//! Mesh validation logic.

use std::collections::HashSet;

use crate::error::{MeshError, MeshResult};
use crate::mesh::{Cell, Face, Patch};

/// Validate the mesh structure: all references exist, volumes are sane, etc.
pub(crate) fn validate_structure(cells: &[Cell], faces: &[Face], patches: &[Patch]) -> MeshResult<()> {
    if cells.is_empty() {
        return Err(MeshError::Empty);
    }

    for cell in cells {
        if !cell.volume.is_finite() || cell.volume <= 0.0 {
            return Err(MeshError::BadVolume {
                cell: cell.id,
                volume: cell.volume,
            });
        }
    }

    let mut names = HashSet::new();
    for patch in patches {
        if !names.insert(patch.name.as_str()) {
            return Err(MeshError::DuplicatePatch {
                name: patch.name.clone(),
            });
        }
    }

    for face in faces {
        if face.owner.slot() >= cells.len() {
            return Err(MeshError::InvalidCellRef {
                face: face.id,
                cell: face.owner,
            });
        }
        match (face.neighbour, face.patch) {
            (Some(neighbour), _) => {
                if neighbour.slot() >= cells.len() {
                    return Err(MeshError::InvalidCellRef {
                        face: face.id,
                        cell: neighbour,
                    });
                }
                if neighbour == face.owner {
                    return Err(MeshError::DegenerateFace { face: face.id });
                }
            }
            (None, Some(patch)) => {
                if patch.slot() >= patches.len() {
                    return Err(MeshError::InvalidPatchRef {
                        face: face.id,
                        patch,
                    });
                }
            }
            (None, None) => {}
        }
    }

    Ok(())
}
