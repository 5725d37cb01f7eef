//! Core mesh data structures and the `Mesh` capability.

use pf_core::{CellId, FaceId, PatchId, Real};

use crate::field::Vector;

/// Boundary classification of a patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchKind {
    /// Solid wall: cells behind these faces are near-wall cells.
    Wall,
    /// Any other boundary (inlet, outlet, symmetry...).
    Patch,
}

/// A control volume.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub id: CellId,
    pub centre: Vector,
    pub volume: Real,
}

/// A face between an owner cell and either a neighbour cell or a patch.
///
/// `area` is the face area vector, pointing out of the owner.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub id: FaceId,
    pub owner: CellId,
    pub neighbour: Option<CellId>,
    pub patch: Option<PatchId>,
    pub centre: Vector,
    pub area: Vector,
    /// Owner interpolation weight (1 on boundary faces).
    pub weight: Real,
}

impl Face {
    pub fn is_internal(&self) -> bool {
        self.neighbour.is_some()
    }
}

/// A named group of boundary faces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub id: PatchId,
    pub name: String,
    pub kind: PatchKind,
}

/// What the phase system needs from a mesh.
///
/// Implementations must be thread-safe (Send + Sync); the interfacial models
/// only read from the mesh.
pub trait Mesh: Send + Sync {
    fn n_cells(&self) -> usize;

    /// Number of faces, internal and boundary.
    fn n_faces(&self) -> usize;

    /// Owner and (for internal faces) neighbour of a face.
    fn face_cells(&self, face: FaceId) -> (CellId, Option<CellId>);

    /// Owner interpolation weight of a face.
    fn face_weight(&self, face: FaceId) -> Real;

    /// Face area vector, pointing out of the owner.
    fn face_area(&self, face: FaceId) -> Vector;

    fn cell_volume(&self, cell: CellId) -> Real;

    /// Distance from each cell centre to the nearest wall face.
    ///
    /// `Real::INFINITY` everywhere when the mesh has no walls.
    fn wall_distance(&self) -> &[Real];

    /// True for cells owning at least one wall face.
    fn is_near_wall(&self, cell: CellId) -> bool;
}

/// A validated, immutable polyhedral mesh.
///
/// The mesh stores:
/// - All cells, faces and patches in vectors (indexed by their IDs).
/// - Compact adjacency: for each cell, which faces bound it.
/// - Per-cell wall distance and near-wall flags, computed once at build time.
#[derive(Debug, Clone)]
pub struct PolyMesh {
    pub(crate) cells: Vec<Cell>,
    pub(crate) faces: Vec<Face>,
    pub(crate) patches: Vec<Patch>,

    /// Offsets for cell->face adjacency: cell i's faces are in cell_faces[cell_face_offsets[i]..cell_face_offsets[i+1]].
    pub(crate) cell_face_offsets: Vec<usize>,

    /// Flat list of face IDs bounding cells (sorted by cell ID then face ID).
    pub(crate) cell_faces: Vec<FaceId>,

    pub(crate) wall_distance: Vec<Real>,
    pub(crate) near_wall: Vec<bool>,
}

impl PolyMesh {
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id.slot())
    }

    pub fn face(&self, id: FaceId) -> Option<&Face> {
        self.faces.get(id.slot())
    }

    pub fn patch_by_name(&self, name: &str) -> Option<&Patch> {
        self.patches.iter().find(|p| p.name == name)
    }

    /// All faces bounding a given cell.
    pub fn cell_faces(&self, cell: CellId) -> &[FaceId] {
        let idx = cell.slot();
        if idx >= self.cells.len() {
            return &[];
        }
        let start = self.cell_face_offsets[idx];
        let end = self.cell_face_offsets[idx + 1];
        &self.cell_faces[start..end]
    }

    /// Cells owning at least one wall face, in index order.
    pub fn near_wall_cells(&self) -> Vec<CellId> {
        self.cells
            .iter()
            .filter(|c| self.near_wall[c.id.slot()])
            .map(|c| c.id)
            .collect()
    }
}

impl Mesh for PolyMesh {
    fn n_cells(&self) -> usize {
        self.cells.len()
    }

    fn n_faces(&self) -> usize {
        self.faces.len()
    }

    fn face_cells(&self, face: FaceId) -> (CellId, Option<CellId>) {
        let f = &self.faces[face.slot()];
        (f.owner, f.neighbour)
    }

    fn face_weight(&self, face: FaceId) -> Real {
        self.faces[face.slot()].weight
    }

    fn face_area(&self, face: FaceId) -> Vector {
        self.faces[face.slot()].area
    }

    fn cell_volume(&self, cell: CellId) -> Real {
        self.cells[cell.slot()].volume
    }

    fn wall_distance(&self) -> &[Real] {
        &self.wall_distance
    }

    fn is_near_wall(&self, cell: CellId) -> bool {
        self.near_wall.get(cell.slot()).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_core::Id;

    #[test]
    fn patch_kind_equality() {
        assert_eq!(PatchKind::Wall, PatchKind::Wall);
        assert_ne!(PatchKind::Wall, PatchKind::Patch);
    }

    #[test]
    fn face_internal_flag() {
        let face = Face {
            id: Id::from_index(0),
            owner: Id::from_index(0),
            neighbour: None,
            patch: Some(Id::from_index(0)),
            centre: Vector::zeros(),
            area: Vector::new(0.0, -1.0, 0.0),
            weight: 1.0,
        };
        assert!(!face.is_internal());
    }
}
