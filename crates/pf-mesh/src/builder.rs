//! Incremental mesh builder.

use std::collections::HashMap;

use pf_core::{CellId, FaceId, PatchId, Real};

use crate::error::MeshResult;
use crate::field::Vector;
use crate::mesh::{Cell, Face, Patch, PatchKind, PolyMesh};
use crate::validate;

/// Builder for constructing a mesh incrementally.
///
/// Use `add_cell`, `add_patch` and the face methods to build up the mesh,
/// then call `build()` to validate and freeze it into an immutable `PolyMesh`.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    cells: Vec<Cell>,
    faces: Vec<Face>,
    patches: Vec<Patch>,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_cell(&mut self, centre: Vector, volume: Real) -> CellId {
        let id = CellId::from_index(self.cells.len() as u32);
        self.cells.push(Cell { id, centre, volume });
        id
    }

    pub fn add_patch(&mut self, name: impl Into<String>, kind: PatchKind) -> PatchId {
        let id = PatchId::from_index(self.patches.len() as u32);
        self.patches.push(Patch {
            id,
            name: name.into(),
            kind,
        });
        id
    }

    /// Add a face shared by two cells. `area` points from owner to neighbour.
    pub fn add_internal_face(
        &mut self,
        owner: CellId,
        neighbour: CellId,
        centre: Vector,
        area: Vector,
    ) -> FaceId {
        self.push_face(owner, Some(neighbour), None, centre, area)
    }

    /// Add a face on a boundary patch. `area` points out of the domain.
    pub fn add_boundary_face(
        &mut self,
        owner: CellId,
        patch: PatchId,
        centre: Vector,
        area: Vector,
    ) -> FaceId {
        self.push_face(owner, None, Some(patch), centre, area)
    }

    fn push_face(
        &mut self,
        owner: CellId,
        neighbour: Option<CellId>,
        patch: Option<PatchId>,
        centre: Vector,
        area: Vector,
    ) -> FaceId {
        let id = FaceId::from_index(self.faces.len() as u32);
        self.faces.push(Face {
            id,
            owner,
            neighbour,
            patch,
            centre,
            area,
            weight: 1.0,
        });
        id
    }

    /// Build and validate the mesh, returning an immutable `PolyMesh`.
    ///
    /// This validates addressing, computes interpolation weights, cell-face
    /// adjacency, and the wall distance of every cell.
    pub fn build(mut self) -> MeshResult<PolyMesh> {
        validate::validate_structure(&self.cells, &self.faces, &self.patches)?;

        for face in &mut self.faces {
            if let Some(neighbour) = face.neighbour {
                face.weight = Self::owner_weight(
                    face,
                    &self.cells[face.owner.slot()],
                    &self.cells[neighbour.slot()],
                );
            }
        }

        let (cell_face_offsets, cell_faces) = Self::build_adjacency(&self.cells, &self.faces);
        let (wall_distance, near_wall) = Self::wall_metrics(&self.cells, &self.faces, &self.patches);

        Ok(PolyMesh {
            cells: self.cells,
            faces: self.faces,
            patches: self.patches,
            cell_face_offsets,
            cell_faces,
            wall_distance,
            near_wall,
        })
    }

    /// Linear interpolation weight of the owner, from face-normal distances.
    fn owner_weight(face: &Face, owner: &Cell, neighbour: &Cell) -> Real {
        let mag_sf = face.area.norm();
        if mag_sf <= 0.0 {
            return 0.5;
        }
        let n = face.area / mag_sf;
        let d_own = n.dot(&(face.centre - owner.centre)).abs();
        let d_nei = n.dot(&(neighbour.centre - face.centre)).abs();
        let total = d_own + d_nei;
        if total <= 0.0 { 0.5 } else { d_nei / total }
    }

    /// Build compact adjacency lists: for each cell, collect its bounding faces.
    fn build_adjacency(cells: &[Cell], faces: &[Face]) -> (Vec<usize>, Vec<FaceId>) {
        let mut cell_to_faces: HashMap<CellId, Vec<FaceId>> = HashMap::new();
        for face in faces {
            cell_to_faces.entry(face.owner).or_default().push(face.id);
            if let Some(neighbour) = face.neighbour {
                cell_to_faces.entry(neighbour).or_default().push(face.id);
            }
        }

        for face_list in cell_to_faces.values_mut() {
            face_list.sort_by_key(|f| f.index());
        }

        let mut offsets = Vec::with_capacity(cells.len() + 1);
        let mut flat = Vec::new();
        offsets.push(0);
        for cell in cells {
            if let Some(face_list) = cell_to_faces.get(&cell.id) {
                flat.extend_from_slice(face_list);
            }
            offsets.push(flat.len());
        }

        (offsets, flat)
    }

    /// Nearest-wall-face distance and near-wall flag per cell.
    fn wall_metrics(cells: &[Cell], faces: &[Face], patches: &[Patch]) -> (Vec<Real>, Vec<bool>) {
        let wall_faces: Vec<&Face> = faces
            .iter()
            .filter(|f| {
                f.patch
                    .and_then(|p| patches.get(p.slot()))
                    .is_some_and(|p| p.kind == PatchKind::Wall)
            })
            .collect();

        let mut near_wall = vec![false; cells.len()];
        for face in &wall_faces {
            near_wall[face.owner.slot()] = true;
        }

        let distance = cells
            .iter()
            .map(|cell| {
                wall_faces
                    .iter()
                    .map(|f| (f.centre - cell.centre).norm())
                    .fold(Real::INFINITY, Real::min)
            })
            .collect();

        (distance, near_wall)
    }
}
