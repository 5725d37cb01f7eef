//! Ready-made meshes for tests and the command-line tool.

use pf_core::Real;

use crate::builder::MeshBuilder;
use crate::error::{MeshError, MeshResult};
use crate::field::Vector;
use crate::mesh::{PatchKind, PolyMesh};

/// A column of `n` cells along `y`, bounded by walls at `y = 0` and `y = height`.
///
/// Each cell is `width x (height/n) x width`. Faces normal to `x` and `z` are
/// omitted, so the column behaves as a one-dimensional wall-bounded channel.
pub fn wall_bounded_column(n: usize, height: Real, width: Real) -> MeshResult<PolyMesh> {
    if n == 0 {
        return Err(MeshError::Empty);
    }
    let dy = height / n as Real;
    let face_area = width * width;

    let mut b = MeshBuilder::new();
    let bottom = b.add_patch("bottom", PatchKind::Wall);
    let top = b.add_patch("top", PatchKind::Wall);

    let cells: Vec<_> = (0..n)
        .map(|i| b.add_cell(Vector::new(0.0, (i as Real + 0.5) * dy, 0.0), face_area * dy))
        .collect();

    for pair in cells.windows(2) {
        let y = pair[1].index() as Real * dy;
        b.add_internal_face(
            pair[0],
            pair[1],
            Vector::new(0.0, y, 0.0),
            Vector::new(0.0, face_area, 0.0),
        );
    }

    b.add_boundary_face(cells[0], bottom, Vector::zeros(), Vector::new(0.0, -face_area, 0.0));
    b.add_boundary_face(
        cells[n - 1],
        top,
        Vector::new(0.0, height, 0.0),
        Vector::new(0.0, face_area, 0.0),
    );

    b.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Mesh;
    use pf_core::CellId;

    #[test]
    fn column_walls_are_first_and_last_cells() {
        let mesh = wall_bounded_column(5, 1.0, 0.1).unwrap();
        assert_eq!(mesh.n_cells(), 5);
        assert_eq!(mesh.n_faces(), 6);
        let near: Vec<u32> = mesh.near_wall_cells().iter().map(|c| c.index()).collect();
        assert_eq!(near, vec![0, 4]);
        assert!(!mesh.is_near_wall(CellId::from_index(2)));
    }

    #[test]
    fn column_wall_distance_is_symmetric() {
        let mesh = wall_bounded_column(4, 2.0, 1.0).unwrap();
        let y = mesh.wall_distance();
        assert!((y[0] - 0.25).abs() < 1e-12);
        assert!((y[1] - 0.75).abs() < 1e-12);
        assert!((y[2] - 0.75).abs() < 1e-12);
        assert!((y[3] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn zero_cells_rejected() {
        assert_eq!(wall_bounded_column(0, 1.0, 1.0).unwrap_err(), MeshError::Empty);
    }
}
