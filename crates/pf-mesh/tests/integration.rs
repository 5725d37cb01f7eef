//! Integration tests for pf-mesh.

use pf_core::CellId;
use pf_mesh::{
    fvc, generation, FvVectorMatrix, Mesh, MeshBuilder, MeshError, PatchKind, Vector,
    VolScalarField, VolVectorField,
};

#[test]
fn build_minimal_mesh() {
    let mut b = MeshBuilder::new();
    let c0 = b.add_cell(Vector::new(0.5, 0.0, 0.0), 1.0);
    let c1 = b.add_cell(Vector::new(1.5, 0.0, 0.0), 1.0);
    let inlet = b.add_patch("inlet", PatchKind::Patch);
    b.add_internal_face(c0, c1, Vector::new(1.0, 0.0, 0.0), Vector::new(1.0, 0.0, 0.0));
    b.add_boundary_face(c0, inlet, Vector::zeros(), Vector::new(-1.0, 0.0, 0.0));

    let mesh = b.build().unwrap();
    assert_eq!(mesh.n_cells(), 2);
    assert_eq!(mesh.n_faces(), 2);

    // no walls: every cell is infinitely far from one
    assert!(mesh.wall_distance().iter().all(|y| y.is_infinite()));
    assert!(mesh.near_wall_cells().is_empty());
    assert_eq!(mesh.patch_by_name("inlet").unwrap().kind, PatchKind::Patch);
}

#[test]
fn rejects_bad_addressing() {
    let mut b = MeshBuilder::new();
    let c0 = b.add_cell(Vector::zeros(), 1.0);
    b.add_internal_face(c0, CellId::from_index(5), Vector::zeros(), Vector::x());
    assert!(matches!(b.build(), Err(MeshError::InvalidCellRef { .. })));

    let mut b = MeshBuilder::new();
    let c0 = b.add_cell(Vector::zeros(), 1.0);
    b.add_internal_face(c0, c0, Vector::zeros(), Vector::x());
    assert!(matches!(b.build(), Err(MeshError::DegenerateFace { .. })));
}

#[test]
fn rejects_non_positive_volume_and_duplicate_patches() {
    let mut b = MeshBuilder::new();
    b.add_cell(Vector::zeros(), 0.0);
    assert!(matches!(b.build(), Err(MeshError::BadVolume { .. })));

    let mut b = MeshBuilder::new();
    b.add_cell(Vector::zeros(), 1.0);
    b.add_patch("wall", PatchKind::Wall);
    b.add_patch("wall", PatchKind::Wall);
    assert!(matches!(b.build(), Err(MeshError::DuplicatePatch { .. })));
}

#[test]
fn field_algebra_on_column() {
    let mesh = generation::wall_bounded_column(6, 1.0, 0.5).unwrap();
    let alpha = VolScalarField::uniform("alpha", mesh.n_cells(), 0.25);
    let u = VolVectorField::uniform("U", mesh.n_cells(), Vector::new(0.0, 2.0, 0.0));
    let alpha_u = &alpha * &u;
    assert!(alpha_u.values().iter().all(|v| (v.y - 0.5).abs() < 1e-12));

    let phi = fvc::flux(&mesh, &alpha_u);
    // internal faces carry 0.5 m/s through 0.25 m^2
    for v in &phi.values()[..5] {
        assert!((v - 0.125).abs() < 1e-12);
    }
}

#[test]
fn matrix_source_uses_current_field() {
    let mut m = FvVectorMatrix::new("U", 2);
    m.add_implicit(&VolScalarField::uniform("K", 2, 1.0));
    let psi = VolVectorField::uniform("U", 2, Vector::new(3.0, 0.0, 0.0));
    let s = m.source(&psi);
    assert_eq!(s.values()[1], Vector::new(-3.0, 0.0, 0.0));
}
