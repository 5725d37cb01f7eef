//! Explicit finite-volume calculus on a `Mesh`.

use std::ops::{Add, Mul};

use pf_core::{FaceId, Real};

use crate::field::{Field, SurfaceLocation, SurfaceScalarField, Vector, VolLocation, VolVectorField};
use crate::mesh::Mesh;

/// Linear interpolation of a cell field to faces.
///
/// Boundary faces take the owner value (zero gradient).
pub fn interpolate<T>(mesh: &dyn Mesh, vf: &Field<T, VolLocation>) -> Field<T, SurfaceLocation>
where
    T: Copy + Send + Sync + Add<Output = T> + Mul<Real, Output = T>,
{
    let v = vf.values();
    let values = (0..mesh.n_faces())
        .map(|i| {
            let face = FaceId::from_index(i as u32);
            let (own, nei) = mesh.face_cells(face);
            match nei {
                Some(nei) => {
                    let w = mesh.face_weight(face);
                    v[own.slot()] * w + v[nei.slot()] * (1.0 - w)
                }
                None => v[own.slot()],
            }
        })
        .collect();
    Field::from_values(format!("interpolate({})", vf.name()), values)
}

/// Face flux `U_f . S_f` of a cell vector field.
pub fn flux(mesh: &dyn Mesh, u: &VolVectorField) -> SurfaceScalarField {
    let uf = interpolate(mesh, u);
    let values = uf
        .values()
        .iter()
        .enumerate()
        .map(|(i, uf)| uf.dot(&mesh.face_area(FaceId::from_index(i as u32))))
        .collect();
    Field::from_values(format!("flux({})", u.name()), values)
}

/// Gauss curl: `(1/V) sum_f S_f x U_f`.
pub fn curl(mesh: &dyn Mesh, u: &VolVectorField) -> VolVectorField {
    let uf = interpolate(mesh, u);
    let mut acc = vec![Vector::zeros(); mesh.n_cells()];
    for (i, uf) in uf.values().iter().enumerate() {
        let face = FaceId::from_index(i as u32);
        let c = mesh.face_area(face).cross(uf);
        let (own, nei) = mesh.face_cells(face);
        acc[own.slot()] += c;
        if let Some(nei) = nei {
            acc[nei.slot()] -= c;
        }
    }
    for (i, a) in acc.iter_mut().enumerate() {
        *a /= mesh.cell_volume(pf_core::CellId::from_index(i as u32));
    }
    Field::from_values(format!("curl({})", u.name()), acc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::VolScalarField;
    use crate::generation::wall_bounded_column;

    #[test]
    fn interpolate_uniform_is_uniform() {
        let mesh = wall_bounded_column(3, 1.0, 1.0).unwrap();
        let f = VolScalarField::uniform("f", 3, 2.5);
        let ff = interpolate(&mesh, &f);
        assert!(ff.values().iter().all(|&v| (v - 2.5).abs() < 1e-12));
    }

    #[test]
    fn interpolate_averages_neighbours() {
        let mesh = wall_bounded_column(2, 1.0, 1.0).unwrap();
        let f = VolScalarField::from_values("f", vec![1.0, 3.0]);
        let ff = interpolate(&mesh, &f);
        // internal face first, then the two walls
        assert!((ff.values()[0] - 2.0).abs() < 1e-12);
        assert_eq!(ff.values()[1], 1.0);
        assert_eq!(ff.values()[2], 3.0);
    }

    #[test]
    fn curl_of_shear_flow() {
        // U = (y, 0, 0) has curl (0, 0, -1)
        let mesh = wall_bounded_column(8, 1.0, 1.0).unwrap();
        let u = VolVectorField::from_values(
            "U",
            mesh.cells().iter().map(|c| Vector::new(c.centre.y, 0.0, 0.0)).collect(),
        );
        let w = curl(&mesh, &u);
        for v in &w.values()[1..7] {
            assert!((v.z + 1.0).abs() < 1e-9, "got {v:?}");
        }
    }

    #[test]
    fn flux_through_walls_of_parallel_flow_is_zero() {
        let mesh = wall_bounded_column(3, 1.0, 1.0).unwrap();
        let u = VolVectorField::uniform("U", 3, Vector::new(1.0, 0.0, 0.0));
        let phi = flux(&mesh, &u);
        assert!(phi.values().iter().all(|v| v.abs() < 1e-12));
    }
}
