//! pf-mesh: mesh collaborator and field layer for phaseflow.
//!
//! Provides:
//! - The `Mesh` capability consumed by the phase system (face interpolation
//!   weights, owner/neighbour addressing, wall classification, wall distance)
//! - `PolyMesh`, a small validated polyhedral mesh built incrementally
//! - Cell-centred and face-centred geometric fields with elementwise algebra
//! - `fvc` explicit operators (interpolation, flux, Gauss curl)
//! - `FvMatrix`, the implicit/explicit source bundle handed to a linear solver
//!
//! # Example
//!
//! ```
//! use pf_mesh::{generation, fvc, Mesh, VolScalarField};
//!
//! let mesh = generation::wall_bounded_column(4, 1.0, 1.0).unwrap();
//! let alpha = VolScalarField::uniform("alpha", mesh.n_cells(), 0.5);
//! let alpha_f = fvc::interpolate(&mesh, &alpha);
//!
//! assert_eq!(alpha_f.len(), mesh.n_faces());
//! ```

pub mod builder;
pub mod error;
pub mod field;
pub mod fvc;
pub mod generation;
pub mod matrix;
pub mod mesh;
pub(crate) mod validate;

pub use builder::MeshBuilder;
pub use error::{MeshError, MeshResult};
pub use field::{
    Field, FieldValue, SurfaceLocation, SurfaceScalarField, SurfaceVectorField, Vector, VolLocation,
    VolScalarField, VolVectorField,
};
pub use matrix::{FvMatrix, FvScalarMatrix, FvVectorMatrix};
pub use mesh::{Cell, Face, Mesh, Patch, PatchKind, PolyMesh};
