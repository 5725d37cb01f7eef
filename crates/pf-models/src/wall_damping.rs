//! Near-wall damping of interfacial forces.
//!
//! A damping model computes a limiter field in `[0, 1]` from the wall
//! distance relative to the dispersed diameter and multiplies forces by it.
//! Surface fields are damped by the limiter interpolated to faces.

use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt::Debug;
use std::sync::OnceLock;

use pf_core::{CellId, Real, clamp_unit};
use pf_mesh::{Mesh, SurfaceScalarField, VolScalarField, VolVectorField, fvc};
use pf_phases::{PairView, PhasePairKey};

use crate::dict::Dict;
use crate::error::ModelResult;
use crate::factory::{Factory, ModelFamily};

pub trait WallDampingModel: Debug + Send + Sync {
    fn type_name(&self) -> &'static str;

    /// Damping factor per cell, in `[0, 1]`.
    fn limiter(&self, pair: &PairView<'_>, mesh: &dyn Mesh) -> VolScalarField;

    fn damp_scalar(
        &self,
        field: &VolScalarField,
        pair: &PairView<'_>,
        mesh: &dyn Mesh,
    ) -> VolScalarField {
        &self.limiter(pair, mesh) * field
    }

    fn damp_vector(
        &self,
        field: &VolVectorField,
        pair: &PairView<'_>,
        mesh: &dyn Mesh,
    ) -> VolVectorField {
        &self.limiter(pair, mesh) * field
    }

    fn damp_surface(
        &self,
        field: &SurfaceScalarField,
        pair: &PairView<'_>,
        mesh: &dyn Mesh,
    ) -> SurfaceScalarField {
        &fvc::interpolate(mesh, &self.limiter(pair, mesh)) * field
    }
}

/// State shared by the interpolated damping models.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Interpolated {
    pub zero_in_near_wall_cells: bool,
}

impl Interpolated {
    pub fn from_dict(dict: &Dict) -> ModelResult<Self> {
        Ok(Self {
            zero_in_near_wall_cells: dict.get_or("zeroInNearWallCells", false)?,
        })
    }

    /// Force the limiter to exactly zero in wall-adjacent cells when enabled.
    pub fn zero_near_wall_cells(&self, mut limiter: VolScalarField, mesh: &dyn Mesh) -> VolScalarField {
        if self.zero_in_near_wall_cells {
            for (i, l) in limiter.values_mut().iter_mut().enumerate() {
                if mesh.is_near_wall(CellId::from_index(i as u32)) {
                    *l = 0.0;
                }
            }
        }
        limiter
    }
}

/// Shape of the limiter as a function of `x = y / (Cd d)`, clipped to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DampingProfile {
    /// No damping: the limiter is 1 everywhere.
    None,
    /// `x`
    Linear,
    /// `(1 - cos(pi x)) / 2`
    Cosine,
    /// `sin(pi x / 2)`
    Sine,
}

impl DampingProfile {
    pub fn type_name(self) -> &'static str {
        match self {
            DampingProfile::None => "none",
            DampingProfile::Linear => "linear",
            DampingProfile::Cosine => "cosine",
            DampingProfile::Sine => "sine",
        }
    }

    pub fn value(self, x: Real) -> Real {
        let x = clamp_unit(x);
        let l = match self {
            DampingProfile::None => 1.0,
            DampingProfile::Linear => x,
            DampingProfile::Cosine => 0.5 * (1.0 - (PI * x).cos()),
            DampingProfile::Sine => (FRAC_PI_2 * x).sin(),
        };
        clamp_unit(l)
    }
}

/// Wall damping with a fixed profile of the normalised wall distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpolatedWallDamping {
    pub base: Interpolated,
    pub profile: DampingProfile,
    /// Scale of the damped region in dispersed diameters.
    pub cd: Real,
}

impl InterpolatedWallDamping {
    pub fn new(profile: DampingProfile, cd: Real, zero_in_near_wall_cells: bool) -> Self {
        Self {
            base: Interpolated {
                zero_in_near_wall_cells,
            },
            profile,
            cd,
        }
    }

    fn from_dict_with(
        profile: DampingProfile,
        dict: &Dict,
    ) -> ModelResult<Box<dyn WallDampingModel>> {
        let cd = dict.real_or("Cd", 1.0)?;
        if cd <= 0.0 {
            return Err(dict.bad("Cd", "must be positive"));
        }
        Ok(Box::new(Self {
            base: Interpolated::from_dict(dict)?,
            profile,
            cd,
        }))
    }

    pub fn none(dict: &Dict, _key: &PhasePairKey) -> ModelResult<Box<dyn WallDampingModel>> {
        Self::from_dict_with(DampingProfile::None, dict)
    }

    pub fn linear(dict: &Dict, _key: &PhasePairKey) -> ModelResult<Box<dyn WallDampingModel>> {
        Self::from_dict_with(DampingProfile::Linear, dict)
    }

    pub fn cosine(dict: &Dict, _key: &PhasePairKey) -> ModelResult<Box<dyn WallDampingModel>> {
        Self::from_dict_with(DampingProfile::Cosine, dict)
    }

    pub fn sine(dict: &Dict, _key: &PhasePairKey) -> ModelResult<Box<dyn WallDampingModel>> {
        Self::from_dict_with(DampingProfile::Sine, dict)
    }
}

impl WallDampingModel for InterpolatedWallDamping {
    fn type_name(&self) -> &'static str {
        self.profile.type_name()
    }

    fn limiter(&self, pair: &PairView<'_>, mesh: &dyn Mesh) -> VolScalarField {
        let scale = self.cd * pair.dispersed().diameter();
        let profile = self.profile;
        let values = mesh
            .wall_distance()
            .iter()
            .map(|&y| profile.value(y / scale))
            .collect();
        let limiter = VolScalarField::from_values("limiter", values);
        self.base.zero_near_wall_cells(limiter, mesh)
    }
}

pub struct WallDamping;

impl ModelFamily for WallDamping {
    const CATEGORY: &'static str = "wallDamping";
    type Model = dyn WallDampingModel;

    fn factory() -> &'static Factory<dyn WallDampingModel> {
        static FACTORY: OnceLock<Factory<dyn WallDampingModel>> = OnceLock::new();
        FACTORY.get_or_init(|| {
            Factory::new(Self::CATEGORY)
                .with("none", InterpolatedWallDamping::none)
                .with("linear", InterpolatedWallDamping::linear)
                .with("cosine", InterpolatedWallDamping::cosine)
                .with("sine", InterpolatedWallDamping::sine)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_hit_end_points() {
        for p in [
            DampingProfile::Linear,
            DampingProfile::Cosine,
            DampingProfile::Sine,
        ] {
            assert_eq!(p.value(0.0), 0.0, "{}", p.type_name());
            assert!((p.value(1.0) - 1.0).abs() < 1e-15, "{}", p.type_name());
            assert!((p.value(7.5) - 1.0).abs() < 1e-15);
            assert_eq!(p.value(-1.0), 0.0);
        }
        assert_eq!(DampingProfile::None.value(0.0), 1.0);
    }

    #[test]
    fn infinite_wall_distance_is_undamped() {
        assert_eq!(DampingProfile::Linear.value(Real::INFINITY), 1.0);
    }

    #[test]
    fn profiles_are_monotone() {
        for p in [
            DampingProfile::Linear,
            DampingProfile::Cosine,
            DampingProfile::Sine,
        ] {
            let mut prev = 0.0;
            for i in 0..=20 {
                let v = p.value(i as Real / 20.0);
                assert!(v >= prev);
                prev = v;
            }
        }
    }
}
