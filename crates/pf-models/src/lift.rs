//! Lift force on a dispersed phase in a sheared continuous phase.

use std::fmt::Debug;
use std::sync::OnceLock;

use pf_core::Real;
use pf_mesh::{Mesh, VolScalarField, VolVectorField, fvc};
use pf_phases::{PairView, PhasePairKey};

use crate::dict::Dict;
use crate::error::ModelResult;
use crate::factory::{Factory, ModelFamily};

pub trait LiftModel: Debug + Send + Sync {
    fn type_name(&self) -> &'static str;

    /// Lift coefficient.
    fn cl(&self, pair: &PairView<'_>) -> VolScalarField;

    /// Force per unit dispersed fraction, `Cl rho_c (Ur x curl(U_c))`.
    fn fi(&self, pair: &PairView<'_>, mesh: &dyn Mesh) -> VolVectorField {
        let vorticity = fvc::curl(mesh, pair.continuous().u());
        let shear = pair
            .ur()
            .zip_map(&vorticity, "Ur^curl(Uc)", |ur, w| ur.cross(&w));
        let coeff = &self.cl(pair) * &pair.continuous().rho();
        (&coeff * &shear).renamed("Fi")
    }

    /// Lift force on the dispersed phase, `alpha_d Fi`.
    fn f(&self, pair: &PairView<'_>, mesh: &dyn Mesh) -> VolVectorField {
        (pair.dispersed().alpha() * &self.fi(pair, mesh)).renamed("Flift")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ConstantLift {
    pub cl: Real,
}

impl ConstantLift {
    pub const TYPE: &'static str = "constantCoefficient";

    pub fn from_dict(dict: &Dict, _key: &PhasePairKey) -> ModelResult<Box<dyn LiftModel>> {
        Ok(Box::new(Self {
            cl: dict.real("Cl")?,
        }))
    }
}

impl LiftModel for ConstantLift {
    fn type_name(&self) -> &'static str {
        Self::TYPE
    }

    fn cl(&self, pair: &PairView<'_>) -> VolScalarField {
        VolScalarField::uniform("Cl", pair.n_cells(), self.cl)
    }
}

pub struct Lift;

impl ModelFamily for Lift {
    const CATEGORY: &'static str = "lift";
    type Model = dyn LiftModel;

    fn factory() -> &'static Factory<dyn LiftModel> {
        static FACTORY: OnceLock<Factory<dyn LiftModel>> = OnceLock::new();
        FACTORY.get_or_init(|| {
            Factory::new(Self::CATEGORY).with(ConstantLift::TYPE, ConstantLift::from_dict)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_mesh::{Vector, generation};
    use pf_phases::{ConstantThermo, PhaseRegistry, PhaseSpec};

    #[test]
    fn no_shear_no_lift() {
        let mesh = generation::wall_bounded_column(4, 1.0, 1.0).unwrap();
        let phases = PhaseRegistry::new(
            vec![
                PhaseSpec::new("air", ConstantThermo::air())
                    .alpha(0.2)
                    .velocity(Vector::new(0.0, 0.5, 0.0)),
                PhaseSpec::new("water", ConstantThermo::water()).alpha(0.8),
            ],
            &mesh,
        )
        .unwrap();
        let view = PairView::new(&phases.phases()[0], &phases.phases()[1], true);
        let lift = ConstantLift { cl: 0.5 };
        let f = lift.f(&view, &mesh);
        assert!(f.values().iter().all(|v| v.norm() < 1e-12));
    }
}
