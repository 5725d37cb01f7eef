//! Surface tension between two phases.

use std::fmt::Debug;
use std::sync::OnceLock;

use pf_core::Real;
use pf_mesh::VolScalarField;
use pf_phases::{PairView, PhasePairKey};

use crate::dict::Dict;
use crate::error::ModelResult;
use crate::factory::{Factory, ModelFamily};

pub trait SurfaceTensionModel: Debug + Send + Sync {
    fn type_name(&self) -> &'static str;

    /// Surface tension coefficient in N/m.
    fn sigma(&self, pair: &PairView<'_>) -> VolScalarField;
}

#[derive(Debug, Clone, Copy)]
pub struct ConstantSurfaceTension {
    pub sigma: Real,
}

impl ConstantSurfaceTension {
    pub const TYPE: &'static str = "constant";

    pub fn from_dict(dict: &Dict, _key: &PhasePairKey) -> ModelResult<Box<dyn SurfaceTensionModel>> {
        let sigma = dict.real("sigma")?;
        if sigma < 0.0 {
            return Err(dict.bad("sigma", "must not be negative"));
        }
        Ok(Box::new(Self { sigma }))
    }
}

impl SurfaceTensionModel for ConstantSurfaceTension {
    fn type_name(&self) -> &'static str {
        Self::TYPE
    }

    fn sigma(&self, pair: &PairView<'_>) -> VolScalarField {
        VolScalarField::uniform("sigma", pair.n_cells(), self.sigma)
    }
}

pub struct SurfaceTension;

impl ModelFamily for SurfaceTension {
    const CATEGORY: &'static str = "surfaceTension";
    type Model = dyn SurfaceTensionModel;

    fn factory() -> &'static Factory<dyn SurfaceTensionModel> {
        static FACTORY: OnceLock<Factory<dyn SurfaceTensionModel>> = OnceLock::new();
        FACTORY.get_or_init(|| {
            Factory::new(Self::CATEGORY)
                .with(ConstantSurfaceTension::TYPE, ConstantSurfaceTension::from_dict)
        })
    }
}
