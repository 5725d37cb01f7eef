//! Aspect ratio of deformed dispersed particles.

use std::fmt::Debug;
use std::sync::OnceLock;

use pf_core::Real;
use pf_mesh::VolScalarField;
use pf_phases::{PairView, PhasePairKey};

use crate::dict::Dict;
use crate::error::ModelResult;
use crate::factory::{Factory, ModelFamily};

pub trait AspectRatioModel: Debug + Send + Sync {
    fn type_name(&self) -> &'static str;

    /// Ratio of minor to major axis, 1 for a sphere.
    fn e(&self, pair: &PairView<'_>) -> VolScalarField;
}

#[derive(Debug, Clone, Copy)]
pub struct ConstantAspectRatio {
    pub e0: Real,
}

impl ConstantAspectRatio {
    pub const TYPE: &'static str = "constant";

    pub fn from_dict(dict: &Dict, _key: &PhasePairKey) -> ModelResult<Box<dyn AspectRatioModel>> {
        let e0 = dict.real("E0")?;
        if !(e0 > 0.0 && e0 <= 1.0) {
            return Err(dict.bad("E0", "must lie in (0, 1]"));
        }
        Ok(Box::new(Self { e0 }))
    }
}

impl AspectRatioModel for ConstantAspectRatio {
    fn type_name(&self) -> &'static str {
        Self::TYPE
    }

    fn e(&self, pair: &PairView<'_>) -> VolScalarField {
        VolScalarField::uniform("E", pair.n_cells(), self.e0)
    }
}

pub struct AspectRatio;

impl ModelFamily for AspectRatio {
    const CATEGORY: &'static str = "aspectRatio";
    type Model = dyn AspectRatioModel;

    fn factory() -> &'static Factory<dyn AspectRatioModel> {
        static FACTORY: OnceLock<Factory<dyn AspectRatioModel>> = OnceLock::new();
        FACTORY.get_or_init(|| {
            Factory::new(Self::CATEGORY)
                .with(ConstantAspectRatio::TYPE, ConstantAspectRatio::from_dict)
        })
    }
}
