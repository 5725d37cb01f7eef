//! Added-mass force of a dispersed phase accelerating through the continuous one.

use std::fmt::Debug;
use std::sync::OnceLock;

use pf_core::Real;
use pf_mesh::VolScalarField;
use pf_phases::{PairView, PhasePairKey};

use crate::dict::Dict;
use crate::error::ModelResult;
use crate::factory::{Factory, ModelFamily};

pub trait VirtualMassModel: Debug + Send + Sync {
    fn type_name(&self) -> &'static str;

    /// Virtual mass coefficient.
    fn cvm(&self, pair: &PairView<'_>) -> VolScalarField;

    /// `Cvm rho_c` per unit dispersed fraction.
    fn ki(&self, pair: &PairView<'_>) -> VolScalarField {
        (&self.cvm(pair) * &pair.continuous().rho()).renamed("Ki")
    }

    /// `Vm = alpha_d Cvm rho_c`.
    fn k(&self, pair: &PairView<'_>) -> VolScalarField {
        (pair.dispersed().alpha() * &self.ki(pair)).renamed("Vm")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ConstantVirtualMass {
    pub cvm: Real,
}

impl ConstantVirtualMass {
    pub const TYPE: &'static str = "constantCoefficient";

    pub fn from_dict(dict: &Dict, _key: &PhasePairKey) -> ModelResult<Box<dyn VirtualMassModel>> {
        let cvm = dict.real("Cvm")?;
        if cvm < 0.0 {
            return Err(dict.bad("Cvm", "must not be negative"));
        }
        Ok(Box::new(Self { cvm }))
    }
}

impl VirtualMassModel for ConstantVirtualMass {
    fn type_name(&self) -> &'static str {
        Self::TYPE
    }

    fn cvm(&self, pair: &PairView<'_>) -> VolScalarField {
        VolScalarField::uniform("Cvm", pair.n_cells(), self.cvm)
    }
}

pub struct VirtualMass;

impl ModelFamily for VirtualMass {
    const CATEGORY: &'static str = "virtualMass";
    type Model = dyn VirtualMassModel;

    fn factory() -> &'static Factory<dyn VirtualMassModel> {
        static FACTORY: OnceLock<Factory<dyn VirtualMassModel>> = OnceLock::new();
        FACTORY.get_or_init(|| {
            Factory::new(Self::CATEGORY)
                .with(ConstantVirtualMass::TYPE, ConstantVirtualMass::from_dict)
        })
    }
}
