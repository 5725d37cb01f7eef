//! Interphase heat transfer coefficients.

use std::fmt::Debug;
use std::sync::OnceLock;

use pf_core::Real;
use pf_mesh::VolScalarField;
use pf_phases::{PairView, PhasePairKey};

use crate::dict::Dict;
use crate::error::ModelResult;
use crate::factory::{Factory, ModelFamily};

/// Volumetric heat transfer coefficient between a dispersed phase and its
/// continuous phase, in W/(m^3 K).
pub trait HeatTransferModel: Debug + Send + Sync {
    fn type_name(&self) -> &'static str;

    fn k(&self, pair: &PairView<'_>) -> VolScalarField;
}

/// `K = 6 max(alpha_d, residual) kappa_c Nu / d^2` for a Nusselt field.
fn from_nusselt(pair: &PairView<'_>, nu: &VolScalarField) -> VolScalarField {
    let d = pair.dispersed().diameter();
    let alpha_kappa = &pair.alpha_d_residual() * &pair.continuous().kappa();
    alpha_kappa.zip_map(nu, "K", move |ak, nu| 6.0 * ak * nu / (d * d))
}

/// Ranz-Marshall, `Nu = 2 + 0.6 Re^1/2 Pr^1/3`.
#[derive(Debug, Clone, Copy)]
pub struct RanzMarshall;

impl RanzMarshall {
    pub const TYPE: &'static str = "RanzMarshall";

    pub fn from_dict(_dict: &Dict, _key: &PhasePairKey) -> ModelResult<Box<dyn HeatTransferModel>> {
        Ok(Box::new(Self))
    }

    pub fn nusselt(re: Real, pr: Real) -> Real {
        2.0 + 0.6 * re.max(0.0).sqrt() * pr.cbrt()
    }
}

impl HeatTransferModel for RanzMarshall {
    fn type_name(&self) -> &'static str {
        Self::TYPE
    }

    fn k(&self, pair: &PairView<'_>) -> VolScalarField {
        let nu = pair.re().zip_map(&pair.pr(), "Nu", Self::nusselt);
        from_nusselt(pair, &nu)
    }
}

/// Conduction-dominated sphere with a fixed Nusselt number of 10.
#[derive(Debug, Clone, Copy)]
pub struct SphericalHeatTransfer;

impl SphericalHeatTransfer {
    pub const TYPE: &'static str = "spherical";

    pub fn from_dict(_dict: &Dict, _key: &PhasePairKey) -> ModelResult<Box<dyn HeatTransferModel>> {
        Ok(Box::new(Self))
    }
}

impl HeatTransferModel for SphericalHeatTransfer {
    fn type_name(&self) -> &'static str {
        Self::TYPE
    }

    fn k(&self, pair: &PairView<'_>) -> VolScalarField {
        let nu = VolScalarField::uniform("Nu", pair.n_cells(), 10.0);
        from_nusselt(pair, &nu)
    }
}

pub struct HeatTransfer;

impl ModelFamily for HeatTransfer {
    const CATEGORY: &'static str = "heatTransfer";
    type Model = dyn HeatTransferModel;

    fn factory() -> &'static Factory<dyn HeatTransferModel> {
        static FACTORY: OnceLock<Factory<dyn HeatTransferModel>> = OnceLock::new();
        FACTORY.get_or_init(|| {
            Factory::new(Self::CATEGORY)
                .with(RanzMarshall::TYPE, RanzMarshall::from_dict)
                .with(SphericalHeatTransfer::TYPE, SphericalHeatTransfer::from_dict)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranz_marshall_stagnant_limit() {
        assert_eq!(RanzMarshall::nusselt(0.0, 0.7), 2.0);
        let nu = RanzMarshall::nusselt(100.0, 8.0);
        assert!((nu - (2.0 + 0.6 * 10.0 * 2.0)).abs() < 1e-12);
    }
}
