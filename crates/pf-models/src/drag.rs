//! Interfacial drag.

use std::fmt::Debug;
use std::sync::OnceLock;

use pf_core::Real;
use pf_mesh::VolScalarField;
use pf_phases::{PairView, PhasePairKey};

use crate::dict::Dict;
use crate::error::ModelResult;
use crate::factory::{Factory, ModelFamily};

/// Drag between a dispersed phase and the continuous phase around it.
pub trait DragModel: Debug + Send + Sync {
    fn type_name(&self) -> &'static str;

    /// Drag coefficient times the relative Reynolds number.
    fn cd_re(&self, pair: &PairView<'_>) -> VolScalarField;

    /// Drag function per unit dispersed fraction, `0.75 CdRe rho_c nu_c / d^2`.
    fn ki(&self, pair: &PairView<'_>) -> VolScalarField {
        let c = pair.continuous();
        let d = pair.dispersed().diameter();
        let mu_c = &c.rho() * &c.nu();
        self.cd_re(pair)
            .zip_map(&mu_c, "Ki", move |cd_re, mu| 0.75 * cd_re * mu / (d * d))
    }

    /// Momentum exchange coefficient `K = max(alpha_d, residual) Ki`.
    fn k(&self, pair: &PairView<'_>) -> VolScalarField {
        (&pair.alpha_d_residual() * &self.ki(pair)).renamed("K")
    }
}

/// Schiller-Naumann correlation for spherical particles.
#[derive(Debug, Clone)]
pub struct SchillerNaumann {
    pub residual_re: Real,
}

impl SchillerNaumann {
    pub const TYPE: &'static str = "SchillerNaumann";

    pub fn from_dict(dict: &Dict, _key: &PhasePairKey) -> ModelResult<Box<dyn DragModel>> {
        let residual_re = dict.real_or("residualRe", 1e-3)?;
        if residual_re <= 0.0 {
            return Err(dict.bad("residualRe", "must be positive"));
        }
        Ok(Box::new(Self { residual_re }))
    }

    pub fn cd_re_of(&self, re: Real) -> Real {
        if re < 1000.0 {
            24.0 * (1.0 + 0.15 * re.powf(0.687))
        } else {
            0.44 * re.max(self.residual_re)
        }
    }
}

impl DragModel for SchillerNaumann {
    fn type_name(&self) -> &'static str {
        Self::TYPE
    }

    fn cd_re(&self, pair: &PairView<'_>) -> VolScalarField {
        pair.re().map("CdRe", |re| self.cd_re_of(re))
    }
}

/// Creeping-flow limit, `Cd Re = 24`.
#[derive(Debug, Clone, Copy)]
pub struct Stokes;

impl Stokes {
    pub const TYPE: &'static str = "Stokes";

    pub fn from_dict(_dict: &Dict, _key: &PhasePairKey) -> ModelResult<Box<dyn DragModel>> {
        Ok(Box::new(Self))
    }
}

impl DragModel for Stokes {
    fn type_name(&self) -> &'static str {
        Self::TYPE
    }

    fn cd_re(&self, pair: &PairView<'_>) -> VolScalarField {
        VolScalarField::uniform("CdRe", pair.n_cells(), 24.0)
    }
}

/// The drag family.
pub struct Drag;

impl ModelFamily for Drag {
    const CATEGORY: &'static str = "drag";
    type Model = dyn DragModel;

    fn factory() -> &'static Factory<dyn DragModel> {
        static FACTORY: OnceLock<Factory<dyn DragModel>> = OnceLock::new();
        FACTORY.get_or_init(|| {
            Factory::new(Self::CATEGORY)
                .with(SchillerNaumann::TYPE, SchillerNaumann::from_dict)
                .with(Stokes::TYPE, Stokes::from_dict)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schiller_naumann_regimes() {
        let sn = SchillerNaumann { residual_re: 1e-3 };
        assert_eq!(sn.cd_re_of(0.0), 24.0);
        let re: Real = 100.0;
        assert!((sn.cd_re_of(re) - 24.0 * (1.0 + 0.15 * re.powf(0.687))).abs() < 1e-12);
        assert!((sn.cd_re_of(2000.0) - 880.0).abs() < 1e-9);
    }

    #[test]
    fn factory_knows_both_models() {
        assert_eq!(Drag::factory().names(), vec!["SchillerNaumann", "Stokes"]);
    }
}
