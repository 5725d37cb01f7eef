//! Interphase species mass transfer coefficients.

use std::fmt::Debug;
use std::sync::OnceLock;

use pf_core::Real;
use pf_mesh::VolScalarField;
use pf_phases::{PairView, PhasePairKey};

use crate::dict::Dict;
use crate::error::ModelResult;
use crate::factory::{Factory, ModelFamily};

/// Volumetric mass transfer coefficient in 1/s.
pub trait MassTransferModel: Debug + Send + Sync {
    fn type_name(&self) -> &'static str;

    fn k(&self, pair: &PairView<'_>) -> VolScalarField;
}

/// Species diffusivity of the continuous phase, `kappa / (rho cp Le)`.
fn diffusivity(pair: &PairView<'_>, le: Real) -> VolScalarField {
    let c = pair.continuous();
    let rho_cp = &c.rho() * &c.cp();
    c.kappa()
        .zip_map(&rho_cp, "D", move |kappa, rho_cp| kappa / (rho_cp * le))
}

/// `K = 6 max(alpha_d, residual) Sh D / d^2`.
fn from_sherwood(pair: &PairView<'_>, sh: &VolScalarField, le: Real) -> VolScalarField {
    let d = pair.dispersed().diameter();
    let alpha_d = &pair.alpha_d_residual() * &diffusivity(pair, le);
    alpha_d.zip_map(sh, "K", move |ad, sh| 6.0 * ad * sh / (d * d))
}

fn read_lewis(dict: &Dict) -> ModelResult<Real> {
    let le = dict.real_or("Le", 1.0)?;
    if le <= 0.0 {
        return Err(dict.bad("Le", "must be positive"));
    }
    Ok(le)
}

/// Frossling, `Sh = 2 + 0.552 Re^1/2 Sc^1/3` with `Sc = Le Pr`.
#[derive(Debug, Clone, Copy)]
pub struct Frossling {
    pub le: Real,
}

impl Frossling {
    pub const TYPE: &'static str = "Frossling";

    pub fn from_dict(dict: &Dict, _key: &PhasePairKey) -> ModelResult<Box<dyn MassTransferModel>> {
        Ok(Box::new(Self {
            le: read_lewis(dict)?,
        }))
    }

    pub fn sherwood(re: Real, sc: Real) -> Real {
        2.0 + 0.552 * re.max(0.0).sqrt() * sc.cbrt()
    }
}

impl MassTransferModel for Frossling {
    fn type_name(&self) -> &'static str {
        Self::TYPE
    }

    fn k(&self, pair: &PairView<'_>) -> VolScalarField {
        let le = self.le;
        let sh = pair
            .re()
            .zip_map(&pair.pr(), "Sh", move |re, pr| Self::sherwood(re, le * pr));
        from_sherwood(pair, &sh, le)
    }
}

/// Fixed Sherwood number of 10.
#[derive(Debug, Clone, Copy)]
pub struct SphericalMassTransfer {
    pub le: Real,
}

impl SphericalMassTransfer {
    pub const TYPE: &'static str = "spherical";

    pub fn from_dict(dict: &Dict, _key: &PhasePairKey) -> ModelResult<Box<dyn MassTransferModel>> {
        Ok(Box::new(Self {
            le: read_lewis(dict)?,
        }))
    }
}

impl MassTransferModel for SphericalMassTransfer {
    fn type_name(&self) -> &'static str {
        Self::TYPE
    }

    fn k(&self, pair: &PairView<'_>) -> VolScalarField {
        let sh = VolScalarField::uniform("Sh", pair.n_cells(), 10.0);
        from_sherwood(pair, &sh, self.le)
    }
}

pub struct MassTransfer;

impl ModelFamily for MassTransfer {
    const CATEGORY: &'static str = "massTransfer";
    type Model = dyn MassTransferModel;

    fn factory() -> &'static Factory<dyn MassTransferModel> {
        static FACTORY: OnceLock<Factory<dyn MassTransferModel>> = OnceLock::new();
        FACTORY.get_or_init(|| {
            Factory::new(Self::CATEGORY)
                .with(Frossling::TYPE, Frossling::from_dict)
                .with(SphericalMassTransfer::TYPE, SphericalMassTransfer::from_dict)
        })
    }
}
