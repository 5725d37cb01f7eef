//! Thermodynamic property capability of a phase.

use pf_core::units::{DynVisc, Density, SpecHeatCapacity, ThermalConductivity};
use pf_core::units::{jpkgk, kgpm3, pas, wpmk};
use pf_core::{PfResult, ensure_positive};
use pf_mesh::VolScalarField;

/// Trait for phase property models.
///
/// Properties are evaluated cell by cell at the phase temperature. Property
/// evaluation itself is outside this crate; implementations only need to
/// return SI values.
pub trait PhaseThermo: Send + Sync {
    /// Model name (for debugging/logging).
    fn name(&self) -> &str;

    /// Density [kg/m³].
    fn rho(&self, t: &VolScalarField) -> VolScalarField;

    /// Dynamic viscosity [Pa·s].
    fn mu(&self, t: &VolScalarField) -> VolScalarField;

    /// Specific heat capacity at constant pressure [J/(kg·K)].
    fn cp(&self, t: &VolScalarField) -> VolScalarField;

    /// Thermal conductivity [W/(m·K)].
    fn kappa(&self, t: &VolScalarField) -> VolScalarField;

    /// Kinematic viscosity [m²/s].
    fn nu(&self, t: &VolScalarField) -> VolScalarField {
        &self.mu(t) / &self.rho(t)
    }
}

/// Temperature-independent properties.
#[derive(Debug, Clone)]
pub struct ConstantThermo {
    pub rho: Density,
    pub mu: DynVisc,
    pub cp: SpecHeatCapacity,
    pub kappa: ThermalConductivity,
}

impl ConstantThermo {
    /// Create a constant-property model, rejecting non-positive values.
    pub fn new(rho: Density, mu: DynVisc, cp: SpecHeatCapacity, kappa: ThermalConductivity) -> PfResult<Self> {
        ensure_positive(rho.value, "density")?;
        ensure_positive(mu.value, "viscosity")?;
        ensure_positive(cp.value, "heat capacity")?;
        ensure_positive(kappa.value, "thermal conductivity")?;
        Ok(Self { rho, mu, cp, kappa })
    }

    /// Air at ambient conditions.
    pub fn air() -> Self {
        Self {
            rho: kgpm3(1.2),
            mu: pas(1.84e-5),
            cp: jpkgk(1007.0),
            kappa: wpmk(0.026),
        }
    }

    /// Liquid water at ambient conditions.
    pub fn water() -> Self {
        Self {
            rho: kgpm3(997.0),
            mu: pas(8.9e-4),
            cp: jpkgk(4181.0),
            kappa: wpmk(0.6),
        }
    }

    fn uniform(t: &VolScalarField, name: &str, value: f64) -> VolScalarField {
        VolScalarField::uniform(name, t.len(), value)
    }
}

impl PhaseThermo for ConstantThermo {
    fn name(&self) -> &str {
        "constant"
    }

    fn rho(&self, t: &VolScalarField) -> VolScalarField {
        Self::uniform(t, "rho", self.rho.value)
    }

    fn mu(&self, t: &VolScalarField) -> VolScalarField {
        Self::uniform(t, "mu", self.mu.value)
    }

    fn cp(&self, t: &VolScalarField) -> VolScalarField {
        Self::uniform(t, "Cp", self.cp.value)
    }

    fn kappa(&self, t: &VolScalarField) -> VolScalarField {
        Self::uniform(t, "kappa", self.kappa.value)
    }
}
