//! The coupling interface a pressure-velocity algorithm drives.

use std::collections::BTreeMap;

use pf_core::Real;
use pf_mesh::{
    Field, FvMatrix, FvScalarMatrix, SurfaceLocation, SurfaceScalarField, Vector, VolLocation,
    VolScalarField,
};

use crate::error::SystemResult;
use crate::phase_system::PhaseSystem;

/// One entry per phase, in phase index order; `None` for phases the term
/// does not apply to.
pub type PhaseMatrices<T> = Vec<Option<FvMatrix<T>>>;

/// One field per phase, in phase index order; `None` where not applicable.
pub type PhaseFields<T, L> = Vec<Option<Field<T, L>>>;

/// Specie transfer sources keyed by the mass-fraction field name
/// (`<specie>.<phase>`).
pub type SpecieMatrices = BTreeMap<String, FvScalarMatrix>;

/// Per-step correction hooks, run in a fixed order by `correct_step`.
///
/// Every hook defaults to doing nothing.
pub trait PhaseCorrection {
    fn correct(&mut self) -> SystemResult<()> {
        Ok(())
    }

    fn correct_kinematics(&mut self) -> SystemResult<()> {
        Ok(())
    }

    fn correct_thermo(&mut self) -> SystemResult<()> {
        Ok(())
    }

    fn correct_reactions(&mut self) -> SystemResult<()> {
        Ok(())
    }

    fn correct_species(&mut self) -> SystemResult<()> {
        Ok(())
    }

    fn correct_turbulence(&mut self) -> SystemResult<()> {
        Ok(())
    }

    fn correct_energy_transport(&mut self) -> SystemResult<()> {
        Ok(())
    }

    /// Run every hook: correct, kinematics, thermo, reactions, species,
    /// turbulence, energy transport. Stops at the first failure.
    fn correct_step(&mut self) -> SystemResult<()> {
        self.correct()?;
        self.correct_kinematics()?;
        self.correct_thermo()?;
        self.correct_reactions()?;
        self.correct_species()?;
        self.correct_turbulence()?;
        self.correct_energy_transport()
    }
}

/// Interfacial transfer terms and the implicit drag coupling.
///
/// `raus` and `rau_fs` hold one `1/A` field per phase (cell and face
/// respectively), the inverse diagonal of each phase's momentum equation.
/// Entries of stationary phases are ignored.
pub trait CoupledPhaseSystem: PhaseCorrection {
    fn phase_system(&self) -> &PhaseSystem;

    /// Momentum sources for the cell-based algorithm.
    fn momentum_transfer(&self) -> SystemResult<PhaseMatrices<Vector>>;

    /// Momentum sources for the face-based algorithm.
    fn momentum_transfer_f(&self) -> SystemResult<PhaseMatrices<Vector>>;

    /// Temperature sources of the anisothermal phases.
    fn heat_transfer(&self) -> SystemResult<PhaseMatrices<Real>>;

    /// Mass fraction sources of the multi-component phases.
    fn specie_transfer(&self) -> SystemResult<SpecieMatrices>;

    /// Face coefficients of the implicit interfacial terms.
    fn af_fs(&self) -> SystemResult<PhaseFields<Real, SurfaceLocation>>;

    /// Fluxes of the explicit interfacial forces, cell-based.
    fn phi_fs(&self, raus: &[VolScalarField]) -> SystemResult<PhaseFields<Real, SurfaceLocation>>;

    /// Fluxes of the explicit interfacial forces, face-based.
    fn phi_f_fs(
        &self,
        rau_fs: &[SurfaceScalarField],
    ) -> SystemResult<PhaseFields<Real, SurfaceLocation>>;

    /// Explicit drag velocities `rAU_i sum_j K_ij U_j`.
    fn kd_u_by_as(&self, raus: &[VolScalarField]) -> SystemResult<PhaseFields<Vector, VolLocation>>;

    /// Explicit drag fluxes `sum_j (rAU_i K_ij)_f phi_j`.
    fn phi_kd_phis(
        &self,
        raus: &[VolScalarField],
    ) -> SystemResult<PhaseFields<Real, SurfaceLocation>>;

    /// Explicit drag fluxes `sum_j rAUf_i (K_ij)_f phi_j`, face-based.
    fn phi_kd_phi_fs(
        &self,
        rau_fs: &[SurfaceScalarField],
    ) -> SystemResult<PhaseFields<Real, SurfaceLocation>>;

    /// Flux corrections of the time derivative, divided by the momentum
    /// diagonal. With `include_virtual_mass` the virtual mass inertia is
    /// corrected as well.
    fn ddt_corr_by_as(
        &self,
        raus: &[VolScalarField],
        include_virtual_mass: bool,
    ) -> SystemResult<PhaseFields<Real, SurfaceLocation>>;

    /// Solve the drag coupling implicitly, updating velocities and fluxes.
    fn partial_elimination(&mut self, raus: &[VolScalarField]) -> SystemResult<()>;

    /// Face-based variant, updating fluxes only.
    fn partial_elimination_f(&mut self, rau_fs: &[SurfaceScalarField]) -> SystemResult<()>;
}

impl PhaseCorrection for PhaseSystem {
    /// Refresh the mixture flux from the phase fluxes.
    fn correct(&mut self) -> SystemResult<()> {
        self.phi = self.calc_phi();
        Ok(())
    }

    fn correct_kinematics(&mut self) -> SystemResult<()> {
        let dt = self.delta_t();
        for phase in self.phases.phases_mut() {
            phase.correct_kinematics(dt);
        }
        Ok(())
    }
}
