//! Interfacial momentum, heat and specie transfer with implicit drag.
//!
//! Drag is never added to the momentum matrices. It is applied afterwards
//! by partial elimination, which solves the drag coupling of all moving
//! phases implicitly in every cell:
//!
//! ```text
//! A_ii = 1 + sum_j rAU_i K_ij      A_ij = -rAU_i K_ij      A U' = U
//! ```
//!
//! Drag against a stationary phase only adds to the diagonal.

use std::sync::Arc;

use pf_config::PhaseProperties;
use pf_core::{PhaseId, Real};
use pf_mesh::{
    Field, FieldValue, FvScalarMatrix, FvVectorMatrix, Mesh, SurfaceLocation, SurfaceScalarField,
    Vector, VolLocation, VolScalarField, VolVectorField, fvc,
};
use pf_models::LiftModel;
use pf_phases::{PairView, PhasePair};
use tracing::{debug, trace};

use crate::coupled::{
    CoupledPhaseSystem, PhaseCorrection, PhaseFields, PhaseMatrices, SpecieMatrices,
};
use crate::elimination::FieldLu;
use crate::error::{SystemError, SystemResult};
use crate::phase_system::PhaseSystem;

/// Guards the ddt coupling coefficient against vanishing old fluxes.
const SMALL: Real = 1e-15;

/// A phase system whose pairs exchange momentum through drag, virtual mass
/// and lift, heat through heat transfer and species through mass transfer.
#[derive(Debug)]
pub struct MomentumTransferSystem {
    system: PhaseSystem,
}

impl MomentumTransferSystem {
    pub fn new(props: &PhaseProperties, mesh: Arc<dyn Mesh>) -> SystemResult<Self> {
        Ok(Self::from_system(PhaseSystem::new(props, mesh)?))
    }

    pub fn from_system(system: PhaseSystem) -> Self {
        Self { system }
    }

    pub fn system(&self) -> &PhaseSystem {
        &self.system
    }

    pub fn system_mut(&mut self) -> &mut PhaseSystem {
        &mut self.system
    }

    pub fn into_system(self) -> PhaseSystem {
        self.system
    }

    /// Blended drag coefficient `K` of every drag pair.
    pub fn kds(&self) -> Vec<(&PhasePair, VolScalarField)> {
        let phases = self.system.phases();
        self.system
            .drag()
            .iter()
            .map(|(_, drag)| (drag.pair(), drag.evaluate(phases, |m, view| m.k(view))))
            .collect()
    }

    /// Blended virtual mass coefficient of every virtual mass pair.
    pub fn vms(&self) -> Vec<(&PhasePair, VolScalarField)> {
        let phases = self.system.phases();
        self.system
            .virtual_mass()
            .iter()
            .map(|(_, vm)| (vm.pair(), vm.evaluate(phases, |m, view| m.k(view))))
            .collect()
    }

    /// Blended lift force on phase1 of every lift pair, wall damped where a
    /// damping model is registered.
    pub fn lift_forces(&self) -> Vec<(&PhasePair, VolVectorField)> {
        let phases = self.system.phases();
        self.system
            .lift()
            .iter()
            .map(|(_, lift)| {
                let force = lift.evaluate_force(phases, |m, view| self.damped_lift(m, view));
                (lift.pair(), force)
            })
            .collect()
    }

    fn damped_lift(&self, model: &dyn LiftModel, view: &PairView<'_>) -> VolVectorField {
        let mesh = self.system.mesh();
        let force = model.f(view, mesh);
        match self.system.wall_damping_for(view) {
            Some(damping) => damping.damp_vector(&force, view, mesh),
            None => force,
        }
    }

    /// Effective heat transfer coefficient of every heat transfer pair.
    ///
    /// Per-side models act as two resistances in series; otherwise the
    /// blended model gives the coefficient directly.
    pub fn heat_transfer_coefficients(&self) -> SystemResult<Vec<(&PhasePair, VolScalarField)>> {
        let phases = self.system.phases();
        let mut out = Vec::new();

        for (key, sides) in self.system.heat_transfer_sides().iter() {
            let pair = self.system.pairs().resolve(key)?.pair();
            let view = self.system.view(key)?;
            let side = |name: &str| {
                sides
                    .side(key, name)
                    .map(|m| m.k(&view))
                    .unwrap_or_else(|| VolScalarField::zeros("K", view.n_cells()))
            };
            let k1 = side(key.first());
            let k2 = side(key.second());
            let k = k1.zip_map(&k2, format!("K{key}"), |a, b| {
                if a + b > 0.0 { a * b / (a + b) } else { 0.0 }
            });
            out.push((pair, k));
        }

        for (key, heat) in self.system.heat_transfer().iter() {
            if self.system.heat_transfer_sides().found(key) {
                continue;
            }
            out.push((heat.pair(), heat.evaluate(phases, |m, view| m.k(view))));
        }
        Ok(out)
    }

    fn check_len(what: &'static str, expected: usize, actual: usize) -> SystemResult<()> {
        if expected != actual {
            return Err(SystemError::SizeMismatch {
                what,
                expected,
                actual,
            });
        }
        Ok(())
    }

    /// One field per phase, each the size of the mesh location.
    fn check_fields<L>(
        &self,
        what: &'static str,
        fields: &[Field<Real, L>],
        len: usize,
    ) -> SystemResult<()> {
        Self::check_len(what, self.system.phases().len(), fields.len())?;
        match fields.iter().find(|f| f.len() != len) {
            Some(field) => Err(SystemError::SizeMismatch {
                what,
                expected: len,
                actual: field.len(),
            }),
            None => Ok(()),
        }
    }

    fn check_raus(&self, raus: &[VolScalarField]) -> SystemResult<()> {
        self.check_fields("rAU fields", raus, self.system.n_cells())
    }

    fn check_rau_fs(&self, rau_fs: &[SurfaceScalarField]) -> SystemResult<()> {
        self.check_fields("rAUf fields", rau_fs, self.system.mesh().n_faces())
    }

    fn empty_momentum_matrices(&self) -> PhaseMatrices<Vector> {
        let n = self.system.n_cells();
        self.system
            .phases()
            .phases()
            .iter()
            .map(|p| p.is_moving().then(|| FvVectorMatrix::new(p.u().name(), n)))
            .collect()
    }

    /// `Vm (DU_other/Dt - DU/Dt)` with the own acceleration implicit over
    /// one time step.
    fn add_virtual_mass(&self, eqns: &mut PhaseMatrices<Vector>) {
        let phases = self.system.phases();
        let by_dt = 1.0 / self.system.delta_t();
        for (pair, vm) in self.vms() {
            let vm_by_dt = &vm * by_dt;
            for (this, other) in directions(pair) {
                let Some(eqn) = eqns[this.slot()].as_mut() else {
                    continue;
                };
                eqn.add_implicit(&vm_by_dt);
                eqn.add_explicit(&(&vm_by_dt * phases.phase(this).u_old()));
                eqn.add_explicit(&(&vm * phases.phase(other).dudt()));
            }
        }
    }

    /// Total explicit lift force on each phase.
    fn phase_forces(&self) -> PhaseFields<Vector, VolLocation> {
        let mut forces: PhaseFields<Vector, VolLocation> =
            vec![None; self.system.phases().len()];
        for (pair, force) in self.lift_forces() {
            for (this, sign) in [(pair.phase1(), 1.0), (pair.phase2(), -1.0)] {
                let contribution = &force * sign;
                accumulate(&mut forces[this.slot()], &contribution);
            }
        }
        forces
    }

    /// Per moving phase, the flux of its explicit force scaled by `rAU_f`.
    fn force_fluxes<F>(&self, rau_f: F) -> PhaseFields<Real, SurfaceLocation>
    where
        F: Fn(PhaseId) -> SurfaceScalarField,
    {
        let mesh = self.system.mesh();
        let phases = self.system.phases();
        self.phase_forces()
            .into_iter()
            .enumerate()
            .map(|(i, force)| {
                let phase = &phases.phases()[i];
                match force {
                    Some(force) if phase.is_moving() => {
                        let flux = fvc::flux(mesh, &force);
                        Some((&rau_f(phase.id()) * &flux).renamed(format!("phiF.{}", phase.name())))
                    }
                    _ => None,
                }
            })
            .collect()
    }

    /// Position of each phase among the moving phases.
    fn moving_positions(&self) -> (Vec<PhaseId>, Vec<Option<usize>>) {
        let phases = self.system.phases();
        let moving = phases.moving_phases().ids().to_vec();
        let mut position = vec![None; phases.len()];
        for (i, id) in moving.iter().enumerate() {
            position[id.slot()] = Some(i);
        }
        (moving, position)
    }

    /// Coupling coefficients over the moving phases, from per-direction
    /// coefficients `c(this, K)` = `rAU_this K` at the field location.
    fn coupling_matrix<L, C>(
        &self,
        len: usize,
        kds: &[(&PhasePair, VolScalarField)],
        coefficient: C,
    ) -> Vec<Vec<Field<Real, L>>>
    where
        C: Fn(PhaseId, &VolScalarField) -> Field<Real, L>,
    {
        let (moving, position) = self.moving_positions();
        let m = moving.len();
        let mut a: Vec<Vec<Field<Real, L>>> = (0..m)
            .map(|i| {
                (0..m)
                    .map(|j| Field::uniform(format!("A{i}{j}"), len, if i == j { 1.0 } else { 0.0 }))
                    .collect()
            })
            .collect();

        for (pair, k) in kds {
            for (this, other) in directions(pair) {
                let Some(i) = position[this.slot()] else {
                    continue;
                };
                let c = coefficient(this, k);
                a[i][i] += &c;
                if let Some(j) = position[other.slot()] {
                    a[i][j] -= &c;
                }
            }
        }
        a
    }

    /// The eliminated velocities and fluxes of the moving phases.
    fn eliminated(
        &self,
        raus: &[VolScalarField],
    ) -> SystemResult<(Vec<VolVectorField>, Vec<SurfaceScalarField>)> {
        let mesh = self.system.mesh();
        let phases = self.system.phases();
        let kds = self.kds();
        let (moving, _) = self.moving_positions();

        let a = self.coupling_matrix(mesh.n_cells(), &kds, |this, k| &raus[this.slot()] * k);
        let af = self.coupling_matrix(mesh.n_faces(), &kds, |this, k| {
            fvc::interpolate(mesh, &(&raus[this.slot()] * k))
        });
        trace!(phases = moving.len(), pairs = kds.len(), "coupling coefficients assembled");

        let us: Vec<VolVectorField> = moving.iter().map(|&id| phases.phase(id).u().clone()).collect();
        let phis: Vec<SurfaceScalarField> =
            moving.iter().map(|&id| phases.phase(id).phi().clone()).collect();
        let us = FieldLu::factorize(a)?.solve(us)?;
        let phis = FieldLu::factorize(af)?.solve(phis)?;
        Ok((us, phis))
    }

    fn eliminated_f(&self, rau_fs: &[SurfaceScalarField]) -> SystemResult<Vec<SurfaceScalarField>> {
        let mesh = self.system.mesh();
        let phases = self.system.phases();
        let kds = self.kds();
        let (moving, _) = self.moving_positions();

        let af = self.coupling_matrix(mesh.n_faces(), &kds, |this, k| {
            &rau_fs[this.slot()] * &fvc::interpolate(mesh, k)
        });
        let phis: Vec<SurfaceScalarField> =
            moving.iter().map(|&id| phases.phase(id).phi().clone()).collect();
        FieldLu::factorize(af)?.solve(phis)
    }
}

/// Both directions of a pair as (this phase, other phase).
fn directions(pair: &PhasePair) -> [(PhaseId, PhaseId); 2] {
    [(pair.phase1(), pair.phase2()), (pair.phase2(), pair.phase1())]
}

fn accumulate<T: FieldValue, L>(slot: &mut Option<Field<T, L>>, value: &Field<T, L>)
where
    Field<T, L>: Clone,
{
    match slot {
        Some(sum) => *sum += value,
        None => *slot = Some(value.clone()),
    }
}

impl PhaseCorrection for MomentumTransferSystem {
    fn correct(&mut self) -> SystemResult<()> {
        self.system.correct()
    }

    fn correct_kinematics(&mut self) -> SystemResult<()> {
        self.system.correct_kinematics()
    }
}

impl CoupledPhaseSystem for MomentumTransferSystem {
    fn phase_system(&self) -> &PhaseSystem {
        &self.system
    }

    /// Virtual mass and lift; drag is left to partial elimination.
    fn momentum_transfer(&self) -> SystemResult<PhaseMatrices<Vector>> {
        let mut eqns = self.empty_momentum_matrices();
        self.add_virtual_mass(&mut eqns);
        for (i, force) in self.phase_forces().into_iter().enumerate() {
            if let (Some(eqn), Some(force)) = (eqns[i].as_mut(), force) {
                eqn.add_explicit(&force);
            }
        }
        debug!(pairs = self.system.pairs().len(), "momentum transfer assembled");
        Ok(eqns)
    }

    /// Virtual mass only; lift enters through `phi_f_fs`.
    fn momentum_transfer_f(&self) -> SystemResult<PhaseMatrices<Vector>> {
        let mut eqns = self.empty_momentum_matrices();
        self.add_virtual_mass(&mut eqns);
        Ok(eqns)
    }

    /// `K (T_other - T)` split into `-K T` implicit and `K T_other` explicit.
    fn heat_transfer(&self) -> SystemResult<PhaseMatrices<Real>> {
        let phases = self.system.phases();
        let n = self.system.n_cells();
        let mut eqns: PhaseMatrices<Real> = phases
            .phases()
            .iter()
            .map(|p| p.is_anisothermal().then(|| FvScalarMatrix::new(p.t().name(), n)))
            .collect();

        for (pair, k) in self.heat_transfer_coefficients()? {
            for (this, other) in directions(pair) {
                let Some(eqn) = eqns[this.slot()].as_mut() else {
                    continue;
                };
                eqn.add_implicit(&k);
                eqn.add_explicit(&(&k * phases.phase(other).t()));
            }
        }
        Ok(eqns)
    }

    /// For every specie both phases of a mass transfer pair carry, a source
    /// driven by the difference of partial densities `rho Y`.
    fn specie_transfer(&self) -> SystemResult<SpecieMatrices> {
        let phases = self.system.phases();
        let n = self.system.n_cells();
        let mut eqns = SpecieMatrices::new();
        for phase in phases.multi_component_phases().iter() {
            for specie in phase.species() {
                let name = format!("{specie}.{}", phase.name());
                eqns.insert(name.clone(), FvScalarMatrix::new(name, n));
            }
        }

        for (_, transfer) in self.system.mass_transfer().iter() {
            let pair = transfer.pair();
            let k = transfer.evaluate(phases, |m, view| m.k(view));
            for (this, other) in directions(pair) {
                let (this, other) = (phases.phase(this), phases.phase(other));
                let rho = this.rho();
                let other_rho = other.rho();
                for specie in this.species() {
                    let Some(other_y) = other.y(specie) else {
                        continue;
                    };
                    let name = format!("{specie}.{}", this.name());
                    let Some(eqn) = eqns.get_mut(&name) else {
                        continue;
                    };
                    eqn.add_implicit(&(&k * &rho));
                    eqn.add_explicit(&(&(&k * &other_rho) * other_y));
                }
            }
        }
        Ok(eqns)
    }

    /// Face drag coefficients plus the implicit virtual mass coefficient.
    fn af_fs(&self) -> SystemResult<PhaseFields<Real, SurfaceLocation>> {
        let mesh = self.system.mesh();
        let phases = self.system.phases();
        let mut afs: PhaseFields<Real, SurfaceLocation> = vec![None; phases.len()];
        let by_dt = 1.0 / self.system.delta_t();

        let kds = self.kds();
        let vms = self.vms();
        let terms = kds
            .iter()
            .map(|(pair, k)| (*pair, fvc::interpolate(mesh, k)))
            .chain(
                vms.iter()
                    .map(|(pair, vm)| (*pair, fvc::interpolate(mesh, &(vm * by_dt)))),
            );
        for (pair, coefficient) in terms {
            for (this, _) in directions(pair) {
                if phases.phase(this).is_moving() {
                    accumulate(&mut afs[this.slot()], &coefficient);
                }
            }
        }
        Ok(afs)
    }

    fn phi_fs(&self, raus: &[VolScalarField]) -> SystemResult<PhaseFields<Real, SurfaceLocation>> {
        self.check_raus(raus)?;
        let mesh = self.system.mesh();
        Ok(self.force_fluxes(|id| fvc::interpolate(mesh, &raus[id.slot()])))
    }

    fn phi_f_fs(
        &self,
        rau_fs: &[SurfaceScalarField],
    ) -> SystemResult<PhaseFields<Real, SurfaceLocation>> {
        self.check_rau_fs(rau_fs)?;
        Ok(self.force_fluxes(|id| rau_fs[id.slot()].clone()))
    }

    fn kd_u_by_as(&self, raus: &[VolScalarField]) -> SystemResult<PhaseFields<Vector, VolLocation>> {
        let phases = self.system.phases();
        self.check_raus(raus)?;
        let mut out: PhaseFields<Vector, VolLocation> = vec![None; phases.len()];
        for (pair, k) in self.kds() {
            for (this, other) in directions(pair) {
                if !phases.phase(this).is_moving() {
                    continue;
                }
                let coefficient = &raus[this.slot()] * &k;
                let term = &coefficient * phases.phase(other).u();
                accumulate(&mut out[this.slot()], &term);
            }
        }
        Ok(out)
    }

    fn phi_kd_phis(
        &self,
        raus: &[VolScalarField],
    ) -> SystemResult<PhaseFields<Real, SurfaceLocation>> {
        let mesh = self.system.mesh();
        let phases = self.system.phases();
        self.check_raus(raus)?;
        let mut out: PhaseFields<Real, SurfaceLocation> = vec![None; phases.len()];
        for (pair, k) in self.kds() {
            for (this, other) in directions(pair) {
                if !phases.phase(this).is_moving() {
                    continue;
                }
                let coefficient = fvc::interpolate(mesh, &(&raus[this.slot()] * &k));
                let term = &coefficient * phases.phase(other).phi();
                accumulate(&mut out[this.slot()], &term);
            }
        }
        Ok(out)
    }

    fn phi_kd_phi_fs(
        &self,
        rau_fs: &[SurfaceScalarField],
    ) -> SystemResult<PhaseFields<Real, SurfaceLocation>> {
        self.check_rau_fs(rau_fs)?;
        let mesh = self.system.mesh();
        let phases = self.system.phases();
        let mut out: PhaseFields<Real, SurfaceLocation> = vec![None; phases.len()];
        for (pair, k) in self.kds() {
            let kf = fvc::interpolate(mesh, &k);
            for (this, other) in directions(pair) {
                if !phases.phase(this).is_moving() {
                    continue;
                }
                let coefficient = &rau_fs[this.slot()] * &kf;
                let term = &coefficient * phases.phase(other).phi();
                accumulate(&mut out[this.slot()], &term);
            }
        }
        Ok(out)
    }

    /// `c (rAU alpha rho)_f (phi_old - flux(U_old)) / dt` per moving phase,
    /// where `c = 1 - min(|phi_corr| / |phi_old|, 1)` fades the correction
    /// out where the old flux and velocity disagree strongly.
    fn ddt_corr_by_as(
        &self,
        raus: &[VolScalarField],
        include_virtual_mass: bool,
    ) -> SystemResult<PhaseFields<Real, SurfaceLocation>> {
        self.check_raus(raus)?;
        let mesh = self.system.mesh();
        let phases = self.system.phases();
        let by_dt = 1.0 / self.system.delta_t();
        let vms = if include_virtual_mass { self.vms() } else { Vec::new() };

        let mut out: PhaseFields<Real, SurfaceLocation> = vec![None; phases.len()];
        for phase in phases.moving_phases().iter() {
            let i = phase.id().slot();
            let phi_corr = phase.phi_old() - &fvc::flux(mesh, phase.u_old());
            let coupling = phi_corr.zip_map(phase.phi_old(), "ddtCouplingCoeff", |corr, old| {
                1.0 - (corr.abs() / (old.abs() + SMALL)).min(1.0)
            });
            let scaled = &(&coupling * &phi_corr) * by_dt;

            let mut inertia = &(&raus[i] * phase.alpha()) * &phase.rho();
            for (pair, vm) in &vms {
                if pair.phase1() == phase.id() || pair.phase2() == phase.id() {
                    inertia += &(&raus[i] * vm);
                }
            }
            let corr = &fvc::interpolate(mesh, &inertia) * &scaled;
            out[i] = Some(corr.renamed(format!("ddtCorrByA.{}", phase.name())));
        }
        Ok(out)
    }

    fn partial_elimination(&mut self, raus: &[VolScalarField]) -> SystemResult<()> {
        self.check_raus(raus)?;
        let (moving, _) = self.moving_positions();
        let (us, phis) = self.eliminated(raus)?;

        let phases = self.system.phases_mut();
        for ((id, u), phi) in moving.into_iter().zip(us).zip(phis) {
            let phase = phases.phase_mut(id);
            *phase.u_mut() = u.renamed(format!("U.{}", phase.name()));
            *phase.phi_mut() = phi.renamed(format!("phi.{}", phase.name()));
        }
        debug!("partial elimination applied");
        Ok(())
    }

    fn partial_elimination_f(&mut self, rau_fs: &[SurfaceScalarField]) -> SystemResult<()> {
        self.check_rau_fs(rau_fs)?;
        let (moving, _) = self.moving_positions();
        let phis = self.eliminated_f(rau_fs)?;

        let phases = self.system.phases_mut();
        for (id, phi) in moving.into_iter().zip(phis) {
            let phase = phases.phase_mut(id);
            *phase.phi_mut() = phi.renamed(format!("phi.{}", phase.name()));
        }
        debug!("face partial elimination applied");
        Ok(())
    }
}
