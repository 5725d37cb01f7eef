//! Phase pairs and their derived interfacial quantities.

use pf_core::{PhaseId, Real, units::constants::G0_MPS2};
use pf_mesh::{VolScalarField, VolVectorField};

use crate::pair_key::PhasePairKey;
use crate::phase::Phase;
use crate::registry::PhaseRegistry;

/// The single shared record of two interacting phases.
///
/// `phase1`/`phase2` follow the canonical (sorted-name) order of the
/// unordered key. Ordered projections refer back to this record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhasePair {
    key: PhasePairKey,
    phase1: PhaseId,
    phase2: PhaseId,
}

impl PhasePair {
    pub(crate) fn new(key: PhasePairKey, phase1: PhaseId, phase2: PhaseId) -> Self {
        Self { key, phase1, phase2 }
    }

    /// The unordered key of this pair.
    pub fn key(&self) -> &PhasePairKey {
        &self.key
    }

    pub fn phase1(&self) -> PhaseId {
        self.phase1
    }

    pub fn phase2(&self) -> PhaseId {
        self.phase2
    }

    /// The partner of `phase`, if it belongs to this pair.
    pub fn other(&self, phase: PhaseId) -> Option<PhaseId> {
        if phase == self.phase1 {
            Some(self.phase2)
        } else if phase == self.phase2 {
            Some(self.phase1)
        } else {
            None
        }
    }
}

/// How a key looks at its underlying pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Unordered,
    /// phase1 dispersed in phase2
    Forward,
    /// phase2 dispersed in phase1
    Reverse,
}

/// A pair seen through one key: shared data plus a direction.
#[derive(Debug, Clone, Copy)]
pub struct PairRef<'a> {
    pair: &'a PhasePair,
    orientation: Orientation,
}

impl<'a> PairRef<'a> {
    pub(crate) fn new(pair: &'a PhasePair, orientation: Orientation) -> Self {
        Self { pair, orientation }
    }

    pub fn pair(&self) -> &'a PhasePair {
        self.pair
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn is_ordered(&self) -> bool {
        self.orientation != Orientation::Unordered
    }

    /// The key this reference was resolved from.
    pub fn key(&self) -> PhasePairKey {
        let k = self.pair.key();
        match self.orientation {
            Orientation::Unordered => k.clone(),
            Orientation::Forward => PhasePairKey::ordered(k.first(), k.second()),
            Orientation::Reverse => PhasePairKey::ordered(k.second(), k.first()),
        }
    }

    /// Dispersed phase. For an unordered pair this is `phase1` by convention.
    pub fn dispersed(&self) -> PhaseId {
        match self.orientation {
            Orientation::Reverse => self.pair.phase2,
            _ => self.pair.phase1,
        }
    }

    /// Continuous phase. For an unordered pair this is `phase2` by convention.
    pub fn continuous(&self) -> PhaseId {
        match self.orientation {
            Orientation::Reverse => self.pair.phase1,
            _ => self.pair.phase2,
        }
    }

    /// Borrow both phases to evaluate derived quantities.
    pub fn view(&self, phases: &'a PhaseRegistry) -> PairView<'a> {
        PairView {
            dispersed: phases.phase(self.dispersed()),
            continuous: phases.phase(self.continuous()),
            ordered: self.is_ordered(),
        }
    }
}

/// Both phases of a pair, borrowed for one evaluation.
#[derive(Clone, Copy)]
pub struct PairView<'a> {
    dispersed: &'a Phase,
    continuous: &'a Phase,
    ordered: bool,
}

impl<'a> PairView<'a> {
    pub fn new(dispersed: &'a Phase, continuous: &'a Phase, ordered: bool) -> Self {
        Self {
            dispersed,
            continuous,
            ordered,
        }
    }

    pub fn dispersed(&self) -> &'a Phase {
        self.dispersed
    }

    pub fn continuous(&self) -> &'a Phase {
        self.continuous
    }

    pub fn is_ordered(&self) -> bool {
        self.ordered
    }

    pub fn n_cells(&self) -> usize {
        self.dispersed.alpha().len()
    }

    /// Relative velocity `U_d - U_c`.
    pub fn ur(&self) -> VolVectorField {
        (self.dispersed.u() - self.continuous.u()).renamed("Ur")
    }

    pub fn mag_ur(&self) -> VolScalarField {
        self.ur().mag()
    }

    /// Dispersed fraction floored at its residual value.
    pub fn alpha_d_residual(&self) -> VolScalarField {
        self.dispersed
            .alpha()
            .max_with(self.dispersed.residual_alpha())
    }

    /// Dispersed-phase diameter.
    pub fn d(&self) -> VolScalarField {
        self.dispersed.d()
    }

    /// Relative Reynolds number `|Ur| d / nu_c`.
    pub fn re(&self) -> VolScalarField {
        let d = self.dispersed.diameter();
        self.mag_ur()
            .zip_map(&self.continuous.nu(), "Re", move |ur, nu| ur * d / nu)
    }

    /// Continuous-phase Prandtl number.
    pub fn pr(&self) -> VolScalarField {
        let c = self.continuous;
        let mu_cp = &c.mu() * &c.cp();
        (&mu_cp / &c.kappa()).renamed("Pr")
    }

    /// Eötvös number for a given surface tension field.
    pub fn eo(&self, sigma: &VolScalarField) -> VolScalarField {
        let d = self.dispersed.diameter();
        let drho = (&self.continuous.rho() - &self.dispersed.rho()).map("drho", Real::abs);
        drho.zip_map(sigma, "Eo", move |drho, sigma| G0_MPS2 * drho * d * d / sigma)
    }

    /// Pair mixture density.
    pub fn rho(&self) -> VolScalarField {
        let d = self.dispersed.alpha() * &self.dispersed.rho();
        let c = self.continuous.alpha() * &self.continuous.rho();
        (&d + &c).renamed("rho")
    }
}
