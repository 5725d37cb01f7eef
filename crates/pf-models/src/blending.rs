//! Blending between the two directional correlations of a phase pair.
//!
//! A blending method turns the phase fractions of a pair into two weight
//! fields: `f1` for the model of phase1 dispersed in phase2 and `f2` for the
//! model of phase2 dispersed in phase1. The weights lie in `[0, 1]` and
//! `f2 = 1 - f1` in every cell.
//!
//! The linear and hyperbolic methods score how continuous each phase is and
//! give the direction in which the more continuous phase carries the other
//! the larger weight. A phase that fills a cell completely is fully
//! continuous and an absent phase not at all, so at fraction 0 or 1 the
//! blend reduces to a single directional model.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::OnceLock;

use pf_core::{Real, clamp_unit};
use pf_mesh::VolScalarField;
use pf_phases::Phase;

use crate::dict::Dict;
use crate::error::{ModelError, ModelResult};
use crate::factory::Factory;

pub trait BlendingMethod: Debug + Send + Sync {
    fn type_name(&self) -> &'static str;

    /// Weight of the `phase1 in phase2` model per cell.
    fn f1(&self, phase1: &Phase, phase2: &Phase) -> VolScalarField;

    /// Both weights, `(f1, 1 - f1)`.
    fn weights(&self, phase1: &Phase, phase2: &Phase) -> (VolScalarField, VolScalarField) {
        let f1 = self.f1(phase1, phase2);
        let f2 = f1.map("f2", |f| 1.0 - f);
        (f1, f2)
    }
}

/// Share of the carrying role given to phase2, from two continuity scores.
fn share(c1: Real, c2: Real) -> Real {
    let total = c1 + c2;
    if total > 0.0 { clamp_unit(c2 / total) } else { 0.5 }
}

fn blend_by_continuity(
    phase1: &Phase,
    phase2: &Phase,
    continuity: impl Fn(&Phase, Real) -> Real + Send + Sync,
) -> VolScalarField {
    phase1.alpha().zip_map(phase2.alpha(), "f1", |a1, a2| {
        share(continuity(phase1, a1), continuity(phase2, a2))
    })
}

/// Read a per-phase table, requiring an entry for every phase.
fn phase_table(dict: &Dict, key: &str, phases: &[String]) -> ModelResult<Vec<Real>> {
    let table: HashMap<String, Real> = dict.get(key)?;
    phases
        .iter()
        .map(|name| {
            let v = table
                .get(name)
                .copied()
                .ok_or_else(|| ModelError::MissingPhaseEntry {
                    dict: format!("{}.{}", dict.name(), key),
                    phase: name.clone(),
                })?;
            if (0.0..=1.0).contains(&v) {
                Ok(v)
            } else {
                Err(dict.bad(key, format!("entry for '{name}' outside [0, 1]")))
            }
        })
        .collect()
}

/// A single continuous phase carries every other phase.
#[derive(Debug, Clone)]
pub struct NoBlending {
    continuous_phase: String,
}

impl NoBlending {
    pub const TYPE: &'static str = "none";

    pub fn new(continuous_phase: impl Into<String>) -> Self {
        Self {
            continuous_phase: continuous_phase.into(),
        }
    }

    pub fn from_dict(dict: &Dict, phases: &[String]) -> ModelResult<Box<dyn BlendingMethod>> {
        let continuous: String = dict.get("continuousPhase")?;
        if !phases.contains(&continuous) {
            return Err(dict.bad(
                "continuousPhase",
                format!("'{continuous}' is not a declared phase"),
            ));
        }
        Ok(Box::new(Self::new(continuous)))
    }

    pub fn continuous_phase(&self) -> &str {
        &self.continuous_phase
    }
}

impl BlendingMethod for NoBlending {
    fn type_name(&self) -> &'static str {
        Self::TYPE
    }

    /// 1 if phase2 is the continuous phase, 0 if phase1 is, an even split
    /// between two dispersed phases.
    fn f1(&self, phase1: &Phase, phase2: &Phase) -> VolScalarField {
        let f = if phase2.name() == self.continuous_phase {
            1.0
        } else if phase1.name() == self.continuous_phase {
            0.0
        } else {
            0.5
        };
        VolScalarField::uniform("f1", phase1.alpha().len(), f)
    }
}

/// Continuity ramps linearly from `minPartlyContinuousAlpha` to
/// `minFullyContinuousAlpha`.
#[derive(Debug, Clone)]
pub struct LinearBlending {
    min_fully_continuous: Vec<Real>,
    min_partly_continuous: Vec<Real>,
}

impl LinearBlending {
    pub const TYPE: &'static str = "linear";

    pub fn from_dict(dict: &Dict, phases: &[String]) -> ModelResult<Box<dyn BlendingMethod>> {
        let fully = phase_table(dict, "minFullyContinuousAlpha", phases)?;
        let partly = phase_table(dict, "minPartlyContinuousAlpha", phases)?;
        for ((name, f), p) in phases.iter().zip(&fully).zip(&partly) {
            if f <= p {
                return Err(dict.bad(
                    "minFullyContinuousAlpha",
                    format!("entry for '{name}' must exceed minPartlyContinuousAlpha"),
                ));
            }
        }
        Ok(Box::new(Self {
            min_fully_continuous: fully,
            min_partly_continuous: partly,
        }))
    }

    /// # Panics
    /// If `phase` is not one of the phases this method was built for.
    pub fn continuity(&self, phase: &Phase, alpha: Real) -> Real {
        let fully = self.min_fully_continuous[phase.index()];
        let partly = self.min_partly_continuous[phase.index()];
        clamp_unit((alpha - partly) / (fully - partly))
    }
}

impl BlendingMethod for LinearBlending {
    fn type_name(&self) -> &'static str {
        Self::TYPE
    }

    fn f1(&self, phase1: &Phase, phase2: &Phase) -> VolScalarField {
        blend_by_continuity(phase1, phase2, |p, a| self.continuity(p, a))
    }
}

/// Continuity follows a `tanh` transition centred on `minContinuousAlpha`
/// with width `transitionAlphaScale`, rescaled to run from 0 at `alpha = 0`
/// to 1 at `alpha = 1`.
#[derive(Debug, Clone)]
pub struct HyperbolicBlending {
    min_continuous: Vec<Real>,
    transition_alpha_scale: Real,
}

impl HyperbolicBlending {
    pub const TYPE: &'static str = "hyperbolic";

    pub fn from_dict(dict: &Dict, phases: &[String]) -> ModelResult<Box<dyn BlendingMethod>> {
        let min_continuous = phase_table(dict, "minContinuousAlpha", phases)?;
        let transition_alpha_scale = dict.real("transitionAlphaScale")?;
        if transition_alpha_scale <= 0.0 {
            return Err(dict.bad("transitionAlphaScale", "must be positive"));
        }
        Ok(Box::new(Self {
            min_continuous,
            transition_alpha_scale,
        }))
    }

    /// # Panics
    /// If `phase` is not one of the phases this method was built for.
    pub fn continuity(&self, phase: &Phase, alpha: Real) -> Real {
        let m = self.min_continuous[phase.index()];
        let s = 4.0 / self.transition_alpha_scale;
        let raw = |a: Real| (s * (a - m)).tanh();
        clamp_unit((raw(alpha) - raw(0.0)) / (raw(1.0) - raw(0.0)))
    }
}

impl BlendingMethod for HyperbolicBlending {
    fn type_name(&self) -> &'static str {
        Self::TYPE
    }

    fn f1(&self, phase1: &Phase, phase2: &Phase) -> VolScalarField {
        blend_by_continuity(phase1, phase2, |p, a| self.continuity(p, a))
    }
}

/// Blending methods by type name. Constructors receive every phase name in
/// registry order.
pub fn factory() -> &'static Factory<dyn BlendingMethod, [String]> {
    static FACTORY: OnceLock<Factory<dyn BlendingMethod, [String]>> = OnceLock::new();
    FACTORY.get_or_init(|| {
        Factory::new("blending")
            .with(NoBlending::TYPE, NoBlending::from_dict)
            .with(LinearBlending::TYPE, LinearBlending::from_dict)
            .with(HyperbolicBlending::TYPE, HyperbolicBlending::from_dict)
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use pf_core::{Tolerances, nearly_equal};
    use pf_mesh::generation;
    use pf_phases::{ConstantThermo, PhaseRegistry, PhaseSpec};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn weights_sum_to_one(
            alpha in 0.0_f64..=1.0,
            fully in 0.5_f64..=1.0,
            partly in 0.0_f64..0.5,
            scale in 0.05_f64..1.0,
            centre in 0.0_f64..=1.0,
        ) {
            let mesh = generation::wall_bounded_column(1, 1.0, 1.0).unwrap();
            let reg = PhaseRegistry::new(
                vec![
                    PhaseSpec::new("a", ConstantThermo::air()).alpha(alpha),
                    PhaseSpec::new("b", ConstantThermo::water()).alpha(1.0 - alpha),
                ],
                &mesh,
            )
            .unwrap();
            let (p1, p2) = (&reg.phases()[0], &reg.phases()[1]);
            let methods: Vec<Box<dyn BlendingMethod>> = vec![
                Box::new(LinearBlending {
                    min_fully_continuous: vec![fully, fully],
                    min_partly_continuous: vec![partly, partly],
                }),
                Box::new(HyperbolicBlending {
                    min_continuous: vec![centre, centre],
                    transition_alpha_scale: scale,
                }),
                Box::new(NoBlending::new("b")),
            ];
            let tol = Tolerances { abs: 1e-12, rel: 1e-12 };
            for m in &methods {
                let (f1, f2) = m.weights(p1, p2);
                let (f1, f2) = (f1.values()[0], f2.values()[0]);
                prop_assert!((0.0..=1.0).contains(&f1));
                prop_assert!((0.0..=1.0).contains(&f2));
                prop_assert!(nearly_equal(f1 + f2, 1.0, tol));
            }
        }
    }
}
