//! The ordered list of phases and its partial views.

use std::collections::{HashMap, HashSet};

use pf_core::PhaseId;
use pf_mesh::Mesh;
use tracing::debug;

use crate::error::{PhaseError, PhaseResult};
use crate::phase::{Phase, PhaseSpec};

/// Owns every phase in configuration order.
///
/// The moving, stationary, anisothermal and multi-component views are
/// computed once at construction and never change afterwards.
#[derive(Debug)]
pub struct PhaseRegistry {
    phases: Vec<Phase>,
    by_name: HashMap<String, PhaseId>,
    moving: Vec<PhaseId>,
    stationary: Vec<PhaseId>,
    anisothermal: Vec<PhaseId>,
    multi_component: Vec<PhaseId>,
}

/// A filtered, read-only view over some of the registered phases.
#[derive(Clone, Copy)]
pub struct PhaseView<'a> {
    phases: &'a [Phase],
    ids: &'a [PhaseId],
}

impl<'a> PhaseView<'a> {
    pub fn ids(&self) -> &'a [PhaseId] {
        self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Phase> + 'a {
        let phases = self.phases;
        self.ids.iter().map(move |id| &phases[id.slot()])
    }

    pub fn names(&self) -> Vec<&'a str> {
        self.iter().map(Phase::name).collect()
    }
}

impl PhaseRegistry {
    /// Create every phase on the mesh, in the given order.
    ///
    /// Fails if no phase is given or a name is repeated.
    pub fn new(specs: Vec<PhaseSpec>, mesh: &dyn Mesh) -> PhaseResult<Self> {
        if specs.is_empty() {
            return Err(PhaseError::NoPhases);
        }

        let mut seen = HashSet::new();
        for spec in &specs {
            if !seen.insert(spec.name().to_string()) {
                return Err(PhaseError::DuplicatePhase {
                    name: spec.name().to_string(),
                });
            }
        }

        let phases = specs
            .into_iter()
            .enumerate()
            .map(|(i, spec)| Phase::new(PhaseId::from_index(i as u32), spec, mesh))
            .collect::<PhaseResult<Vec<_>>>()?;

        let by_name = phases
            .iter()
            .map(|p| (p.name().to_string(), p.id()))
            .collect();
        let select = |pred: fn(&Phase) -> bool| -> Vec<PhaseId> {
            phases.iter().filter(|p| pred(p)).map(Phase::id).collect()
        };
        let moving = select(Phase::is_moving);
        let stationary = select(Phase::is_stationary);
        let anisothermal = select(Phase::is_anisothermal);
        let multi_component = select(Phase::is_multi_component);

        debug!(
            phases = phases.len(),
            moving = moving.len(),
            stationary = stationary.len(),
            anisothermal = anisothermal.len(),
            multi_component = multi_component.len(),
            "phase registry built"
        );

        Ok(Self {
            phases,
            by_name,
            moving,
            stationary,
            anisothermal,
            multi_component,
        })
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// All phases in configuration order.
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Mutable access for the per-step correction calls.
    pub fn phases_mut(&mut self) -> &mut [Phase] {
        &mut self.phases
    }

    pub fn moving_phases(&self) -> PhaseView<'_> {
        self.view(&self.moving)
    }

    pub fn stationary_phases(&self) -> PhaseView<'_> {
        self.view(&self.stationary)
    }

    pub fn anisothermal_phases(&self) -> PhaseView<'_> {
        self.view(&self.anisothermal)
    }

    pub fn multi_component_phases(&self) -> PhaseView<'_> {
        self.view(&self.multi_component)
    }

    fn view<'a>(&'a self, ids: &'a [PhaseId]) -> PhaseView<'a> {
        PhaseView {
            phases: &self.phases,
            ids,
        }
    }

    /// # Panics
    /// If `id` was not issued by this registry.
    pub fn phase(&self, id: PhaseId) -> &Phase {
        &self.phases[id.slot()]
    }

    /// # Panics
    /// If `id` was not issued by this registry.
    pub fn phase_mut(&mut self, id: PhaseId) -> &mut Phase {
        &mut self.phases[id.slot()]
    }

    pub fn id_of(&self, name: &str) -> Option<PhaseId> {
        self.by_name.get(name).copied()
    }

    pub fn find(&self, name: &str) -> Option<&Phase> {
        self.id_of(name).map(|id| self.phase(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thermo::ConstantThermo;
    use pf_mesh::generation::wall_bounded_column;

    fn specs() -> Vec<PhaseSpec> {
        vec![
            PhaseSpec::new("air", ConstantThermo::air()).anisothermal(true),
            PhaseSpec::new("water", ConstantThermo::water()).species(["H2O", "NaCl"]),
            PhaseSpec::new("sand", ConstantThermo::water()).stationary(true),
        ]
    }

    #[test]
    fn views_follow_attributes() {
        let mesh = wall_bounded_column(2, 1.0, 1.0).unwrap();
        let reg = PhaseRegistry::new(specs(), &mesh).unwrap();
        assert_eq!(reg.moving_phases().names(), vec!["air", "water"]);
        assert_eq!(reg.stationary_phases().names(), vec!["sand"]);
        assert_eq!(reg.anisothermal_phases().names(), vec!["air"]);
        assert_eq!(reg.multi_component_phases().names(), vec!["water"]);
    }

    #[test]
    fn order_is_configuration_order() {
        let mesh = wall_bounded_column(2, 1.0, 1.0).unwrap();
        let reg = PhaseRegistry::new(specs(), &mesh).unwrap();
        let names: Vec<_> = reg.phases().iter().map(Phase::name).collect();
        assert_eq!(names, vec!["air", "water", "sand"]);
        assert_eq!(reg.id_of("sand").unwrap().index(), 2);
    }

    #[test]
    fn rejects_empty_and_duplicates() {
        let mesh = wall_bounded_column(2, 1.0, 1.0).unwrap();
        assert_eq!(PhaseRegistry::new(vec![], &mesh).unwrap_err(), PhaseError::NoPhases);

        let dup = vec![
            PhaseSpec::new("air", ConstantThermo::air()),
            PhaseSpec::new("air", ConstantThermo::air()),
        ];
        assert_eq!(
            PhaseRegistry::new(dup, &mesh).unwrap_err(),
            PhaseError::DuplicatePhase { name: "air".into() }
        );
    }
}
