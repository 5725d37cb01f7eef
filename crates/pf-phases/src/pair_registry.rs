//! Storage and lookup of phase pairs.

use std::collections::HashMap;

use tracing::trace;

use crate::error::{PhaseError, PhaseResult};
use crate::pair::{Orientation, PairRef, PhasePair};
use crate::pair_key::PhasePairKey;
use crate::registry::PhaseRegistry;

/// One `PhasePair` per unordered phase combination, plus every key
/// (ordered or not) that has been generated for it.
///
/// Ordered keys never own a copy of the pair; they resolve to the
/// unordered record with an orientation.
#[derive(Debug, Default, Clone)]
pub struct PhasePairRegistry {
    pairs: Vec<PhasePair>,
    index: HashMap<PhasePairKey, (usize, Orientation)>,
}

impl PhasePairRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every key, creating the shared pair on first sight. An
    /// ordered key also registers its swapped twin.
    ///
    /// Idempotent: generating a key twice is a no-op.
    pub fn generate_pairs<'k>(
        &mut self,
        keys: impl IntoIterator<Item = &'k PhasePairKey>,
        phases: &PhaseRegistry,
    ) -> PhaseResult<()> {
        for key in keys {
            self.generate(key, phases)?;
        }
        Ok(())
    }

    fn generate(&mut self, key: &PhasePairKey, phases: &PhaseRegistry) -> PhaseResult<usize> {
        if let Some(&(slot, _)) = self.index.get(key) {
            return Ok(slot);
        }
        if key.first() == key.second() {
            return Err(PhaseError::SelfPaired {
                name: key.first().to_string(),
            });
        }

        let unordered = key.to_unordered();
        let slot = match self.index.get(&unordered) {
            Some(&(slot, _)) => slot,
            None => {
                let lookup = |name: &str| {
                    phases.id_of(name).ok_or_else(|| PhaseError::UnknownPhase {
                        name: name.to_string(),
                        pair: key.to_string(),
                    })
                };
                let phase1 = lookup(unordered.first())?;
                let phase2 = lookup(unordered.second())?;
                self.pairs
                    .push(PhasePair::new(unordered.clone(), phase1, phase2));
                let slot = self.pairs.len() - 1;
                self.index
                    .insert(unordered.clone(), (slot, Orientation::Unordered));
                trace!(pair = %unordered, "phase pair created");
                slot
            }
        };

        // A directional key brings both ordered projections of the pair.
        if key.is_ordered() {
            self.index.insert(
                PhasePairKey::ordered(unordered.first(), unordered.second()),
                (slot, Orientation::Forward),
            );
            self.index.insert(
                PhasePairKey::ordered(unordered.second(), unordered.first()),
                (slot, Orientation::Reverse),
            );
        }
        Ok(slot)
    }

    /// Look up a generated key.
    pub fn get(&self, key: &PhasePairKey) -> Option<PairRef<'_>> {
        self.index
            .get(key)
            .map(|&(slot, orientation)| PairRef::new(&self.pairs[slot], orientation))
    }

    /// Look up a generated key, failing if it was never generated.
    pub fn resolve(&self, key: &PhasePairKey) -> PhaseResult<PairRef<'_>> {
        self.get(key).ok_or_else(|| PhaseError::UnknownPair {
            key: key.to_string(),
        })
    }

    pub fn contains(&self, key: &PhasePairKey) -> bool {
        self.index.contains_key(key)
    }

    /// The unique pairs in creation order.
    pub fn pairs(&self) -> &[PhasePair] {
        &self.pairs
    }

    /// Every generated key, sorted.
    pub fn keys(&self) -> Vec<&PhasePairKey> {
        let mut keys: Vec<_> = self.index.keys().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::PhaseSpec;
    use crate::thermo::ConstantThermo;
    use pf_mesh::generation::wall_bounded_column;

    fn phases() -> PhaseRegistry {
        let mesh = wall_bounded_column(3, 1.0, 1.0).unwrap();
        PhaseRegistry::new(
            vec![
                PhaseSpec::new("water", ConstantThermo::water()),
                PhaseSpec::new("air", ConstantThermo::air()),
            ],
            &mesh,
        )
        .unwrap()
    }

    #[test]
    fn ordered_keys_share_one_pair() {
        let phases = phases();
        let mut reg = PhasePairRegistry::new();
        let keys = [
            PhasePairKey::ordered("air", "water"),
            PhasePairKey::ordered("water", "air"),
            PhasePairKey::unordered("water", "air"),
        ];
        reg.generate_pairs(&keys, &phases).unwrap();
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.keys().len(), 3);

        let a = reg.resolve(&keys[0]).unwrap();
        let b = reg.resolve(&keys[1]).unwrap();
        assert!(std::ptr::eq(a.pair(), b.pair()));
        assert_eq!(a.dispersed(), phases.id_of("air").unwrap());
        assert_eq!(b.dispersed(), phases.id_of("water").unwrap());
    }

    #[test]
    fn one_ordered_key_registers_both_directions() {
        let phases = phases();
        let mut reg = PhasePairRegistry::new();
        reg.generate_pairs([&PhasePairKey::ordered("air", "water")], &phases)
            .unwrap();
        assert_eq!(reg.keys().len(), 3);

        let fwd = reg.resolve(&PhasePairKey::ordered("air", "water")).unwrap();
        let rev = reg.resolve(&PhasePairKey::ordered("water", "air")).unwrap();
        assert!(std::ptr::eq(fwd.pair(), rev.pair()));
        assert_eq!(fwd.dispersed(), rev.continuous());
        assert_eq!(fwd.continuous(), rev.dispersed());
        assert_eq!(rev.dispersed(), phases.id_of("water").unwrap());
    }

    #[test]
    fn generating_twice_is_idempotent() {
        let phases = phases();
        let mut reg = PhasePairRegistry::new();
        let key = PhasePairKey::ordered("air", "water");
        reg.generate_pairs([&key], &phases).unwrap();
        reg.generate_pairs([&key], &phases).unwrap();
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn unknown_and_self_pairs_fail() {
        let phases = phases();
        let mut reg = PhasePairRegistry::new();
        let err = reg
            .generate_pairs([&PhasePairKey::ordered("oil", "water")], &phases)
            .unwrap_err();
        assert!(matches!(err, PhaseError::UnknownPhase { ref name, .. } if name == "oil"));

        let err = reg
            .generate_pairs([&PhasePairKey::unordered("air", "air")], &phases)
            .unwrap_err();
        assert!(matches!(err, PhaseError::SelfPaired { .. }));
        assert!(reg.is_empty());
    }

    #[test]
    fn resolve_reports_missing_key() {
        let reg = PhasePairRegistry::new();
        let err = reg
            .resolve(&PhasePairKey::ordered("air", "water"))
            .unwrap_err();
        assert_eq!(
            err,
            PhaseError::UnknownPair {
                key: "(air in water)".into()
            }
        );
    }
}
