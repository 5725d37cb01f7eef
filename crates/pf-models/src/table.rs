//! Pair-keyed tables of constructed sub-models.

use std::collections::HashMap;
use std::fmt;

use pf_phases::PhasePairKey;

use crate::blended::BlendedInterfacialModel;
use crate::error::{LookupError, LookupKind};

/// Entries of one model category, keyed by phase pair.
pub struct ModelTable<V> {
    category: &'static str,
    kind: LookupKind,
    entries: HashMap<PhasePairKey, V>,
}

/// One model per ordered or unordered key.
pub type SubModelTable<M> = ModelTable<Box<M>>;

/// One blended composite per unordered key.
pub type BlendedTable<M> = ModelTable<BlendedInterfacialModel<M>>;

/// One model per side of an unordered key.
pub type TwoSidedTable<M> = ModelTable<TwoSided<M>>;

impl<V> ModelTable<V> {
    fn with_kind(category: &'static str, kind: LookupKind) -> Self {
        Self {
            category,
            kind,
            entries: HashMap::new(),
        }
    }

    pub fn category(&self) -> &'static str {
        self.category
    }

    /// Insert an entry, returning any entry it replaced.
    pub fn insert(&mut self, key: PhasePairKey, value: V) -> Option<V> {
        self.entries.insert(key, value)
    }

    pub fn found(&self, key: &PhasePairKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &PhasePairKey) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn lookup(&self, key: &PhasePairKey) -> Result<&V, LookupError> {
        self.entries.get(key).ok_or_else(|| LookupError {
            category: self.category,
            key: key.to_string(),
            kind: self.kind,
        })
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> Vec<&PhasePairKey> {
        let mut keys: Vec<_> = self.entries.keys().collect();
        keys.sort();
        keys
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&PhasePairKey, &V)> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<M: ?Sized> ModelTable<Box<M>> {
    pub fn new(category: &'static str) -> Self {
        Self::with_kind(category, LookupKind::Plain)
    }

    /// Look up the model of `dispersed` in `continuous`.
    pub fn lookup_by_names(&self, dispersed: &str, continuous: &str) -> Result<&M, LookupError> {
        self.lookup(&PhasePairKey::ordered(dispersed, continuous))
            .map(|m| m.as_ref())
    }

    pub fn found_by_names(&self, dispersed: &str, continuous: &str) -> bool {
        self.found(&PhasePairKey::ordered(dispersed, continuous))
    }
}

impl<M: ?Sized> ModelTable<BlendedInterfacialModel<M>> {
    pub fn new_blended(category: &'static str) -> Self {
        Self::with_kind(category, LookupKind::Blended)
    }
}

impl<M: ?Sized> ModelTable<TwoSided<M>> {
    pub fn new_two_sided(category: &'static str) -> Self {
        Self::with_kind(category, LookupKind::TwoSided)
    }
}

impl<V: fmt::Debug> fmt::Debug for ModelTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter().map(|(k, v)| (k.to_string(), v))).finish()
    }
}

/// The model on each side of an unordered pair, for the side whose phase is
/// `first`/`second` of the key.
pub struct TwoSided<M: ?Sized> {
    pub first: Option<Box<M>>,
    pub second: Option<Box<M>>,
}

impl<M: ?Sized> TwoSided<M> {
    pub fn new(first: Option<Box<M>>, second: Option<Box<M>>) -> Self {
        Self { first, second }
    }

    /// The model for the named side of `key`.
    pub fn side(&self, key: &PhasePairKey, phase: &str) -> Option<&M> {
        if key.first() == phase {
            self.first.as_deref()
        } else if key.second() == phase {
            self.second.as_deref()
        } else {
            None
        }
    }
}

impl<M: ?Sized + fmt::Debug> fmt::Debug for TwoSided<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwoSided")
            .field("first", &self.first)
            .field("second", &self.second)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lookup_by_key_and_names() {
        let mut table: SubModelTable<str> = ModelTable::new("drag");
        let key = PhasePairKey::ordered("air", "water");
        table.insert(key.clone(), "SchillerNaumann".into());

        assert!(table.found(&key));
        assert_eq!(table.lookup_by_names("air", "water").unwrap(), "SchillerNaumann");
        assert!(!table.found_by_names("water", "air"));

        let err = table.lookup_by_names("air", "air").unwrap_err();
        assert_eq!(err.to_string(), "No drag model for (air in air)");
    }

    #[test]
    fn two_sided_resolves_by_phase_name() {
        let key = PhasePairKey::unordered("water", "air");
        let sides: TwoSided<str> = TwoSided::new(Some("gas side".into()), None);
        assert_eq!(sides.side(&key, "air"), Some("gas side"));
        assert_eq!(sides.side(&key, "water"), None);
        assert_eq!(sides.side(&key, "oil"), None);
    }
}
