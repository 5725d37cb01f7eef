//! Ordered and unordered phase pair identities.

use std::fmt;
use std::str::FromStr;

use crate::error::PhaseError;

/// Identity of a phase pair.
///
/// An unordered key is canonicalised at construction (names sorted), so
/// `(a and b)` and `(b and a)` compare and hash equal. An ordered key keeps
/// its direction: `first` is dispersed in `second`, and `(a in b)` differs
/// from `(b in a)` and from `(a and b)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhasePairKey {
    first: String,
    second: String,
    ordered: bool,
}

impl PhasePairKey {
    /// Symmetric key for two phases.
    pub fn unordered(a: impl Into<String>, b: impl Into<String>) -> Self {
        let (a, b) = (a.into(), b.into());
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self {
            first,
            second,
            ordered: false,
        }
    }

    /// Directional key: `dispersed` in `continuous`.
    pub fn ordered(dispersed: impl Into<String>, continuous: impl Into<String>) -> Self {
        Self {
            first: dispersed.into(),
            second: continuous.into(),
            ordered: true,
        }
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }

    pub fn is_ordered(&self) -> bool {
        self.ordered
    }

    /// The dispersed phase name of an ordered key.
    pub fn dispersed(&self) -> Option<&str> {
        self.ordered.then_some(self.first.as_str())
    }

    /// The continuous phase name of an ordered key.
    pub fn continuous(&self) -> Option<&str> {
        self.ordered.then_some(self.second.as_str())
    }

    /// The symmetric key of the same two phases.
    pub fn to_unordered(&self) -> Self {
        Self::unordered(self.first.clone(), self.second.clone())
    }

    /// The ordered key with roles exchanged. Unordered keys are returned as-is.
    pub fn swapped(&self) -> Self {
        if self.ordered {
            Self::ordered(self.second.clone(), self.first.clone())
        } else {
            self.clone()
        }
    }

    /// Whether the key names a phase.
    pub fn contains(&self, phase: &str) -> bool {
        self.first == phase || self.second == phase
    }

    /// The name of the other phase, if `phase` is part of the key.
    pub fn other(&self, phase: &str) -> Option<&str> {
        if self.first == phase {
            Some(&self.second)
        } else if self.second == phase {
            Some(&self.first)
        } else {
            None
        }
    }
}

impl fmt::Display for PhasePairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.ordered { "in" } else { "and" };
        write!(f, "({} {} {})", self.first, sep, self.second)
    }
}

/// Parses `a in b`, `a and b`, with or without surrounding parentheses.
impl FromStr for PhasePairKey {
    type Err = PhaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PhaseError::InvalidPairSpec { spec: s.to_string() };
        let trimmed = s.trim();
        let inner = match (trimmed.strip_prefix('('), trimmed.ends_with(')')) {
            (Some(rest), true) => rest.strip_suffix(')').ok_or_else(invalid)?,
            (None, false) => trimmed,
            _ => return Err(invalid()),
        };
        if inner.contains(['(', ')']) {
            return Err(invalid());
        }

        let words: Vec<&str> = inner.split_whitespace().collect();
        match words.as_slice() {
            [a, "in", b] => Ok(Self::ordered(*a, *b)),
            [a, "and", b] => Ok(Self::unordered(*a, *b)),
            _ => Err(invalid()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn unordered_is_symmetric() {
        assert_eq!(
            PhasePairKey::unordered("air", "water"),
            PhasePairKey::unordered("water", "air")
        );
    }

    #[test]
    fn ordered_keeps_direction() {
        let ab = PhasePairKey::ordered("air", "water");
        let ba = PhasePairKey::ordered("water", "air");
        assert_ne!(ab, ba);
        assert_ne!(ab, PhasePairKey::unordered("air", "water"));
        assert_eq!(ab.swapped(), ba);
        assert_eq!(ab.dispersed(), Some("air"));
        assert_eq!(ab.to_unordered(), ba.to_unordered());
    }

    #[test]
    fn hashing_matches_equality() {
        let mut set = HashSet::new();
        set.insert(PhasePairKey::unordered("a", "b"));
        set.insert(PhasePairKey::unordered("b", "a"));
        set.insert(PhasePairKey::ordered("a", "b"));
        set.insert(PhasePairKey::ordered("b", "a"));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn parse_and_display() {
        let k: PhasePairKey = "(air in water)".parse().unwrap();
        assert_eq!(k, PhasePairKey::ordered("air", "water"));
        assert_eq!(k.to_string(), "(air in water)");

        let k: PhasePairKey = "water and air".parse().unwrap();
        assert_eq!(k.to_string(), "(air and water)");

        assert!("air with water".parse::<PhasePairKey>().is_err());
        assert!("air".parse::<PhasePairKey>().is_err());
    }

    #[test]
    fn unbalanced_parentheses_are_rejected() {
        for spec in ["(air in water", "air in water)", "((air in water)", "("] {
            let err = spec.parse::<PhasePairKey>().unwrap_err();
            assert!(matches!(err, PhaseError::InvalidPairSpec { spec: ref s } if s == spec));
        }
    }

    #[test]
    fn other_phase() {
        let k = PhasePairKey::ordered("air", "water");
        assert_eq!(k.other("air"), Some("water"));
        assert_eq!(k.other("oil"), None);
        assert!(k.contains("water"));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn unordered_keys_are_symmetric(a in "[a-z]{1,8}", b in "[a-z]{1,8}") {
            prop_assert_eq!(PhasePairKey::unordered(&a, &b), PhasePairKey::unordered(&b, &a));
            let ordered = PhasePairKey::ordered(&a, &b);
            prop_assert_eq!(ordered.to_unordered(), PhasePairKey::unordered(&a, &b));
            prop_assert_eq!(ordered.swapped().swapped(), ordered);
        }

        #[test]
        fn display_parses_back(a in "[a-z]{1,8}", b in "[a-z]{1,8}", ordered in any::<bool>()) {
            let key = if ordered {
                PhasePairKey::ordered(&a, &b)
            } else {
                PhasePairKey::unordered(&a, &b)
            };
            let parsed: PhasePairKey = key.to_string().parse().unwrap();
            prop_assert_eq!(parsed, key);
        }
    }
}
