//! Error types for sub-model construction and lookup.

use pf_core::PfError;
use pf_phases::PhaseError;
use thiserror::Error;

/// Errors raised while reading parameter blocks and constructing models.
///
/// Every variant is a configuration defect.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Unknown {family} model type '{name}'; valid types are: {}", .known.join(", "))]
    UnknownModelType {
        family: &'static str,
        name: String,
        known: Vec<&'static str>,
    },

    #[error("Missing parameter '{key}' in {dict}")]
    MissingParameter { dict: String, key: String },

    #[error("Bad parameter '{key}' in {dict}: {reason}")]
    BadParameter {
        dict: String,
        key: String,
        reason: String,
    },

    #[error("No entry for phase '{phase}' in {dict}")]
    MissingPhaseEntry { dict: String, phase: String },

    #[error("Blended model for {pair} has no directional model")]
    EmptyBlend { pair: String },

    #[error(transparent)]
    Phase(#[from] PhaseError),
}

pub type ModelResult<T> = Result<T, ModelError>;

impl From<PfError> for ModelError {
    fn from(e: PfError) -> Self {
        ModelError::Phase(e.into())
    }
}

/// A sub-model was requested for a key that has none.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("No {kind}{category} model for {key}")]
pub struct LookupError {
    pub category: &'static str,
    pub key: String,
    pub kind: LookupKind,
}

/// Which table a failed lookup went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Plain,
    Blended,
    TwoSided,
}

impl std::fmt::Display for LookupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupKind::Plain => Ok(()),
            LookupKind::Blended => f.write_str("blended "),
            LookupKind::TwoSided => f.write_str("two-sided "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_type_lists_valid_names() {
        let err = ModelError::UnknownModelType {
            family: "drag",
            name: "Foo".into(),
            known: vec!["SchillerNaumann", "Stokes"],
        };
        let msg = err.to_string();
        assert!(msg.contains("Foo"));
        assert!(msg.contains("SchillerNaumann, Stokes"));
    }

    #[test]
    fn lookup_error_display() {
        let err = LookupError {
            category: "drag",
            key: "(air in air)".into(),
            kind: LookupKind::Blended,
        };
        assert_eq!(err.to_string(), "No blended drag model for (air in air)");
    }
}
