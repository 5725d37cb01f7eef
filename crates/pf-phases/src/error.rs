//! Phase and phase-pair configuration errors.

use pf_core::PfError;
use thiserror::Error;

/// Result type for phase operations.
pub type PhaseResult<T> = Result<T, PhaseError>;

/// Structural errors in the phase list or a pair specifier.
///
/// All of these are configuration defects and are never recovered from.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhaseError {
    #[error("No phases declared")]
    NoPhases,

    #[error("Phase '{name}' is declared more than once")]
    DuplicatePhase { name: String },

    #[error("Pair {pair} refers to unknown phase '{name}'")]
    UnknownPhase { name: String, pair: String },

    #[error("Phase '{name}' cannot be paired with itself")]
    SelfPaired { name: String },

    #[error("Cannot parse phase pair specifier '{spec}'")]
    InvalidPairSpec { spec: String },

    #[error("Phase pair {key} has not been generated")]
    UnknownPair { key: String },

    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Field '{field}' has {actual} values, expected {expected}")]
    FieldSize {
        field: String,
        expected: usize,
        actual: usize,
    },
}

impl From<PfError> for PhaseError {
    fn from(e: PfError) -> Self {
        match e {
            PfError::NonFinite { what, .. }
            | PfError::InvalidArg { what }
            | PfError::Invariant { what } => PhaseError::NonPhysical { what },
        }
    }
}
