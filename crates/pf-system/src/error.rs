//! Error types for phase system construction and coupling.

use pf_config::{ConfigError, ValidationError};
use pf_core::PfError;
use pf_mesh::MeshError;
use pf_models::{LookupError, ModelError};
use pf_phases::PhaseError;
use thiserror::Error;

/// Errors raised while building or driving a phase system.
#[derive(Error, Debug)]
pub enum SystemError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ModelError),

    #[error("Phase error: {0}")]
    Phase(#[from] PhaseError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Mesh error: {0}")]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("Expected {expected} {what}, got {actual}")]
    SizeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Numeric error: {what}")]
    Numeric { what: String },
}

pub type SystemResult<T> = Result<T, SystemError>;

impl From<PfError> for SystemError {
    fn from(e: PfError) -> Self {
        SystemError::Phase(e.into())
    }
}

impl SystemError {
    /// True for defects of the phase-properties document.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SystemError::Configuration(_)
                | SystemError::Phase(_)
                | SystemError::Validation(_)
                | SystemError::Config(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_models::LookupKind;

    #[test]
    fn lookup_error_is_passed_through() {
        let err: SystemError = LookupError {
            category: "drag",
            key: "(air in air)".into(),
            kind: LookupKind::Blended,
        }
        .into();
        assert_eq!(err.to_string(), "No blended drag model for (air in air)");
        assert!(!err.is_configuration());
    }

    #[test]
    fn phase_errors_are_configuration() {
        let err: SystemError = PhaseError::SelfPaired { name: "air".into() }.into();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("air"));
    }
}
