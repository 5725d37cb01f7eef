//! pf-config: phase-properties document format and validation.
//!
//! The document lists the phases, one blending block per model category and
//! the pair-keyed model entries of each category. It is read from YAML or
//! JSON and validated before any phase or model is built.

pub mod schema;
pub mod validate;

pub use schema::*;
pub use validate::{ValidationError, validate_properties};

use std::path::Path;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse and validate a YAML document.
pub fn from_yaml_str(content: &str) -> ConfigResult<PhaseProperties> {
    let props: PhaseProperties = serde_yaml::from_str(content)?;
    validate_properties(&props)?;
    Ok(props)
}

/// Parse and validate a JSON document.
pub fn from_json_str(content: &str) -> ConfigResult<PhaseProperties> {
    let props: PhaseProperties = serde_json::from_str(content)?;
    validate_properties(&props)?;
    Ok(props)
}

pub fn load_yaml(path: &Path) -> ConfigResult<PhaseProperties> {
    let content = std::fs::read_to_string(path)?;
    from_yaml_str(&content)
}

pub fn save_yaml(path: &Path, props: &PhaseProperties) -> ConfigResult<()> {
    validate_properties(props)?;
    let content = serde_yaml::to_string(props)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ConfigResult<PhaseProperties> {
    let content = std::fs::read_to_string(path)?;
    from_json_str(&content)
}

pub fn save_json(path: &Path, props: &PhaseProperties) -> ConfigResult<()> {
    validate_properties(props)?;
    let content = serde_json::to_string_pretty(props)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a document, choosing the format from the file extension.
pub fn load(path: &Path) -> ConfigResult<PhaseProperties> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_json(path),
        _ => load_yaml(path),
    }
}
