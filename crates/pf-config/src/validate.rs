//! Phase-properties validation.
//!
//! Everything here is checked before any phase or model is constructed, so
//! a document that validates fails later only on model-specific parameter
//! values.

use std::collections::HashSet;

use pf_models::{blending_types, model_types};
use serde_yaml::Value;

use crate::schema::{CATEGORIES, DEFAULT_BLENDING, LATEST_VERSION, ModelDef, PhaseDef, PhaseProperties};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate entry: {name} in {context}")]
    Duplicate { name: String, context: String },

    #[error("Missing reference: {name} in {context}")]
    MissingReference { name: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown {category} model type '{name}'; valid types are: {}", .known.join(", "))]
    UnknownModelType {
        category: String,
        name: String,
        known: Vec<&'static str>,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_properties(props: &PhaseProperties) -> Result<(), ValidationError> {
    if props.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: props.version,
        });
    }

    if props.phases.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "phases".to_string(),
            value: "[]".to_string(),
            reason: "at least one phase is required".to_string(),
        });
    }

    let mut names = HashSet::new();
    for phase in &props.phases {
        if !names.insert(phase.name.as_str()) {
            return Err(ValidationError::Duplicate {
                name: phase.name.clone(),
                context: "phases".to_string(),
            });
        }
        validate_phase(phase)?;
    }

    for (category, defs) in props.categories() {
        validate_category(category, defs, &names)?;
    }

    for (category, block) in &props.blending {
        if category != DEFAULT_BLENDING && !CATEGORIES.contains(&category.as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "blending".to_string(),
                value: category.clone(),
                reason: "not a model category".to_string(),
            });
        }
        let type_name = block.get("type").and_then(Value::as_str).unwrap_or("");
        let known = blending_types();
        if !known.contains(&type_name) {
            return Err(ValidationError::UnknownModelType {
                category: format!("{category} blending"),
                name: type_name.to_string(),
                known,
            });
        }
    }

    Ok(())
}

fn positive(field: String, v: f64) -> Result<(), ValidationError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            field,
            value: v.to_string(),
            reason: "must be positive and finite".to_string(),
        })
    }
}

fn validate_phase(phase: &PhaseDef) -> Result<(), ValidationError> {
    let name = &phase.name;
    positive(format!("phase '{name}' diameter"), phase.diameter)?;
    positive(format!("phase '{name}' residualAlpha"), phase.residual_alpha)?;
    positive(format!("phase '{name}' thermo.rho"), phase.thermo.rho)?;
    positive(format!("phase '{name}' thermo.mu"), phase.thermo.mu)?;
    positive(format!("phase '{name}' thermo.cp"), phase.thermo.cp)?;
    positive(format!("phase '{name}' thermo.kappa"), phase.thermo.kappa)?;

    if let Some(initial) = &phase.initial {
        if !(0.0..=1.0).contains(&initial.alpha) {
            return Err(ValidationError::InvalidValue {
                field: format!("phase '{name}' initial.alpha"),
                value: initial.alpha.to_string(),
                reason: "must lie in [0, 1]".to_string(),
            });
        }
        positive(format!("phase '{name}' initial.temperature"), initial.temperature)?;
    }

    let mut species = HashSet::new();
    for s in &phase.species {
        if !species.insert(s) {
            return Err(ValidationError::Duplicate {
                name: s.clone(),
                context: format!("phase '{name}' species"),
            });
        }
    }
    Ok(())
}

fn validate_category(
    category: &str,
    defs: &[ModelDef],
    phases: &HashSet<&str>,
) -> Result<(), ValidationError> {
    let known = model_types(category).unwrap_or_default();
    let mut seen = HashSet::new();

    for def in defs {
        let key = def.key().map_err(|e| ValidationError::InvalidValue {
            field: format!("{category} pair"),
            value: def.pair.clone(),
            reason: e.to_string(),
        })?;

        for name in [key.first(), key.second()] {
            if !phases.contains(name) {
                return Err(ValidationError::MissingReference {
                    name: name.to_string(),
                    context: format!("{category} {key}"),
                });
            }
        }
        if key.first() == key.second() {
            return Err(ValidationError::InvalidValue {
                field: format!("{category} pair"),
                value: def.pair.clone(),
                reason: "a phase cannot be paired with itself".to_string(),
            });
        }

        if let Some(side) = &def.side
            && !key.contains(side)
        {
            return Err(ValidationError::MissingReference {
                name: side.clone(),
                context: format!("{category} {key} side"),
            });
        }

        let type_name = def.type_name().unwrap_or("");
        if !known.contains(&type_name) {
            return Err(ValidationError::UnknownModelType {
                category: category.to_string(),
                name: type_name.to_string(),
                known,
            });
        }

        if !seen.insert((key.clone(), def.side.clone())) {
            return Err(ValidationError::Duplicate {
                name: key.to_string(),
                context: category.to_string(),
            });
        }
    }
    Ok(())
}
