//! Parameter blocks handed to model constructors.

use pf_core::Real;
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};

use crate::error::{ModelError, ModelResult};

/// A named block of model parameters.
///
/// Values are kept as loosely typed YAML and converted on access, so each
/// model reads exactly the keys it understands and reports the rest of the
/// block by name when something is missing or malformed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dict {
    name: String,
    entries: Mapping,
}

impl Dict {
    pub fn new(name: impl Into<String>, entries: Mapping) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }

    /// Wrap a YAML value, which must be a mapping (or null for an empty block).
    pub fn from_value(name: impl Into<String>, value: Value) -> ModelResult<Self> {
        let name = name.into();
        match value {
            Value::Mapping(entries) => Ok(Self { name, entries }),
            Value::Null => Ok(Self {
                name,
                entries: Mapping::new(),
            }),
            other => Err(ModelError::BadParameter {
                dict: name,
                key: String::new(),
                reason: format!("expected a mapping, found {other:?}"),
            }),
        }
    }

    /// Parse a block from YAML text.
    pub fn from_yaml_str(name: impl Into<String>, text: &str) -> ModelResult<Self> {
        let name = name.into();
        let value: Value = serde_yaml::from_str(text).map_err(|e| ModelError::BadParameter {
            dict: name.clone(),
            key: String::new(),
            reason: e.to_string(),
        })?;
        Self::from_value(name, value)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &Mapping {
        &self.entries
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Builder-style insert, mostly for programmatic construction.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.entries.insert(Value::from(key), value.into());
        self
    }

    /// Read and convert a required entry.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> ModelResult<T> {
        match self.entries.get(key) {
            Some(value) => self.convert(key, value),
            None => Err(ModelError::MissingParameter {
                dict: self.name.clone(),
                key: key.to_string(),
            }),
        }
    }

    /// Read and convert an optional entry, falling back to `default`.
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> ModelResult<T> {
        match self.entries.get(key) {
            Some(value) => self.convert(key, value),
            None => Ok(default),
        }
    }

    /// A required finite real number.
    pub fn real(&self, key: &str) -> ModelResult<Real> {
        let v: Real = self.get(key)?;
        self.finite(key, v)
    }

    /// An optional finite real number.
    pub fn real_or(&self, key: &str, default: Real) -> ModelResult<Real> {
        let v: Real = self.get_or(key, default)?;
        self.finite(key, v)
    }

    /// The `type` entry naming the model to construct.
    pub fn type_name(&self) -> ModelResult<String> {
        self.get("type")
    }

    /// Reject a value with a reason, naming this block.
    pub fn bad(&self, key: &str, reason: impl Into<String>) -> ModelError {
        ModelError::BadParameter {
            dict: self.name.clone(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    fn convert<T: DeserializeOwned>(&self, key: &str, value: &Value) -> ModelResult<T> {
        serde_yaml::from_value(value.clone()).map_err(|e| self.bad(key, e.to_string()))
    }

    fn finite(&self, key: &str, v: Real) -> ModelResult<Real> {
        if v.is_finite() {
            Ok(v)
        } else {
            Err(self.bad(key, "value is not finite"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn typed_lookups() {
        let dict = Dict::from_yaml_str(
            "drag",
            "type: SchillerNaumann\nresidualRe: 1.0e-3\ntable: { air: 0.7, water: 0.3 }\n",
        )
        .unwrap();
        assert_eq!(dict.type_name().unwrap(), "SchillerNaumann");
        assert_eq!(dict.real("residualRe").unwrap(), 1e-3);
        assert_eq!(dict.real_or("Cd", 1.0).unwrap(), 1.0);
        let table: HashMap<String, Real> = dict.get("table").unwrap();
        assert_eq!(table["water"], 0.3);
    }

    #[test]
    fn missing_and_malformed_entries() {
        let dict = Dict::default().with("Cd", "large");
        assert!(matches!(
            dict.real("Cl"),
            Err(ModelError::MissingParameter { .. })
        ));
        assert!(matches!(
            dict.real("Cd"),
            Err(ModelError::BadParameter { .. })
        ));
        assert!(!dict.get_or("flag", false).unwrap());
    }

    #[test]
    fn non_mapping_is_rejected() {
        assert!(Dict::from_yaml_str("x", "- 1\n- 2\n").is_err());
        assert!(Dict::from_yaml_str("x", "{}").unwrap().entries().is_empty());
        assert!(Dict::from_value("x", Value::Null).unwrap().entries().is_empty());
    }
}
