//! Phase-properties document schema.

use std::collections::BTreeMap;

use pf_core::{Real, jpkgk, kgpm3, pas, wpmk};
use pf_mesh::Vector;
use pf_phases::{ConstantThermo, PhaseError, PhasePairKey, PhaseResult, PhaseSpec};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

/// Current document version.
pub const LATEST_VERSION: u32 = 1;

/// Interfacial model categories, in document order.
pub const CATEGORIES: [&str; 8] = [
    "drag",
    "virtualMass",
    "lift",
    "heatTransfer",
    "massTransfer",
    "surfaceTension",
    "aspectRatio",
    "wallDamping",
];

/// Blending entry used by categories without their own.
pub const DEFAULT_BLENDING: &str = "default";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PhaseProperties {
    #[serde(default = "latest_version")]
    pub version: u32,
    pub phases: Vec<PhaseDef>,
    /// Blending method per category, keyed by category name or `default`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub blending: BTreeMap<String, Mapping>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drag: Vec<ModelDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub virtual_mass: Vec<ModelDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lift: Vec<ModelDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub heat_transfer: Vec<ModelDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mass_transfer: Vec<ModelDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub surface_tension: Vec<ModelDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aspect_ratio: Vec<ModelDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub wall_damping: Vec<ModelDef>,
}

fn latest_version() -> u32 {
    LATEST_VERSION
}

impl PhaseProperties {
    /// Model entries of a category by its document name.
    pub fn category(&self, name: &str) -> Option<&[ModelDef]> {
        let defs = match name {
            "drag" => &self.drag,
            "virtualMass" => &self.virtual_mass,
            "lift" => &self.lift,
            "heatTransfer" => &self.heat_transfer,
            "massTransfer" => &self.mass_transfer,
            "surfaceTension" => &self.surface_tension,
            "aspectRatio" => &self.aspect_ratio,
            "wallDamping" => &self.wall_damping,
            _ => return None,
        };
        Some(defs)
    }

    /// Every category with its entries.
    pub fn categories(&self) -> impl Iterator<Item = (&'static str, &[ModelDef])> {
        CATEGORIES
            .iter()
            .filter_map(move |&c| self.category(c).map(|defs| (c, defs)))
    }

    /// The blending block for a category, falling back to `default`.
    pub fn blending_for(&self, category: &str) -> Option<&Mapping> {
        self.blending
            .get(category)
            .or_else(|| self.blending.get(DEFAULT_BLENDING))
    }

    pub fn phase_names(&self) -> Vec<String> {
        self.phases.iter().map(|p| p.name.clone()).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PhaseDef {
    pub name: String,
    #[serde(default = "default_true")]
    pub moving: bool,
    #[serde(default)]
    pub anisothermal: bool,
    #[serde(default = "default_diameter")]
    pub diameter: Real,
    #[serde(default = "default_residual_alpha")]
    pub residual_alpha: Real,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub species: Vec<String>,
    pub thermo: ThermoDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial: Option<InitialDef>,
}

fn default_true() -> bool {
    true
}

fn default_diameter() -> Real {
    1e-3
}

fn default_residual_alpha() -> Real {
    1e-6
}

impl PhaseDef {
    /// Translate into a phase specification, validating the thermo block.
    pub fn to_spec(&self) -> PhaseResult<PhaseSpec> {
        let t = &self.thermo;
        let thermo = ConstantThermo::new(kgpm3(t.rho), pas(t.mu), jpkgk(t.cp), wpmk(t.kappa))?;
        let initial = self.initial.clone().unwrap_or_default();
        Ok(PhaseSpec::new(self.name.clone(), thermo)
            .stationary(!self.moving)
            .anisothermal(self.anisothermal)
            .diameter(self.diameter)
            .residual_alpha(self.residual_alpha)
            .species(self.species.iter().cloned())
            .alpha(initial.alpha)
            .velocity(Vector::from(initial.velocity))
            .temperature(initial.temperature))
    }
}

/// Constant thermophysical properties in SI units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ThermoDef {
    pub rho: Real,
    pub mu: Real,
    pub cp: Real,
    pub kappa: Real,
}

/// Uniform initial state of a phase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InitialDef {
    #[serde(default)]
    pub alpha: Real,
    #[serde(default)]
    pub velocity: [Real; 3],
    #[serde(default = "default_temperature")]
    pub temperature: Real,
}

fn default_temperature() -> Real {
    300.0
}

impl Default for InitialDef {
    fn default() -> Self {
        Self {
            alpha: 0.0,
            velocity: [0.0; 3],
            temperature: default_temperature(),
        }
    }
}

/// One pair-keyed model entry. Every key other than `pair` and `side`,
/// including `type`, is handed to the model as its parameter block.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelDef {
    pub pair: String,
    /// Phase whose side of the interface this model describes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    #[serde(flatten)]
    pub params: Mapping,
}

impl ModelDef {
    pub fn key(&self) -> Result<PhasePairKey, PhaseError> {
        self.pair.parse()
    }

    pub fn type_name(&self) -> Option<&str> {
        self.params.get("type").and_then(Value::as_str)
    }
}
