//! pf-system: the coupled phase system of phaseflow.
//!
//! Builds the phases, phase pairs and every pair-keyed sub-model table from
//! a validated phase-properties document, and assembles the interfacial
//! transfer terms a pressure-velocity algorithm consumes:
//! - `PhaseSystem`: registries, sub-model tables and mixture properties
//! - `CoupledPhaseSystem` / `PhaseCorrection`: the coupling interface and
//!   the ordered per-step correction hooks
//! - `MomentumTransferSystem`: virtual mass, lift, heat and specie transfer
//!   sources, and the implicit partial elimination of drag
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use pf_mesh::generation;
//! use pf_models::Drag;
//! use pf_phases::PhasePairKey;
//! use pf_system::MomentumTransferSystem;
//!
//! let props = pf_config::from_yaml_str(
//!     r#"
//! phases:
//!   - { name: air, diameter: 3.0e-3, thermo: { rho: 1.2, mu: 1.8e-5, cp: 1007, kappa: 0.026 } }
//!   - { name: water, thermo: { rho: 997, mu: 8.9e-4, cp: 4180, kappa: 0.6 } }
//! blending:
//!   drag: { type: none, continuousPhase: water }
//! drag:
//!   - { pair: "air in water", type: SchillerNaumann }
//! "#,
//! )
//! .unwrap();
//!
//! let mesh = generation::wall_bounded_column(8, 1.0, 0.1).unwrap();
//! let fluid = MomentumTransferSystem::new(&props, Arc::new(mesh)).unwrap();
//!
//! let key: PhasePairKey = "air in water".parse().unwrap();
//! assert!(fluid.system().found_blended_sub_model::<Drag>(&key));
//! ```

pub mod coupled;
pub mod elimination;
pub mod error;
pub mod generation;
pub mod momentum_transfer;
pub mod phase_system;

pub use coupled::{CoupledPhaseSystem, PhaseCorrection, PhaseFields, PhaseMatrices, SpecieMatrices};
pub use elimination::FieldLu;
pub use error::{SystemError, SystemResult};
pub use generation::{
    ModelEntry, blending_method, create_sub_models, generate_blended_sub_models, generate_pairs,
    generate_pairs_and_sub_models, generate_two_sided_sub_models,
};
pub use momentum_transfer::MomentumTransferSystem;
pub use phase_system::{BLENDED_CATEGORIES, HasBlendedSubModels, HasSubModels, PhaseSystem};
