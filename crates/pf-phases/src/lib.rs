//! pf-phases: phases and phase pairs for phaseflow.
//!
//! Provides:
//! - `PhaseThermo`, the thermodynamic property capability of a phase
//! - `Phase`, one continuum constituent with its fraction, velocity, flux,
//!   temperature and species fields
//! - `PhaseRegistry`, the ordered phase list with its moving, stationary,
//!   anisothermal and multi-component views
//! - `PhasePairKey`, ordered and unordered pair identities
//! - `PhasePairRegistry`, one shared `PhasePair` per phase combination with
//!   ordered projections resolving to it
//!
//! # Example
//!
//! ```
//! use pf_mesh::generation;
//! use pf_phases::{ConstantThermo, PhasePairKey, PhasePairRegistry, PhaseRegistry, PhaseSpec};
//!
//! let mesh = generation::wall_bounded_column(4, 1.0, 1.0).unwrap();
//! let phases = PhaseRegistry::new(
//!     vec![
//!         PhaseSpec::new("air", ConstantThermo::air()).diameter(3e-3),
//!         PhaseSpec::new("water", ConstantThermo::water()),
//!     ],
//!     &mesh,
//! )
//! .unwrap();
//!
//! let key: PhasePairKey = "air in water".parse().unwrap();
//! let mut pairs = PhasePairRegistry::new();
//! pairs.generate_pairs([&key], &phases).unwrap();
//!
//! let pair = pairs.resolve(&key).unwrap();
//! assert_eq!(phases.phase(pair.dispersed()).name(), "air");
//! ```

pub mod error;
pub mod pair;
pub mod pair_key;
pub mod pair_registry;
pub mod phase;
pub mod registry;
pub mod thermo;

pub use error::{PhaseError, PhaseResult};
pub use pair::{Orientation, PairRef, PairView, PhasePair};
pub use pair_key::PhasePairKey;
pub use pair_registry::PhasePairRegistry;
pub use phase::{Phase, PhaseSpec};
pub use registry::{PhaseRegistry, PhaseView};
pub use thermo::{ConstantThermo, PhaseThermo};
