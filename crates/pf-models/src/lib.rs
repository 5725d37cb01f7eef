//! pf-models: interfacial sub-model library for phaseflow.
//!
//! Provides one family per interfacial effect, each a trait with one or
//! more correlations registered by type name in a process-wide factory:
//! - drag (`SchillerNaumann`, `Stokes`)
//! - virtual mass, lift (`constantCoefficient`)
//! - heat transfer (`RanzMarshall`, `spherical`)
//! - mass transfer (`Frossling`, `spherical`)
//! - surface tension, aspect ratio (`constant`)
//! - wall damping (`none`, `linear`, `cosine`, `sine`)
//!
//! plus the blending methods (`none`, `linear`, `hyperbolic`), the blended
//! two-direction composite and the pair-keyed model tables.
//!
//! Models are stateless functions of a `PairView`; construction reads a
//! `Dict` parameter block.
//!
//! # Example
//!
//! ```
//! use pf_models::{Dict, Drag, DragModel, ModelFamily};
//! use pf_phases::PhasePairKey;
//!
//! let key = PhasePairKey::ordered("air", "water");
//! let dict = Dict::default().with("type", "SchillerNaumann");
//! let drag = Drag::create(&dict, &key).unwrap();
//! assert_eq!(drag.type_name(), "SchillerNaumann");
//!
//! let unknown = Dict::default().with("type", "Unknown");
//! let err = Drag::create(&unknown, &key).unwrap_err();
//! assert!(err.to_string().contains("SchillerNaumann"));
//! ```

pub mod aspect_ratio;
pub mod blended;
pub mod blending;
pub mod catalog;
pub mod dict;
pub mod drag;
pub mod error;
pub mod factory;
pub mod heat_transfer;
pub mod lift;
pub mod mass_transfer;
pub mod surface_tension;
pub mod table;
pub mod virtual_mass;
pub mod wall_damping;

pub use aspect_ratio::{AspectRatio, AspectRatioModel, ConstantAspectRatio};
pub use blended::BlendedInterfacialModel;
pub use blending::{BlendingMethod, HyperbolicBlending, LinearBlending, NoBlending};
pub use catalog::{blending_types, model_types};
pub use dict::Dict;
pub use drag::{Drag, DragModel, SchillerNaumann, Stokes};
pub use error::{LookupError, LookupKind, ModelError, ModelResult};
pub use factory::{Constructor, Factory, ModelFamily};
pub use heat_transfer::{HeatTransfer, HeatTransferModel, RanzMarshall, SphericalHeatTransfer};
pub use lift::{ConstantLift, Lift, LiftModel};
pub use mass_transfer::{Frossling, MassTransfer, MassTransferModel, SphericalMassTransfer};
pub use surface_tension::{ConstantSurfaceTension, SurfaceTension, SurfaceTensionModel};
pub use table::{BlendedTable, ModelTable, SubModelTable, TwoSided, TwoSidedTable};
pub use virtual_mass::{ConstantVirtualMass, VirtualMass, VirtualMassModel};
pub use wall_damping::{
    DampingProfile, Interpolated, InterpolatedWallDamping, WallDamping, WallDampingModel,
};
