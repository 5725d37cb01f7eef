//! pf-core: stable foundation for phaseflow.
//!
//! Contains:
//! - units (uom SI types + constructors for phase properties)
//! - numeric (Real + tolerances + float helpers)
//! - ids (compact ids for phases, cells, faces and patches)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

pub use error::{PfError, PfResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
